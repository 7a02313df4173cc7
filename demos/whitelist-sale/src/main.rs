//! Whitelist sale walkthrough
//!
//! Shows:
//! 1. Publisher builds the allowlist offline and publishes only the root
//! 2. A member mints with their proof
//! 3. The same member tries again and is refused
//! 4. An outsider presents a proof and is refused

use allowlist::{build_allowlist, canonicalize, HashAlgorithm, MerkleTree, MintGate, TreeOptions};

fn account(i: u8) -> [u8; 20] {
    let mut a = [0u8; 20];
    a[0] = 0xa0;
    a[19] = i;
    a
}

fn main() {
    println!("=== Whitelist Sale ===\n");

    let whitelisted: Vec<[u8; 20]> = (0..5).map(account).collect();
    let outsider = account(0xb0);

    // 1. Offline build
    println!("--- Offline build ({} members) ---", whitelisted.len());
    let bundle = build_allowlist(&whitelisted, HashAlgorithm::Keccak256, TreeOptions::default())
        .expect("allowlist builds");
    println!("Merkle root: {}", bundle.root);
    for entry in &bundle.entries {
        println!("  {} -> {} siblings", entry.address, entry.proof.len());
    }

    let gate = MintGate::new(bundle.root_hash().expect("root parses"));

    // 2. Member mints
    println!("\n--- Member mint ---");
    let member = &bundle.entries[0];
    match gate.mint(&whitelisted[0], &member.proof) {
        Ok(admission) => println!("{} admitted (leaf {})", member.address, admission.leaf),
        Err(e) => println!("{} rejected: {}", member.address, e),
    }

    // 3. Replay
    println!("\n--- Replay ---");
    match gate.mint(&whitelisted[0], &member.proof) {
        Ok(_) => println!("admitted twice (BAD!)"),
        Err(e) => println!("rejected: {e}"),
    }

    // 4. Outsider computes a proof against the same tree
    println!("\n--- Outsider ---");
    let leaves = whitelisted.iter().map(|a| canonicalize(a).expect("20-byte address"));
    let tree = MerkleTree::build(&HashAlgorithm::Keccak256, leaves, TreeOptions::default())
        .expect("tree builds");
    let forged = tree
        .proof(&canonicalize(&outsider).expect("20-byte address"))
        .unwrap_or_default();
    match gate.mint(&outsider, &forged) {
        Ok(_) => println!("outsider admitted (BAD!)"),
        Err(e) => println!("0x{} rejected: {e}", hex::encode(outsider)),
    }

    // borrowing a member's proof does not help either
    match gate.mint(&outsider, &bundle.entries[1].proof) {
        Ok(_) => println!("outsider admitted (BAD!)"),
        Err(e) => println!("with a borrowed proof: {e}"),
    }

    println!("\nClaimed: {}", gate.claimed_count().unwrap_or(0));
}
