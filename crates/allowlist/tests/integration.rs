use allowlist::{
    build_allowlist, canonicalize, verify_proof, FileBackedClaimStore, GateError, HashAlgorithm,
    InMemoryClaimStore, Leaf, MerkleProof, MerkleTree, MintGate, TreeOptions,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

fn random_addresses(n: usize) -> Vec<[u8; 20]> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| rng.gen::<[u8; 20]>()).collect()
}

fn leaves_of(addresses: &[[u8; 20]]) -> Vec<Leaf> {
    addresses.iter().map(|a| canonicalize(a).unwrap()).collect()
}

#[test]
fn test_whitelist_sale_scenario() {
    let accounts = random_addresses(10);
    let whitelisted = &accounts[..5];
    let outsider = accounts[5];

    let tree = MerkleTree::build(
        &HashAlgorithm::Keccak256,
        leaves_of(whitelisted),
        TreeOptions::default(),
    )
    .unwrap();
    let gate = MintGate::from_hex_root(
        &allowlist::encode_hash(&tree.root()),
        HashAlgorithm::Keccak256,
        InMemoryClaimStore::new(),
    )
    .unwrap();

    let proof = tree.proof(&canonicalize(&whitelisted[0]).unwrap()).unwrap();
    // the outsider was never part of the tree, so its computed proof is empty
    let outsider_proof = tree
        .proof(&canonicalize(&outsider).unwrap())
        .unwrap_or_default();

    assert!(gate.mint(&whitelisted[0], &proof).is_ok());

    let again = gate.mint(&whitelisted[0], &proof).unwrap_err();
    assert_eq!(again, GateError::AlreadyClaimed);
    assert_eq!(again.to_string(), "already claimed");

    let rejected = gate.mint(&outsider, &outsider_proof).unwrap_err();
    assert_eq!(rejected, GateError::InvalidMerkleProof);
    assert_eq!(rejected.to_string(), "invalid merkle proof");

    assert_eq!(gate.claimed_count().unwrap(), 1);
}

#[test]
fn test_inclusion_soundness_many_sizes() {
    for n in 1..=33 {
        let leaves = leaves_of(&random_addresses(n));
        for odd_node in [allowlist::OddNodePolicy::CarryUp, allowlist::OddNodePolicy::Duplicate] {
            let options = TreeOptions { odd_node, ..Default::default() };
            let tree = MerkleTree::build(&HashAlgorithm::Keccak256, leaves.clone(), options).unwrap();
            for leaf in &leaves {
                let proof = tree.proof(leaf).unwrap();
                assert!(
                    verify_proof(&HashAlgorithm::Keccak256, leaf, &proof, &tree.root()),
                    "leaf {leaf} failed in tree of {n}"
                );
            }
        }
    }
}

#[test]
fn test_exclusion_with_members_proofs() {
    let members = leaves_of(&random_addresses(16));
    let tree = MerkleTree::build(&HashAlgorithm::Keccak256, members.clone(), TreeOptions::default()).unwrap();
    let outsider = canonicalize(&[0xfe; 20]).unwrap();

    for member in &members {
        let proof = tree.proof(member).unwrap();
        assert!(!verify_proof(&HashAlgorithm::Keccak256, &outsider, &proof, &tree.root()));
    }
    assert!(!verify_proof(
        &HashAlgorithm::Keccak256,
        &outsider,
        &MerkleProof::default(),
        &tree.root()
    ));
}

#[test]
fn test_exclusion_with_tampered_proofs() {
    let members = leaves_of(&random_addresses(9));
    let tree = MerkleTree::build(&HashAlgorithm::Keccak256, members.clone(), TreeOptions::default()).unwrap();
    let mut rng = rand::thread_rng();

    for member in &members {
        let mut proof = tree.proof(member).unwrap();
        let level = rng.gen_range(0..proof.len());
        let byte = rng.gen_range(0..32);
        proof.siblings[level][byte] ^= 0x80;
        assert!(!verify_proof(&HashAlgorithm::Keccak256, member, &proof, &tree.root()));
    }
}

#[test]
fn test_order_independence() {
    let mut rng = rand::thread_rng();
    let leaves = leaves_of(&random_addresses(21));
    let reference = MerkleTree::build(&HashAlgorithm::Keccak256, leaves.clone(), TreeOptions::default())
        .unwrap()
        .root();

    for _ in 0..20 {
        let mut shuffled = leaves.clone();
        shuffled.shuffle(&mut rng);
        let tree = MerkleTree::build(&HashAlgorithm::Keccak256, shuffled, TreeOptions::default()).unwrap();
        assert_eq!(tree.root(), reference);
    }
}

#[test]
fn test_root_independent_of_duplicates_when_deduped() {
    let leaves = leaves_of(&random_addresses(7));
    let mut with_dups = leaves.clone();
    with_dups.extend_from_slice(&leaves[..3]);

    let a = MerkleTree::build(&HashAlgorithm::Keccak256, leaves, TreeOptions::default()).unwrap();
    let b = MerkleTree::build(&HashAlgorithm::Keccak256, with_dups, TreeOptions::default()).unwrap();
    assert_eq!(a.root(), b.root());
}

#[test]
fn test_at_most_once_for_every_member() {
    let addresses = random_addresses(12);
    let bundle = build_allowlist(&addresses, HashAlgorithm::Keccak256, TreeOptions::default()).unwrap();
    let gate = MintGate::new(bundle.root_hash().unwrap());

    for (address, entry) in addresses.iter().zip(&bundle.entries) {
        assert!(gate.mint(address, &entry.proof).is_ok());
        assert_eq!(gate.mint(address, &entry.proof), Err(GateError::AlreadyClaimed));
        assert_eq!(gate.mint(address, &MerkleProof::default()), Err(GateError::AlreadyClaimed));
    }
    assert_eq!(gate.claimed_count().unwrap(), addresses.len());
}

#[test]
fn test_validity_unaffected_by_other_claims() {
    let addresses = random_addresses(8);
    let bundle = build_allowlist(&addresses, HashAlgorithm::Blake3, TreeOptions::default()).unwrap();
    let root = bundle.root_hash().unwrap();
    let gate = MintGate::with_store(root, HashAlgorithm::Blake3, InMemoryClaimStore::new());

    let last = bundle.entries.last().unwrap();
    assert!(verify_proof(&HashAlgorithm::Blake3, &last.leaf, &last.proof, &root));

    for (address, entry) in addresses.iter().zip(&bundle.entries).take(7) {
        gate.mint(address, &entry.proof).unwrap();
    }

    assert!(verify_proof(&HashAlgorithm::Blake3, &last.leaf, &last.proof, &root));
    assert!(gate.mint(&addresses[7], &last.proof).is_ok());
}

#[test]
fn test_concurrent_claims_same_leaf() {
    let addresses = random_addresses(4);
    let bundle = build_allowlist(&addresses, HashAlgorithm::Keccak256, TreeOptions::default()).unwrap();
    let gate = Arc::new(MintGate::new(bundle.root_hash().unwrap()));
    let proof = bundle.entries[0].proof.clone();
    let caller = addresses[0];

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let gate = Arc::clone(&gate);
            let proof = proof.clone();
            std::thread::spawn(move || gate.mint(&caller, &proof))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let admitted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(admitted, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == GateError::AlreadyClaimed));
}

#[test]
fn test_concurrent_claims_different_leaves() {
    let addresses = random_addresses(32);
    let bundle = build_allowlist(&addresses, HashAlgorithm::Keccak256, TreeOptions::default()).unwrap();
    let gate = Arc::new(MintGate::new(bundle.root_hash().unwrap()));

    let handles: Vec<_> = addresses
        .iter()
        .zip(bundle.entries.iter())
        .map(|(address, entry)| {
            let gate = Arc::clone(&gate);
            let address = *address;
            let proof = entry.proof.clone();
            std::thread::spawn(move || gate.mint(&address, &proof))
        })
        .collect();

    for h in handles {
        assert!(h.join().unwrap().is_ok());
    }
    assert_eq!(gate.claimed_count().unwrap(), 32);
}

#[test]
fn test_file_backed_gate_remembers_claims() {
    let path = std::env::temp_dir().join(format!("allowlist-gate-{}.bin", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let addresses = random_addresses(5);
    let bundle = build_allowlist(&addresses, HashAlgorithm::Keccak256, TreeOptions::default()).unwrap();
    let root = bundle.root_hash().unwrap();

    {
        let store = FileBackedClaimStore::open(&path).unwrap();
        let gate = MintGate::with_store(root, HashAlgorithm::Keccak256, store);
        gate.mint(&addresses[0], &bundle.entries[0].proof).unwrap();
    }

    let store = FileBackedClaimStore::open(&path).unwrap();
    let gate = MintGate::with_store(root, HashAlgorithm::Keccak256, store);
    assert!(gate.is_claimed(&addresses[0]).unwrap());
    assert_eq!(
        gate.mint(&addresses[0], &bundle.entries[0].proof),
        Err(GateError::AlreadyClaimed)
    );
    assert!(gate.mint(&addresses[1], &bundle.entries[1].proof).is_ok());

    let _ = std::fs::remove_file(&path);
}
