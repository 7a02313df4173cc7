use anyhow::{bail, Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use allowlist::{canonicalize_str, parse_root, verify_proof, GateError, MerkleProof};

use crate::build_bundle::HashArg;

#[derive(Args, Debug)]
pub struct Cli {
    /// Published root (0x + 64 hex chars)
    #[arg(short, long)]
    pub root: String,

    #[arg(short, long)]
    pub address: String,

    /// JSON array of sibling hashes
    #[arg(short, long)]
    pub proof: PathBuf,

    #[arg(long, value_enum, default_value_t = HashArg::Keccak256)]
    pub hash: HashArg,
}

pub fn run(cli: &Cli) -> Result<()> {
    let root = parse_root(&cli.root)?;
    let leaf = canonicalize_str(&cli.address)?;
    let json = fs::read_to_string(&cli.proof)
        .with_context(|| format!("Failed to read proof {}", cli.proof.display()))?;
    let siblings: Vec<String> = serde_json::from_str(&json).context("Invalid proof JSON")?;
    let proof = MerkleProof::from_hex(&siblings)?;

    let hash: allowlist::HashAlgorithm = cli.hash.into();
    if !verify_proof(&hash, &leaf, &proof, &root) {
        bail!(GateError::InvalidMerkleProof);
    }

    println!("ok: {} is included under {}", leaf, cli.root);
    Ok(())
}
