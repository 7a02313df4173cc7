use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use allowlist::{parse_root, Hash32, HashAlgorithm};

#[derive(Clone, Debug)]
pub struct GateConfig {
    pub merkle_root: Hash32,
    pub hash: HashAlgorithm,
    pub bind_addr: String,
    pub claims_path: Option<PathBuf>,
}

impl GateConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GateConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_root = lookup("GATE_MERKLE_ROOT")
            .context("Missing required env var: GATE_MERKLE_ROOT")?;
        let merkle_root = parse_root(&raw_root).context("GATE_MERKLE_ROOT is not a valid root")?;

        let hash = lookup("GATE_HASH")
            .map(|v| v.parse::<HashAlgorithm>())
            .transpose()
            .context("GATE_HASH must be one of keccak256, blake3, sha256")?
            .unwrap_or_default();

        let bind_addr = lookup("GATE_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        if !bind_addr.contains(':') {
            bail!("GATE_BIND_ADDR must be host:port, got {bind_addr}");
        }

        let claims_path = lookup("GATE_CLAIMS_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            merkle_root,
            hash,
            bind_addr,
            claims_path,
        })
    }
}
