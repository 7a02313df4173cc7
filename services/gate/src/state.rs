use std::sync::Arc;

use allowlist::{ClaimStore, FileBackedClaimStore, InMemoryClaimStore, MintGate};
use anyhow::{Context, Result};
use tracing::info;

use crate::config::GateConfig;

pub type SharedGate = Arc<MintGate<Box<dyn ClaimStore>>>;

#[derive(Clone)]
pub struct AppState {
    pub gate: SharedGate,
}

impl AppState {
    pub fn new(gate: MintGate<Box<dyn ClaimStore>>) -> Self {
        Self { gate: Arc::new(gate) }
    }

    pub fn from_config(cfg: &GateConfig) -> Result<Self> {
        let store: Box<dyn ClaimStore> = match &cfg.claims_path {
            Some(path) => {
                let store = FileBackedClaimStore::open(path)
                    .with_context(|| format!("Failed to open claim snapshot {}", path.display()))?;
                info!(
                    path = %path.display(),
                    claimed = store.claimed_count().unwrap_or(0),
                    "claims: file-backed"
                );
                Box::new(store)
            }
            None => {
                info!("claims: in-memory (not persisted)");
                Box::new(InMemoryClaimStore::new())
            }
        };

        Ok(Self::new(MintGate::with_store(cfg.merkle_root, cfg.hash, store)))
    }
}
