//! Claim storage trait and implementations

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};

use crate::{GateError, Hash32, Leaf, Result};

/// The set of leaves that have consumed their admission.
///
/// `try_claim` is the only mutation and must be an atomic insert-if-absent:
/// when several callers race on one leaf exactly one of them sees `true`.
pub trait ClaimStore: Send + Sync {
    fn is_claimed(&self, leaf: &Leaf) -> Result<bool>;

    /// Mark `leaf` claimed. Returns `false` if it already was.
    fn try_claim(&self, leaf: Leaf) -> Result<bool>;

    fn claimed_count(&self) -> Result<usize>;
}

impl<S: ClaimStore + ?Sized> ClaimStore for Box<S> {
    fn is_claimed(&self, leaf: &Leaf) -> Result<bool> {
        (**self).is_claimed(leaf)
    }

    fn try_claim(&self, leaf: Leaf) -> Result<bool> {
        (**self).try_claim(leaf)
    }

    fn claimed_count(&self) -> Result<usize> {
        (**self).claimed_count()
    }
}

fn poisoned() -> GateError {
    GateError::Storage("claim set lock poisoned".into())
}

/// In-memory claim set (for tests, demos and host-serialized deployments)
#[derive(Clone, Default)]
pub struct InMemoryClaimStore {
    claimed: Arc<RwLock<HashSet<Leaf>>>,
}

impl InMemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClaimStore for InMemoryClaimStore {
    fn is_claimed(&self, leaf: &Leaf) -> Result<bool> {
        let claimed = self.claimed.read().map_err(|_| poisoned())?;
        Ok(claimed.contains(leaf))
    }

    fn try_claim(&self, leaf: Leaf) -> Result<bool> {
        let mut claimed = self.claimed.write().map_err(|_| poisoned())?;
        Ok(claimed.insert(leaf))
    }

    fn claimed_count(&self) -> Result<usize> {
        let claimed = self.claimed.read().map_err(|_| poisoned())?;
        Ok(claimed.len())
    }
}

#[derive(Serialize, Deserialize)]
struct ClaimSnapshot {
    version: u32,
    claimed: Vec<Hash32>,
}

const SNAPSHOT_VERSION: u32 = 1;

/// Claim set persisted as a bincode snapshot.
///
/// Every successful claim rewrites the snapshot through a synced temp file
/// and a rename, so a crash leaves either the old or the new snapshot. If the
/// write fails the claim is rolled back in memory and the on-disk and
/// in-memory sets never diverge. Claims serialize on that write; it suits
/// allowlists whose claimed set stays in the thousands.
pub struct FileBackedClaimStore {
    path: PathBuf,
    claimed: Mutex<HashSet<Leaf>>,
}

impl FileBackedClaimStore {
    /// Open the snapshot at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let claimed = if path.exists() {
            let bytes = fs::read(&path).map_err(|e| GateError::Storage(e.to_string()))?;
            let snapshot: ClaimSnapshot = bincode::deserialize(&bytes)
                .map_err(|e| GateError::Serialization(e.to_string()))?;
            if snapshot.version != SNAPSHOT_VERSION {
                return Err(GateError::Storage(format!(
                    "unsupported snapshot version {}",
                    snapshot.version
                )));
            }
            snapshot.claimed.into_iter().map(Leaf::from_bytes).collect()
        } else {
            HashSet::new()
        };

        Ok(Self { path, claimed: Mutex::new(claimed) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, claimed: &HashSet<Leaf>) -> Result<()> {
        let mut leaves: Vec<Hash32> = claimed.iter().map(|l| *l.as_bytes()).collect();
        leaves.sort_unstable();
        let snapshot = ClaimSnapshot { version: SNAPSHOT_VERSION, claimed: leaves };
        let bytes = bincode::serialize(&snapshot)
            .map_err(|e| GateError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        write_synced(&tmp, &bytes).map_err(|e| GateError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| GateError::Storage(e.to_string()))?;
        sync_parent_dir(&self.path).map_err(|e| GateError::Storage(e.to_string()))?;
        Ok(())
    }
}

// The snapshot must be on disk before the rename makes it visible.
fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

// Makes the rename itself durable.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => File::open(dir)?.sync_all(),
        _ => File::open(".")?.sync_all(),
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl ClaimStore for FileBackedClaimStore {
    fn is_claimed(&self, leaf: &Leaf) -> Result<bool> {
        let claimed = self.claimed.lock().map_err(|_| poisoned())?;
        Ok(claimed.contains(leaf))
    }

    fn try_claim(&self, leaf: Leaf) -> Result<bool> {
        let mut claimed = self.claimed.lock().map_err(|_| poisoned())?;
        if !claimed.insert(leaf) {
            return Ok(false);
        }
        if let Err(e) = self.persist(&claimed) {
            claimed.remove(&leaf);
            return Err(e);
        }
        Ok(true)
    }

    fn claimed_count(&self) -> Result<usize> {
        let claimed = self.claimed.lock().map_err(|_| poisoned())?;
        Ok(claimed.len())
    }
}
