//! # Snapshot Store Adapters
//!
//! - `JsonFileSnapshotStore`: pretty JSON on disk, atomic replace.
//! - `InMemorySnapshotStore`: for tests and embedded use.

use crate::domain::entities::{RegistrySnapshot, SNAPSHOT_VERSION};
use crate::domain::invariants::check_snapshot_invariants;
use crate::errors::SnapshotError;
use crate::ports::outbound::SnapshotStore;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// Rejects snapshots that decode but describe an impossible registry.
pub fn validate_snapshot(snapshot: &RegistrySnapshot) -> Result<(), SnapshotError> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::Corrupted(format!(
            "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
            snapshot.version
        )));
    }

    let result = check_snapshot_invariants(&snapshot.registry, &snapshot.journal);
    if result.is_ok() {
        Ok(())
    } else {
        Err(SnapshotError::Corrupted(result.describe()))
    }
}

// =============================================================================
// JSON FILE STORE
// =============================================================================

/// Snapshot store backed by a single JSON file.
///
/// Writes go to `<path>.tmp` first and are renamed over `path`, so a crash
/// mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    /// Store at `path`. The parent directory is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn load(&self) -> Result<RegistrySnapshot, SnapshotError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(SnapshotError::NotFound),
            Err(e) => return Err(SnapshotError::Io(e.to_string())),
        };

        let snapshot: RegistrySnapshot = serde_json::from_slice(&raw)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;
        validate_snapshot(&snapshot)?;

        debug!(
            path = %self.path.display(),
            events = snapshot.journal.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), SnapshotError> {
        let encoded = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| SnapshotError::Io(e.to_string()))?;
            }
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &encoded)
            .await
            .map_err(|e| SnapshotError::Io(e.to_string()))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| SnapshotError::Io(e.to_string()))?;

        debug!(
            path = %self.path.display(),
            bytes = encoded.len(),
            "Snapshot saved"
        );
        Ok(())
    }

    async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// Snapshot store that keeps the last snapshot in memory.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshot: Mutex<Option<RegistrySnapshot>>,
}

impl InMemorySnapshotStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self) -> Result<RegistrySnapshot, SnapshotError> {
        self.snapshot
            .lock()
            .await
            .clone()
            .ok_or(SnapshotError::NotFound)
    }

    async fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), SnapshotError> {
        *self.snapshot.lock().await = Some(snapshot.clone());
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
