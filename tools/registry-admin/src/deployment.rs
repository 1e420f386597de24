//! # Deployment Record
//!
//! Written once by `deploy` next to the snapshot. Later commands use it
//! to confirm a registry exists in the data directory.

use chrono::{DateTime, Utc};
use governance_registry::prelude::{compute_registry_id, PrincipalId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where and by whom a registry was deployed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Identifier derived from the deployer and the deployment time.
    pub registry_id: PrincipalId,
    /// Principal that constructed the registry (its first owner).
    pub deployer: PrincipalId,
    /// Deployment time.
    pub deployed_at: DateTime<Utc>,
    /// Snapshot file of the registry, relative to the data directory.
    pub snapshot_path: PathBuf,
}

impl DeploymentRecord {
    /// Build a record, deriving the registry id.
    #[must_use]
    pub fn new(deployer: PrincipalId, deployed_at: DateTime<Utc>, snapshot_path: PathBuf) -> Self {
        let nanos = deployed_at
            .timestamp_nanos_opt()
            .and_then(|n| u128::try_from(n).ok())
            .unwrap_or_default();

        Self {
            registry_id: compute_registry_id(deployer, nanos),
            deployer,
            deployed_at,
            snapshot_path,
        }
    }

    /// Write the record as pretty JSON.
    pub async fn save(&self, path: &Path) -> anyhow::Result<()> {
        let encoded = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, encoded).await?;
        Ok(())
    }

    /// Read a record written by [`DeploymentRecord::save`].
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }
}
