//! # Admin Configuration
//!
//! Where the registry lives on disk. Defaults, then environment, then
//! command-line flags.

use std::env;
use std::path::{Path, PathBuf};

/// File name of the registry snapshot inside the data directory.
pub const SNAPSHOT_FILE: &str = "registry.json";

/// File name of the deployment record inside the data directory.
pub const DEPLOYMENT_FILE: &str = "deployment.json";

/// Admin CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// Directory holding the snapshot and the deployment record.
    pub data_dir: PathBuf,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

impl AdminConfig {
    /// Create configuration from environment variables.
    ///
    /// - `REGISTRY_DATA_DIR`: Data directory (default: ./data)
    #[must_use]
    pub fn from_env() -> Self {
        env::var("REGISTRY_DATA_DIR")
            .map(|dir| Self {
                data_dir: PathBuf::from(dir),
            })
            .unwrap_or_default()
    }

    /// Apply a `--data-dir` override.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }

    /// Path of the registry snapshot.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    /// Path of the deployment record.
    #[must_use]
    pub fn deployment_path(&self) -> PathBuf {
        self.data_dir.join(DEPLOYMENT_FILE)
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
