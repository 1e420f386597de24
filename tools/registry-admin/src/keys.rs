//! # Validator Key Files
//!
//! Generates principal key pairs for validators and admins, and reads a
//! caller's principal back from its key file.
//!
//! Layout written by [`generate_validator_accounts`]:
//!
//! ```text
//! <out-dir>/validator-1.key        0x<64 hex chars>
//! <out-dir>/validator-2.key
//! ...
//! <out-dir>/validatorAccounts.json [{ "validator": "validator-1", "address": "0x..." }, ...]
//! ```

use governance_registry::errors::KeyError;
use governance_registry::prelude::{KeyGenerator, PrincipalId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// File name of the account summary.
pub const ACCOUNTS_FILE: &str = "validatorAccounts.json";

/// One generated validator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorAccount {
    /// Account label, `validator-<i>`.
    pub validator: String,
    /// Derived principal.
    pub address: PrincipalId,
}

/// Path of the key file for `label`.
#[must_use]
pub fn key_path(out_dir: &Path, label: &str) -> PathBuf {
    out_dir.join(format!("{label}.key"))
}

/// Generate `count` key pairs, write one key file each plus the account
/// summary, and return the accounts in order.
pub async fn generate_validator_accounts(
    generator: &dyn KeyGenerator,
    count: usize,
    out_dir: &Path,
) -> Result<Vec<ValidatorAccount>, KeyError> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|e| KeyError::Io(format!("{}: {e}", out_dir.display())))?;

    let mut accounts = Vec::with_capacity(count);
    for i in 1..=count {
        let pair = generator.generate()?;
        let validator = format!("validator-{i}");
        let path = key_path(out_dir, &validator);

        write_secret(&path, &pair.secret)
            .await
            .map_err(|e| KeyError::Io(format!("{}: {e}", path.display())))?;
        registry_telemetry::metric_inc!(registry_telemetry::KEYS_GENERATED);
        debug!(validator = %validator, address = %pair.principal, "Key written");

        accounts.push(ValidatorAccount {
            validator,
            address: pair.principal,
        });
    }

    let summary =
        serde_json::to_string_pretty(&accounts).map_err(|e| KeyError::Io(e.to_string()))?;
    let summary_path = out_dir.join(ACCOUNTS_FILE);
    tokio::fs::write(&summary_path, summary)
        .await
        .map_err(|e| KeyError::Io(format!("{}: {e}", summary_path.display())))?;

    info!(count, out_dir = %out_dir.display(), "Validator accounts generated");
    Ok(accounts)
}

/// Write a secret key readable by the current user only.
async fn write_secret(path: &Path, secret: &str) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    // `mode` only applies on create; tighten a key file that already existed.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600)).await?;
    }
    file.write_all(secret.as_bytes()).await?;
    file.flush().await
}

/// Read a key file and derive its principal.
pub async fn read_principal(
    generator: &dyn KeyGenerator,
    path: &Path,
) -> Result<PrincipalId, KeyError> {
    let secret = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| KeyError::Io(format!("{}: {e}", path.display())))?;
    generator.principal_from_secret(&secret)
}
