//! # Command Execution
//!
//! Every command opens the registry from the data directory, runs, and
//! returns a JSON document for `main` to print.

use crate::cli::Command;
use crate::config::{AdminConfig, SNAPSHOT_FILE};
use crate::deployment::DeploymentRecord;
use crate::keys::{generate_validator_accounts, read_principal};

use anyhow::{bail, Context, Result};
use governance_registry::prelude::*;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Run `command` against the registry described by `config`.
pub async fn execute(command: Command, config: &AdminConfig) -> Result<Value> {
    let keys = Secp256k1KeyGenerator::new();

    match command {
        Command::GenKeys { count, out_dir } => {
            let accounts = generate_validator_accounts(&keys, count, &out_dir)
                .await
                .context("failed to generate validator accounts")?;
            Ok(serde_json::to_value(accounts)?)
        }

        Command::Deploy {
            deployer_key,
            admins,
        } => deploy(&keys, &deployer_key, &admins, config).await,

        Command::Owner => {
            let service = open(config).await?;
            Ok(json!({ "owner": service.owner().await }))
        }

        Command::IsAuthorized { address } => {
            let service = open(config).await?;
            Ok(json!({
                "address": address,
                "authorized": service.is_authorized(address).await,
            }))
        }

        Command::GetParam { name, raw_key } => {
            let key = match (raw_key, name.as_deref()) {
                (Some(key), _) => key,
                (None, Some(name)) => parameter_key(name),
                (None, None) => bail!("either a parameter name or --raw-key is required"),
            };
            let service = open(config).await?;
            Ok(json!({
                "name": name,
                "key": key,
                "value": service.get_parameter(key).await,
            }))
        }

        Command::Events { from, kinds } => {
            let service = open(config).await?;
            let filter = if kinds.is_empty() {
                EventFilter::all()
            } else {
                EventFilter::kinds(kinds)
            };
            Ok(serde_json::to_value(service.events(&filter, from).await)?)
        }

        Command::TransferOwnership {
            caller_key,
            new_owner,
        } => {
            let caller = caller(&keys, &caller_key).await?;
            let service = open(config).await?;
            let record = service.transfer_ownership(caller, new_owner).await?;
            Ok(serde_json::to_value(record)?)
        }

        Command::Authorize {
            caller_key,
            entity,
            revoke,
        } => {
            let caller = caller(&keys, &caller_key).await?;
            let service = open(config).await?;
            let record = service
                .set_entity_authorization(caller, entity, !revoke)
                .await?;
            Ok(serde_json::to_value(record)?)
        }

        Command::SetParam {
            caller_key,
            name,
            value,
        } => {
            let caller = caller(&keys, &caller_key).await?;
            let service = open(config).await?;
            let record = service
                .set_parameter(caller, parameter_key(&name), value)
                .await?;
            Ok(serde_json::to_value(record)?)
        }
    }
}

/// Construct the registry and authorize each admin in memory, then write
/// the snapshot once and the deployment record last.
///
/// A snapshot without a record is left over from an interrupted deploy and
/// is overwritten.
async fn deploy(
    keys: &Secp256k1KeyGenerator,
    deployer_key: &Path,
    admins: &[PrincipalId],
    config: &AdminConfig,
) -> Result<Value> {
    let deployment_path = config.deployment_path();
    if tokio::fs::try_exists(&deployment_path).await? {
        bail!(
            "a registry is already deployed in {}",
            config.data_dir().display()
        );
    }

    let snapshot_path = config.snapshot_path();
    let store = JsonFileSnapshotStore::new(&snapshot_path);
    if store.exists().await {
        warn!(
            snapshot = %snapshot_path.display(),
            "Replacing snapshot left without a deployment record"
        );
    }

    let deployer = caller(keys, deployer_key).await?;
    let service = GovernanceRegistryService::new(deployer, service_config())
        .context("failed to deploy registry")?;

    for admin in admins {
        service
            .set_entity_authorization(deployer, *admin, true)
            .await
            .with_context(|| format!("failed to authorize {admin}"))?;
    }

    store
        .save(&service.snapshot().await)
        .await
        .with_context(|| format!("failed to write {}", snapshot_path.display()))?;

    let record = DeploymentRecord::new(
        deployer,
        chrono::Utc::now(),
        PathBuf::from(SNAPSHOT_FILE),
    );
    if let Err(e) = record.save(&deployment_path).await {
        if let Err(cleanup) = tokio::fs::remove_file(&snapshot_path).await {
            warn!(error = %cleanup, "Failed to remove snapshot of aborted deploy");
        }
        return Err(e.context("failed to write deployment record"));
    }

    info!(
        registry_id = %record.registry_id,
        owner = %deployer,
        admins = admins.len(),
        "Registry deployed"
    );

    Ok(json!({
        "deployment": record,
        "authorized": service.authorized_entities().await,
    }))
}

/// Restore the deployed registry from the data directory.
///
/// The recorded snapshot path is resolved against the data directory, so
/// the directory can be addressed from any working directory.
async fn open(config: &AdminConfig) -> Result<GovernanceRegistryService> {
    let deployment_path = config.deployment_path();
    if !tokio::fs::try_exists(&deployment_path).await? {
        bail!(
            "no registry deployed in {} (run `registry-admin deploy` first)",
            config.data_dir().display()
        );
    }

    let record = DeploymentRecord::load(&deployment_path)
        .await
        .context("failed to read deployment record")?;
    let snapshot_path = config.data_dir().join(&record.snapshot_path);
    let store = Arc::new(JsonFileSnapshotStore::new(&snapshot_path));

    GovernanceRegistryService::restore(store, service_config())
        .await
        .with_context(|| format!("failed to load {}", snapshot_path.display()))
}

async fn caller(keys: &Secp256k1KeyGenerator, key_file: &Path) -> Result<PrincipalId> {
    read_principal(keys, key_file)
        .await
        .with_context(|| format!("failed to load key {}", key_file.display()))
}

fn service_config() -> ServiceConfig {
    ServiceConfig {
        registry_name: "registry-admin".to_string(),
        ..ServiceConfig::default()
    }
}

// =============================================================================
// TESTS
// =============================================================================
