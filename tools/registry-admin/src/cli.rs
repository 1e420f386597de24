//! Command-line arguments.

use clap::{Parser, Subcommand};
use governance_registry::prelude::{EventKind, ParameterKey, PrincipalId};
use std::path::PathBuf;

/// registry-admin: deploy and administer a governance registry
#[derive(Parser, Debug)]
#[command(name = "registry-admin", version)]
#[command(about = "Deploy and administer a governance registry")]
pub struct Cli {
    /// Directory holding the registry snapshot and deployment record
    /// (default: $REGISTRY_DATA_DIR or ./data)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Generate validator key files and validatorAccounts.json
    GenKeys {
        /// Number of accounts
        #[arg(short = 'n', long, default_value_t = 4)]
        count: usize,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Construct a new registry and authorize the initial admins
    Deploy {
        /// Key file of the deployer (becomes the owner)
        #[arg(long)]
        deployer_key: PathBuf,

        /// Principal to authorize right after construction (repeatable)
        #[arg(long = "admin")]
        admins: Vec<PrincipalId>,
    },

    /// Print the current owner
    Owner,

    /// Print whether a principal may write parameters
    IsAuthorized {
        /// Principal to check
        address: PrincipalId,
    },

    /// Print a parameter value (empty string if never set)
    GetParam {
        /// Parameter name; the key is keccak256(name)
        #[arg(required_unless_present = "raw_key", conflicts_with = "raw_key")]
        name: Option<String>,

        /// Raw 32-byte key in hex
        #[arg(long)]
        raw_key: Option<ParameterKey>,
    },

    /// Print journaled events
    Events {
        /// First sequence number to include
        #[arg(long, default_value_t = 0)]
        from: u64,

        /// Only these event kinds (repeatable)
        #[arg(long = "kind")]
        kinds: Vec<EventKind>,
    },

    /// Transfer ownership (owner only)
    TransferOwnership {
        /// Key file of the calling principal
        #[arg(long)]
        caller_key: PathBuf,

        /// New owner
        new_owner: PrincipalId,
    },

    /// Grant or revoke parameter-write authorization (owner only)
    Authorize {
        /// Key file of the calling principal
        #[arg(long)]
        caller_key: PathBuf,

        /// Entity to update
        entity: PrincipalId,

        /// Revoke instead of grant
        #[arg(long)]
        revoke: bool,
    },

    /// Write a parameter (authorized entities only)
    SetParam {
        /// Key file of the calling principal
        #[arg(long)]
        caller_key: PathBuf,

        /// Parameter name; the key is keccak256(name)
        name: String,

        /// Value to store
        value: String,
    },
}
