//! registry-admin: Governance Registry admin CLI
//!
//! Generates validator keys, deploys a registry into a data directory and
//! submits calls to it on behalf of principals identified by key files.
//!
//! ```text
//! registry-admin gen-keys --count 4 --out-dir keys
//! registry-admin deploy --deployer-key keys/validator-1.key --admin 0x...
//! registry-admin set-param --caller-key keys/validator-2.key maxValidators 21
//! registry-admin get-param maxValidators
//! registry-admin events --from 1 --kind ParameterSet
//! ```
//!
//! ## Data Directory
//!
//! | File | Written by | Contents |
//! |------|------------|----------|
//! | `registry.json` | every mutation | state and event journal |
//! | `deployment.json` | `deploy` | registry id, deployer, time, snapshot path |

pub mod cli;
pub mod commands;
pub mod config;
pub mod deployment;
pub mod keys;

pub use cli::{Cli, Command};
pub use commands::execute;
pub use config::AdminConfig;
pub use deployment::DeploymentRecord;
pub use keys::{generate_validator_accounts, read_principal, ValidatorAccount};
