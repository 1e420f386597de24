//! # Governance Registry
//!
//! An owner-administered registry of governance parameters. One owner
//! decides which entities may write parameters; authorized entities store
//! string values under 32-byte keys; anyone may read.
//!
//! ## Operations
//!
//! | Operation | Caller requirement | Failure | Event |
//! |-----------|--------------------|---------|-------|
//! | `construct(deployer)` | - | `InvalidArgument` for the null principal | - |
//! | `owner()` | any | - | - |
//! | `is_authorized(p)` | any | - | - |
//! | `transfer_ownership(new_owner)` | owner | `NotOwner`, `InvalidArgument` | `OwnershipTransferred` |
//! | `set_entity_authorization(e, flag)` | owner | `NotOwner` | `EntityAuthorized` |
//! | `set_parameter(key, value)` | authorized | `NotAuthorized` | `ParameterSet` |
//! | `get_parameter(key)` | any | - | - |
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Owner is never the null principal | `domain/invariants.rs` - `check_owner_invariant()` |
//! | The deployer is authorized at construction | `domain/registry.rs` - `construct()` |
//! | Each commit changes exactly what its event describes | `domain/invariants.rs` - `check_transition_invariant()` |
//! | Journal sequences are contiguous from 1 | `domain/invariants.rs` - `check_journal_invariant()` |
//! | Rejected calls change nothing | `service.rs` - staged commit in `execute()` |
//!
//! ## Layout
//!
//! | Layer | Location | Purpose |
//! |-------|----------|---------|
//! | Domain | `domain/` | State machine, identifiers, hashing, invariants |
//! | Ports | `ports/` | `GovernanceRegistryApi`, `AuditTrail`, `SnapshotStore`, `KeyGenerator` |
//! | Adapters | `adapters/` | JSON file / in-memory snapshot stores, secp256k1 keys |
//! | Service | `service.rs` | Concurrency, journaling, persistence, live feed |
//!
//! ## Usage Example
//!
//! ```ignore
//! use governance_registry::prelude::*;
//!
//! let service = GovernanceRegistryService::new(deployer, ServiceConfig::default())?;
//! service.set_entity_authorization(deployer, council, true).await?;
//! service
//!     .set_parameter(council, parameter_key("maxBlockSize"), "8000000".into())
//!     .await?;
//! assert_eq!(service.get_parameter(parameter_key("maxBlockSize")).await, "8000000");
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        EventJournal, EventRecord, RegistryEvent, RegistrySnapshot, SNAPSHOT_VERSION,
    };
    pub use crate::domain::registry::{GovernanceRegistry, RegistryCall};

    // Value objects
    pub use crate::domain::value_objects::{ParameterKey, ParseIdError, PrincipalId};

    // Domain services
    pub use crate::domain::services::{compute_registry_id, keccak256, parameter_key};

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, check_snapshot_invariants, InvariantCheckResult,
        InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::{AuditTrail, GovernanceRegistryApi};
    pub use crate::ports::outbound::{KeyGenerator, PrincipalKeyPair, SnapshotStore};

    // Events
    pub use crate::events::{topics, EventFilter, EventKind};

    // Errors
    pub use crate::errors::{KeyError, RegistryError, SnapshotError};

    // Adapters
    pub use crate::adapters::{
        principal_from_verifying_key, InMemorySnapshotStore, JsonFileSnapshotStore,
        Secp256k1KeyGenerator,
    };

    // Service
    pub use crate::service::{
        create_test_service, GovernanceRegistryService, ServiceConfig, ServiceStats,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
