//! # Error Types
//!
//! All error types for the governance registry.

use crate::domain::value_objects::PrincipalId;
use thiserror::Error;

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// Errors returned by registry operations.
///
/// A call that fails with any of these leaves the registry state and the
/// event journal exactly as they were before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller is not the current owner.
    #[error("GovernanceRegistry: caller is not the owner")]
    NotOwner {
        /// The rejected caller.
        caller: PrincipalId,
    },

    /// Caller is not an authorized entity.
    #[error("GovernanceRegistry: caller is not authorized")]
    NotAuthorized {
        /// The rejected caller.
        caller: PrincipalId,
    },

    /// Malformed argument (e.g. the null principal as new owner).
    #[error("GovernanceRegistry: invalid argument: {0}")]
    InvalidArgument(String),

    /// Snapshot persistence failed; the transition was not committed.
    #[error("snapshot error")]
    Snapshot(#[from] SnapshotError),

    /// A staged transition broke a state invariant and was discarded.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl RegistryError {
    /// Returns true if the caller lacked the required privilege.
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::NotOwner { .. } | Self::NotAuthorized { .. })
    }

    /// Short, stable label used for metrics and log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotOwner { .. } => "not_owner",
            Self::NotAuthorized { .. } => "not_authorized",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Snapshot(_) => "snapshot",
            Self::InvariantViolation(_) => "invariant_violation",
        }
    }
}

// =============================================================================
// SNAPSHOT ERRORS
// =============================================================================

/// Errors from the snapshot store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Filesystem failure.
    #[error("snapshot I/O failed: {0}")]
    Io(String),

    /// Encoding or decoding failed.
    #[error("snapshot serialization failed: {0}")]
    Serialization(String),

    /// The snapshot decoded but describes an impossible state.
    #[error("snapshot corrupted: {0}")]
    Corrupted(String),

    /// No snapshot has been written yet.
    #[error("no snapshot found")]
    NotFound,
}

// =============================================================================
// KEY ERRORS
// =============================================================================

/// Errors from key generation and key loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The secret is not a valid secp256k1 scalar.
    #[error("invalid secret key: {0}")]
    InvalidSecret(String),

    /// Reading or writing key material failed.
    #[error("key I/O failed: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================
