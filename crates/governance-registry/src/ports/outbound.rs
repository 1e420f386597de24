//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the registry depends on:
//! - Snapshot persistence
//! - Key generation for principals
//!
//! Adapters in `crate::adapters` implement them.

use crate::domain::entities::RegistrySnapshot;
use crate::domain::value_objects::PrincipalId;
use crate::errors::{KeyError, SnapshotError};
use async_trait::async_trait;
use std::fmt;

// =============================================================================
// SNAPSHOT STORE
// =============================================================================

/// Durable storage for the full registry state and journal.
///
/// ## Implementation Notes
///
/// `save` must be atomic: after a failed save, `load` returns the previous
/// snapshot (or `NotFound`), never a partially written one.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the most recently saved snapshot.
    ///
    /// # Returns
    ///
    /// * `Err(SnapshotError::NotFound)` - If nothing has been saved yet
    async fn load(&self) -> Result<RegistrySnapshot, SnapshotError>;

    /// Replace the stored snapshot.
    async fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), SnapshotError>;

    /// Whether a snapshot has been saved.
    async fn exists(&self) -> bool {
        self.load().await.is_ok()
    }
}

// =============================================================================
// KEY GENERATOR
// =============================================================================

/// A principal together with the secret that proves it.
#[derive(Clone, PartialEq, Eq)]
pub struct PrincipalKeyPair {
    /// Principal derived from the secret.
    pub principal: PrincipalId,
    /// `0x`-prefixed hex secret.
    pub secret: String,
}

impl fmt::Debug for PrincipalKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrincipalKeyPair")
            .field("principal", &self.principal)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Source of `(principal, credential)` pairs for deployers and test callers.
pub trait KeyGenerator: Send + Sync {
    /// Generate a fresh key pair.
    fn generate(&self) -> Result<PrincipalKeyPair, KeyError>;

    /// Recover the principal a secret belongs to.
    fn principal_from_secret(&self, secret: &str) -> Result<PrincipalId, KeyError>;
}

// =============================================================================
// TESTS
// =============================================================================
