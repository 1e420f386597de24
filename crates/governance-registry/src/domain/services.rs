//! # Domain Services
//!
//! Stateless hashing helpers shared by the registry and its callers.

use crate::domain::value_objects::{ParameterKey, PrincipalId};
use sha3::{Digest, Keccak256};

/// Computes keccak256 hash of data.
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Derives the parameter key for a human-readable name.
///
/// keccak256 of the UTF-8 bytes of `name`.
#[must_use]
pub fn parameter_key(name: &str) -> ParameterKey {
    ParameterKey::new(keccak256(name.as_bytes()))
}

/// Derives a registry identifier from its deployer and deployment time.
///
/// Identifier = keccak256(deployer ++ `nanos_be`)\[12:\]
#[must_use]
pub fn compute_registry_id(deployer: PrincipalId, deployed_at_nanos: u128) -> PrincipalId {
    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(deployer.as_bytes());
    data.extend_from_slice(&deployed_at_nanos.to_be_bytes());
    let hash = keccak256(&data);

    let mut id = [0u8; 20];
    id.copy_from_slice(&hash[12..]);
    PrincipalId::new(id)
}

// =============================================================================
// TESTS
// =============================================================================
