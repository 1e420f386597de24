//! # Driving Ports (API - Inbound)
//!
//! The operation surface of the registry. Callers (the admin CLI, tests,
//! an embedding service) use these traits; `GovernanceRegistryService`
//! implements them.
//!
//! Every method takes the caller as an already-authenticated
//! [`PrincipalId`]. The registry authorizes; it never authenticates.

use crate::domain::entities::EventRecord;
use crate::domain::value_objects::{ParameterKey, PrincipalId};
use crate::errors::RegistryError;
use async_trait::async_trait;
use tokio::sync::broadcast;

// =============================================================================
// GOVERNANCE REGISTRY API (Primary Driving Port)
// =============================================================================

/// Primary API of the governance registry.
///
/// | Operation | Caller requirement | Event |
/// |-----------|--------------------|-------|
/// | `owner` | any | - |
/// | `is_authorized` | any | - |
/// | `transfer_ownership` | owner | `OwnershipTransferred` |
/// | `set_entity_authorization` | owner | `EntityAuthorized` |
/// | `set_parameter` | authorized entity | `ParameterSet` |
/// | `get_parameter` | any | - |
#[async_trait]
pub trait GovernanceRegistryApi: Send + Sync {
    /// Current owner.
    async fn owner(&self) -> PrincipalId;

    /// Whether `principal` may write parameters.
    async fn is_authorized(&self, principal: PrincipalId) -> bool;

    /// Move ownership to `new_owner`.
    ///
    /// # Returns
    ///
    /// * `EventRecord` - The journaled `OwnershipTransferred` event
    async fn transfer_ownership(
        &self,
        caller: PrincipalId,
        new_owner: PrincipalId,
    ) -> Result<EventRecord, RegistryError>;

    /// Grant or revoke parameter-write authorization for `entity`.
    ///
    /// # Returns
    ///
    /// * `EventRecord` - The journaled `EntityAuthorized` event
    async fn set_entity_authorization(
        &self,
        caller: PrincipalId,
        entity: PrincipalId,
        authorized: bool,
    ) -> Result<EventRecord, RegistryError>;

    /// Overwrite the parameter stored under `key`.
    ///
    /// # Returns
    ///
    /// * `EventRecord` - The journaled `ParameterSet` event
    async fn set_parameter(
        &self,
        caller: PrincipalId,
        key: ParameterKey,
        value: String,
    ) -> Result<EventRecord, RegistryError>;

    /// Value stored under `key`, or the empty string.
    async fn get_parameter(&self, key: ParameterKey) -> String;
}

// =============================================================================
// AUDIT TRAIL (Observer Port)
// =============================================================================

/// Read access to the event journal for indexers and other observers.
#[async_trait]
pub trait AuditTrail: Send + Sync {
    /// Journaled records with `sequence >= from`, in order.
    async fn events_since(&self, from: u64) -> Vec<EventRecord>;

    /// Live feed of records committed after the call.
    ///
    /// Slow receivers may observe `RecvError::Lagged`; they can catch up
    /// with [`AuditTrail::events_since`].
    fn subscribe(&self) -> broadcast::Receiver<EventRecord>;
}
