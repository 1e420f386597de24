//! # Registry State Machine
//!
//! Owner, authorized-entity flags and parameters, plus the access checks
//! that gate every mutation. Pure and synchronous: callers provide
//! serialization (see `service.rs`).
//!
//! Every mutating method validates first and mutates second, so an `Err`
//! return never leaves a partial change behind.

use crate::domain::entities::RegistryEvent;
use crate::domain::value_objects::{ParameterKey, PrincipalId};
use crate::errors::RegistryError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// CALLS
// =============================================================================

/// A mutating call, as submitted by a principal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryCall {
    /// `transferOwnership(newOwner)`
    TransferOwnership {
        /// Proposed owner.
        new_owner: PrincipalId,
    },
    /// `setEntityAuthorization(entity, authorized)`
    SetEntityAuthorization {
        /// Target entity.
        entity: PrincipalId,
        /// Flag to store.
        authorized: bool,
    },
    /// `setParameter(key, value)`
    SetParameter {
        /// Parameter key.
        key: ParameterKey,
        /// Value to store.
        value: String,
    },
}

impl RegistryCall {
    /// Operation name, used for spans and metric labels.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::TransferOwnership { .. } => "transfer_ownership",
            Self::SetEntityAuthorization { .. } => "set_entity_authorization",
            Self::SetParameter { .. } => "set_parameter",
        }
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// The governance registry state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceRegistry {
    owner: PrincipalId,
    authorized_entities: BTreeMap<PrincipalId, bool>,
    parameters: BTreeMap<ParameterKey, String>,
}

impl GovernanceRegistry {
    /// Constructs a registry owned and authorized by `deployer`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `deployer` is the null principal.
    pub fn construct(deployer: PrincipalId) -> Result<Self, RegistryError> {
        if deployer.is_zero() {
            return Err(RegistryError::InvalidArgument(
                "deployer is the zero principal".to_string(),
            ));
        }

        let mut authorized_entities = BTreeMap::new();
        authorized_entities.insert(deployer, true);

        Ok(Self {
            owner: deployer,
            authorized_entities,
            parameters: BTreeMap::new(),
        })
    }

    /// Current owner.
    #[must_use]
    pub fn owner(&self) -> PrincipalId {
        self.owner
    }

    /// Authorization flag for `principal`; false when absent.
    #[must_use]
    pub fn is_authorized(&self, principal: PrincipalId) -> bool {
        self.authorized_entities
            .get(&principal)
            .copied()
            .unwrap_or(false)
    }

    /// Stored value for `key`; the empty string when never written.
    #[must_use]
    pub fn get_parameter(&self, key: &ParameterKey) -> &str {
        self.parameters.get(key).map_or("", String::as_str)
    }

    /// Every entity that has ever had a flag set, with its current flag.
    #[must_use]
    pub fn entity_flags(&self) -> &BTreeMap<PrincipalId, bool> {
        &self.authorized_entities
    }

    /// Entities whose flag is currently true.
    pub fn authorized_entities(&self) -> impl Iterator<Item = PrincipalId> + '_ {
        self.authorized_entities
            .iter()
            .filter(|(_, authorized)| **authorized)
            .map(|(entity, _)| *entity)
    }

    /// All stored parameters.
    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<ParameterKey, String> {
        &self.parameters
    }

    /// Moves ownership to `new_owner`.
    ///
    /// Authorization flags of both principals are left untouched.
    ///
    /// # Errors
    ///
    /// - `NotOwner` if `caller` is not the current owner.
    /// - `InvalidArgument` if `new_owner` is the null principal.
    pub fn transfer_ownership(
        &mut self,
        caller: PrincipalId,
        new_owner: PrincipalId,
    ) -> Result<RegistryEvent, RegistryError> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(RegistryError::InvalidArgument(
                "new owner is the zero principal".to_string(),
            ));
        }

        let previous_owner = self.owner;
        self.owner = new_owner;

        Ok(RegistryEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        })
    }

    /// Stores the authorization flag for `entity`.
    ///
    /// Setting the current value again is legal and emits again.
    ///
    /// # Errors
    ///
    /// `NotOwner` if `caller` is not the current owner.
    pub fn set_entity_authorization(
        &mut self,
        caller: PrincipalId,
        entity: PrincipalId,
        authorized: bool,
    ) -> Result<RegistryEvent, RegistryError> {
        self.require_owner(caller)?;
        self.authorized_entities.insert(entity, authorized);
        Ok(RegistryEvent::EntityAuthorized { entity, authorized })
    }

    /// Overwrites the value stored under `key`.
    ///
    /// # Errors
    ///
    /// `NotAuthorized` if `caller`'s flag is not true. Ownership alone
    /// does not grant this right.
    pub fn set_parameter(
        &mut self,
        caller: PrincipalId,
        key: ParameterKey,
        value: String,
    ) -> Result<RegistryEvent, RegistryError> {
        if !self.is_authorized(caller) {
            return Err(RegistryError::NotAuthorized { caller });
        }
        self.parameters.insert(key, value.clone());
        Ok(RegistryEvent::ParameterSet { key, value })
    }

    /// Dispatches a [`RegistryCall`] on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// Whatever the dispatched operation returns.
    pub fn apply(
        &mut self,
        caller: PrincipalId,
        call: RegistryCall,
    ) -> Result<RegistryEvent, RegistryError> {
        match call {
            RegistryCall::TransferOwnership { new_owner } => {
                self.transfer_ownership(caller, new_owner)
            }
            RegistryCall::SetEntityAuthorization { entity, authorized } => {
                self.set_entity_authorization(caller, entity, authorized)
            }
            RegistryCall::SetParameter { key, value } => self.set_parameter(caller, key, value),
        }
    }

    fn require_owner(&self, caller: PrincipalId) -> Result<(), RegistryError> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(RegistryError::NotOwner { caller })
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
