//! # Event Schema (Audit Trail)
//!
//! Topics and filters for the records in the event journal.
//! The event types themselves live in `domain::entities`.
//!
//! | Event | Topic | Emitted by |
//! |-------|-------|------------|
//! | `OwnershipTransferred` | `governance_registry.ownership_transferred` | `transfer_ownership` |
//! | `EntityAuthorized` | `governance_registry.entity_authorized` | `set_entity_authorization` |
//! | `ParameterSet` | `governance_registry.parameter_set` | `set_parameter` |

use crate::domain::entities::{EventRecord, RegistryEvent};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// EVENT TOPICS
// =============================================================================

/// Event topics for the governance registry.
pub mod topics {
    /// Ownership moved to a new principal.
    pub const OWNERSHIP_TRANSFERRED: &str = "governance_registry.ownership_transferred";

    /// An entity's authorization flag was set.
    pub const ENTITY_AUTHORIZED: &str = "governance_registry.entity_authorized";

    /// A parameter was written.
    pub const PARAMETER_SET: &str = "governance_registry.parameter_set";
}

impl RegistryEvent {
    /// Topic this event is published on.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        self.kind().topic()
    }

    /// Discriminant of this event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::OwnershipTransferred { .. } => EventKind::OwnershipTransferred,
            Self::EntityAuthorized { .. } => EventKind::EntityAuthorized,
            Self::ParameterSet { .. } => EventKind::ParameterSet,
        }
    }
}

// =============================================================================
// EVENT KIND
// =============================================================================

/// Event discriminant, used to filter the journal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// `OwnershipTransferred`
    OwnershipTransferred,
    /// `EntityAuthorized`
    EntityAuthorized,
    /// `ParameterSet`
    ParameterSet,
}

impl EventKind {
    /// Topic for this kind.
    #[must_use]
    pub fn topic(self) -> &'static str {
        match self {
            Self::OwnershipTransferred => topics::OWNERSHIP_TRANSFERRED,
            Self::EntityAuthorized => topics::ENTITY_AUTHORIZED,
            Self::ParameterSet => topics::PARAMETER_SET,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OwnershipTransferred => "OwnershipTransferred",
            Self::EntityAuthorized => "EntityAuthorized",
            Self::ParameterSet => "ParameterSet",
        };
        f.write_str(name)
    }
}

impl FromStr for EventKind {
    type Err = String;

    /// Accepts the event name (`ParameterSet`) or its snake-case form
    /// (`parameter_set`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OwnershipTransferred" | "ownership_transferred" => Ok(Self::OwnershipTransferred),
            "EntityAuthorized" | "entity_authorized" => Ok(Self::EntityAuthorized),
            "ParameterSet" | "parameter_set" => Ok(Self::ParameterSet),
            other => Err(format!("unknown event kind: {other}")),
        }
    }
}

// =============================================================================
// EVENT FILTER
// =============================================================================

/// Selects journal records by kind.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    kinds: Vec<EventKind>,
}

impl EventFilter {
    /// Filter that matches every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter that matches only the given kinds.
    #[must_use]
    pub fn kinds(kinds: impl IntoIterator<Item = EventKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Whether `record` passes this filter.
    #[must_use]
    pub fn matches(&self, record: &EventRecord) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&record.event.kind())
    }
}

// =============================================================================
// TESTS
// =============================================================================
