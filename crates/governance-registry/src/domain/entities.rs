//! # Core Domain Entities
//!
//! Events, the append-only journal that orders them, and the snapshot
//! that captures the full registry for persistence.

use crate::domain::registry::GovernanceRegistry;
use crate::domain::value_objects::{ParameterKey, PrincipalId};
use serde::{Deserialize, Serialize};

// =============================================================================
// REGISTRY EVENT
// =============================================================================

/// Record of one successful mutating transition.
///
/// Exactly one event is produced per committed call and none for a
/// rejected call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum RegistryEvent {
    /// Ownership moved from `previous_owner` to `new_owner`.
    OwnershipTransferred {
        /// Owner before the call.
        previous_owner: PrincipalId,
        /// Owner after the call.
        new_owner: PrincipalId,
    },
    /// An entity's authorization flag was set.
    EntityAuthorized {
        /// The entity whose flag changed (or was re-set).
        entity: PrincipalId,
        /// The stored flag.
        authorized: bool,
    },
    /// A parameter was written.
    ParameterSet {
        /// The parameter key.
        key: ParameterKey,
        /// The stored value.
        value: String,
    },
}

impl RegistryEvent {
    /// Event name as it appears in the audit trail.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
            Self::EntityAuthorized { .. } => "EntityAuthorized",
            Self::ParameterSet { .. } => "ParameterSet",
        }
    }
}

// =============================================================================
// EVENT RECORD & JOURNAL
// =============================================================================

/// A journaled event with its position in the audit trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// 1-based position in the journal.
    pub sequence: u64,
    /// The event itself.
    pub event: RegistryEvent,
}

/// Append-only, gap-free sequence of event records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventJournal {
    records: Vec<EventRecord>,
}

impl EventJournal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a journal from persisted records.
    ///
    /// Fails if sequences are not exactly `1..=n` in order.
    pub fn from_records(records: Vec<EventRecord>) -> Result<Self, String> {
        for (index, record) in records.iter().enumerate() {
            let expected = index as u64 + 1;
            if record.sequence != expected {
                return Err(format!(
                    "journal gap: expected sequence {expected}, found {}",
                    record.sequence
                ));
            }
        }
        Ok(Self { records })
    }

    /// Appends an event and returns the stored record.
    pub fn append(&mut self, event: RegistryEvent) -> EventRecord {
        let record = EventRecord {
            sequence: self.next_sequence(),
            event,
        };
        self.records.push(record.clone());
        record
    }

    /// Sequence number the next appended record will receive.
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.records.len() as u64 + 1
    }

    /// Records with `sequence >= from`.
    #[must_use]
    pub fn since(&self, from: u64) -> &[EventRecord] {
        let start = usize::try_from(from.saturating_sub(1))
            .unwrap_or(usize::MAX)
            .min(self.records.len());
        &self.records[start..]
    }

    /// All records in order.
    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing has been journaled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Full persisted form of a registry: state plus audit trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Format version.
    pub version: u32,
    /// Registry state.
    pub registry: GovernanceRegistry,
    /// Every event emitted since construction.
    pub journal: Vec<EventRecord>,
}

impl RegistrySnapshot {
    /// Captures a registry and its journal.
    #[must_use]
    pub fn capture(registry: &GovernanceRegistry, journal: &EventJournal) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            registry: registry.clone(),
            journal: journal.records().to_vec(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
