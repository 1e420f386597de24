//! # Domain Invariants
//!
//! Checks run against a staged transition before it is committed, and
//! against snapshots when they are loaded.
//!
//! - Owner is never the null principal.
//! - A transition changes only what its event describes.
//! - The journal is gap-free from sequence 1.

use crate::domain::entities::{EventRecord, RegistryEvent};
use crate::domain::registry::GovernanceRegistry;
use std::fmt;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Owner must be a non-null principal.
#[must_use]
pub fn check_owner_invariant(registry: &GovernanceRegistry) -> bool {
    !registry.owner().is_zero()
}

/// The post-state differs from the pre-state exactly as `event` says.
#[must_use]
pub fn check_transition_invariant(
    before: &GovernanceRegistry,
    after: &GovernanceRegistry,
    event: &RegistryEvent,
) -> bool {
    match event {
        RegistryEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        } => {
            before.owner() == *previous_owner
                && after.owner() == *new_owner
                && before.entity_flags() == after.entity_flags()
                && before.parameters() == after.parameters()
        }
        RegistryEvent::EntityAuthorized { entity, authorized } => {
            let mut expected = before.entity_flags().clone();
            expected.insert(*entity, *authorized);
            before.owner() == after.owner()
                && after.entity_flags() == &expected
                && before.parameters() == after.parameters()
        }
        RegistryEvent::ParameterSet { key, value } => {
            let mut expected = before.parameters().clone();
            expected.insert(*key, value.clone());
            before.owner() == after.owner()
                && before.entity_flags() == after.entity_flags()
                && after.parameters() == &expected
        }
    }
}

/// Journal sequences are exactly `1..=n`.
#[must_use]
pub fn check_journal_invariant(records: &[EventRecord]) -> bool {
    records
        .iter()
        .enumerate()
        .all(|(index, record)| record.sequence == index as u64 + 1)
}

/// Check every invariant that applies to a staged transition.
#[must_use]
pub fn check_all_invariants(
    before: &GovernanceRegistry,
    after: &GovernanceRegistry,
    event: &RegistryEvent,
) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_owner_invariant(after) {
        violations.push(InvariantViolation::NullOwner);
    }

    if !check_transition_invariant(before, after, event) {
        violations.push(InvariantViolation::UndescribedChange {
            event: event.name(),
        });
    }

    InvariantCheckResult { violations }
}

/// Check the invariants that apply to a loaded snapshot.
#[must_use]
pub fn check_snapshot_invariants(
    registry: &GovernanceRegistry,
    journal: &[EventRecord],
) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_owner_invariant(registry) {
        violations.push(InvariantViolation::NullOwner);
    }

    if !check_journal_invariant(journal) {
        violations.push(InvariantViolation::JournalGap);
    }

    InvariantCheckResult { violations }
}

// =============================================================================
// RESULT TYPES
// =============================================================================

/// Outcome of an invariant check.
#[derive(Clone, Debug, Default)]
pub struct InvariantCheckResult {
    /// Violations found; empty when all invariants hold.
    pub violations: Vec<InvariantViolation>,
}

impl InvariantCheckResult {
    /// True if no invariant was violated.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// Human-readable summary of all violations.
    #[must_use]
    pub fn describe(&self) -> String {
        self.violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A single invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Owner became the null principal.
    NullOwner,
    /// State changed in a way the event does not describe.
    UndescribedChange {
        /// Name of the event the transition produced.
        event: &'static str,
    },
    /// Journal sequences are not contiguous from 1.
    JournalGap,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullOwner => write!(f, "owner is the zero principal"),
            Self::UndescribedChange { event } => {
                write!(f, "state change not described by {event}")
            }
            Self::JournalGap => write!(f, "journal sequence is not contiguous"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
