//! # Governance Registry Service
//!
//! Wraps the registry state machine for concurrent callers.
//!
//! ## Execution Model
//!
//! - One `tokio::sync::RwLock` guards the registry and its journal.
//! - Mutations hold the write lock for check → stage → verify → persist →
//!   commit → journal, so no other writer interleaves and no reader sees a
//!   half-applied call.
//! - Reads take the read lock and run concurrently with each other.
//! - A call is staged on a copy of the state. The live state is replaced
//!   only after invariants hold and the snapshot store accepted the
//!   staged snapshot; any failure before that leaves everything unchanged.

use crate::adapters::snapshot_store::validate_snapshot;
use crate::domain::entities::{EventJournal, EventRecord, RegistrySnapshot, SNAPSHOT_VERSION};
use crate::domain::invariants::check_all_invariants;
use crate::domain::registry::{GovernanceRegistry, RegistryCall};
use crate::domain::value_objects::{ParameterKey, PrincipalId};
use crate::errors::{RegistryError, SnapshotError};
use crate::events::EventFilter;
use crate::ports::inbound::{AuditTrail, GovernanceRegistryApi};
use crate::ports::outbound::SnapshotStore;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, instrument, warn};

/// Governance Registry Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Name used in spans and logs.
    pub registry_name: String,
    /// Persist a snapshot before committing each mutation (requires a store).
    pub persist_snapshots: bool,
    /// Buffer size of the live event feed.
    pub event_channel_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            registry_name: "governance-registry".to_string(),
            persist_snapshots: true,
            event_channel_capacity: 1024,
        }
    }
}

/// Statistics for the Governance Registry Service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Mutations committed.
    pub calls_committed: u64,
    /// Mutations rejected for any reason.
    pub calls_rejected: u64,
    /// Rejections caused by `NotOwner` / `NotAuthorized`.
    pub access_denied: u64,
    /// Rejections caused by the snapshot store.
    pub persistence_failures: u64,
    /// Average mutation latency in microseconds.
    pub avg_call_time_us: u64,
}

/// Registry state and its audit trail, guarded together.
struct RegistryCore {
    registry: GovernanceRegistry,
    journal: EventJournal,
}

/// The governance registry service.
///
/// This service:
/// 1. Serializes mutations and authorizes each against the current state
/// 2. Journals one event per committed mutation
/// 3. Publishes committed events to live subscribers
/// 4. Persists snapshots through an optional [`SnapshotStore`]
pub struct GovernanceRegistryService {
    config: ServiceConfig,
    core: RwLock<RegistryCore>,
    store: Option<Arc<dyn SnapshotStore>>,
    events_tx: broadcast::Sender<EventRecord>,
    stats: RwLock<ServiceStats>,
}

impl GovernanceRegistryService {
    fn from_parts(
        registry: GovernanceRegistry,
        journal: EventJournal,
        store: Option<Arc<dyn SnapshotStore>>,
        config: ServiceConfig,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(config.event_channel_capacity.max(1));
        Self {
            config,
            core: RwLock::new(RegistryCore { registry, journal }),
            store,
            events_tx,
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    /// Construct a registry owned by `deployer`, without persistence.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `deployer` is the null principal.
    pub fn new(deployer: PrincipalId, config: ServiceConfig) -> Result<Self, RegistryError> {
        let registry = GovernanceRegistry::construct(deployer)?;
        Ok(Self::from_parts(registry, EventJournal::new(), None, config))
    }

    /// Construct a registry owned by `deployer` and persist its initial
    /// snapshot to `store`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a null deployer, `Snapshot` if the initial
    /// save fails.
    #[instrument(skip(store, config), fields(registry = %config.registry_name))]
    pub async fn deploy(
        deployer: PrincipalId,
        store: Arc<dyn SnapshotStore>,
        config: ServiceConfig,
    ) -> Result<Self, RegistryError> {
        let registry = GovernanceRegistry::construct(deployer)?;
        let journal = EventJournal::new();

        if config.persist_snapshots {
            store
                .save(&RegistrySnapshot::capture(&registry, &journal))
                .await?;
        }

        info!(owner = %deployer, "Governance registry deployed");
        Ok(Self::from_parts(registry, journal, Some(store), config))
    }

    /// Rebuild a service from the snapshot held by `store`.
    ///
    /// # Errors
    ///
    /// `Snapshot` if the store is empty, unreadable, or the snapshot is
    /// inconsistent.
    #[instrument(skip(store, config), fields(registry = %config.registry_name))]
    pub async fn restore(
        store: Arc<dyn SnapshotStore>,
        config: ServiceConfig,
    ) -> Result<Self, RegistryError> {
        let snapshot = store.load().await?;
        validate_snapshot(&snapshot)?;

        let journal =
            EventJournal::from_records(snapshot.journal).map_err(SnapshotError::Corrupted)?;

        info!(
            owner = %snapshot.registry.owner(),
            events = journal.len(),
            "Governance registry restored"
        );
        Ok(Self::from_parts(snapshot.registry, journal, Some(store), config))
    }

    /// Service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Full state and journal as they are right now.
    pub async fn snapshot(&self) -> RegistrySnapshot {
        let core = self.core.read().await;
        RegistrySnapshot::capture(&core.registry, &core.journal)
    }

    /// Entities whose flag is currently true.
    pub async fn authorized_entities(&self) -> Vec<PrincipalId> {
        self.core.read().await.registry.authorized_entities().collect()
    }

    /// Journaled records with `sequence >= from` that pass `filter`.
    pub async fn events(&self, filter: &EventFilter, from: u64) -> Vec<EventRecord> {
        self.core
            .read()
            .await
            .journal
            .since(from)
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }

    /// Execute a mutating call on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// - `NotOwner` / `NotAuthorized` when the caller lacks the privilege
    /// - `InvalidArgument` for a malformed target
    /// - `Snapshot` when persistence failed
    /// - `InvariantViolation` when the staged state is inconsistent
    ///
    /// On any error the registry, the journal and the live feed are
    /// untouched.
    #[instrument(
        skip(self, caller, call),
        fields(registry = %self.config.registry_name, operation = call.operation(), caller = %caller)
    )]
    pub async fn execute(
        &self,
        caller: PrincipalId,
        call: RegistryCall,
    ) -> Result<EventRecord, RegistryError> {
        let operation = call.operation();
        let start = Instant::now();

        let result = self.execute_internal(caller, call).await;
        self.record_outcome(operation, &result, start.elapsed()).await;

        match &result {
            Ok(record) => info!(
                sequence = record.sequence,
                event = record.event.name(),
                "Registry call committed"
            ),
            Err(e) => warn!(error = %e, kind = e.kind(), "Registry call rejected"),
        }

        result
    }

    /// Internal mutation path; runs entirely under the write lock.
    async fn execute_internal(
        &self,
        caller: PrincipalId,
        call: RegistryCall,
    ) -> Result<EventRecord, RegistryError> {
        let mut core = self.core.write().await;

        let mut staged = core.registry.clone();
        let event = staged.apply(caller, call)?;

        let check = check_all_invariants(&core.registry, &staged, &event);
        if !check.is_ok() {
            return Err(RegistryError::InvariantViolation(check.describe()));
        }

        let record = EventRecord {
            sequence: core.journal.next_sequence(),
            event,
        };

        if let Some(store) = self.persisting_store() {
            let mut journal = core.journal.records().to_vec();
            journal.push(record.clone());
            let snapshot = RegistrySnapshot {
                version: SNAPSHOT_VERSION,
                registry: staged.clone(),
                journal,
            };
            store.save(&snapshot).await?;
        }

        core.registry = staged;
        let committed = core.journal.append(record.event);
        debug_assert_eq!(committed.sequence, record.sequence);

        #[cfg(feature = "metrics")]
        observe_state(&core.registry);

        // No subscribers is not an error
        let _ = self.events_tx.send(committed.clone());

        Ok(committed)
    }

    fn persisting_store(&self) -> Option<&Arc<dyn SnapshotStore>> {
        if self.config.persist_snapshots {
            self.store.as_ref()
        } else {
            None
        }
    }

    async fn record_outcome(
        &self,
        operation: &'static str,
        result: &Result<EventRecord, RegistryError>,
        elapsed: Duration,
    ) {
        let elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);

        {
            let mut stats = self.stats.write().await;
            match result {
                Ok(_) => stats.calls_committed += 1,
                Err(e) => {
                    stats.calls_rejected += 1;
                    if e.is_access_denied() {
                        stats.access_denied += 1;
                    }
                    if matches!(e, RegistryError::Snapshot(_)) {
                        stats.persistence_failures += 1;
                    }
                }
            }
            let total = stats.calls_committed + stats.calls_rejected;
            stats.avg_call_time_us = (stats.avg_call_time_us * (total - 1) + elapsed_us) / total;
        }

        #[cfg(feature = "metrics")]
        {
            let outcome = match result {
                Ok(_) => "committed",
                Err(e) => e.kind(),
            };
            registry_telemetry::metric_inc!(
                registry_telemetry::REGISTRY_CALLS,
                &[operation, outcome]
            );
            registry_telemetry::metric_observe!(
                registry_telemetry::REGISTRY_CALL_DURATION,
                elapsed.as_secs_f64()
            );
            if let Ok(record) = result {
                registry_telemetry::metric_inc!(
                    registry_telemetry::REGISTRY_EVENTS,
                    &[record.event.name()]
                );
            }
        }

        #[cfg(not(feature = "metrics"))]
        let _ = operation;
    }
}

#[cfg(feature = "metrics")]
fn observe_state(registry: &GovernanceRegistry) {
    registry_telemetry::AUTHORIZED_ENTITIES.set(registry.authorized_entities().count() as f64);
    registry_telemetry::PARAMETERS_STORED.set(registry.parameters().len() as f64);
}

/// Create an in-memory service owned by `owner` (for testing).
///
/// # Panics
///
/// If `owner` is the null principal.
#[must_use]
pub fn create_test_service(owner: PrincipalId) -> GovernanceRegistryService {
    GovernanceRegistryService::new(owner, ServiceConfig::default())
        .expect("test owner must be non-zero")
}

// =============================================================================
// GovernanceRegistryApi Implementation
// =============================================================================

#[async_trait]
impl GovernanceRegistryApi for GovernanceRegistryService {
    async fn owner(&self) -> PrincipalId {
        self.core.read().await.registry.owner()
    }

    async fn is_authorized(&self, principal: PrincipalId) -> bool {
        let authorized = self.core.read().await.registry.is_authorized(principal);
        debug!(principal = %principal, authorized, "isAuthorized");
        authorized
    }

    async fn transfer_ownership(
        &self,
        caller: PrincipalId,
        new_owner: PrincipalId,
    ) -> Result<EventRecord, RegistryError> {
        self.execute(caller, RegistryCall::TransferOwnership { new_owner })
            .await
    }

    async fn set_entity_authorization(
        &self,
        caller: PrincipalId,
        entity: PrincipalId,
        authorized: bool,
    ) -> Result<EventRecord, RegistryError> {
        self.execute(
            caller,
            RegistryCall::SetEntityAuthorization { entity, authorized },
        )
        .await
    }

    async fn set_parameter(
        &self,
        caller: PrincipalId,
        key: ParameterKey,
        value: String,
    ) -> Result<EventRecord, RegistryError> {
        self.execute(caller, RegistryCall::SetParameter { key, value })
            .await
    }

    async fn get_parameter(&self, key: ParameterKey) -> String {
        let value = self
            .core
            .read()
            .await
            .registry
            .get_parameter(&key)
            .to_string();
        debug!(key = %key, "getParameter");
        value
    }
}

#[async_trait]
impl AuditTrail for GovernanceRegistryService {
    async fn events_since(&self, from: u64) -> Vec<EventRecord> {
        self.events(&EventFilter::all(), from).await
    }

    fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.events_tx.subscribe()
    }
}

// =============================================================================
// TESTS
// =============================================================================
