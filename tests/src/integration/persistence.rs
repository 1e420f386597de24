//! # Persistence
//!
//! Snapshot files on disk: restore after restart, rollback when a save
//! fails, refusal to load tampered snapshots.

#[cfg(test)]
mod tests {
    use crate::principal;
    use async_trait::async_trait;
    use governance_registry::prelude::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    const OWNER: u8 = 0x01;
    const ADMIN: u8 = 0x02;

    async fn deploy_at(path: &std::path::Path) -> GovernanceRegistryService {
        GovernanceRegistryService::deploy(
            principal(OWNER),
            Arc::new(JsonFileSnapshotStore::new(path)),
            ServiceConfig::default(),
        )
        .await
        .unwrap()
    }

    async fn restore_from(path: &std::path::Path) -> Result<GovernanceRegistryService, RegistryError> {
        GovernanceRegistryService::restore(
            Arc::new(JsonFileSnapshotStore::new(path)),
            ServiceConfig::default(),
        )
        .await
    }

    #[tokio::test]
    async fn test_restart_restores_state_and_journal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");

        let before = {
            let service = deploy_at(&path).await;
            service
                .set_entity_authorization(principal(OWNER), principal(ADMIN), true)
                .await
                .unwrap();
            service
                .set_parameter(principal(ADMIN), parameter_key("epochLength"), "32".into())
                .await
                .unwrap();
            service
                .transfer_ownership(principal(OWNER), principal(ADMIN))
                .await
                .unwrap();
            service.snapshot().await
        };

        let restored = restore_from(&path).await.unwrap();
        assert_eq!(restored.snapshot().await, before);
        assert_eq!(restored.owner().await, principal(ADMIN));
        assert_eq!(restored.get_parameter(parameter_key("epochLength")).await, "32");
        assert_eq!(restored.events_since(0).await.len(), 3);
    }

    #[tokio::test]
    async fn test_rejected_calls_are_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        let service = deploy_at(&path).await;
        let on_disk = std::fs::read(&path).unwrap();

        let _ = service
            .set_parameter(principal(ADMIN), parameter_key("k"), "v".into())
            .await;
        let _ = service
            .transfer_ownership(principal(ADMIN), principal(ADMIN))
            .await;

        assert_eq!(std::fs::read(&path).unwrap(), on_disk);
    }

    #[tokio::test]
    async fn test_snapshot_file_is_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        let service = deploy_at(&path).await;
        service
            .set_parameter(principal(OWNER), parameter_key("k"), "v".into())
            .await
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], SNAPSHOT_VERSION);
        assert_eq!(raw["registry"]["owner"], principal(OWNER).to_hex());
        assert_eq!(raw["journal"][0]["sequence"], 1);
        assert_eq!(raw["journal"][0]["event"]["event"], "ParameterSet");
        assert_eq!(raw["journal"][0]["event"]["value"], "v");
    }

    #[tokio::test]
    async fn test_tampered_owner_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        drop(deploy_at(&path).await);

        let mut raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        raw["registry"]["owner"] = serde_json::json!(PrincipalId::ZERO.to_hex());
        std::fs::write(&path, serde_json::to_vec(&raw).unwrap()).unwrap();

        let result = restore_from(&path).await;
        assert!(matches!(
            result,
            Err(RegistryError::Snapshot(SnapshotError::Corrupted(_)))
        ));
    }

    #[tokio::test]
    async fn test_restore_without_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let result = restore_from(&dir.path().join("missing.json")).await;
        assert!(matches!(
            result,
            Err(RegistryError::Snapshot(SnapshotError::NotFound))
        ));
    }

    /// File store that can be switched into failing mode.
    struct FlakyStore {
        inner: JsonFileSnapshotStore,
        failing: AtomicBool,
    }

    #[async_trait]
    impl SnapshotStore for FlakyStore {
        async fn load(&self) -> Result<RegistrySnapshot, SnapshotError> {
            self.inner.load().await
        }

        async fn save(&self, snapshot: &RegistrySnapshot) -> Result<(), SnapshotError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(SnapshotError::Io("disk full".into()));
            }
            self.inner.save(snapshot).await
        }
    }

    #[tokio::test]
    async fn test_failed_save_keeps_memory_and_disk_in_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.json");
        let store = Arc::new(FlakyStore {
            inner: JsonFileSnapshotStore::new(&path),
            failing: AtomicBool::new(false),
        });

        let service =
            GovernanceRegistryService::deploy(principal(OWNER), store.clone(), ServiceConfig::default())
                .await
                .unwrap();
        service
            .set_parameter(principal(OWNER), parameter_key("k"), "1".into())
            .await
            .unwrap();

        store.failing.store(true, Ordering::SeqCst);
        let err = service
            .set_parameter(principal(OWNER), parameter_key("k"), "2".into())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Snapshot(SnapshotError::Io(_))));
        assert_eq!(service.get_parameter(parameter_key("k")).await, "1");

        store.failing.store(false, Ordering::SeqCst);
        let record = service
            .set_parameter(principal(OWNER), parameter_key("k"), "3".into())
            .await
            .unwrap();
        assert_eq!(record.sequence, 2);

        let restored = restore_from(&path).await.unwrap();
        assert_eq!(restored.snapshot().await, service.snapshot().await);
    }
}
