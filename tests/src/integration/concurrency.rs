//! # Concurrency
//!
//! Many tasks share one service on a multi-thread runtime. Checks that
//! writers serialize, journal sequences stay gap-free, and readers never
//! observe a partially applied call.

#[cfg(test)]
mod tests {
    use crate::principal;
    use governance_registry::prelude::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    const OWNER: u8 = 0x01;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_get_unique_sequences() {
        let service = Arc::new(create_test_service(principal(OWNER)));
        let writers: Vec<u8> = (0x10..0x18).collect();

        for &w in &writers {
            service
                .set_entity_authorization(principal(OWNER), principal(w), true)
                .await
                .unwrap();
        }

        let mut handles = Vec::new();
        for &w in &writers {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                let mut sequences = Vec::new();
                for i in 0..25 {
                    let record = service
                        .set_parameter(principal(w), parameter_key(&format!("{w}-{i}")), i.to_string())
                        .await
                        .unwrap();
                    sequences.push(record.sequence);
                }
                sequences
            }));
        }

        let mut all = BTreeSet::new();
        for handle in handles {
            for seq in handle.await.unwrap() {
                assert!(all.insert(seq), "sequence {seq} handed out twice");
            }
        }

        let authorizations = writers.len() as u64;
        let expected: BTreeSet<u64> = (authorizations + 1..=authorizations + 200).collect();
        assert_eq!(all, expected);

        let journal = service.events_since(0).await;
        assert_eq!(journal.len(), 208);
        assert!(journal
            .iter()
            .enumerate()
            .all(|(i, r)| r.sequence == i as u64 + 1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_never_see_half_applied_transfer() {
        let service = Arc::new(create_test_service(principal(OWNER)));
        let a = principal(0xaa);
        let b = principal(0xbb);

        // Ping-pong ownership between two principals while readers poll
        let writer = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service.transfer_ownership(principal(OWNER), a).await.unwrap();
                for _ in 0..100 {
                    service.transfer_ownership(a, b).await.unwrap();
                    service.transfer_ownership(b, a).await.unwrap();
                }
            })
        };

        let mut readers = Vec::new();
        for _ in 0..4 {
            let service = Arc::clone(&service);
            readers.push(tokio::spawn(async move {
                for _ in 0..200 {
                    let snapshot = service.snapshot().await;
                    let owner = snapshot.registry.owner();
                    assert!(!owner.is_zero());

                    // The last journaled transfer names the owner we see
                    let last_owner = snapshot
                        .journal
                        .iter()
                        .rev()
                        .find_map(|r| match r.event {
                            RegistryEvent::OwnershipTransferred { new_owner, .. } => Some(new_owner),
                            _ => None,
                        })
                        .unwrap_or(principal(OWNER));
                    assert_eq!(owner, last_owner);
                    tokio::task::yield_now().await;
                }
            }));
        }

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
        assert_eq!(service.owner().await, a);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_transfers_have_one_winner() {
        let service = Arc::new(create_test_service(principal(OWNER)));

        // Every task races to move ownership away from OWNER
        let mut handles = Vec::new();
        for target in 0x20..0x30u8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .transfer_ownership(principal(OWNER), principal(target))
                    .await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(e) => assert_eq!(e, RegistryError::NotOwner { caller: principal(OWNER) }),
            }
        }

        assert_eq!(winners, 1);
        assert_eq!(service.events_since(0).await.len(), 1);
        assert_eq!(service.stats().await.access_denied, 15);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_subscriber_sees_commits_in_journal_order() {
        let service = Arc::new(create_test_service(principal(OWNER)));
        let mut feed = service.subscribe();

        let mut handles = Vec::new();
        for i in 0..4u8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                for j in 0..10 {
                    service
                        .set_parameter(principal(OWNER), parameter_key(&format!("{i}/{j}")), "x".into())
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        for expected in 1..=40u64 {
            assert_eq!(feed.recv().await.unwrap().sequence, expected);
        }
    }
}
