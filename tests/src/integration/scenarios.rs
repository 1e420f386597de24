//! # Registry Scenarios
//!
//! Each scenario starts from a fresh deployment by `O`, mirroring a
//! per-test redeploy.
//!
//! | # | Flow | Expectation |
//! |---|------|-------------|
//! | 1 | construct as `O` | `owner == O`, `O` authorized |
//! | 2 | `O` transfers to `A` | `owner == A`, `OwnershipTransferred(O, A)` |
//! | 3 | unauthorized `A` sets `k` | `NotAuthorized`, `k` reads `""` |
//! | 4 | `O` authorizes `A`, `A` sets `k = v` | `ParameterSet(k, v)`, `k` reads `v` |
//! | 5 | non-owner `B` transfers to `C` | `NotOwner`, owner unchanged |
//! | 6 | read a never-set key | `""` |

#[cfg(test)]
mod tests {
    use crate::principal;
    use governance_registry::prelude::*;
    use proptest::prelude::*;

    const O: u8 = 0x0f;
    const A: u8 = 0x0a;
    const B: u8 = 0x0b;
    const C: u8 = 0x0c;

    fn deploy() -> GovernanceRegistryService {
        create_test_service(principal(O))
    }

    // =========================================================================
    // LITERAL SCENARIOS
    // =========================================================================

    #[tokio::test]
    async fn test_scenario_1_construction() {
        let registry = deploy();
        assert_eq!(registry.owner().await, principal(O));
        assert!(registry.is_authorized(principal(O)).await);
    }

    #[tokio::test]
    async fn test_scenario_2_transfer_ownership() {
        let registry = deploy();

        let record = registry
            .transfer_ownership(principal(O), principal(A))
            .await
            .unwrap();

        assert_eq!(registry.owner().await, principal(A));
        assert_eq!(
            record.event,
            RegistryEvent::OwnershipTransferred {
                previous_owner: principal(O),
                new_owner: principal(A),
            }
        );
    }

    #[tokio::test]
    async fn test_scenario_3_unauthorized_set_parameter() {
        let registry = deploy();

        let err = registry
            .set_parameter(principal(A), parameter_key("k"), "v".into())
            .await
            .unwrap_err();

        assert_eq!(err, RegistryError::NotAuthorized { caller: principal(A) });
        assert_eq!(err.to_string(), "GovernanceRegistry: caller is not authorized");
        assert_eq!(registry.get_parameter(parameter_key("k")).await, "");
    }

    #[tokio::test]
    async fn test_scenario_4_authorize_then_set_parameter() {
        let registry = deploy();

        registry
            .set_entity_authorization(principal(O), principal(A), true)
            .await
            .unwrap();
        let record = registry
            .set_parameter(principal(A), parameter_key("k"), "v".into())
            .await
            .unwrap();

        assert_eq!(
            record.event,
            RegistryEvent::ParameterSet {
                key: parameter_key("k"),
                value: "v".into(),
            }
        );
        assert_eq!(registry.get_parameter(parameter_key("k")).await, "v");
    }

    #[tokio::test]
    async fn test_scenario_5_non_owner_transfer() {
        let registry = deploy();

        let err = registry
            .transfer_ownership(principal(B), principal(C))
            .await
            .unwrap_err();

        assert_eq!(err, RegistryError::NotOwner { caller: principal(B) });
        assert_eq!(err.to_string(), "GovernanceRegistry: caller is not the owner");
        assert_eq!(registry.owner().await, principal(O));
    }

    #[tokio::test]
    async fn test_scenario_6_never_set_key() {
        let registry = deploy();
        assert_eq!(registry.get_parameter(parameter_key("never_set")).await, "");
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    #[tokio::test]
    async fn test_authorization_is_idempotent_and_not_deduplicated() {
        let registry = deploy();
        let mut feed = registry.subscribe();

        for _ in 0..2 {
            registry
                .set_entity_authorization(principal(O), principal(A), true)
                .await
                .unwrap();
            assert!(registry.is_authorized(principal(A)).await);
        }

        for expected in 1..=2 {
            let record = feed.recv().await.unwrap();
            assert_eq!(record.sequence, expected);
            assert_eq!(
                record.event,
                RegistryEvent::EntityAuthorized {
                    entity: principal(A),
                    authorized: true,
                }
            );
        }
    }

    #[tokio::test]
    async fn test_previous_owner_keeps_authorization_after_transfer() {
        let registry = deploy();
        registry
            .transfer_ownership(principal(O), principal(A))
            .await
            .unwrap();

        // O is no longer owner but may still write parameters
        assert!(registry.is_authorized(principal(O)).await);
        assert!(!registry.is_authorized(principal(A)).await);
        registry
            .set_parameter(principal(O), parameter_key("k"), "v".into())
            .await
            .unwrap();

        // A owns the registry but must authorize itself to write
        let err = registry
            .set_parameter(principal(A), parameter_key("k"), "w".into())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotAuthorized { .. }));

        registry
            .set_entity_authorization(principal(A), principal(A), true)
            .await
            .unwrap();
        registry
            .set_parameter(principal(A), parameter_key("k"), "w".into())
            .await
            .unwrap();
        assert_eq!(registry.get_parameter(parameter_key("k")).await, "w");
    }

    #[tokio::test]
    async fn test_deauthorized_owner_keeps_ownership() {
        let registry = deploy();
        registry
            .set_entity_authorization(principal(O), principal(O), false)
            .await
            .unwrap();

        assert_eq!(registry.owner().await, principal(O));
        assert!(!registry.is_authorized(principal(O)).await);
        assert!(matches!(
            registry
                .set_parameter(principal(O), parameter_key("k"), "v".into())
                .await,
            Err(RegistryError::NotAuthorized { .. })
        ));

        // Owner-only operations still work
        registry
            .set_entity_authorization(principal(O), principal(O), true)
            .await
            .unwrap();
        assert!(registry.is_authorized(principal(O)).await);
    }

    #[tokio::test]
    async fn test_transfer_to_null_principal_rejected() {
        let registry = deploy();
        let before = registry.snapshot().await;

        let err = registry
            .transfer_ownership(principal(O), PrincipalId::ZERO)
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::InvalidArgument(_)));
        assert_eq!(registry.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_empty_value_is_a_legal_write() {
        let registry = deploy();
        registry
            .set_parameter(principal(O), parameter_key("k"), "v".into())
            .await
            .unwrap();
        let record = registry
            .set_parameter(principal(O), parameter_key("k"), String::new())
            .await
            .unwrap();

        assert_eq!(record.sequence, 2);
        assert_eq!(registry.get_parameter(parameter_key("k")).await, "");
    }

    #[tokio::test]
    async fn test_api_usable_as_trait_object() {
        let registry: Box<dyn GovernanceRegistryApi> = Box::new(deploy());
        registry
            .set_parameter(principal(O), parameter_key("k"), "v".into())
            .await
            .unwrap();
        assert_eq!(registry.get_parameter(parameter_key("k")).await, "v");
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_non_owner_cannot_transfer(caller in 1u8..=255, target in 1u8..=255) {
            prop_assume!(caller != O);
            runtime().block_on(async {
                let registry = deploy();
                let result = registry.transfer_ownership(principal(caller), principal(target)).await;
                assert_eq!(result, Err(RegistryError::NotOwner { caller: principal(caller) }));
                assert_eq!(registry.owner().await, principal(O));
                assert!(registry.events_since(0).await.is_empty());
            });
        }

        #[test]
        fn prop_unauthorized_writes_change_nothing(
            caller in 1u8..=255,
            name in "[a-zA-Z]{1,12}",
            value in ".{0,32}",
        ) {
            prop_assume!(caller != O);
            runtime().block_on(async {
                let registry = deploy();
                registry
                    .set_parameter(principal(O), parameter_key(&name), "original".into())
                    .await
                    .unwrap();
                let before = registry.snapshot().await;

                let result = registry
                    .set_parameter(principal(caller), parameter_key(&name), value)
                    .await;

                assert!(matches!(result, Err(RegistryError::NotAuthorized { .. })));
                assert_eq!(registry.snapshot().await, before);
            });
        }

        #[test]
        fn prop_authorized_write_reads_back(
            writer in 1u8..=255,
            name in "[a-zA-Z_]{1,16}",
            value in ".{0,64}",
        ) {
            runtime().block_on(async {
                let registry = deploy();
                registry
                    .set_entity_authorization(principal(O), principal(writer), true)
                    .await
                    .unwrap();

                let key = parameter_key(&name);
                let record = registry
                    .set_parameter(principal(writer), key, value.clone())
                    .await
                    .unwrap();

                assert_eq!(record.event, RegistryEvent::ParameterSet { key, value: value.clone() });
                assert_eq!(registry.get_parameter(key).await, value);
            });
        }
    }
}
