//! # Governance Registry Benchmarks
//!
//! | Path | What is measured |
//! |------|------------------|
//! | `set_parameter` | stage, verify, commit, journal (in memory) |
//! | `set_parameter_persisted` | same plus a JSON snapshot write |
//! | `get_parameter` | read lock plus map lookup |
//! | `parameter_key` | keccak256 of a parameter name |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use governance_registry::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

const OWNER: PrincipalId = PrincipalId::new([0x01; 20]);

fn bench_set_parameter(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("registry-writes");
    group.measurement_time(Duration::from_secs(5));

    let service = create_test_service(OWNER);
    let key = parameter_key("maxBlockSize");
    group.bench_function("set_parameter", |b| {
        b.iter(|| {
            rt.block_on(service.set_parameter(OWNER, key, black_box("8000000".to_string())))
                .unwrap()
        })
    });

    let dir = tempfile::tempdir().unwrap();
    let persisted = rt
        .block_on(GovernanceRegistryService::deploy(
            OWNER,
            Arc::new(JsonFileSnapshotStore::new(dir.path().join("registry.json"))),
            ServiceConfig::default(),
        ))
        .unwrap();
    group.sample_size(20);
    group.bench_function("set_parameter_persisted", |b| {
        b.iter(|| {
            rt.block_on(persisted.set_parameter(OWNER, key, black_box("8000000".to_string())))
                .unwrap()
        })
    });

    group.finish();
}

fn bench_get_parameter(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("registry-reads");

    for size in [10usize, 1_000, 10_000] {
        let service = create_test_service(OWNER);
        rt.block_on(async {
            for i in 0..size {
                service
                    .set_parameter(OWNER, parameter_key(&format!("p{i}")), i.to_string())
                    .await
                    .unwrap();
            }
        });
        let key = parameter_key("p7");

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("get_parameter", size), &size, |b, _| {
            b.iter(|| rt.block_on(service.get_parameter(black_box(key))))
        });
    }

    group.finish();
}

fn bench_parameter_key(c: &mut Criterion) {
    c.bench_function("parameter_key", |b| {
        b.iter(|| parameter_key(black_box("governance.maxValidators")))
    });
}

criterion_group!(
    benches,
    bench_set_parameter,
    bench_get_parameter,
    bench_parameter_key
);
criterion_main!(benches);
