//! In-memory repository and proxy store benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mirrordb_bench::{generate_items, mixed_criteria};
use mirrordb_core::{
    Context, EntityId, EvictionConfig, MemoryRepository, MruPolicy, ProxyStore, Repository,
    StoreConfig,
};
use mirrordb_testkit::Item;
use std::sync::Arc;

/// Benchmark matching against the in-memory repository.
fn bench_memory_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("memory_match_all");
    let ctx = Context::new();
    let criteria = mixed_criteria();

    for count in [100, 1000, 10000].iter() {
        let repo = MemoryRepository::new(generate_items(*count));
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &repo, |b, repo| {
            b.iter(|| repo.match_all(&ctx, black_box(&criteria)).unwrap());
        });
    }
    group.finish();
}

/// Benchmark creates under an MRU bound.
fn bench_bounded_create(c: &mut Criterion) {
    let ctx = Context::new();
    let repo = MemoryRepository::<Item>::default().with_policy(MruPolicy::new(1000));

    c.bench_function("mru_create", |b| {
        b.iter(|| repo.create(&ctx, black_box(Item::new("a"))).unwrap());
    });
}

/// Benchmark warming a proxy store and reading through its mirror.
fn bench_proxy(c: &mut Criterion) {
    let mut group = c.benchmark_group("proxy_store");
    let ctx = Context::new();
    let remote = Arc::new(MemoryRepository::new(generate_items(1000)));

    group.throughput(Throughput::Elements(1000));
    group.bench_function("load_1000", |b| {
        b.iter(|| {
            let mut store = ProxyStore::<Item>::with_config(
                StoreConfig::new().cache_eviction(EvictionConfig::Lru(500)),
            );
            store.load(&ctx, remote.clone()).unwrap();
            store
        });
    });

    let mut store = ProxyStore::<Item>::new();
    store.load(&ctx, remote.clone()).unwrap();
    let id = EntityId::new("i500");
    group.bench_function("read_hit", |b| {
        b.iter(|| store.read(&ctx, black_box(&id)).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_memory_match, bench_bounded_create, bench_proxy);
criterion_main!(benches);
