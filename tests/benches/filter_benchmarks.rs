//! # Subscription Matching Benchmarks
//!
//! Cost of routing one event: a single filter check, and a full registry
//! scan as the number of subscriptions grows.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use eg_01_subscriptions::{matches, InMemorySubscriptionRegistry, SubscriptionRegistry};
use shared_types::{Endpoint, Event, EventSubscriptionFilter};

fn sample_event() -> Event {
    Event::new(
        "Microsoft.Storage.BlobCreated",
        "/blobServices/default/containers/images/blobs/cat.png",
    )
}

// ============================================================================
// Single filter
// ============================================================================

fn bench_filter_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter-match");
    let event = sample_event();

    let catch_all = EventSubscriptionFilter::all();
    group.bench_function("catch_all", |b| {
        b.iter(|| black_box(matches(&event, &catch_all)))
    });

    let types = EventSubscriptionFilter::for_types([
        "Microsoft.Storage.BlobDeleted",
        "Microsoft.Storage.BlobRenamed",
        "microsoft.storage.blobcreated",
    ]);
    group.bench_function("type_list", |b| {
        b.iter(|| black_box(matches(&event, &types)))
    });

    let insensitive = EventSubscriptionFilter::all()
        .with_subject_begins_with("/BLOBSERVICES/default/")
        .with_subject_ends_with(".PNG");
    group.bench_function("subject_insensitive", |b| {
        b.iter(|| black_box(matches(&event, &insensitive)))
    });

    let sensitive = insensitive.clone().case_sensitive(true);
    group.bench_function("subject_sensitive", |b| {
        b.iter(|| black_box(matches(&event, &sensitive)))
    });

    group.finish();
}

// ============================================================================
// Registry scan
// ============================================================================

fn populated_registry(size: usize) -> InMemorySubscriptionRegistry {
    let registry = InMemorySubscriptionRegistry::new();
    for i in 0..size {
        let Ok(endpoint) = Endpoint::parse(format!("http://localhost:9000/hook/{i}")) else {
            continue;
        };
        // Every other subscriber wants this event
        let filter = if i % 2 == 0 {
            EventSubscriptionFilter::all().with_subject_ends_with(".png")
        } else {
            EventSubscriptionFilter::for_types(["Microsoft.Storage.BlobDeleted"])
        };
        registry.register(endpoint, filter);
    }
    registry
}

fn bench_list_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry-list-matching");
    let event = sample_event();

    for size in [10, 100, 1_000, 10_000] {
        let registry = populated_registry(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &registry, |b, registry| {
            b.iter(|| black_box(registry.list_matching(&event)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_filter_match, bench_list_matching);
criterion_main!(benches);
