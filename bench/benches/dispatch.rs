//! Dispatcher microbenchmarks using Criterion.
//!
//! These benchmarks measure individual dispatcher operations in isolation:
//! - Subscribe
//! - Publish across growing subscription lists
//! - Publish with lazy eviction of dead listeners
//! - Tag matching

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rusty_bench::workload::{Counter, Workload, WorkloadConfig};
use rusty_events::{
    Delegate, Dispatcher, Event, Filter, TagFilter, diagnostics::NullSink, tag::Registry,
};

// =============================================================================
// Subscribe Benchmarks
// =============================================================================

fn bench_subscribe(c: &mut Criterion) {
    let mut group = c.benchmark_group("subscribe");
    let registry = Registry::new();
    let tag = registry.register("Game.PlayerDied").unwrap();

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("exact", count), &count, |b, &n| {
            let listeners: Vec<_> = (0..n).map(|_| Arc::new(Counter::default())).collect();
            let delegate = Delegate::new(|_: &Counter, _: &Event| {});
            b.iter(|| {
                let dispatcher = Dispatcher::builder().capacity(n).sink(NullSink).build();
                for listener in &listeners {
                    let filter = Filter::events(TagFilter::exact([tag.clone()]));
                    black_box(dispatcher.subscribe(listener, filter, delegate.clone()).ok());
                }
                dispatcher
            });
        });
    }

    group.finish();
}

// =============================================================================
// Publish Benchmarks
// =============================================================================

fn bench_publish(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish");

    for count in [100, 1_000, 10_000] {
        group.throughput(Throughput::Elements(1));

        group.bench_with_input(BenchmarkId::new("mixed_filters", count), &count, |b, &n| {
            let mut workload = Workload::with_config(WorkloadConfig {
                subscriptions: n,
                ..Default::default()
            });
            b.iter(|| {
                let event = workload.next_event();
                workload.dispatcher().publish(black_box(&event));
            });
        });

        group.bench_with_input(BenchmarkId::new("no_match", count), &count, |b, &n| {
            let workload = Workload::with_config(WorkloadConfig {
                subscriptions: n,
                payload_ratio: 0.0,
                ..Default::default()
            });
            let miss = workload.registry().register("Unrelated.Event").unwrap();
            let event = Event::new(miss);
            b.iter(|| {
                workload.dispatcher().publish(black_box(&event));
            });
        });
    }

    group.finish();
}

// =============================================================================
// Eviction Benchmarks
// =============================================================================

fn bench_eviction(c: &mut Criterion) {
    let mut group = c.benchmark_group("evict");

    for count in [1_000, 10_000] {
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("every_tenth", count), &count, |b, &n| {
            b.iter_batched(
                || {
                    let mut workload = Workload::with_config(WorkloadConfig {
                        subscriptions: n,
                        ..Default::default()
                    });
                    workload.drop_every(10);
                    workload
                },
                |mut workload| {
                    workload.publish(1);
                    workload
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Tag Benchmarks
// =============================================================================

fn bench_tags(c: &mut Criterion) {
    let mut group = c.benchmark_group("tags");
    let registry = Registry::new();
    let ancestor = registry.register("UI.Menu").unwrap();
    let descendant = registry.register("UI.Menu.Options.Audio.Volume").unwrap();
    let sibling = registry.register("UI.MenuBar.File").unwrap();

    group.bench_function("descendant", |b| {
        b.iter(|| black_box(&descendant).matches(black_box(&ancestor)));
    });

    group.bench_function("sibling_prefix", |b| {
        b.iter(|| black_box(&sibling).matches(black_box(&ancestor)));
    });

    group.bench_function("interned_equality", |b| {
        let again = registry.register("UI.Menu.Options.Audio.Volume").unwrap();
        b.iter(|| black_box(&descendant) == black_box(&again));
    });

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_subscribe,
    bench_publish,
    bench_eviction,
    bench_tags,
);

criterion_main!(benches);
