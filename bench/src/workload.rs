//! Seeded dispatcher workloads.
//!
//! A [`Workload`] owns a tag registry, a dispatcher, and the listeners subscribed to it.
//! Everything random is drawn from a `ChaCha8Rng` seeded from the config, so two
//! workloads built from the same config are identical.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use rusty_events::{
    Delegate, Dispatcher, Event, Filter, Tag, TagFilter, diagnostics::NullSink, tag::Registry,
};
use rusty_macros::Payload;

/// Payload carried by a share of the generated events.
#[derive(Payload, Clone, Copy, Debug, Default)]
pub struct Damage {
    pub amount: u32,
}

/// Configuration for a dispatcher workload.
#[derive(Debug, Clone, Copy)]
pub struct WorkloadConfig {
    /// Number of subscriptions to register.
    pub subscriptions: usize,
    /// Number of segments in the deepest tags.
    pub depth: usize,
    /// Number of children per tag.
    pub fanout: usize,
    /// Share of subscriptions that require a [`Damage`] payload (0.0 to 1.0).
    pub payload_ratio: f64,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            subscriptions: 1_000,
            depth: 3,
            fanout: 4,
            payload_ratio: 0.25,
            seed: 12345,
        }
    }
}

/// A listener that counts deliveries.
#[derive(Debug, Default)]
pub struct Counter {
    hits: AtomicU64,
}

impl Counter {
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }
}

/// A populated dispatcher plus everything needed to drive it.
pub struct Workload {
    config: WorkloadConfig,
    registry: Registry,
    tags: Vec<Tag>,
    dispatcher: Dispatcher,
    listeners: Vec<Arc<Counter>>,
    rng: ChaCha8Rng,
}

impl Workload {
    pub fn new() -> Self {
        Self::with_config(WorkloadConfig::default())
    }

    /// Build the tag tree and register `config.subscriptions` subscriptions.
    pub fn with_config(config: WorkloadConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let registry = Registry::new();
        let tags = tag_tree(&registry, config.depth, config.fanout);
        let dispatcher = Dispatcher::builder()
            .capacity(config.subscriptions)
            .sink(NullSink)
            .build();

        let count = counter();
        let mut listeners = Vec::with_capacity(config.subscriptions);
        for _ in 0..config.subscriptions {
            let listener = Arc::new(Counter::default());
            let filter = random_filter(&mut rng, &tags, config.payload_ratio);
            if dispatcher.subscribe(&listener, filter, count.clone()).is_ok() {
                listeners.push(listener);
            }
        }

        Self {
            config,
            registry,
            tags,
            dispatcher,
            listeners,
            rng,
        }
    }

    #[inline]
    pub fn config(&self) -> &WorkloadConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Every tag in the generated tree.
    #[inline]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Total deliveries across all listeners.
    pub fn deliveries(&self) -> u64 {
        self.listeners.iter().map(|listener| listener.hits()).sum()
    }

    /// Draw a random event, half of them carrying a payload.
    pub fn next_event(&mut self) -> Event {
        let tag = self
            .tags
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| root_tag(&self.registry));
        let event = Event::new(tag);
        if self.rng.gen_bool(0.5) {
            event.with_payload(Damage {
                amount: self.rng.gen_range(1..100),
            })
        } else {
            event
        }
    }

    /// Publish `count` random events.
    pub fn publish(&mut self, count: usize) {
        for _ in 0..count {
            let event = self.next_event();
            self.dispatcher.publish(&event);
        }
    }

    /// Drop every `nth` listener so the next publish has something to evict.
    pub fn drop_every(&mut self, nth: usize) {
        let mut index = 0;
        self.listeners.retain(|_| {
            index += 1;
            nth == 0 || index % nth != 0
        });
    }

    /// Register fresh listeners until there are `config.subscriptions` again.
    pub fn refill(&mut self) {
        let count = counter();
        while self.dispatcher.len() < self.config.subscriptions {
            let listener = Arc::new(Counter::default());
            let filter = random_filter(&mut self.rng, &self.tags, self.config.payload_ratio);
            if self.dispatcher.subscribe(&listener, filter, count.clone()).is_err() {
                break;
            }
            self.listeners.push(listener);
        }
    }
}

impl Default for Workload {
    fn default() -> Self {
        Self::new()
    }
}

fn counter() -> Delegate<Counter> {
    Delegate::new(|counter: &Counter, _: &Event| {
        counter.hits.fetch_add(1, Ordering::Relaxed);
    })
}

fn root_tag(registry: &Registry) -> Tag {
    registry
        .register("Bench")
        .unwrap_or_else(|error| panic!("static tag is invalid: {error}"))
}

/// Register `fanout^1 + .. + fanout^depth` tags under a `Bench` root.
fn tag_tree(registry: &Registry, depth: usize, fanout: usize) -> Vec<Tag> {
    let mut tags = Vec::new();
    let mut level = vec![root_tag(registry)];
    for _ in 0..depth {
        let mut next = Vec::with_capacity(level.len() * fanout);
        for parent in &level {
            for child in 0..fanout {
                let name = format!("{parent}.N{child}");
                let tag = registry
                    .register(&name)
                    .unwrap_or_else(|error| panic!("generated tag is invalid: {error}"));
                next.push(tag);
            }
        }
        tags.extend(next.iter().cloned());
        level = next;
    }
    tags
}

fn random_filter(rng: &mut ChaCha8Rng, tags: &[Tag], payload_ratio: f64) -> Filter {
    let events = match (rng.gen_range(0..10), tags.choose(rng)) {
        (0, _) | (_, None) => TagFilter::any(),
        (1..=4, Some(tag)) => TagFilter::exact([tag.clone()]),
        (_, Some(tag)) => TagFilter::hierarchical([tag.clone()]),
    };
    let filter = Filter::events(events);
    if rng.gen_bool(payload_ratio.clamp(0.0, 1.0)) {
        filter.payload::<Damage>()
    } else {
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> WorkloadConfig {
        WorkloadConfig {
            subscriptions: 50,
            depth: 2,
            fanout: 3,
            ..Default::default()
        }
    }

    #[test]
    fn tag_tree_has_expected_size() {
        let workload = Workload::with_config(small());

        assert_eq!(workload.tags().len(), 3 + 9);
        // Root plus the generated tags.
        assert_eq!(workload.registry().len(), 1 + 3 + 9);
    }

    #[test]
    fn workload_registers_all_subscriptions() {
        let workload = Workload::with_config(small());

        assert_eq!(workload.dispatcher().len(), 50);
    }

    #[test]
    fn same_seed_gives_same_deliveries() {
        let mut a = Workload::with_config(small());
        let mut b = Workload::with_config(small());

        a.publish(100);
        b.publish(100);

        assert!(a.deliveries() > 0);
        assert_eq!(a.deliveries(), b.deliveries());
    }

    #[test]
    fn dropped_listeners_are_evicted_and_refilled() {
        // Given
        let mut workload = Workload::with_config(small());

        // When
        workload.drop_every(5);
        workload.publish(1);

        // Then
        assert_eq!(workload.dispatcher().len(), 40);
        workload.refill();
        assert_eq!(workload.dispatcher().len(), 50);
    }
}
