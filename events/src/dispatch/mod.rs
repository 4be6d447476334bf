//! The subscription list and the publish loop.
//!
//! A [`Dispatcher`] owns an insertion-ordered list of subscriptions. Each subscription
//! holds a weak reference to its listener, an event filter, a domain filter, an optional
//! required payload type, and a delegate.
//!
//! # Publishing
//!
//! [`publish()`](Dispatcher::publish) walks the subscriptions newest first. For each one it
//! checks, in order and stopping at the first failure:
//!
//! 1. **Liveness**: a dead listener marks the subscription for eviction.
//! 2. **Event tag** against the event filter.
//! 3. **Domain tag** against the domain filter.
//! 4. **Payload** against the required payload type (reported when it fails).
//! 5. **Invoke** the delegate (reported when the listener can no longer be reached).
//!
//! Subscriptions found dead are evicted once the walk is done, keeping the order of the
//! survivors. Nothing that goes wrong for one subscription stops the walk, and nothing is
//! returned to the publisher.
//!
//! # Reentrancy
//!
//! Delegates may subscribe, unsubscribe, and publish from inside a publish. The walk runs
//! over a snapshot of the list taken when the publish started:
//!
//! - subscriptions added during the walk are not called by it,
//! - subscriptions removed during the walk are not called after their removal,
//! - a nested publish runs to completion, eviction included, before returning.
//!
//! # Thread Safety
//!
//! `Dispatcher` is `Send + Sync`. The list sits behind a mutex that is held to take the
//! snapshot and to apply removals, never while a delegate runs.
//!
//! # Example
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new();
//! let hud = Arc::new(Hud::default());
//!
//! dispatcher.subscribe(
//!     &hud,
//!     Filter::events(TagFilter::hierarchical([registry.register("Game")?])),
//!     Delegate::new(|hud: &Hud, event: &Event| hud.show(event.tag())),
//! )?;
//!
//! dispatcher.publish(&Event::new(registry.register("Game.PlayerDied")?));
//! ```

mod config;
mod error;
mod subscription;

use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use log::{debug, trace};

pub use config::{Builder, Config};
pub use error::{Error, Reason};
pub use subscription::{Filter, Handle};

use crate::{
    diagnostics::{Diagnostic, Sink},
    event::Event,
    listener::{AsListener, Delegate, ListenerRef},
    tag::TagContainer,
};
use subscription::{Check, Subscription};

static NEXT_DISPATCHER: AtomicU64 = AtomicU64::new(0);

/// Routes published events to matching subscriptions.
pub struct Dispatcher {
    id: u64,
    subscriptions: Mutex<Vec<Arc<Subscription>>>,
    next_handle: AtomicU64,
    config: Config,
    sink: Arc<dyn Sink>,
}

impl Dispatcher {
    /// A dispatcher with the default [`Config`] that reports to the log.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// A dispatcher with the given configuration that reports to the log.
    pub fn with_config(config: Config) -> Self {
        Self::builder().config(config).build()
    }

    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(crate) fn from_parts(config: Config, sink: Arc<dyn Sink>) -> Self {
        Self {
            id: NEXT_DISPATCHER.fetch_add(1, Ordering::Relaxed),
            subscriptions: Mutex::new(Vec::with_capacity(config.capacity)),
            next_handle: AtomicU64::new(0),
            config,
            sink,
        }
    }

    #[inline]
    pub fn config(&self) -> Config {
        self.config
    }

    /// Register `delegate` to be called on `listener` for events passing `filter`.
    ///
    /// The dispatcher only keeps a weak reference to the listener. The same listener,
    /// filter and delegate may be registered any number of times; each registration is
    /// independent and each one fires.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegistration`] and registers nothing if the listener is not
    /// alive or the delegate is unbound. The problem is also reported to the sink.
    pub fn subscribe<L, R>(
        &self,
        listener: &R,
        filter: Filter,
        delegate: Delegate<L>,
    ) -> Result<Handle, Error>
    where
        L: Send + Sync + 'static,
        R: AsListener<L> + ?Sized,
    {
        let weak = listener.as_weak();
        let reference = ListenerRef::new(&weak);

        let reason = if !reference.is_alive() {
            Some(Reason::DeadListener)
        } else if !delegate.is_bound() {
            Some(Reason::UnboundDelegate)
        } else {
            None
        };
        if let Some(reason) = reason {
            let error = Error::InvalidRegistration(reason);
            self.report(None, reference.type_name(), error);
            return Err(error);
        }

        let handle = Handle::new(self.id, self.next_handle.fetch_add(1, Ordering::Relaxed));
        let subscription = Subscription::new(handle, &weak, filter, delegate);
        debug!("Subscribed listener {} as {}", reference.type_name(), handle);
        self.lock().push(Arc::new(subscription));
        Ok(handle)
    }

    /// Deliver `event` to every live subscription that matches it, newest first.
    pub fn publish(&self, event: &Event) {
        let snapshot = self.snapshot();
        trace!("Publishing {} to {} subscriptions", event.tag(), snapshot.len());

        let mut dead = HashSet::new();
        for subscription in snapshot.iter().rev() {
            // Removed while this walk was in progress.
            if !subscription.is_live() {
                continue;
            }

            let listener = subscription.listener();
            if !listener.is_alive() {
                dead.insert(subscription.handle());
                continue;
            }

            match subscription.filter().check(event) {
                Check::Passed => {}
                Check::Filtered => continue,
                Check::Rejected(error) => {
                    self.report(Some(subscription.handle()), listener.type_name(), error);
                    continue;
                }
            }

            if !subscription.invoke(event) {
                self.report(
                    Some(subscription.handle()),
                    listener.type_name(),
                    Error::DeliveryFailure,
                );
            }
        }

        if !dead.is_empty() {
            self.evict(&dead);
        }
    }

    /// Remove every subscription of `listener` that was made with `delegate`.
    ///
    /// Removing a pair that is not subscribed does nothing.
    pub fn unsubscribe<L, R>(&self, listener: &R, delegate: &Delegate<L>)
    where
        L: Send + Sync + 'static,
        R: AsListener<L> + ?Sized,
    {
        let reference = ListenerRef::new(&listener.as_weak());
        self.remove_where(|subscription| {
            subscription.listener().same_listener(&reference) && subscription.is_bound_to(delegate)
        });
    }

    /// Remove the subscriptions of `listener` whose event filter intersects `events` and
    /// whose domain filter intersects `domains`.
    ///
    /// An empty `events` or `domains` places no restriction on that dimension. Removing
    /// nothing is not an error.
    pub fn unsubscribe_filtered<L, R>(
        &self,
        listener: &R,
        events: &TagContainer,
        domains: &TagContainer,
    ) where
        L: Send + Sync + 'static,
        R: AsListener<L> + ?Sized,
    {
        let reference = ListenerRef::new(&listener.as_weak());
        self.remove_where(|subscription| {
            let filter = subscription.filter();
            subscription.listener().same_listener(&reference)
                && (events.is_empty() || filter.event_filter().intersects(events))
                && (domains.is_empty() || filter.domain_filter().intersects(domains))
        });
    }

    /// Remove every subscription of `listener`. Returns how many were removed.
    pub fn unsubscribe_listener<L, R>(&self, listener: &R) -> usize
    where
        L: Send + Sync + 'static,
        R: AsListener<L> + ?Sized,
    {
        let reference = ListenerRef::new(&listener.as_weak());
        self.remove_where(|subscription| subscription.listener().same_listener(&reference))
            .len()
    }

    /// Remove one subscription. Returns `false` if it was not registered.
    pub fn unsubscribe_handle(&self, handle: Handle) -> bool {
        !self.remove_where(|subscription| subscription.handle() == handle).is_empty()
    }

    /// `true` if the subscription is still registered.
    ///
    /// A subscription whose listener died stays registered until the next publish.
    pub fn contains(&self, handle: Handle) -> bool {
        self.lock()
            .iter()
            .any(|subscription| subscription.handle() == handle)
    }

    /// Number of registered subscriptions, including ones not yet found dead.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove every subscription.
    pub fn clear(&self) {
        self.remove_where(|_| true);
    }

    fn snapshot(&self) -> Vec<Arc<Subscription>> {
        self.lock().clone()
    }

    /// Remove the subscriptions found dead by a walk.
    ///
    /// Overlapping walks can find the same subscription dead. Only the walk that actually
    /// removes it reports it.
    fn evict(&self, dead: &HashSet<Handle>) {
        let evicted = self.remove_where(|subscription| dead.contains(&subscription.handle()));
        if evicted.is_empty() {
            return;
        }
        if self.config.report_stale {
            for subscription in &evicted {
                self.report(
                    Some(subscription.handle()),
                    subscription.listener().type_name(),
                    Error::StaleListener,
                );
            }
        }
        debug!("Evicted {} subscriptions of dead listeners", evicted.len());
    }

    /// Remove and kill matching subscriptions, keeping the order of the rest.
    fn remove_where(
        &self,
        mut predicate: impl FnMut(&Subscription) -> bool,
    ) -> Vec<Arc<Subscription>> {
        let mut removed = Vec::new();
        self.lock().retain(|subscription| {
            if predicate(subscription.as_ref()) {
                subscription.kill();
                removed.push(Arc::clone(subscription));
                false
            } else {
                true
            }
        });
        removed
    }

    fn report(&self, handle: Option<Handle>, listener: &'static str, error: Error) {
        self.sink.record(Diagnostic {
            handle,
            listener,
            error,
        });
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<Subscription>>> {
        // Delegates never run under the lock, so a poisoned list is still consistent.
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("subscriptions", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
