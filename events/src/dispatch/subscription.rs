use std::{
    fmt,
    sync::{
        Weak,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{
    dispatch::Error,
    event::Event,
    filter::TagFilter,
    listener::{Delegate, ListenerRef},
    payload::{Payload, PayloadType},
};

/// Identifies one registration in a dispatcher.
///
/// Handles carry the id of the dispatcher that issued them, so a handle never matches a
/// subscription of another dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle {
    dispatcher: u64,
    id: u64,
}

impl Handle {
    #[inline]
    pub(crate) const fn new(dispatcher: u64, id: u64) -> Self {
        Self { dispatcher, id }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.id)
    }
}

/// What a subscription wants to receive: an event filter, a domain filter, and an
/// optional required payload type.
///
/// ```rust,ignore
/// let filter = Filter::events(TagFilter::hierarchical([game]))
///     .domains(TagFilter::exact([domains_game]))
///     .payload::<PlayerDied>();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    events: TagFilter,
    domains: TagFilter,
    payload: Option<PayloadType>,
}

impl Filter {
    /// Accept every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept events whose tag passes `events`, from any domain.
    pub fn events(events: impl Into<TagFilter>) -> Self {
        Self {
            events: events.into(),
            ..Self::default()
        }
    }

    /// Restrict the domains.
    pub fn domains(mut self, domains: impl Into<TagFilter>) -> Self {
        self.domains = domains.into();
        self
    }

    /// Require a payload of type `T`.
    pub fn payload<T: Payload>(self) -> Self {
        self.payload_type(PayloadType::of::<T>())
    }

    /// Require a payload of the given type.
    pub fn payload_type(mut self, payload: PayloadType) -> Self {
        self.payload = Some(payload);
        self
    }

    #[inline]
    pub fn event_filter(&self) -> &TagFilter {
        &self.events
    }

    #[inline]
    pub fn domain_filter(&self) -> &TagFilter {
        &self.domains
    }

    #[inline]
    pub fn required_payload(&self) -> Option<PayloadType> {
        self.payload
    }

    /// Test an event: event tag, then domain, then payload.
    pub(crate) fn check(&self, event: &Event) -> Check {
        if !self.events.matches(Some(event.tag())) || !self.domains.matches(event.domain()) {
            return Check::Filtered;
        }
        let Some(expected) = self.payload else {
            return Check::Passed;
        };
        let actual = event.payload_value().map(|value| value.payload_type());
        if actual == Some(expected) {
            Check::Passed
        } else {
            Check::Rejected(Error::PayloadMismatch { expected, actual })
        }
    }
}

/// Outcome of testing an event against a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Check {
    Passed,
    /// The tags did not match. Not a problem worth reporting.
    Filtered,
    Rejected(Error),
}

type Invoke = dyn Fn(&Event) -> bool + Send + Sync;

/// A registered listener, its filter, and the type-erased call into its delegate.
pub(crate) struct Subscription {
    handle: Handle,
    listener: ListenerRef,
    binding: Option<usize>,
    filter: Filter,
    invoke: Box<Invoke>,
    /// Cleared when the subscription is removed. Snapshots taken by in-flight publishes
    /// may still hold the subscription and must skip it.
    live: AtomicBool,
}

impl Subscription {
    pub fn new<L: Send + Sync + 'static>(
        handle: Handle,
        listener: &Weak<L>,
        filter: Filter,
        delegate: Delegate<L>,
    ) -> Self {
        let target = Weak::clone(listener);
        let binding = delegate.binding_addr();
        Self {
            handle,
            listener: ListenerRef::new(listener),
            binding,
            filter,
            invoke: Box::new(move |event: &Event| match target.upgrade() {
                Some(listener) => delegate.execute_if_bound(&listener, event),
                None => false,
            }),
            live: AtomicBool::new(true),
        }
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    #[inline]
    pub fn listener(&self) -> &ListenerRef {
        &self.listener
    }

    #[inline]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// `true` if this subscription was created with the given delegate binding.
    pub fn is_bound_to<L>(&self, delegate: &Delegate<L>) -> bool {
        self.binding.is_some() && self.binding == delegate.binding_addr()
    }

    /// `true` until the subscription is removed.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Move the subscription to its terminal state.
    #[inline]
    pub fn kill(&self) {
        self.live.store(false, Ordering::Release);
    }

    /// Call the delegate. Returns `false` if the listener could not be reached.
    #[inline]
    pub fn invoke(&self, event: &Event) -> bool {
        (self.invoke)(event)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("handle", &self.handle)
            .field("listener", &self.listener)
            .field("filter", &self.filter)
            .field("live", &self.is_live())
            .finish_non_exhaustive()
    }
}
