use crate::{
    payload::{Payload, PayloadValue},
    tag::Tag,
};

/// An event as handed to [`Dispatcher::publish`](crate::Dispatcher::publish) and on to
/// every matching delegate.
///
/// The event tag is mandatory. The domain tag and the payload are optional.
///
/// ```rust,ignore
/// let event = Event::new(registry.register("Game.PlayerDied")?)
///     .with_domain(registry.register("Domains.Game")?)
///     .with_payload(PlayerDied { player: 7 });
/// dispatcher.publish(&event);
/// ```
#[derive(Debug)]
pub struct Event {
    tag: Tag,
    domain: Option<Tag>,
    payload: Option<PayloadValue>,
}

impl Event {
    /// An event with a tag and nothing else.
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            domain: None,
            payload: None,
        }
    }

    /// Set the domain tag.
    pub fn with_domain(mut self, domain: Tag) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Attach a payload.
    pub fn with_payload<T: Payload>(self, payload: T) -> Self {
        self.with_payload_value(PayloadValue::new(payload))
    }

    /// Attach an already boxed payload.
    pub fn with_payload_value(mut self, payload: PayloadValue) -> Self {
        self.payload = Some(payload);
        self
    }

    #[inline]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    #[inline]
    pub fn domain(&self) -> Option<&Tag> {
        self.domain.as_ref()
    }

    #[inline]
    pub fn payload_value(&self) -> Option<&PayloadValue> {
        self.payload.as_ref()
    }

    /// The payload as a `T`, if there is one of that type.
    pub fn payload<T: Payload>(&self) -> Option<&T> {
        self.payload.as_ref()?.downcast_ref::<T>()
    }
}
