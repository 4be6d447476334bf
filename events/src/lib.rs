//! In-process publish/subscribe for tagged events.
//!
//! Producers publish an [`Event`]: a hierarchical [`Tag`], an optional domain tag, and an
//! optional runtime-typed payload. Listeners subscribe with a [`Filter`] and a
//! [`Delegate`], and every live subscription whose filter accepts the event is called
//! synchronously, newest first, before [`Dispatcher::publish`] returns.
//!
//! - [`tag`]: tags, tag containers, and the tag registry
//! - [`filter`]: per-subscription tag filters and match modes
//! - [`payload`]: the payload marker trait and type-erased payload values
//! - [`listener`]: weak listener references and delegates
//! - [`dispatch`]: the dispatcher itself
//! - [`diagnostics`]: where non-fatal delivery problems are reported
//!
//! The dispatcher never keeps a listener alive. Subscriptions of dropped listeners are
//! skipped and evicted the next time an event is published.

// Lets `#[derive(Payload)]` refer to `::rusty_events` from inside this crate.
extern crate self as rusty_events;

pub mod diagnostics;
pub mod dispatch;
pub mod event;
pub mod filter;
pub mod listener;
pub mod payload;
pub mod tag;

pub use dispatch::{Dispatcher, Error, Filter, Handle};
pub use event::Event;
pub use filter::{MatchMode, TagFilter};
pub use listener::{AsListener, Delegate, ListenerRef};
pub use payload::{Payload, PayloadType, PayloadValue};
pub use rusty_macros::Payload;
pub use tag::{Tag, TagContainer};
