//! Where non-fatal dispatch problems go.
//!
//! The dispatcher never fails a publish. When a subscription is skipped for a reason other
//! than its filters, a [`Diagnostic`] is handed to the dispatcher's [`Sink`]. Sinks are
//! purely observational; nothing they do feeds back into dispatch.
//!
//! - [`LogSink`] (the default) writes through the `log` facade.
//! - [`ChannelSink`] forwards diagnostics into a channel for inspection.
//! - [`NullSink`] drops them.

use crossbeam::channel::{Receiver, Sender, unbounded};
use log::{debug, warn};

use crate::dispatch::{Error, Handle};

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The subscription involved, if one had been created.
    pub handle: Option<Handle>,
    /// Type name of the listener involved.
    pub listener: &'static str,
    pub error: Error,
}

/// Receiver of diagnostics.
pub trait Sink: Send + Sync {
    fn record(&self, diagnostic: Diagnostic);
}

/// Writes diagnostics to the `log` facade.
///
/// Stale listeners are routine (a listener dropped without unsubscribing) and are logged
/// at debug level. Everything else is a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl Sink for LogSink {
    fn record(&self, diagnostic: Diagnostic) {
        let subscription = diagnostic
            .handle
            .map_or_else(|| String::from("-"), |handle| handle.to_string());
        match diagnostic.error {
            Error::StaleListener => debug!(
                "Evicting subscription {} of dead listener {}",
                subscription, diagnostic.listener
            ),
            error => warn!(
                "Listener {} (subscription {}): {}",
                diagnostic.listener, subscription, error
            ),
        }
    }
}

/// Forwards diagnostics into a channel.
pub struct ChannelSink {
    sender: Sender<Diagnostic>,
}

impl ChannelSink {
    pub fn new(sender: Sender<Diagnostic>) -> Self {
        Self { sender }
    }

    pub fn with_receiver() -> (Self, Receiver<Diagnostic>) {
        let (sender, receiver) = unbounded();
        (Self::new(sender), receiver)
    }
}

impl Sink for ChannelSink {
    fn record(&self, diagnostic: Diagnostic) {
        let _ = self.sender.try_send(diagnostic);
    }
}

/// Discards diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl Sink for NullSink {
    fn record(&self, _diagnostic: Diagnostic) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(error: Error) -> Diagnostic {
        Diagnostic {
            handle: None,
            listener: "test::Listener",
            error,
        }
    }

    #[test]
    fn channel_sink_forwards_in_order() {
        // Given
        let (sink, receiver) = ChannelSink::with_receiver();

        // When
        sink.record(diagnostic(Error::StaleListener));
        sink.record(diagnostic(Error::DeliveryFailure));

        // Then
        let received: Vec<_> = receiver.try_iter().map(|d| d.error).collect();
        assert_eq!(received, vec![Error::StaleListener, Error::DeliveryFailure]);
    }

    #[test]
    fn channel_sink_ignores_dropped_receiver() {
        let (sink, receiver) = ChannelSink::with_receiver();
        drop(receiver);

        sink.record(diagnostic(Error::DeliveryFailure));
    }

    #[test]
    fn log_and_null_sinks_accept_everything() {
        LogSink.record(diagnostic(Error::StaleListener));
        LogSink.record(diagnostic(Error::DeliveryFailure));
        NullSink.record(diagnostic(Error::DeliveryFailure));
    }
}
