use std::sync::Arc;

use crate::{
    diagnostics::{LogSink, Sink},
    dispatch::Dispatcher,
};

/// Tunables for a [`Dispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of subscriptions the list is sized for up front.
    pub capacity: usize,
    /// Report evicted subscriptions of dead listeners to the sink.
    pub report_stale: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 16,
            report_stale: true,
        }
    }
}

/// Builds a [`Dispatcher`].
///
/// ```rust,ignore
/// let (sink, diagnostics) = ChannelSink::with_receiver();
/// let dispatcher = Dispatcher::builder()
///     .capacity(256)
///     .report_stale(false)
///     .sink(sink)
///     .build();
/// ```
pub struct Builder {
    config: Config,
    sink: Arc<dyn Sink>,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            config: Config::default(),
            sink: Arc::new(LogSink),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn report_stale(mut self, report_stale: bool) -> Self {
        self.config.report_stale = report_stale;
        self
    }

    /// Send diagnostics to `sink` instead of the log.
    pub fn sink(self, sink: impl Sink + 'static) -> Self {
        self.shared_sink(Arc::new(sink))
    }

    /// Send diagnostics to a sink shared with other dispatchers.
    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher::from_parts(self.config, self.sink)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
