//! Progress events emitted while walking the source chain.

/// One step of a discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// About to invoke the source at `position` in the chain.
    SourceSelected {
        source: &'static str,
        position: usize,
    },
    /// The source ran but matched nothing.
    SourceEmpty { source: &'static str },
    /// The source could not run; the chain moves on.
    SourceFailed { source: &'static str, error: String },
    /// A raw listing was dropped during extraction.
    ItemSkipped {
        source: &'static str,
        index: usize,
        reason: String,
    },
    /// Every source was tried without a non-empty batch.
    SourcesExhausted { attempted: usize },
}

/// Receives [`DiscoveryEvent`]s as a run progresses.
pub trait DiscoveryObserver: Send + Sync {
    fn on_event(&self, event: &DiscoveryEvent);
}

/// Default observer: forwards every event to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DiscoveryObserver for TracingObserver {
    fn on_event(&self, event: &DiscoveryEvent) {
        match event {
            DiscoveryEvent::SourceSelected { source, position } => {
                tracing::debug!(source, position, "trying source");
            }
            DiscoveryEvent::SourceEmpty { source } => {
                tracing::info!(source, "source returned no businesses");
            }
            DiscoveryEvent::SourceFailed { source, error } => {
                tracing::warn!(source, error = %error, "source unavailable");
            }
            DiscoveryEvent::ItemSkipped {
                source,
                index,
                reason,
            } => {
                tracing::debug!(source, index, reason = %reason, "listing skipped");
            }
            DiscoveryEvent::SourcesExhausted { attempted } => {
                tracing::info!(attempted, "all sources exhausted");
            }
        }
    }
}
