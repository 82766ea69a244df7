//! Discovery pipeline orchestration.

use std::sync::Arc;

use leadscout_core::{AppConfig, DiscoveryQuery, DiscoveryResult, WebsitePresenceClassifier};
use leadscout_sources::{Source, SourceBatch, SourceError};

use crate::chain::build_sources;
use crate::events::{DiscoveryEvent, DiscoveryObserver, TracingObserver};

/// Walks an ordered chain of sources for each query.
///
/// Sources and the observer are shared read-only, so one pipeline can serve
/// concurrent requests.
pub struct DiscoveryPipeline {
    sources: Vec<Arc<dyn Source>>,
    observer: Arc<dyn DiscoveryObserver>,
}

impl DiscoveryPipeline {
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn Source>>) -> Self {
        Self {
            sources,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Builds the pipeline for the chain named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if a source's HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        Ok(Self::new(build_sources(config)?))
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn DiscoveryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Source names in chain order.
    #[must_use]
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Run one discovery request.
    ///
    /// 1. Try each source in order; failures and empty batches move on.
    /// 2. Classify the first non-empty batch against that source's self
    ///    domains.
    /// 3. Aggregate totals. An exhausted chain yields a zero-total result
    ///    with an explanatory message, never an error.
    pub async fn run(&self, query: &DiscoveryQuery) -> DiscoveryResult {
        for (position, source) in self.sources.iter().enumerate() {
            let name = source.name();
            self.observer.on_event(&DiscoveryEvent::SourceSelected {
                source: name,
                position,
            });

            let batch = match source.discover(query).await {
                Ok(batch) => batch,
                Err(e) => {
                    self.observer.on_event(&DiscoveryEvent::SourceFailed {
                        source: name,
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            self.report_skipped(name, &batch);
            if batch.is_empty() {
                self.observer
                    .on_event(&DiscoveryEvent::SourceEmpty { source: name });
                continue;
            }

            let fallback = batch.synthetic || position > 0;
            let result = classify_batch(source.as_ref(), batch, fallback);
            tracing::info!(
                source = name,
                location = %query.location,
                category = %query.category,
                total_found = result.total_found(),
                without_websites = result.without_websites(),
                fallback,
                "discovery complete"
            );
            return result;
        }

        self.observer.on_event(&DiscoveryEvent::SourcesExhausted {
            attempted: self.sources.len(),
        });
        DiscoveryResult::empty(exhausted_message(query))
    }

    fn report_skipped(&self, source: &'static str, batch: &SourceBatch) {
        for item in &batch.skipped {
            self.observer.on_event(&DiscoveryEvent::ItemSkipped {
                source,
                index: item.index,
                reason: item.reason.clone(),
            });
        }
    }
}

fn classify_batch(source: &dyn Source, batch: SourceBatch, fallback: bool) -> DiscoveryResult {
    let classifier = WebsitePresenceClassifier::new(source.self_domains());
    let records = batch
        .records
        .into_iter()
        .map(|record| classifier.classify_record(record))
        .collect();
    DiscoveryResult::from_records(records, source.name(), fallback)
}

/// Message returned when no source produced anything.
#[must_use]
pub fn exhausted_message(query: &DiscoveryQuery) -> String {
    if query.is_all_categories() {
        format!(
            "No businesses found in {}. Try a different category or location.",
            query.location
        )
    } else {
        format!(
            "No {} businesses found in {}. Try a different category or location.",
            query.category, query.location
        )
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
