use async_trait::async_trait;
use leadscout_core::{BusinessRecord, DiscoveryQuery};

use crate::error::{SkippedItem, SourceError};

/// Records produced by one `discover` call.
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    pub records: Vec<BusinessRecord>,
    /// Raw items dropped during extraction.
    pub skipped: Vec<SkippedItem>,
    /// `true` when the records were generated rather than discovered.
    pub synthetic: bool,
}

impl SourceBatch {
    #[must_use]
    pub fn live(records: Vec<BusinessRecord>, skipped: Vec<SkippedItem>) -> Self {
        Self {
            records,
            skipped,
            synthetic: false,
        }
    }

    #[must_use]
    pub fn synthetic(records: Vec<BusinessRecord>) -> Self {
        Self {
            records,
            skipped: Vec::new(),
            synthetic: true,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A business-finder backend.
///
/// An empty batch means "nothing matched" and is not an error; `Err` is
/// reserved for a source that could not run at all.
#[async_trait]
pub trait Source: Send + Sync {
    /// Stable identifier used in logs, events and API responses.
    fn name(&self) -> &'static str;

    /// Hosts owned by the source itself. Website URLs on these hosts are
    /// listing pages, not independent websites.
    fn self_domains(&self) -> &[&'static str] {
        &[]
    }

    async fn discover(&self, query: &DiscoveryQuery) -> Result<SourceBatch, SourceError>;
}
