use thiserror::Error;

/// Reasons a source could not produce a batch.
///
/// The discovery pipeline treats every variant as "source unavailable" and
/// moves on to the next source in the chain.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{source_name} requires an API credential but none is configured")]
    MissingCredential { source_name: &'static str },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to {url} was answered with a bot challenge page")]
    Blocked { url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("browser error: {0}")]
    Browser(String),

    #[error("{operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: &'static str,
        timeout_secs: u64,
    },
}

/// One raw listing that could not be turned into a record.
///
/// Skipping an item never aborts the rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    /// Position of the item in the source's raw result list.
    pub index: usize,
    pub reason: String,
}

impl SkippedItem {
    pub fn new(index: usize, reason: impl Into<String>) -> Self {
        Self {
            index,
            reason: reason.into(),
        }
    }
}
