//! Client for a Yelp Fusion style business-search API.
//!
//! Paginates `GET businesses/search` with a bearer credential. Without a
//! credential, or when the very first page fails, the source either degrades
//! to an embedded [`SyntheticSource`] or reports the failure, depending on how
//! it was built.

mod types;

use async_trait::async_trait;
use leadscout_core::{BusinessRecord, DiscoveryQuery};
use reqwest::{Client, Url};

use crate::error::{SkippedItem, SourceError};
use crate::fetch::build_client;
use crate::source::{Source, SourceBatch};
use crate::synthetic::SyntheticSource;

use types::{ApiBusiness, SearchPage};

const DEFAULT_BASE_URL: &str = "https://api.yelp.com/v3/";
const SOURCE_NAME: &str = "remote_api";

/// Businesses requested per page.
pub const PAGE_SIZE: usize = 50;

/// Hard cap on records accumulated across pages.
pub const MAX_RESULTS: usize = 200;

/// Largest search radius the API accepts.
pub const MAX_RADIUS_METERS: u32 = 40_000;

const METERS_PER_MILE: f64 = 1609.34;

/// Converts a radius in miles to the API's metre radius, capped at
/// [`MAX_RADIUS_METERS`].
#[must_use]
pub fn radius_meters(radius_miles: f64) -> u32 {
    let meters = (radius_miles.max(0.0) * METERS_PER_MILE).floor();
    // Saturating float-to-int cast, then clamp to the API ceiling.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let meters = meters as u32;
    meters.min(MAX_RADIUS_METERS)
}

/// Remote business-search API source.
///
/// Use [`RemoteApiSource::new`] for production or
/// [`RemoteApiSource::with_base_url`] to point at a mock server in tests.
pub struct RemoteApiSource {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
    fallback: Option<SyntheticSource>,
}

impl RemoteApiSource {
    /// Creates a source pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a source with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the client cannot be constructed, or
    /// [`SourceError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        let client = build_client(timeout_secs, user_agent)?;

        // A trailing slash keeps `join` appending to the path instead of
        // replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SourceError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_owned),
            base_url,
            fallback: None,
        })
    }

    /// Degrade to `fallback` instead of failing when no credential is
    /// configured or no page could be fetched.
    #[must_use]
    pub fn with_synthetic_fallback(mut self, fallback: SyntheticSource) -> Self {
        self.fallback = Some(fallback);
        self
    }

    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn search_url(&self, query: &DiscoveryQuery, offset: usize) -> Result<Url, SourceError> {
        let mut url = self
            .base_url
            .join("businesses/search")
            .map_err(|e| SourceError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("location", &query.location)
                .append_pair("radius", &radius_meters(query.radius_miles).to_string())
                .append_pair("limit", &PAGE_SIZE.to_string())
                .append_pair("offset", &offset.to_string());
            if !query.is_all_categories() {
                pairs.append_pair("categories", &query.category.to_lowercase());
            }
        }
        Ok(url)
    }

    async fn fetch_page(
        &self,
        api_key: &str,
        query: &DiscoveryQuery,
        offset: usize,
    ) -> Result<SearchPage, SourceError> {
        let url = self.search_url(query, offset)?;
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
            context: format!("businesses/search(offset={offset})"),
            source: e,
        })
    }

    /// Walks pages until a short page, the record cap, the page budget, or the
    /// first failure. The page budget bounds the requests even when every
    /// listing on a full page is skipped.
    ///
    /// Returns whatever was accumulated together with the failure, if any.
    async fn collect_pages(
        &self,
        api_key: &str,
        query: &DiscoveryQuery,
    ) -> (Vec<BusinessRecord>, Vec<SkippedItem>, Option<SourceError>) {
        let mut records = Vec::new();
        let mut skipped = Vec::new();
        let mut offset = 0;

        while offset < MAX_RESULTS && records.len() < MAX_RESULTS {
            let page = match self.fetch_page(api_key, query, offset).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        source = SOURCE_NAME,
                        offset,
                        accumulated = records.len(),
                        error = %e,
                        "search page failed; stopping pagination"
                    );
                    return (records, skipped, Some(e));
                }
            };

            let count = page.businesses.len();
            tracing::debug!(
                source = SOURCE_NAME,
                offset,
                count,
                total = ?page.total,
                "fetched search page"
            );

            for (i, raw) in page.businesses.into_iter().enumerate() {
                let decoded = serde_json::from_value::<ApiBusiness>(raw)
                    .map_err(|e| format!("undecodable listing: {e}"))
                    .and_then(ApiBusiness::into_record);
                match decoded {
                    Ok(record) => records.push(record),
                    Err(reason) => skipped.push(SkippedItem::new(offset + i, reason)),
                }
            }

            if count < PAGE_SIZE {
                break;
            }
            offset += PAGE_SIZE;
        }

        records.truncate(MAX_RESULTS);
        (records, skipped, None)
    }

    async fn degrade(
        &self,
        query: &DiscoveryQuery,
        error: SourceError,
    ) -> Result<SourceBatch, SourceError> {
        match &self.fallback {
            Some(fallback) => {
                tracing::warn!(
                    source = SOURCE_NAME,
                    error = %error,
                    "remote search unavailable; using synthetic data"
                );
                fallback.discover(query).await
            }
            None => Err(error),
        }
    }
}

#[async_trait]
impl Source for RemoteApiSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn self_domains(&self) -> &[&'static str] {
        &["yelp.com"]
    }

    async fn discover(&self, query: &DiscoveryQuery) -> Result<SourceBatch, SourceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            let error = SourceError::MissingCredential {
                source_name: SOURCE_NAME,
            };
            return self.degrade(query, error).await;
        };

        let (records, skipped, failure) = self.collect_pages(api_key, query).await;
        match failure {
            Some(error) if records.is_empty() => self.degrade(query, error).await,
            _ => Ok(SourceBatch::live(records, skipped)),
        }
    }
}
