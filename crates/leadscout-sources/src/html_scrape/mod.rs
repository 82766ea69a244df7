//! Yellow Pages style directory scraper.
//!
//! One GET of the directory's search page per query; listings are parsed out
//! of the returned HTML.

mod parse;

use async_trait::async_trait;
use leadscout_core::DiscoveryQuery;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;

use crate::error::SourceError;
use crate::fetch::{build_client, fetch_html};
use crate::source::{Source, SourceBatch};
use crate::text::{category_key, category_label};

pub use parse::MAX_LISTINGS;

const DEFAULT_BASE_URL: &str = "https://www.yellowpages.com";
const SELF_DOMAIN: &str = "yellowpages.com";

/// Search term used when the category has no directory slug.
pub const GENERIC_SEARCH_TERM: &str = "businesses";

/// Internal category vocabulary → directory search slug.
const CATEGORY_SLUGS: [(&str, &str); 9] = [
    ("barbershop", "barber-shops"),
    ("dentist", "dentists"),
    ("electrician", "electricians"),
    ("plumber", "plumbers"),
    ("handyman", "handyman-services"),
    ("hvac", "heating-and-air-conditioning"),
    ("roofing", "roofing-contractors"),
    ("landscaping", "landscaping"),
    ("auto repair", "auto-repair"),
];

/// Query-value encoding that leaves slug punctuation readable.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Maps a category onto the directory's search slug.
#[must_use]
pub fn directory_slug(category: &str) -> &'static str {
    let wanted = category_key(category);
    CATEGORY_SLUGS
        .iter()
        .find(|(key, _)| category_key(key) == wanted)
        .map_or(GENERIC_SEARCH_TERM, |(_, slug)| *slug)
}

/// `"Reno, NV"` → `"reno-nv"`.
#[must_use]
pub fn location_slug(location: &str) -> String {
    location
        .trim()
        .replace(", ", "-")
        .replace(' ', "-")
        .to_lowercase()
}

pub struct HtmlScrapeSource {
    client: Client,
    base_url: String,
}

impl HtmlScrapeSource {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a source against a custom directory host (for wiremock tests).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    #[must_use]
    pub fn search_url(&self, query: &DiscoveryQuery) -> String {
        let terms = utf8_percent_encode(directory_slug(&query.category), QUERY_VALUE);
        let geo = location_slug(&query.location);
        let geo = utf8_percent_encode(&geo, QUERY_VALUE);
        format!(
            "{}/search?search_terms={terms}&geo_location_terms={geo}",
            self.base_url
        )
    }
}

#[async_trait]
impl Source for HtmlScrapeSource {
    fn name(&self) -> &'static str {
        "html_scrape"
    }

    fn self_domains(&self) -> &[&'static str] {
        &[SELF_DOMAIN]
    }

    async fn discover(&self, query: &DiscoveryQuery) -> Result<SourceBatch, SourceError> {
        let url = self.search_url(query);
        let html = fetch_html(&self.client, &url).await?;

        let label = category_label(&query.category);
        let (records, skipped) = parse::parse_listings(&html, label.as_deref(), SELF_DOMAIN);

        if records.is_empty() {
            tracing::info!(
                source = self.name(),
                category = %query.category,
                location = %query.location,
                "no directory listings found"
            );
        }
        Ok(SourceBatch::live(records, skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories_map_to_slugs() {
        assert_eq!(directory_slug("plumber"), "plumbers");
        assert_eq!(directory_slug("HVAC"), "heating-and-air-conditioning");
        assert_eq!(directory_slug("auto repair"), "auto-repair");
        assert_eq!(directory_slug("autorepair"), "auto-repair");
    }

    #[test]
    fn unknown_categories_use_generic_term() {
        assert_eq!(directory_slug("all"), GENERIC_SEARCH_TERM);
        assert_eq!(directory_slug("florist"), GENERIC_SEARCH_TERM);
    }

    #[test]
    fn location_slug_hyphenates() {
        assert_eq!(location_slug("Reno, NV"), "reno-nv");
        assert_eq!(location_slug("Salt Lake City, UT"), "salt-lake-city-ut");
    }

    #[test]
    fn search_url_contains_slug_and_location() {
        let source = HtmlScrapeSource::with_base_url(5, "test", "http://127.0.0.1:9/")
            .expect("client builds");
        let query = DiscoveryQuery::new("Salt Lake City", "UT", None, Some("dentist"));
        assert_eq!(
            source.search_url(&query),
            "http://127.0.0.1:9/search?search_terms=dentists&geo_location_terms=salt-lake-city-ut"
        );
    }
}
