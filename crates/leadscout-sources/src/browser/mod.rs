//! Maps style search through a headless browser.
//!
//! The source drives a [`BrowserSession`] obtained from a [`BrowserDriver`]:
//! navigate, wait for result cards, scroll the results feed, then snapshot
//! the cards and parse each one independently. The session is closed on
//! every exit path.

mod chromium;
mod extract;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use leadscout_core::DiscoveryQuery;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{SkippedItem, SourceError};
use crate::source::{Source, SourceBatch};
use crate::text::category_label;

pub use chromium::ChromiumDriver;
pub use extract::{default_layouts, CardLayout, CURRENT_LAYOUT, LEGACY_LAYOUT};

const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/";
const SELF_DOMAIN: &str = "google.com";

/// Selectors for a single result card, most specific first.
pub const RESULT_SELECTORS: [&str; 4] = [
    "[role=\"article\"]",
    ".Nv2PK",
    ".lI9IFe",
    "[jsaction*=\"mouseover\"]",
];

/// Selectors for the scrollable results container.
pub const FEED_SELECTORS: [&str; 2] = ["[role=\"feed\"]", ".m6QErb"];

/// Most result cards snapshotted per search.
pub const MAX_CARDS: usize = 50;

const SEARCH_PHRASE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b' ')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

/// A launched browser able to open sessions.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, SourceError>;
}

/// One owned browser session. Callers must finish with [`BrowserSession::close`].
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), SourceError>;

    /// Returns `false` when none of `selectors` appeared before `timeout`.
    async fn wait_for_any(
        &mut self,
        selectors: &[&str],
        timeout: Duration,
    ) -> Result<bool, SourceError>;

    /// Scrolls the first container matching `selectors` to its bottom.
    async fn scroll_feed(&mut self, selectors: &[&str]) -> Result<(), SourceError>;

    /// Outer HTML of up to `limit` elements matching the first selector in
    /// `selectors` that matches anything.
    async fn result_cards(
        &mut self,
        selectors: &[&str],
        limit: usize,
    ) -> Result<Vec<String>, SourceError>;

    async fn close(self: Box<Self>) -> Result<(), SourceError>;
}

/// Timing and volume knobs for a browser search.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// How long to wait for the first result card.
    pub result_wait: Duration,
    pub scrolls: u32,
    /// Pause after each scroll so lazily loaded cards can render.
    pub scroll_pause: Duration,
    pub max_cards: usize,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            result_wait: Duration::from_secs(10),
            scrolls: 3,
            scroll_pause: Duration::from_secs(2),
            max_cards: MAX_CARDS,
        }
    }
}

pub struct BrowserAutomationSource {
    driver: Arc<dyn BrowserDriver>,
    settings: BrowserSettings,
    layouts: Vec<CardLayout>,
}

impl BrowserAutomationSource {
    #[must_use]
    pub fn new(driver: Arc<dyn BrowserDriver>, settings: BrowserSettings) -> Self {
        Self {
            driver,
            settings,
            layouts: default_layouts(),
        }
    }

    /// Replaces the ordered card layouts used for extraction.
    #[must_use]
    pub fn with_layouts(mut self, layouts: Vec<CardLayout>) -> Self {
        self.layouts = layouts;
        self
    }

    /// `plumber near Reno, NV` → `.../maps/search/plumber+near+Reno%2C+NV`.
    #[must_use]
    pub fn search_url(query: &DiscoveryQuery) -> String {
        let what = if query.is_all_categories() {
            "businesses"
        } else {
            query.category.as_str()
        };
        let phrase = format!("{what} near {}", query.location);
        let encoded = utf8_percent_encode(&phrase, SEARCH_PHRASE)
            .to_string()
            .replace(' ', "+");
        format!("{MAPS_SEARCH_BASE}{encoded}")
    }

    async fn run_session(
        &self,
        session: &mut dyn BrowserSession,
        query: &DiscoveryQuery,
    ) -> Result<SourceBatch, SourceError> {
        let url = Self::search_url(query);
        session.navigate(&url).await?;

        if !session
            .wait_for_any(&RESULT_SELECTORS, self.settings.result_wait)
            .await?
        {
            tracing::info!(
                source = self.name(),
                url = %url,
                wait_secs = self.settings.result_wait.as_secs(),
                "no result cards before timeout"
            );
            return Ok(SourceBatch::default());
        }

        for scroll in 0..self.settings.scrolls {
            if let Err(e) = session.scroll_feed(&FEED_SELECTORS).await {
                tracing::debug!(source = self.name(), scroll, error = %e, "feed scroll failed");
                break;
            }
            if !self.settings.scroll_pause.is_zero() {
                tokio::time::sleep(self.settings.scroll_pause).await;
            }
        }

        let cards = session
            .result_cards(&RESULT_SELECTORS, self.settings.max_cards)
            .await?;
        let label = category_label(&query.category);

        let mut records = Vec::with_capacity(cards.len());
        let mut skipped = Vec::new();
        for (index, card) in cards.iter().take(self.settings.max_cards).enumerate() {
            match extract::extract_card(card, &self.layouts, label.as_deref(), SELF_DOMAIN) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    tracing::debug!(source = self.name(), index, reason = %reason, "card skipped");
                    skipped.push(SkippedItem::new(index, reason));
                }
            }
        }

        Ok(SourceBatch::live(records, skipped))
    }
}

#[async_trait]
impl Source for BrowserAutomationSource {
    fn name(&self) -> &'static str {
        "browser"
    }

    fn self_domains(&self) -> &[&'static str] {
        &[SELF_DOMAIN]
    }

    async fn discover(&self, query: &DiscoveryQuery) -> Result<SourceBatch, SourceError> {
        let mut session = self.driver.launch().await?;
        let outcome = self.run_session(session.as_mut(), query).await;

        if let Err(e) = session.close().await {
            tracing::warn!(source = self.name(), error = %e, "failed to close browser session");
        }
        outcome
    }
}

#[cfg(test)]
#[path = "browser_test.rs"]
mod tests;
