//! Builds the source chain described by [`AppConfig`].

use std::sync::Arc;
use std::time::Duration;

use leadscout_core::{AppConfig, SourceKind};
use leadscout_sources::{
    BrowserAutomationSource, BrowserSettings, ChromiumDriver, HtmlScrapeSource, RemoteApiSource,
    Source, SourceError, SyntheticSource,
};

/// Instantiates the configured sources in order.
///
/// The remote API only gets its own synthetic fallback when the chain has no
/// synthetic link; otherwise falling back is the chain's job and an
/// unavailable API must surface as a failure so later sources get a turn.
///
/// # Errors
///
/// Returns [`SourceError`] if an HTTP client cannot be constructed.
pub fn build_sources(config: &AppConfig) -> Result<Vec<Arc<dyn Source>>, SourceError> {
    let chain_has_synthetic = config.sources.contains(&SourceKind::Synthetic);
    let mut sources: Vec<Arc<dyn Source>> = Vec::with_capacity(config.sources.len());

    for kind in &config.sources {
        let source: Arc<dyn Source> = match kind {
            SourceKind::RemoteApi => {
                let mut remote = RemoteApiSource::new(
                    config.yelp_api_key.as_deref(),
                    config.request_timeout_secs,
                    &config.user_agent,
                )?;
                if !remote.has_credential() {
                    tracing::warn!("YELP_API_KEY not set; remote search source is degraded");
                }
                if !chain_has_synthetic {
                    remote = remote.with_synthetic_fallback(SyntheticSource::new());
                }
                Arc::new(remote)
            }
            SourceKind::HtmlScrape => Arc::new(HtmlScrapeSource::new(
                config.request_timeout_secs,
                &config.user_agent,
            )?),
            SourceKind::Browser => {
                let driver = ChromiumDriver::new(
                    config.chromium_path.clone(),
                    &config.user_agent,
                    Duration::from_secs(config.request_timeout_secs.max(config.browser_wait_secs)),
                );
                let settings = BrowserSettings {
                    result_wait: Duration::from_secs(config.browser_wait_secs),
                    scrolls: config.browser_scrolls,
                    ..BrowserSettings::default()
                };
                Arc::new(BrowserAutomationSource::new(Arc::new(driver), settings))
            }
            SourceKind::Synthetic => Arc::new(SyntheticSource::new()),
        };
        sources.push(source);
    }

    tracing::debug!(
        sources = ?config.sources.iter().map(|k| k.as_str()).collect::<Vec<_>>(),
        "source chain built"
    );
    Ok(sources)
}
