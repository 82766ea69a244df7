//! Low-level HTTP helpers shared by the HTTP-backed sources.

use std::time::Duration;

use reqwest::Client;

use crate::error::SourceError;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Builds the `reqwest` client used by every HTTP-backed source.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the underlying client cannot be
/// constructed (e.g., invalid TLS config).
pub fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, SourceError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs)))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Fetches the HTML body of a directory page.
///
/// A non-2xx status or a bot-challenge interstitial are errors so that the
/// caller can tell "page unreachable" apart from "page has no listings".
pub(crate) async fn fetch_html(client: &Client, url: &str) -> Result<String, SourceError> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
        .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }

    let body = response.text().await?;
    if looks_like_bot_challenge(&body) {
        tracing::warn!(url, "directory page returned a bot challenge");
        return Err(SourceError::Blocked {
            url: url.to_owned(),
        });
    }
    Ok(body)
}

fn looks_like_bot_challenge(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    let has_cloudflare_banner = lowered.contains("attention required! | cloudflare");
    let has_challenge_platform = lowered.contains("/cdn-cgi/challenge-platform/");
    let has_just_a_moment = lowered.contains("just a moment...");
    let has_cf_chl = lowered.contains("cf-chl-");

    has_cloudflare_banner || has_challenge_platform || (has_just_a_moment && has_cf_chl)
}
