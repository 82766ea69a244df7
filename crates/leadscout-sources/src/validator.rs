//! Website reachability probe.
//!
//! Separate from website-presence classification: classification never
//! touches the network, the probe always does.

use reqwest::Client;

use crate::error::SourceError;
use crate::fetch::build_client;

/// Issues bounded `HEAD` requests to check that a website answers.
#[derive(Debug, Clone)]
pub struct ReachabilityProbe {
    client: Client,
}

impl ReachabilityProbe {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
        })
    }

    /// `true` when a `HEAD` request (following redirects) ends with a status
    /// below 400. Timeouts, network errors and malformed URLs are `false`.
    pub async fn validate_reachable(&self, url: &str) -> bool {
        let Some(target) = normalize_url(url) else {
            return false;
        };

        match self.client.head(&target).send().await {
            Ok(response) => {
                let status = response.status();
                tracing::debug!(url = %target, status = status.as_u16(), "reachability probe");
                status.as_u16() < 400
            }
            Err(e) => {
                tracing::debug!(url = %target, error = %e, "reachability probe failed");
                false
            }
        }
    }
}

/// Adds `http://` to scheme-less URLs; `None` for blank input.
fn normalize_url(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        Some(trimmed.to_owned())
    } else {
        Some(format!("http://{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_less_urls_get_http() {
        assert_eq!(
            normalize_url("example.com").as_deref(),
            Some("http://example.com")
        );
        assert_eq!(
            normalize_url(" https://example.com ").as_deref(),
            Some("https://example.com")
        );
        assert_eq!(
            normalize_url("HTTP://EXAMPLE.COM").as_deref(),
            Some("HTTP://EXAMPLE.COM")
        );
    }

    #[test]
    fn blank_url_is_rejected() {
        assert_eq!(normalize_url("   "), None);
    }

    #[tokio::test]
    async fn blank_url_is_unreachable() {
        let probe = ReachabilityProbe::new(1, "test").expect("client builds");
        assert!(!probe.validate_reachable("").await);
    }
}
