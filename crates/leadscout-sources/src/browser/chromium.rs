//! Headless Chromium driver built on chromiumoxide.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{BrowserDriver, BrowserSession};
use crate::error::SourceError;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn browser_error(context: &str, err: impl std::fmt::Display) -> SourceError {
    SourceError::Browser(format!("{context}: {err}"))
}

/// Launches one headless Chromium process per session.
#[derive(Debug, Clone)]
pub struct ChromiumDriver {
    /// Explicit browser binary; chromiumoxide auto-detects when `None`.
    executable: Option<PathBuf>,
    user_agent: String,
    navigation_timeout: Duration,
}

impl ChromiumDriver {
    #[must_use]
    pub fn new(
        executable: Option<PathBuf>,
        user_agent: &str,
        navigation_timeout: Duration,
    ) -> Self {
        Self {
            executable,
            user_agent: user_agent.to_owned(),
            navigation_timeout,
        }
    }

    fn config(&self) -> Result<BrowserConfig, SourceError> {
        let mut builder = BrowserConfig::builder()
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg(format!("--user-agent={}", self.user_agent))
            .request_timeout(self.navigation_timeout);
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        builder
            .build()
            .map_err(|e| browser_error("failed to build browser config", e))
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, SourceError> {
        let config = self.config()?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| browser_error("failed to launch Chromium", e))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler.abort();
                return Err(browser_error("failed to open page", e));
            }
        };

        tracing::debug!("chromium session launched");
        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler,
            navigation_timeout: self.navigation_timeout,
        }))
    }
}

struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl ChromiumSession {
    async fn evaluate<T: DeserializeOwned>(&self, script: String) -> Result<T, SourceError> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| browser_error("script evaluation failed", e))?
            .into_value()
            .map_err(|e| browser_error("unexpected script result", e))
    }
}

fn selectors_json(selectors: &[&str]) -> Result<String, SourceError> {
    serde_json::to_string(selectors).map_err(|e| browser_error("invalid selector list", e))
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SourceError> {
        match tokio::time::timeout(self.navigation_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(browser_error("navigation failed", e)),
            Err(_) => Err(SourceError::Timeout {
                operation: "navigation",
                timeout_secs: self.navigation_timeout.as_secs(),
            }),
        }
    }

    async fn wait_for_any(
        &mut self,
        selectors: &[&str],
        timeout: Duration,
    ) -> Result<bool, SourceError> {
        let deadline = Instant::now() + timeout;
        loop {
            for selector in selectors {
                if self.page.find_element(*selector).await.is_ok() {
                    return Ok(true);
                }
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn scroll_feed(&mut self, selectors: &[&str]) -> Result<(), SourceError> {
        let script = format!(
            "(() => {{ for (const sel of {}) {{ const el = document.querySelector(sel); \
             if (el) {{ el.scrollTop = el.scrollHeight; return true; }} }} return false; }})()",
            selectors_json(selectors)?
        );
        if self.evaluate::<bool>(script).await? {
            Ok(())
        } else {
            Err(SourceError::Browser("results feed not found".to_owned()))
        }
    }

    async fn result_cards(
        &mut self,
        selectors: &[&str],
        limit: usize,
    ) -> Result<Vec<String>, SourceError> {
        let script = format!(
            "(() => {{ for (const sel of {}) {{ const nodes = Array.from(document.querySelectorAll(sel)); \
             if (nodes.length) {{ return nodes.slice(0, {limit}).map(n => n.outerHTML); }} }} return []; }})()",
            selectors_json(selectors)?
        );
        self.evaluate(script).await
    }

    async fn close(self: Box<Self>) -> Result<(), SourceError> {
        let Self {
            mut browser,
            page,
            handler,
            ..
        } = *self;

        let _ = page.close().await;
        let closed = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| browser_error("failed to close Chromium", e));
        let _ = browser.wait().await;
        handler.abort();
        tracing::debug!("chromium session closed");
        closed
    }
}
