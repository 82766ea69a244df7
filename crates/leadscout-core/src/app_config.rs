use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Business-finder backends that can appear in the discovery chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    RemoteApi,
    HtmlScrape,
    Browser,
    Synthetic,
}

impl SourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::RemoteApi => "remote_api",
            SourceKind::HtmlScrape => "html_scrape",
            SourceKind::Browser => "browser",
            SourceKind::Synthetic => "synthetic",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote_api" | "yelp" => Ok(SourceKind::RemoteApi),
            "html_scrape" | "yellowpages" => Ok(SourceKind::HtmlScrape),
            "browser" | "maps" => Ok(SourceKind::Browser),
            "synthetic" | "mock" => Ok(SourceKind::Synthetic),
            other => Err(format!("unknown source '{other}'")),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Credential for the remote business-search API. `None` degrades that
    /// source instead of failing startup.
    pub yelp_api_key: Option<String>,
    /// Discovery chain, tried in order.
    pub sources: Vec<SourceKind>,
    pub export_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub browser_wait_secs: u64,
    pub browser_scrolls: u32,
    pub chromium_path: Option<PathBuf>,
    pub validate_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "yelp_api_key",
                &self.yelp_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("sources", &self.sources)
            .field("export_dir", &self.export_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("browser_wait_secs", &self.browser_wait_secs)
            .field("browser_scrolls", &self.browser_scrolls)
            .field("chromium_path", &self.chromium_path)
            .field("validate_timeout_secs", &self.validate_timeout_secs)
            .finish()
    }
}
