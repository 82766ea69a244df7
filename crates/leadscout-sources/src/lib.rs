//! Business-finder sources for leadscout.
//!
//! Every backend (remote search API, directory HTML scrape, headless browser,
//! synthetic generator) implements [`Source`] and normalizes its output into
//! [`leadscout_core::BusinessRecord`].

pub mod browser;
pub mod error;
pub mod html_scrape;
pub mod remote_api;
pub mod source;
pub mod synthetic;
pub mod validator;

pub(crate) mod fetch;
mod text;

pub use browser::{
    BrowserAutomationSource, BrowserDriver, BrowserSession, BrowserSettings, CardLayout,
    ChromiumDriver,
};
pub use error::{SkippedItem, SourceError};
pub use fetch::build_client;
pub use html_scrape::HtmlScrapeSource;
pub use remote_api::RemoteApiSource;
pub use source::{Source, SourceBatch};
pub use synthetic::SyntheticSource;
pub use validator::ReachabilityProbe;
