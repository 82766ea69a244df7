//! Website-presence classification.
//!
//! A listing only counts as having a website when its URL points somewhere
//! other than the directory or vendor that produced the listing. No network
//! access happens here; liveness probing lives in `leadscout-sources`.

use crate::business::{BusinessRecord, ClassifiedRecord};

/// Classifies records against the self domains of the source that produced
/// them.
#[derive(Debug, Clone, Default)]
pub struct WebsitePresenceClassifier {
    self_domains: Vec<String>,
}

impl WebsitePresenceClassifier {
    /// `self_domains` are bare hosts such as `"yelp.com"`; subdomains of each
    /// host are treated as self-referential too.
    #[must_use]
    pub fn new<I, S>(self_domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            self_domains: self_domains
                .into_iter()
                .map(|d| d.as_ref().trim().trim_start_matches("www.").to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn classify(&self, record: &BusinessRecord) -> bool {
        let url = record.website_url().trim();
        if url.is_empty() {
            return false;
        }
        !self.is_self_referential(url)
    }

    #[must_use]
    pub fn classify_record(&self, record: BusinessRecord) -> ClassifiedRecord {
        let has_website = self.classify(&record);
        ClassifiedRecord::new(record, has_website)
    }

    /// True when `url`'s host is one of the self domains or a subdomain of
    /// one. Query strings and paths are ignored.
    #[must_use]
    pub fn is_self_referential(&self, url: &str) -> bool {
        if self.self_domains.is_empty() {
            return false;
        }

        match parse_host(url) {
            Some(host) => self
                .self_domains
                .iter()
                .any(|domain| host == *domain || host.ends_with(&format!(".{domain}"))),
            None => {
                let lowered = url.to_ascii_lowercase();
                self.self_domains.iter().any(|d| lowered.contains(d.as_str()))
            }
        }
    }
}

fn parse_host(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url)
        .ok()
        .filter(|u| u.host_str().is_some())
        .or_else(|| url::Url::parse(&format!("http://{url}")).ok())?;
    parsed.host_str().map(str::to_ascii_lowercase)
}
