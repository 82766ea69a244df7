//! Wire types for the remote business-search API.
//!
//! Only the fields leadscout reads are modelled; everything else in the
//! payload is ignored.

use leadscout_core::{BusinessRecord, Rating};
use serde::Deserialize;

/// One page of `GET businesses/search`.
///
/// Businesses stay as raw JSON until each one is decoded on its own, so a
/// single malformed listing does not discard the whole page.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchPage {
    #[serde(default)]
    pub businesses: Vec<serde_json::Value>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiBusiness {
    #[serde(default)]
    pub name: Option<String>,
    /// The provider's own listing page, not the business's website.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub display_phone: Option<String>,
    #[serde(default)]
    pub location: Option<ApiLocation>,
    #[serde(default)]
    pub categories: Vec<ApiCategory>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiLocation {
    #[serde(default)]
    pub display_address: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCategory {
    #[serde(default)]
    pub title: String,
}

impl ApiBusiness {
    /// Normalizes the listing, or explains why it had to be skipped.
    pub(crate) fn into_record(self) -> Result<BusinessRecord, String> {
        let name = self.name.unwrap_or_default();
        let record = BusinessRecord::new(&name).map_err(|_| "listing has no name".to_owned())?;

        Ok(record
            .with_phone(self.display_phone.unwrap_or_default())
            .with_address(self.location.unwrap_or_default().display_address)
            .with_categories(self.categories.into_iter().map(|c| c.title))
            .with_rating(self.rating.and_then(Rating::new))
            .with_review_count(self.review_count.unwrap_or(0))
            .with_website_url(self.url.unwrap_or_default()))
    }
}
