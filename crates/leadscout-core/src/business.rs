use serde::{Deserialize, Deserializer, Serialize};

use crate::CoreError;

/// A star rating on the usual 0–5 scale.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(into = "f64")]
pub struct Rating(f64);

impl Rating {
    /// Returns `None` for values outside `[0.0, 5.0]` or non-finite input.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && (0.0..=5.0).contains(&value)).then_some(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Canonical business listing every source normalizes into.
///
/// Built once by a source through the consuming `with_*` methods and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessRecord {
    name: String,
    phone: Option<String>,
    address: Vec<String>,
    categories: Vec<String>,
    rating: Option<Rating>,
    review_count: u32,
    /// Empty when the source exposed no website field at all.
    website_url: String,
}

impl BusinessRecord {
    /// Starts a record for the given business name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyName`] when the trimmed name is empty.
    pub fn new(name: impl AsRef<str>) -> Result<Self, CoreError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            phone: None,
            address: Vec::new(),
            categories: Vec::new(),
            rating: None,
            review_count: 0,
            website_url: String::new(),
        })
    }

    /// Blank phone text leaves the phone absent.
    #[must_use]
    pub fn with_phone(mut self, phone: impl AsRef<str>) -> Self {
        let phone = phone.as_ref().trim();
        self.phone = (!phone.is_empty()).then(|| phone.to_string());
        self
    }

    #[must_use]
    pub fn with_address_line(mut self, line: impl AsRef<str>) -> Self {
        let line = line.as_ref().trim();
        if !line.is_empty() {
            self.address.push(line.to_string());
        }
        self
    }

    #[must_use]
    pub fn with_address<I, S>(self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .fold(self, |record, line| record.with_address_line(line))
    }

    /// Adds a category label; blanks and duplicates are ignored.
    #[must_use]
    pub fn with_category(mut self, category: impl AsRef<str>) -> Self {
        let category = category.as_ref().trim();
        if !category.is_empty() && !self.categories.iter().any(|c| c == category) {
            self.categories.push(category.to_string());
        }
        self
    }

    #[must_use]
    pub fn with_categories<I, S>(self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        categories
            .into_iter()
            .fold(self, |record, category| record.with_category(category))
    }

    #[must_use]
    pub fn with_rating(mut self, rating: Option<Rating>) -> Self {
        self.rating = rating;
        self
    }

    #[must_use]
    pub fn with_review_count(mut self, review_count: u32) -> Self {
        self.review_count = review_count;
        self
    }

    #[must_use]
    pub fn with_website_url(mut self, url: impl AsRef<str>) -> Self {
        self.website_url = url.as_ref().trim().to_string();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    #[must_use]
    pub fn address(&self) -> &[String] {
        &self.address
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    #[must_use]
    pub fn review_count(&self) -> u32 {
        self.review_count
    }

    #[must_use]
    pub fn website_url(&self) -> &str {
        &self.website_url
    }

    /// Address lines joined for display, e.g. `"123 Main St, Reno, NV"`.
    #[must_use]
    pub fn display_address(&self) -> String {
        self.address.join(", ")
    }

    #[must_use]
    pub fn display_categories(&self) -> String {
        self.categories.join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeadPriority {
    High,
    Low,
}

impl LeadPriority {
    /// Businesses without a website are the leads worth calling first.
    #[must_use]
    pub fn for_website_presence(has_website: bool) -> Self {
        if has_website {
            LeadPriority::Low
        } else {
            LeadPriority::High
        }
    }
}

impl std::fmt::Display for LeadPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadPriority::High => write!(f, "HIGH"),
            LeadPriority::Low => write!(f, "LOW"),
        }
    }
}

/// A [`BusinessRecord`] tagged with its website verdict.
///
/// `lead_priority` is always derived from `has_website`; there is no way to
/// set it on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    record: BusinessRecord,
    has_website: bool,
    lead_priority: LeadPriority,
}

impl ClassifiedRecord {
    #[must_use]
    pub fn new(record: BusinessRecord, has_website: bool) -> Self {
        Self {
            record,
            has_website,
            lead_priority: LeadPriority::for_website_presence(has_website),
        }
    }

    #[must_use]
    pub fn record(&self) -> &BusinessRecord {
        &self.record
    }

    #[must_use]
    pub fn has_website(&self) -> bool {
        self.has_website
    }

    #[must_use]
    pub fn lead_priority(&self) -> LeadPriority {
        self.lead_priority
    }

    #[must_use]
    pub fn into_record(self) -> BusinessRecord {
        self.record
    }
}

/// Outcome of one discovery request.
///
/// Totals are computed from `records` at construction, so
/// `total_found == records.len()` and `without_websites` always matches the
/// number of records with `has_website == false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoveryResult {
    total_found: usize,
    without_websites: usize,
    records: Vec<ClassifiedRecord>,
    source: Option<String>,
    fallback: bool,
    message: Option<String>,
}

impl DiscoveryResult {
    #[must_use]
    pub fn from_records(records: Vec<ClassifiedRecord>, source: &str, fallback: bool) -> Self {
        let without_websites = records.iter().filter(|r| !r.has_website()).count();
        Self {
            total_found: records.len(),
            without_websites,
            records,
            source: Some(source.to_string()),
            fallback,
            message: None,
        }
    }

    /// Zero-total result carrying an explanation for the caller.
    #[must_use]
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            total_found: 0,
            without_websites: 0,
            records: Vec::new(),
            source: None,
            fallback: false,
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn total_found(&self) -> usize {
        self.total_found
    }

    #[must_use]
    pub fn without_websites(&self) -> usize {
        self.without_websites
    }

    #[must_use]
    pub fn records(&self) -> &[ClassifiedRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ClassifiedRecord> {
        self.records
    }

    /// Name of the source whose records were returned.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// `true` when the records are synthetic or came from a later source in
    /// the chain.
    #[must_use]
    pub fn fallback(&self) -> bool {
        self.fallback
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Flat JSON shape of a [`ClassifiedRecord`] exchanged with API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessView {
    pub name: String,
    #[serde(default = "not_available")]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub categories: String,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default = "default_has_website")]
    pub has_website: bool,
    #[serde(default)]
    pub website_url: String,
}

pub(crate) const PHONE_NOT_AVAILABLE: &str = "N/A";

fn not_available() -> String {
    PHONE_NOT_AVAILABLE.to_string()
}

// Rows without the flag are treated as having a website so they are never
// promoted to HIGH priority by accident.
fn default_has_website() -> bool {
    true
}

/// Accepts a number, a numeric string, `"N/A"` or `null`.
fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RatingField {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<RatingField>::deserialize(deserializer)? {
        Some(RatingField::Number(n)) => Some(n),
        Some(RatingField::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    })
}

impl From<&ClassifiedRecord> for BusinessView {
    fn from(classified: &ClassifiedRecord) -> Self {
        let record = classified.record();
        Self {
            name: record.name().to_string(),
            phone: record.phone().unwrap_or(PHONE_NOT_AVAILABLE).to_string(),
            address: record.display_address(),
            categories: record.display_categories(),
            rating: record.rating().map(Rating::value),
            review_count: record.review_count(),
            has_website: classified.has_website(),
            website_url: record.website_url().to_string(),
        }
    }
}

impl TryFrom<BusinessView> for ClassifiedRecord {
    type Error = CoreError;

    /// Rebuilds a classified record from a client-supplied row, keeping the
    /// client's `has_website` verdict.
    fn try_from(view: BusinessView) -> Result<Self, Self::Error> {
        let phone = if view.phone.trim() == PHONE_NOT_AVAILABLE {
            ""
        } else {
            view.phone.as_str()
        };
        let record = BusinessRecord::new(&view.name)?
            .with_phone(phone)
            .with_address_line(&view.address)
            .with_categories(view.categories.split(','))
            .with_rating(view.rating.and_then(Rating::new))
            .with_review_count(view.review_count)
            .with_website_url(&view.website_url);
        Ok(ClassifiedRecord::new(record, view.has_website))
    }
}

#[cfg(test)]
#[path = "business_test.rs"]
mod tests;
