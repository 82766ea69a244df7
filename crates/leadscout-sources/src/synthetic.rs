//! Synthetic business generator.
//!
//! Used as the last link of the fallback chain and as the remote API's
//! degraded mode when no credential is configured. Output looks like real
//! local listings but is entirely made up.

use async_trait::async_trait;
use leadscout_core::{BusinessRecord, DiscoveryQuery, Rating};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::SourceError;
use crate::source::{Source, SourceBatch};
use crate::text::{category_key, category_label, title_case};

/// Maximum number of records in one synthetic batch.
pub const SYNTHETIC_RESULT_CAP: usize = 8;

/// Probability that a generated business has a website.
pub const WEBSITE_PROBABILITY: f64 = 0.4;

/// Index of the handyman catalog in [`CATALOGS`].
const FALLBACK_CATALOG: usize = 4;

const AREA_CODES: [&str; 6] = ["555", "702", "415", "213", "619", "408"];

const STREET_NAMES: [&str; 10] = [
    "Main St",
    "Oak Ave",
    "First St",
    "Park Rd",
    "Market St",
    "Center Ave",
    "Washington Blvd",
    "Broadway",
    "Pine St",
    "Elm Ave",
];

const CATALOGS: [(&str, [&str; 10]); 9] = [
    (
        "barbershop",
        [
            "Classic Cuts",
            "The Gentleman's Barber",
            "Main Street Barbers",
            "Executive Cuts",
            "Old Town Barbershop",
            "Modern Man Barber Co.",
            "Corner Barbershop",
            "The Clipper Shop",
            "Fresh Cuts",
            "Uptown Barbers",
        ],
    ),
    (
        "dentist",
        [
            "Bright Smile Dental",
            "Family Dental Care",
            "Downtown Dental Group",
            "Comfort Dental",
            "Main Street Dentistry",
            "Smile Center",
            "Premier Dental",
            "City Dental Clinic",
            "Perfect Smile Dentistry",
            "Gentle Dental",
        ],
    ),
    (
        "electrician",
        [
            "Lightning Electric",
            "PowerPro Electricians",
            "Spark Electric Co.",
            "Reliable Electric",
            "24/7 Electric Services",
            "City Electric Solutions",
            "Express Electrical",
            "Master Electricians",
            "Bright Electric",
            "Voltage Pros",
        ],
    ),
    (
        "plumber",
        [
            "Quick Fix Plumbing",
            "Drain Masters",
            "Flow Pro Plumbers",
            "Emergency Plumbing",
            "City Plumbing Co.",
            "Pipe Dreams Plumbing",
            "Reliable Plumbers",
            "24 Hour Plumbing",
            "Water Works Plumbing",
            "Fix-It Plumbing",
        ],
    ),
    (
        "handyman",
        [
            "Fix-It-All Services",
            "Handy Helper",
            "Mr. Fix It",
            "All Tasks Handyman",
            "Home Repair Pros",
            "Quick Fix Services",
            "Reliable Handyman",
            "The Handyman Co.",
            "Home Solutions",
            "Fix & Go",
        ],
    ),
    (
        "hvac",
        [
            "Cool Air HVAC",
            "Climate Control Experts",
            "City Heating & Cooling",
            "Comfort Zone HVAC",
            "Air Masters",
            "Temperature Pro",
            "All Seasons HVAC",
            "Express HVAC",
            "Climate Solutions",
            "Air Comfort",
        ],
    ),
    (
        "roofing",
        [
            "Top Roof Services",
            "Reliable Roofing",
            "City Roofers",
            "Premier Roofing",
            "Storm Guard Roofing",
            "Quality Roof Repair",
            "Express Roofing",
            "Master Roofers",
            "Summit Roofing",
            "Apex Roofing",
        ],
    ),
    (
        "landscaping",
        [
            "Green Thumb Landscaping",
            "Beautiful Yards",
            "City Landscaping",
            "Premier Lawn Care",
            "Nature's Touch",
            "Express Lawn Services",
            "Quality Landscaping",
            "Green Valley",
            "Bloom Landscaping",
            "Yard Pros",
        ],
    ),
    (
        "auto repair",
        [
            "Quick Fix Auto",
            "City Auto Repair",
            "Express Auto Service",
            "Main Street Auto",
            "Reliable Auto Shop",
            "Premier Auto Care",
            "Master Mechanics",
            "Downtown Auto",
            "Fast Lane Auto",
            "Pro Auto Service",
        ],
    ),
];

/// Resolves a category to its catalog, falling back to the handyman catalog.
///
/// Keys are compared lower-cased with whitespace removed, so `"Auto Repair"`,
/// `"auto repair"` and `"autorepair"` all select the same catalog.
#[must_use]
pub fn catalog_for(category: &str) -> (&'static str, &'static [&'static str]) {
    let wanted = category_key(category);
    let (key, names) = CATALOGS
        .iter()
        .find(|(key, _)| category_key(key) == wanted)
        .unwrap_or(&CATALOGS[FALLBACK_CATALOG]);
    (*key, names.as_slice())
}

/// Generates plausible, randomized businesses for any query.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    seed: Option<u64>,
    cap: usize,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            seed: None,
            cap: SYNTHETIC_RESULT_CAP,
        }
    }

    /// Same seed and query always produce the same batch.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            cap: SYNTHETIC_RESULT_CAP,
        }
    }

    #[must_use]
    pub fn generate(&self, query: &DiscoveryQuery) -> Vec<BusinessRecord> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let (catalog_key, names) = catalog_for(&query.category);
        let city = query.city();
        let label = category_label(&query.category).unwrap_or_else(|| title_case(catalog_key));

        let mut records = Vec::with_capacity(names.len());
        for (i, template) in names.iter().enumerate() {
            let area_code = AREA_CODES[rng.random_range(0..AREA_CODES.len())];
            let phone = format!(
                "({area_code}) {}-{}",
                rng.random_range(100..=999),
                rng.random_range(1000..=9999)
            );

            let street_numbers = [100 + i * 25, 250 + i * 33, 500 + i * 17];
            let number = street_numbers[rng.random_range(0..street_numbers.len())];
            let street = STREET_NAMES[rng.random_range(0..STREET_NAMES.len())];

            let rating = (rng.random_range(3.2..=4.8_f64) * 10.0).round() / 10.0;
            let review_count = rng.random_range(15..=150);
            let website_url = if rng.random_bool(WEBSITE_PROBABILITY) {
                format!("https://www.{}.com", website_slug(template))
            } else {
                String::new()
            };

            let Ok(record) = BusinessRecord::new(format!("{template} - {city}")) else {
                continue;
            };
            records.push(
                record
                    .with_phone(phone)
                    .with_address([format!("{number} {street}"), query.location.clone()])
                    .with_category(label.clone())
                    .with_rating(Rating::new(rating))
                    .with_review_count(review_count)
                    .with_website_url(website_url),
            );
        }

        records.shuffle(&mut rng);
        records.truncate(self.cap);
        records
    }
}

fn website_slug(template: &str) -> String {
    template
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[async_trait]
impl Source for SyntheticSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn discover(&self, query: &DiscoveryQuery) -> Result<SourceBatch, SourceError> {
        let records = self.generate(query);
        tracing::debug!(
            source = self.name(),
            category = %query.category,
            location = %query.location,
            count = records.len(),
            "generated synthetic businesses"
        );
        Ok(SourceBatch::synthetic(records))
    }
}
