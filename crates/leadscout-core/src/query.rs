use serde::{Deserialize, Serialize};

pub const DEFAULT_RADIUS_MILES: f64 = 5.0;
pub const DEFAULT_CATEGORY: &str = "all";

/// What a caller is looking for: a category of business near a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryQuery {
    /// Display location, e.g. `"Reno, NV"`.
    pub location: String,
    pub radius_miles: f64,
    /// Internal category vocabulary (`"plumber"`, `"auto repair"`, `"all"`...).
    pub category: String,
}

impl DiscoveryQuery {
    /// Builds a query from request parts, applying the default radius and
    /// category when they are missing or blank.
    #[must_use]
    pub fn new(city: &str, state: &str, radius_miles: Option<f64>, category: Option<&str>) -> Self {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);
        let radius_miles = radius_miles
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(DEFAULT_RADIUS_MILES);

        Self {
            location: format!("{}, {}", city.trim(), state.trim()),
            radius_miles,
            category: category.to_string(),
        }
    }

    /// City part of the location (text before the first comma).
    #[must_use]
    pub fn city(&self) -> &str {
        self.location
            .split(',')
            .next()
            .map_or(self.location.as_str(), str::trim)
    }

    #[must_use]
    pub fn is_all_categories(&self) -> bool {
        self.category.eq_ignore_ascii_case(DEFAULT_CATEGORY)
    }
}
