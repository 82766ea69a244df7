//! Result-card extraction for Maps style search pages.
//!
//! Cards arrive as outer-HTML snapshots. Each [`CardLayout`] is one way of
//! reading a card; layouts are tried in order and the first one that finds a
//! business name wins.

use std::sync::LazyLock;

use leadscout_core::{BusinessRecord, Rating, WebsitePresenceClassifier};
use percent_encoding::percent_decode_str;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::text::{collapse_whitespace, digit_count};

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[()\d\s\-+]{10,}").expect("valid regex"));
static RATING_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?\s*(stars?|reviews?)").expect("valid regex"));
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)").expect("valid regex"));
static REVIEWS_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([\d,]+)\s+reviews?").expect("valid regex"));

/// CSS selectors describing one card markup generation.
#[derive(Debug, Clone, Copy)]
pub struct CardLayout {
    pub label: &'static str,
    pub name_selectors: &'static [&'static str],
    /// Elements whose text holds phone, address and category fragments.
    pub info_selectors: &'static [&'static str],
    pub rating_selectors: &'static [&'static str],
    pub review_selectors: &'static [&'static str],
    pub website_selectors: &'static [&'static str],
}

pub const CURRENT_LAYOUT: CardLayout = CardLayout {
    label: "current",
    name_selectors: &[".fontHeadlineSmall", ".qBF1Pd", ".DUwDvf"],
    info_selectors: &[".W4Efsd span", ".W4Efsd"],
    rating_selectors: &[".MW4etd", "[aria-label*=\"stars\"]"],
    review_selectors: &[".UY7F9", "[aria-label*=\"reviews\"]"],
    website_selectors: &[
        "a[data-value=\"Website\"]",
        "a[aria-label*=\"Website\"]",
        "a[data-item-id=\"authority\"]",
    ],
};

pub const LEGACY_LAYOUT: CardLayout = CardLayout {
    label: "legacy",
    name_selectors: &[
        "[data-value=\"Business name\"]",
        "h3",
        ".section-result-title",
    ],
    info_selectors: &[".fontBodyMedium", ".section-result-details"],
    rating_selectors: &[".fontBodySmall", ".section-result-rating"],
    review_selectors: &[".fontBodySmall", ".section-result-num-ratings"],
    website_selectors: &["a.section-result-action-website", "a[href*=\"url?q=\"]"],
};

/// Layouts in the order they are tried.
#[must_use]
pub fn default_layouts() -> Vec<CardLayout> {
    vec![CURRENT_LAYOUT, LEGACY_LAYOUT]
}

/// Turns one card snapshot into a record.
///
/// `fallback_category` labels the record when the card text carries no
/// category; links on `self_domain` are never taken as the website.
pub(crate) fn extract_card(
    html: &str,
    layouts: &[CardLayout],
    fallback_category: Option<&str>,
    self_domain: &str,
) -> Result<BusinessRecord, String> {
    let fragment = Html::parse_fragment(html);
    let root = fragment.root_element();

    for layout in layouts {
        let Some(name) = first_text(root, layout.name_selectors) else {
            continue;
        };
        let Ok(record) = BusinessRecord::new(&name) else {
            continue;
        };
        tracing::trace!(layout = layout.label, name = %name, "card matched layout");
        return Ok(fill_record(
            record,
            root,
            layout,
            fallback_category,
            self_domain,
        ));
    }

    Err("card has no recognizable business name".to_owned())
}

fn fill_record(
    mut record: BusinessRecord,
    root: ElementRef<'_>,
    layout: &CardLayout,
    fallback_category: Option<&str>,
    self_domain: &str,
) -> BusinessRecord {
    let info = InfoFields::collect(root, layout.info_selectors);

    if let Some(phone) = info.phone {
        record = record.with_phone(phone);
    }
    if let Some(address) = info.address {
        record = record.with_address_line(address);
    }
    if let Some(category) = info.category.as_deref().or(fallback_category) {
        record = record.with_category(category);
    }

    record = record
        .with_rating(find_rating(root, layout.rating_selectors))
        .with_review_count(find_review_count(root, layout.review_selectors).unwrap_or(0));

    if let Some(website) = find_website(root, layout.website_selectors, self_domain) {
        record = record.with_website_url(website);
    }
    record
}

/// Phone, address and category pulled from a card's free-text lines.
#[derive(Debug, Default, PartialEq, Eq)]
struct InfoFields {
    phone: Option<String>,
    address: Option<String>,
    category: Option<String>,
}

impl InfoFields {
    fn collect(root: ElementRef<'_>, selectors: &[&str]) -> Self {
        let mut fields = Self::default();
        for el in first_matching(root, selectors) {
            let text = collapse_whitespace(&el.text().collect::<String>());
            fields.absorb(&text);
        }
        fields
    }

    /// Lines look like `"Plumber · 12 Oak Ave"` or `"Open 24 hours · (775) 555-0101"`.
    fn absorb(&mut self, text: &str) {
        let dotted = text.contains('·');
        for segment in text.split('·').map(str::trim).filter(|s| !s.is_empty()) {
            if looks_like_phone(segment) {
                self.phone.get_or_insert_with(|| segment.to_owned());
            } else if looks_like_address(segment) {
                self.address.get_or_insert_with(|| segment.to_owned());
            } else if dotted && looks_like_category(segment) {
                self.category.get_or_insert_with(|| segment.to_owned());
            }
        }
    }
}

fn looks_like_phone(text: &str) -> bool {
    PHONE_RE.is_match(text) && digit_count(text) >= 7
}

fn looks_like_address(text: &str) -> bool {
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let has_alpha = text.chars().any(char::is_alphabetic);
    let lowered = text.to_lowercase();
    has_digit
        && has_alpha
        && text.chars().count() > 10
        && !RATING_TEXT_RE.is_match(&lowered)
        && !is_opening_hours(&lowered)
}

fn looks_like_category(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '&' || c == '-' || c == '\'')
        && !is_opening_hours(&text.to_lowercase())
}

fn is_opening_hours(lowered: &str) -> bool {
    ["open", "closed", "opens", "closes"]
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

fn find_rating(root: ElementRef<'_>, selectors: &[&str]) -> Option<Rating> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .flat_map(|selector| {
            root.select(&selector)
                .map(|el| {
                    let text = collapse_whitespace(&el.text().collect::<String>());
                    if text.is_empty() {
                        el.value().attr("aria-label").unwrap_or_default().to_owned()
                    } else {
                        text
                    }
                })
                .collect::<Vec<_>>()
        })
        .find_map(|text| {
            let value = NUMBER_RE.captures(&text)?[1].parse::<f64>().ok()?;
            (1.0..=5.0).contains(&value).then_some(value)
        })
        .and_then(Rating::new)
}

fn find_review_count(root: ElementRef<'_>, selectors: &[&str]) -> Option<u32> {
    for selector in selectors.iter().filter_map(|s| Selector::parse(s).ok()) {
        for el in root.select(&selector) {
            let text = el.text().collect::<String>();
            if let Some(count) = parenthesized_count(&text) {
                return Some(count);
            }
            let label = el.value().attr("aria-label").unwrap_or_default();
            if let Some(caps) = REVIEWS_LABEL_RE.captures(label) {
                if let Ok(count) = caps[1].replace(',', "").parse() {
                    return Some(count);
                }
            }
        }
    }
    None
}

/// `"4.6(1,234)"` → `1234`.
fn parenthesized_count(text: &str) -> Option<u32> {
    let (_, rest) = text.split_once('(')?;
    let (inner, _) = rest.split_once(')')?;
    let cleaned: String = inner.chars().filter(|c| *c != ',' && *c != '+').collect();
    cleaned.trim().parse().ok()
}

fn find_website(root: ElementRef<'_>, selectors: &[&str], self_domain: &str) -> Option<String> {
    let classifier = WebsitePresenceClassifier::new([self_domain]);
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .flat_map(|selector| {
            root.select(&selector)
                .filter_map(|el| el.value().attr("href"))
                .map(str::to_owned)
                .collect::<Vec<_>>()
        })
        .filter_map(|href| unwrap_redirect(&href))
        .find(|href| href.starts_with("http") && !classifier.is_self_referential(href))
}

/// Resolves `/url?q=<target>&...` redirect links to their target.
fn unwrap_redirect(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let Some((_, query)) = href.split_once("url?q=") else {
        return Some(href.to_owned());
    };
    let target = query.split('&').next().unwrap_or_default();
    percent_decode_str(target)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

/// Matches of the first selector in `selectors` that matches anything.
fn first_matching<'a>(root: ElementRef<'a>, selectors: &[&str]) -> Vec<ElementRef<'a>> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .map(|selector| root.select(&selector).collect::<Vec<_>>())
        .find(|matches| !matches.is_empty())
        .unwrap_or_default()
}

fn first_text(root: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .flat_map(|selector| {
            root.select(&selector)
                .map(|el| collapse_whitespace(&el.text().collect::<String>()))
                .collect::<Vec<_>>()
        })
        .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_CARD: &str = r#"
        <div role="article" class="Nv2PK">
          <div class="qBF1Pd fontHeadlineSmall">Drain Masters</div>
          <span class="MW4etd">4.6</span><span class="UY7F9">(1,234)</span>
          <div class="W4Efsd">
            <span>Plumber · 12 Oak Avenue</span>
            <span>Open 24 hours · (775) 555-0101</span>
          </div>
          <a data-value="Website" href="https://drainmasters.example/">Website</a>
        </div>"#;

    const LEGACY_CARD: &str = r#"
        <div class="section-result">
          <h3 class="section-result-title"><span>Pipe Pros</span></h3>
          <span class="section-result-rating">4.1</span>
          <span class="section-result-num-ratings">(56)</span>
          <span class="section-result-details">455 Washington Blvd Reno</span>
          <a class="section-result-action-website"
             href="/url?q=https%3A%2F%2Fpipepros.example%2F&amp;sa=U">Website</a>
        </div>"#;

    fn extract(html: &str) -> Result<BusinessRecord, String> {
        extract_card(html, &default_layouts(), Some("Plumber"), "google.com")
    }

    #[test]
    fn current_layout_card_extracts_fields() {
        let record = extract(CURRENT_CARD).expect("card has a name");
        assert_eq!(record.name(), "Drain Masters");
        assert_eq!(record.phone(), Some("(775) 555-0101"));
        assert_eq!(record.display_address(), "12 Oak Avenue");
        assert_eq!(record.display_categories(), "Plumber");
        assert_eq!(record.rating().map(Rating::value), Some(4.6));
        assert_eq!(record.review_count(), 1234);
        assert_eq!(record.website_url(), "https://drainmasters.example/");
    }

    #[test]
    fn legacy_layout_is_used_when_current_has_no_name() {
        let record = extract(LEGACY_CARD).expect("legacy card has a name");
        assert_eq!(record.name(), "Pipe Pros");
        assert_eq!(record.display_address(), "455 Washington Blvd Reno");
        assert_eq!(record.rating().map(Rating::value), Some(4.1));
        assert_eq!(record.review_count(), 56);
        assert_eq!(record.website_url(), "https://pipepros.example/");
        assert_eq!(record.display_categories(), "Plumber");
    }

    #[test]
    fn card_without_name_fails() {
        let err = extract(r#"<div role="article"><span class="MW4etd">4.2</span></div>"#)
            .expect_err("nameless card");
        assert!(err.contains("no recognizable business name"));
    }

    #[test]
    fn self_domain_links_are_ignored() {
        let html = r#"<div role="article"><div class="fontHeadlineSmall">Only Maps</div>
            <a data-value="Website" href="https://www.google.com/maps/place/x">Website</a></div>"#;
        let record = extract(html).expect("named card");
        assert_eq!(record.website_url(), "");
    }

    #[test]
    fn website_mentioning_self_domain_in_query_is_kept() {
        let html = r#"<div role="article"><div class="fontHeadlineSmall">Ref Plumbing</div>
            <a data-value="Website" href="https://refplumbing.example/?ref=google.com">Website</a></div>"#;
        let record = extract(html).expect("named card");
        assert_eq!(record.website_url(), "https://refplumbing.example/?ref=google.com");
    }

    #[test]
    fn rating_from_aria_label() {
        let html = r#"<div role="article"><div class="fontHeadlineSmall">Aria Shop</div>
            <span aria-label="3.9 stars 12 Reviews"></span></div>"#;
        let record = extract(html).expect("named card");
        assert_eq!(record.rating().map(Rating::value), Some(3.9));
    }

    #[test]
    fn phone_requires_seven_digits() {
        assert!(looks_like_phone("(775) 555-0101"));
        assert!(!looks_like_phone("(  ) -  - 12"));
    }

    #[test]
    fn address_rejects_rating_and_hours_text() {
        assert!(looks_like_address("12 Oak Ave, Reno"));
        assert!(!looks_like_address("4.5 stars (120)"));
        assert!(!looks_like_address("Open 24 hours"));
        assert!(!looks_like_address("Main St"));
    }

    #[test]
    fn info_fields_split_on_middle_dot() {
        let mut fields = InfoFields::default();
        fields.absorb("Electrician · 410 Market St");
        fields.absorb("Closed · Opens 8 AM · (702) 555-0199");
        assert_eq!(
            fields,
            InfoFields {
                phone: Some("(702) 555-0199".into()),
                address: Some("410 Market St".into()),
                category: Some("Electrician".into()),
            }
        );
    }

    #[test]
    fn parenthesized_count_strips_separators() {
        assert_eq!(parenthesized_count("4.6(1,234)"), Some(1234));
        assert_eq!(parenthesized_count("(99+)"), Some(99));
        assert_eq!(parenthesized_count("no count"), None);
    }
}
