//! Listing extraction for directory search-result pages.

use std::sync::LazyLock;

use leadscout_core::{BusinessRecord, Rating};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::SkippedItem;
use crate::text::collapse_whitespace;

/// Most listings taken from a single results page.
pub const MAX_LISTINGS: usize = 30;

static RESULT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.result").expect("valid selector"));
static BUSINESS_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.business-name").expect("valid selector"));
static PHONES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.phones").expect("valid selector"));
static STREET_ADDRESS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.street-address").expect("valid selector"));
static LOCALITY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.locality").expect("valid selector"));
static WEBSITE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.track-visit-website").expect("valid selector"));
static RATINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.ratings").expect("valid selector"));
static REVIEW_COUNT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.count").expect("valid selector"));

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").expect("valid regex"));
static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)").expect("valid regex"));

/// Parses up to [`MAX_LISTINGS`] `div.result` blocks from a results page.
///
/// `category_label` is attached to every record; `self_domain` filters
/// website links that point back at the directory.
pub(crate) fn parse_listings(
    html: &str,
    category_label: Option<&str>,
    self_domain: &str,
) -> (Vec<BusinessRecord>, Vec<SkippedItem>) {
    let document = Html::parse_document(html);
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (index, listing) in document.select(&RESULT).take(MAX_LISTINGS).enumerate() {
        match parse_listing(listing, category_label, self_domain) {
            Ok(record) => records.push(record),
            Err(reason) => skipped.push(SkippedItem::new(index, reason)),
        }
    }

    (records, skipped)
}

fn parse_listing(
    listing: ElementRef<'_>,
    category_label: Option<&str>,
    self_domain: &str,
) -> Result<BusinessRecord, String> {
    let name = first_text(listing, &BUSINESS_NAME).unwrap_or_default();
    let mut record =
        BusinessRecord::new(&name).map_err(|_| "listing has no business name".to_owned())?;

    if let Some(phone) = first_text(listing, &PHONES) {
        record = record.with_phone(phone);
    }

    let address = [
        first_text(listing, &STREET_ADDRESS),
        first_text(listing, &LOCALITY),
    ];
    record = record.with_address(address.into_iter().flatten());

    if let Some(label) = category_label {
        record = record.with_category(label);
    }

    let website = listing
        .select(&WEBSITE_LINK)
        .filter_map(|link| link.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty() && !href.contains(self_domain));
    if let Some(href) = website {
        record = record.with_website_url(href);
    }

    if let Some(ratings) = listing.select(&RATINGS).next() {
        let rating = ratings
            .value()
            .attr("data-rating")
            .and_then(|raw| NUMBER_RE.captures(raw))
            .and_then(|caps| caps[1].parse::<f64>().ok())
            .and_then(Rating::new);
        record = record.with_rating(rating);

        let review_count = first_text(ratings, &REVIEW_COUNT)
            .and_then(|text| {
                DIGITS_RE
                    .captures(&text)
                    .and_then(|caps| caps[1].parse::<u32>().ok())
            })
            .unwrap_or(0);
        record = record.with_review_count(review_count);
    }

    Ok(record)
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(body: &str) -> String {
        format!(r#"<html><body><div class="search-results">{body}</div></body></html>"#)
    }

    const FULL_LISTING: &str = r#"
        <div class="result">
          <a class="business-name" href="/reno-nv/mip/drain-masters">  Drain
             Masters </a>
          <div class="phones phone primary">(775) 555-0101</div>
          <div class="adr">
            <div class="street-address">12 Oak Ave</div>
            <div class="locality">Reno, NV 89501</div>
          </div>
          <div class="ratings" data-rating="4.5"><span class="count">(87)</span></div>
          <a class="track-visit-website" href="https://www.yellowpages.com/redirect">YP</a>
          <a class="track-visit-website" href="https://drainmasters.example">Website</a>
        </div>"#;

    #[test]
    fn full_listing_extracts_every_field() {
        let (records, skipped) =
            parse_listings(&listing(FULL_LISTING), Some("Plumber"), "yellowpages.com");
        assert!(skipped.is_empty());
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.name(), "Drain Masters");
        assert_eq!(record.phone(), Some("(775) 555-0101"));
        assert_eq!(record.display_address(), "12 Oak Ave, Reno, NV 89501");
        assert_eq!(record.display_categories(), "Plumber");
        assert_eq!(record.website_url(), "https://drainmasters.example");
        assert_eq!(record.rating().map(Rating::value), Some(4.5));
        assert_eq!(record.review_count(), 87);
    }

    #[test]
    fn listing_without_name_is_skipped() {
        let html = listing(
            r#"<div class="result"><div class="phones">(775) 555-0101</div></div>
               <div class="result"><a class="business-name">Pipe Pros</a></div>"#,
        );
        let (records, skipped) = parse_listings(&html, None, "yellowpages.com");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), "Pipe Pros");
        assert_eq!(skipped, [SkippedItem::new(0, "listing has no business name")]);
    }

    #[test]
    fn self_referential_links_are_not_websites() {
        let html = listing(
            r#"<div class="result"><a class="business-name">Only YP</a>
               <a class="track-visit-website" href="https://www.yellowpages.com/x">x</a></div>"#,
        );
        let (records, _) = parse_listings(&html, None, "yellowpages.com");
        assert_eq!(records[0].website_url(), "");
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let html = listing(r#"<div class="result"><a class="business-name">Bare</a></div>"#);
        let (records, _) = parse_listings(&html, None, "yellowpages.com");
        let record = &records[0];
        assert_eq!(record.phone(), None);
        assert!(record.address().is_empty());
        assert!(record.categories().is_empty());
        assert_eq!(record.rating(), None);
        assert_eq!(record.review_count(), 0);
    }

    #[test]
    fn listings_are_capped() {
        let body: String = (0..40)
            .map(|i| format!(r#"<div class="result"><a class="business-name">Biz {i}</a></div>"#))
            .collect();
        let (records, _) = parse_listings(&listing(&body), None, "yellowpages.com");
        assert_eq!(records.len(), MAX_LISTINGS);
        assert_eq!(records[29].name(), "Biz 29");
    }

    #[test]
    fn page_without_results_is_empty() {
        let (records, skipped) =
            parse_listings("<html><body>No results</body></html>", None, "yellowpages.com");
        assert!(records.is_empty());
        assert!(skipped.is_empty());
    }
}
