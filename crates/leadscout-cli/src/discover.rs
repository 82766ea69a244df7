//! `discover` command: run the source chain and print the leads.

use std::fmt::Write as _;

use leadscout_core::{AppConfig, DiscoveryQuery, DiscoveryResult};
use leadscout_pipeline::{CsvExporter, DiscoveryPipeline, ExportError};

#[derive(Debug, Clone)]
pub(crate) struct DiscoverArgs {
    pub city: String,
    pub state: String,
    pub radius: f64,
    pub category: String,
    pub export: bool,
}

/// Runs one discovery and prints a summary followed by one line per lead.
///
/// # Errors
///
/// Returns an error if city or state is blank, the source chain cannot be
/// built, or `--export` was given and writing the CSV fails. An empty result
/// with `--export` is reported, not treated as an error.
pub(crate) async fn run_discover(config: &AppConfig, args: &DiscoverArgs) -> anyhow::Result<()> {
    if args.city.trim().is_empty() || args.state.trim().is_empty() {
        tracing::warn!(city = %args.city, state = %args.state, "discover rejected");
        anyhow::bail!("city and state are required");
    }

    let pipeline = DiscoveryPipeline::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build source chain: {e}"))?;
    let query = DiscoveryQuery::new(
        &args.city,
        &args.state,
        Some(args.radius),
        Some(args.category.as_str()),
    );

    let result = pipeline.run(&query).await;
    tracing::info!(
        location = %query.location,
        category = %query.category,
        found = result.total_found(),
        without_websites = result.without_websites(),
        source = result.source().unwrap_or("none"),
        fallback = result.fallback(),
        "discovery finished"
    );
    print!("{}", render_summary(&query, &result));

    if args.export {
        let exporter = CsvExporter::new(&config.export_dir);
        match exporter.export(result.records()) {
            Ok(path) => {
                tracing::info!(path = %path.display(), rows = result.total_found(), "leads exported");
                println!("exported {} rows to {}", result.total_found(), path.display());
            }
            Err(ExportError::Empty) => println!("nothing to export"),
            Err(e) => {
                tracing::error!(dir = %config.export_dir.display(), error = %e, "CSV export failed");
                return Err(e.into());
            }
        }
    }

    Ok(())
}

/// Text report printed by `discover`.
pub(crate) fn render_summary(query: &DiscoveryQuery, result: &DiscoveryResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} | {} within {} mi",
        query.location, query.category, query.radius_miles
    );

    if let Some(message) = result.message() {
        let _ = writeln!(out, "{message}");
        return out;
    }

    let source = result.source().unwrap_or("unknown");
    let _ = writeln!(
        out,
        "found {} businesses, {} without a website (source: {source}{})",
        result.total_found(),
        result.without_websites(),
        if result.fallback() { ", fallback" } else { "" }
    );

    for classified in result.records() {
        let record = classified.record();
        let rating = record
            .rating()
            .map_or_else(|| "-".to_string(), |r| r.to_string());
        let _ = writeln!(
            out,
            "[{}] {} | {} | {} | rating {} ({} reviews){}",
            classified.lead_priority(),
            record.name(),
            record.phone().unwrap_or("N/A"),
            record.display_address(),
            rating,
            record.review_count(),
            if classified.has_website() {
                format!(" | {}", record.website_url())
            } else {
                String::new()
            }
        );
    }

    out
}
