use super::*;
use leadscout_core::{BusinessRecord, ClassifiedRecord, DiscoveryQuery, DiscoveryResult, Rating};

#[test]
fn parses_discover_with_defaults() {
    let cli = Cli::try_parse_from(["leadscout-cli", "discover", "--city", "Reno", "--state", "NV"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Discover {
            ref city,
            ref state,
            ref category,
            export: false,
            ..
        }) if city == "Reno" && state == "NV" && category == "all"
    ));
    if let Some(Commands::Discover { radius, .. }) = cli.command {
        assert!((radius - 5.0).abs() < f64::EPSILON);
    }
}

#[test]
fn parses_discover_with_all_flags() {
    let cli = Cli::try_parse_from([
        "leadscout-cli",
        "discover",
        "--city",
        "Carson City",
        "--state",
        "NV",
        "--radius",
        "12.5",
        "--category",
        "auto repair",
        "--export",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Discover {
            ref category,
            export: true,
            ..
        }) if category == "auto repair"
    ));
}

#[test]
fn discover_requires_city_and_state() {
    assert!(Cli::try_parse_from(["leadscout-cli", "discover", "--city", "Reno"]).is_err());
}

#[test]
fn parses_validate_command() {
    let cli = Cli::try_parse_from(["leadscout-cli", "validate", "example.com"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Validate { ref url }) if url == "example.com"
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["leadscout-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn summary_lists_leads_with_priority() {
    let query = DiscoveryQuery::new("Reno", "NV", None, Some("plumber"));
    let no_site = BusinessRecord::new("Washoe Plumbing")
        .expect("valid name")
        .with_phone("(775) 555-0142")
        .with_address(["12 Oak Avenue", "Reno, NV"])
        .with_rating(Rating::new(4.6))
        .with_review_count(88);
    let with_site = BusinessRecord::new("Comstock Pipes")
        .expect("valid name")
        .with_website_url("https://comstockpipes.example");
    let result = DiscoveryResult::from_records(
        vec![
            ClassifiedRecord::new(no_site, false),
            ClassifiedRecord::new(with_site, true),
        ],
        "html_scrape",
        true,
    );

    let text = discover::render_summary(&query, &result);
    let lines: Vec<_> = text.lines().collect();

    assert_eq!(lines[0], "Reno, NV | plumber within 5 mi");
    assert_eq!(
        lines[1],
        "found 2 businesses, 1 without a website (source: html_scrape, fallback)"
    );
    assert_eq!(
        lines[2],
        "[HIGH] Washoe Plumbing | (775) 555-0142 | 12 Oak Avenue, Reno, NV | rating 4.6 (88 reviews)"
    );
    assert_eq!(
        lines[3],
        "[LOW] Comstock Pipes | N/A |  | rating - (0 reviews) | https://comstockpipes.example"
    );
}

#[test]
fn summary_of_empty_result_prints_message() {
    let query = DiscoveryQuery::new("Elko", "NV", None, None);
    let result = DiscoveryResult::empty("No businesses found in Elko, NV.");

    let text = discover::render_summary(&query, &result);

    assert_eq!(
        text,
        "Elko, NV | all within 5 mi\nNo businesses found in Elko, NV.\n"
    );
}

fn synthetic_only_config() -> leadscout_core::AppConfig {
    leadscout_core::build_app_config(|var| match var {
        "LEADSCOUT_SOURCES" => Ok("synthetic".to_string()),
        _ => Err(std::env::VarError::NotPresent),
    })
    .expect("config builds")
}

fn discover_args(city: &str, state: &str) -> discover::DiscoverArgs {
    discover::DiscoverArgs {
        city: city.to_string(),
        state: state.to_string(),
        radius: 5.0,
        category: "plumber".to_string(),
        export: false,
    }
}

#[tokio::test]
async fn discover_rejects_blank_state() {
    let err = discover::run_discover(&synthetic_only_config(), &discover_args("Reno", "  "))
        .await
        .expect_err("blank state");
    assert_eq!(err.to_string(), "city and state are required");
}

#[tokio::test]
async fn discover_runs_synthetic_chain() {
    discover::run_discover(&synthetic_only_config(), &discover_args("Reno", "NV"))
        .await
        .expect("synthetic discovery succeeds");
}
