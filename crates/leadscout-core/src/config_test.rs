use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "LEADSCOUT_ENV"));
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults are valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:5000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.yelp_api_key.is_none());
    assert_eq!(
        cfg.sources,
        vec![
            SourceKind::RemoteApi,
            SourceKind::HtmlScrape,
            SourceKind::Synthetic
        ]
    );
    assert_eq!(cfg.export_dir.to_string_lossy(), "exports");
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.browser_wait_secs, 10);
    assert_eq!(cfg.browser_scrolls, 3);
    assert!(cfg.chromium_path.is_none());
    assert_eq!(cfg.validate_timeout_secs, 5);
}

#[test]
fn blank_api_key_is_treated_as_missing() {
    let mut map = HashMap::new();
    map.insert("YELP_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.yelp_api_key.is_none());
}

#[test]
fn api_key_is_redacted_in_debug_output() {
    let mut map = HashMap::new();
    map.insert("YELP_API_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.yelp_api_key.as_deref(), Some("super-secret"));
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("[redacted]"));
}

#[test]
fn sources_override_preserves_order_and_dedups() {
    let mut map = HashMap::new();
    map.insert("LEADSCOUT_SOURCES", "browser, synthetic,browser");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.sources, vec![SourceKind::Browser, SourceKind::Synthetic]);
}

#[test]
fn sources_accept_aliases() {
    let mut map = HashMap::new();
    map.insert("LEADSCOUT_SOURCES", "yelp,yellowpages,maps,mock");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.sources,
        vec![
            SourceKind::RemoteApi,
            SourceKind::HtmlScrape,
            SourceKind::Browser,
            SourceKind::Synthetic
        ]
    );
}

#[test]
fn unknown_source_fails() {
    let mut map = HashMap::new();
    map.insert("LEADSCOUT_SOURCES", "remote_api,carrier_pigeon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LEADSCOUT_SOURCES"),
        "expected InvalidEnvVar(LEADSCOUT_SOURCES), got: {result:?}"
    );
}

#[test]
fn empty_source_list_fails() {
    let mut map = HashMap::new();
    map.insert("LEADSCOUT_SOURCES", " , ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LEADSCOUT_SOURCES"));
}

#[test]
fn invalid_bind_addr_fails() {
    let mut map = HashMap::new();
    map.insert("LEADSCOUT_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LEADSCOUT_BIND_ADDR"),
        "expected InvalidEnvVar(LEADSCOUT_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("LEADSCOUT_REQUEST_TIMEOUT_SECS", "30");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 30);
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("LEADSCOUT_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LEADSCOUT_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(LEADSCOUT_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn zero_timeout_is_rejected() {
    let mut map = HashMap::new();
    map.insert("LEADSCOUT_VALIDATE_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "LEADSCOUT_VALIDATE_TIMEOUT_SECS")
    );
}

#[test]
fn browser_settings_override() {
    let mut map = HashMap::new();
    map.insert("LEADSCOUT_BROWSER_WAIT_SECS", "20");
    map.insert("LEADSCOUT_BROWSER_SCROLLS", "5");
    map.insert("LEADSCOUT_CHROMIUM_PATH", "/usr/bin/chromium");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.browser_wait_secs, 20);
    assert_eq!(cfg.browser_scrolls, 5);
    assert_eq!(
        cfg.chromium_path.as_deref(),
        Some(std::path::Path::new("/usr/bin/chromium"))
    );
}
