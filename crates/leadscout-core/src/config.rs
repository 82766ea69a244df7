use crate::app_config::{AppConfig, Environment, SourceKind};
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional: a missing API credential degrades the remote
/// source at discovery time rather than failing here.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("LEADSCOUT_ENV", "development"))?;

    let bind_addr = or_default("LEADSCOUT_BIND_ADDR", "0.0.0.0:5000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("LEADSCOUT_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("LEADSCOUT_LOG_LEVEL", "info");
    let yelp_api_key = optional("YELP_API_KEY");
    let sources = parse_sources(&or_default(
        "LEADSCOUT_SOURCES",
        "remote_api,html_scrape,synthetic",
    ))?;
    let export_dir = PathBuf::from(or_default("LEADSCOUT_EXPORT_DIR", "exports"));

    let request_timeout_secs = parse_u64("LEADSCOUT_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("LEADSCOUT_USER_AGENT", DEFAULT_USER_AGENT);
    let browser_wait_secs = parse_u64("LEADSCOUT_BROWSER_WAIT_SECS", "10")?;
    let browser_scrolls = parse_u32("LEADSCOUT_BROWSER_SCROLLS", "3")?;
    let chromium_path = optional("LEADSCOUT_CHROMIUM_PATH").map(PathBuf::from);
    let validate_timeout_secs = parse_u64("LEADSCOUT_VALIDATE_TIMEOUT_SECS", "5")?;

    for (var, value) in [
        ("LEADSCOUT_REQUEST_TIMEOUT_SECS", request_timeout_secs),
        ("LEADSCOUT_BROWSER_WAIT_SECS", browser_wait_secs),
        ("LEADSCOUT_VALIDATE_TIMEOUT_SECS", validate_timeout_secs),
    ] {
        if value == 0 {
            return Err(invalid(var, "timeout must be at least 1 second".to_string()));
        }
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        yelp_api_key,
        sources,
        export_dir,
        request_timeout_secs,
        user_agent,
        browser_wait_secs,
        browser_scrolls,
        chromium_path,
        validate_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LEADSCOUT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Parse a comma-separated source chain, dropping repeated entries.
fn parse_sources(raw: &str) -> Result<Vec<SourceKind>, ConfigError> {
    let mut sources = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let kind = part
            .parse::<SourceKind>()
            .map_err(|reason| ConfigError::InvalidEnvVar {
                var: "LEADSCOUT_SOURCES".to_string(),
                reason,
            })?;
        if !sources.contains(&kind) {
            sources.push(kind);
        }
    }

    if sources.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "LEADSCOUT_SOURCES".to_string(),
            reason: "at least one source is required".to_string(),
        });
    }

    Ok(sources)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
