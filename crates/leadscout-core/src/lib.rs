//! Shared domain types and configuration for leadscout.

pub mod app_config;
pub mod business;
pub mod classify;
pub mod config;
pub mod query;

pub use app_config::{AppConfig, Environment, SourceKind};
pub use business::{
    BusinessRecord, BusinessView, ClassifiedRecord, DiscoveryResult, LeadPriority, Rating,
};
pub use classify::WebsitePresenceClassifier;
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use query::DiscoveryQuery;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("business record name must not be empty")]
    EmptyName,
}
