//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::path::Path;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("relay.nick is required")]
    MissingNick,
    #[error("relay.password is required")]
    MissingPassword,
    #[error("relay.channel is required")]
    MissingChannel,
    #[error("relay.channel must not contain spaces or commas, got '{0}'")]
    InvalidChannel(String),
    #[error("api.client_id is required")]
    MissingClientId,
    #[error("{0} must be an http(s) URL, got '{1}'")]
    InvalidUrl(&'static str, String),
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("database.path parent directory does not exist: {0}")]
    DatabasePathInvalid(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Required fields
    if config.relay.nick.trim().is_empty() {
        errors.push(ValidationError::MissingNick);
    }
    if config.relay.password.is_empty() {
        errors.push(ValidationError::MissingPassword);
    }
    if config.relay.owner().is_empty() {
        errors.push(ValidationError::MissingChannel);
    } else if config.relay.channel.contains([' ', ',']) {
        errors.push(ValidationError::InvalidChannel(config.relay.channel.clone()));
    }
    if config.api.client_id.is_empty() {
        errors.push(ValidationError::MissingClientId);
    }

    for (field, url) in [
        ("api.base_url", &config.api.base_url),
        ("roster.base_url", &config.roster.base_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ValidationError::InvalidUrl(field, url.clone()));
        }
    }

    // Zero would make tokio::time::interval panic
    for (field, secs) in [
        ("sync.follower_interval_secs", config.sync.follower_interval_secs),
        ("sync.chatter_interval_secs", config.sync.chatter_interval_secs),
        ("sync.request_timeout_secs", config.sync.request_timeout_secs),
    ] {
        if secs == 0 {
            errors.push(ValidationError::ZeroInterval(field));
        }
    }

    // Database path validation
    if config.database.path != ":memory:" {
        let db_path = Path::new(&config.database.path);
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            errors.push(ValidationError::DatabasePathInvalid(
                config.database.path.clone(),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
