//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the site map has a fallback entry and usable targets
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedirectConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system, at startup and on reload

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::RedirectConfig;
use crate::negotiation::FALLBACK_LANGUAGE;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid {field} \"{value}\": not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("unknown log level \"{0}\"")]
    UnknownLogLevel(String),

    #[error("sites has no entry for fallback language \"{0}\"")]
    MissingFallback(&'static str),

    #[error("site key \"{0}\" is not a two-letter lowercase language code")]
    InvalidLanguageCode(String),

    #[error("site \"{code}\" has an invalid URL \"{url}\": {reason}")]
    InvalidUrl {
        code: String,
        url: String,
        reason: String,
    },
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &RedirectConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.listener.max_concurrent_requests == 0 {
        errors.push(ValidationError::Zero("listener.max_concurrent_requests"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }
    if config.reload.enabled && config.reload.poll_interval_secs == 0 {
        errors.push(ValidationError::Zero("reload.poll_interval_secs"));
    }

    let observability = &config.observability;
    if !LOG_LEVELS.contains(&observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(observability.log_level.clone()));
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    if !config.sites.contains_key(FALLBACK_LANGUAGE) {
        errors.push(ValidationError::MissingFallback(FALLBACK_LANGUAGE));
    }
    for (code, url) in &config.sites {
        if !is_language_code(code) {
            errors.push(ValidationError::InvalidLanguageCode(code.clone()));
        }
        if let Err(reason) = check_location(url) {
            errors.push(ValidationError::InvalidUrl {
                code: code.clone(),
                url: url.clone(),
                reason,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_language_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_lowercase())
}

/// A redirect target must fit in a `Location` header and be an absolute URL
/// or a relative reference.
fn check_location(location: &str) -> Result<(), String> {
    if location.trim().is_empty() {
        return Err("empty".to_string());
    }
    if HeaderValue::from_str(location).is_err() {
        return Err("not a valid header value".to_string());
    }
    match Url::parse(location) {
        Ok(_) => Ok(()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = Url::parse("http://localhost/").map_err(|e| e.to_string())?;
            base.join(location).map(|_| ()).map_err(|e| e.to_string())
        }
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RedirectConfig {
        let mut config = RedirectConfig::default();
        config.sites.insert("en".into(), "en/index.html".into());
        config.sites.insert("de".into(), "https://example.org/de/".into());
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(validate_config(&valid()), Ok(()));
    }

    #[test]
    fn test_missing_fallback_rejected() {
        let mut config = valid();
        config.sites.remove("en");
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingFallback("en")]);
    }

    #[test]
    fn test_empty_sites_rejected() {
        let errors = validate_config(&RedirectConfig::default()).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingFallback("en")));
    }

    #[test]
    fn test_bad_language_codes() {
        let mut config = valid();
        config.sites.insert("EN".into(), "/x".into());
        config.sites.insert("eng".into(), "/x".into());
        config.sites.insert("f".into(), "/x".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| matches!(e, ValidationError::InvalidLanguageCode(_))));
    }

    #[test]
    fn test_bad_urls() {
        let mut config = valid();
        config.sites.insert("fr".into(), "  ".into());
        config.sites.insert("it".into(), "/it\nSet-Cookie: x=1".into());
        config.sites.insert("es".into(), "http://[::1".into());
        let errors = validate_config(&config).unwrap_err();
        let codes: Vec<&str> = errors
            .iter()
            .filter_map(|e| match e {
                ValidationError::InvalidUrl { code, .. } => Some(code.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(codes, vec!["es", "fr", "it"]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid();
        config.listener.bind_address = "not-an-address".into();
        config.listener.max_concurrent_requests = 0;
        config.timeouts.request_secs = 0;
        config.observability.log_level = "loud".into();
        config.observability.metrics_address = "nowhere".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::UnknownLogLevel("loud".into())));
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = valid();
        config.observability.metrics_enabled = false;
        config.observability.metrics_address = "nowhere".into();
        assert_eq!(validate_config(&config), Ok(()));
    }
}
