//! URL validation for configured service endpoints.
//!
//! The composer talks to exactly one operator-configured service (voice
//! directory, model directory, and generation endpoint all hang off the same
//! base URL). Validation ensures the configured base:
//! - Uses HTTPS (HTTP is allowed only via the dev-mode validator)
//! - Has a host
//! - Carries no query string or fragment (endpoints are joined onto it)

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Errors that can occur during endpoint URL validation
#[derive(Debug, Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("URL scheme must be HTTPS, got: {0}")]
    HttpsRequired(String),

    #[error("URL must have a host")]
    MissingHost,

    #[error("Base URL must not carry a query string or fragment: {0}")]
    TrailingComponents(String),
}

/// Validates a service base URL for production use.
///
/// # Arguments
/// * `raw` - The configured base URL string
///
/// # Returns
/// * `Ok(Url)` - The parsed, validated URL
/// * `Err(UrlValidationError)` - What made the URL unacceptable
pub fn validate_service_base_url(raw: &str) -> Result<Url, UrlValidationError> {
    let url = parse_base(raw)?;

    if url.scheme() != "https" {
        return Err(UrlValidationError::HttpsRequired(url.scheme().to_string()));
    }

    Ok(url)
}

/// Development-mode variant that also accepts plain HTTP.
///
/// Intended for local mock services and tests; logs a warning when an
/// insecure scheme is accepted.
pub fn validate_service_base_url_dev(raw: &str) -> Result<Url, UrlValidationError> {
    let url = parse_base(raw)?;

    match url.scheme() {
        "https" => {}
        "http" => {
            warn!("accepting insecure base URL (dev mode): {raw}");
        }
        other => return Err(UrlValidationError::HttpsRequired(other.to_string())),
    }

    Ok(url)
}

fn parse_base(raw: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(raw)?;

    if url.host_str().is_none() {
        return Err(UrlValidationError::MissingHost);
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(UrlValidationError::TrailingComponents(raw.to_string()));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https() {
        let url = validate_service_base_url("https://api.chorus.example").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("api.chorus.example"));
    }

    #[test]
    fn test_rejects_http_in_production() {
        let err = validate_service_base_url("http://api.chorus.example").unwrap_err();
        assert!(matches!(err, UrlValidationError::HttpsRequired(_)));
    }

    #[test]
    fn test_dev_mode_accepts_http() {
        assert!(validate_service_base_url_dev("http://127.0.0.1:9000").is_ok());
    }

    #[test]
    fn test_dev_mode_rejects_other_schemes() {
        let err = validate_service_base_url_dev("ftp://files.example").unwrap_err();
        assert!(matches!(err, UrlValidationError::HttpsRequired(_)));
    }

    #[test]
    fn test_rejects_missing_host() {
        let err = validate_service_base_url("https:///v1").unwrap_err();
        assert!(matches!(err, UrlValidationError::MissingHost));
    }

    #[test]
    fn test_rejects_query_and_fragment() {
        assert!(matches!(
            validate_service_base_url("https://api.chorus.example/?x=1").unwrap_err(),
            UrlValidationError::TrailingComponents(_)
        ));
        assert!(matches!(
            validate_service_base_url("https://api.chorus.example/#top").unwrap_err(),
            UrlValidationError::TrailingComponents(_)
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            validate_service_base_url("not a url").unwrap_err(),
            UrlValidationError::InvalidFormat(_)
        ));
    }
}
