//! Target URL validation.
//!
//! The URL is validated but never rewritten: redirects use the stored string
//! verbatim, so query strings and fragments survive unchanged.

use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Schemes accepted as redirect targets.
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

impl From<UrlValidationError> for AppError {
    fn from(e: UrlValidationError) -> Self {
        AppError::invalid_url("Invalid URL", json!({ "reason": e.to_string() }))
    }
}

/// Checks that `input` is an absolute http(s) URL with a host.
///
/// # Security
///
/// Rejects `javascript:`, `data:`, `file:` and other non-web schemes so the
/// redirect endpoint cannot be used to smuggle them.
///
/// # Errors
///
/// Returns [`UrlValidationError::InvalidFormat`] for unparsable input,
/// [`UrlValidationError::UnsupportedProtocol`] for non-web schemes and
/// [`UrlValidationError::MissingHost`] when the host is empty.
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    // The raw string becomes a Location header, so it must be header-safe as is
    if input.chars().any(char::is_control) {
        return Err(UrlValidationError::InvalidFormat(
            "URL contains control characters".to_string(),
        ));
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(UrlValidationError::UnsupportedProtocol);
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_http_and_https() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com/a").is_ok());
    }

    #[test]
    fn test_query_fragment_and_port() {
        assert!(validate_url("https://example.com:8443/p?q=1&r=2#frag").is_ok());
    }

    #[test]
    fn test_ip_and_localhost() {
        assert!(validate_url("http://192.168.1.1:8080/api").is_ok());
        assert!(validate_url("http://localhost:3000/test").is_ok());
        assert!(validate_url("http://[::1]:8080/").is_ok());
    }

    #[test]
    fn test_not_a_url() {
        assert!(matches!(
            validate_url("not-a-url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_empty_string() {
        assert!(matches!(
            validate_url(""),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_no_protocol() {
        assert!(matches!(
            validate_url("example.com/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_non_web_protocols() {
        for input in [
            "ftp://example.com/file.txt",
            "javascript:alert('xss')",
            "data:text/plain,Hello",
            "mailto:test@example.com",
            "file:///etc/passwd",
        ] {
            assert!(
                matches!(
                    validate_url(input),
                    Err(UrlValidationError::UnsupportedProtocol)
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_control_characters_rejected() {
        assert!(matches!(
            validate_url("https://example.com/a\nb"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(validate_url("https://example.com/\t").is_err());
    }

    #[test]
    fn test_http_without_host() {
        // WHATWG parsing turns "http:///x" into host "x"; a bare scheme has nothing to parse
        assert!(validate_url("http://").is_err());
    }

    #[test]
    fn test_converts_into_invalid_url_app_error() {
        let err: AppError = validate_url("nope").unwrap_err().into();
        assert!(matches!(err, AppError::InvalidUrl { .. }));
        assert_eq!(err.code(), "invalid_url");
    }
}
