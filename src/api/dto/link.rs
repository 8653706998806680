//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::entities::Link;
use crate::error::AppError;

/// Body of `POST /api/links`.
///
/// Fields are kept as raw JSON so that a missing or non-string `url` becomes
/// an invalid-URL error rather than a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateLinkRequest {
    #[serde(default)]
    pub url: Value,

    #[serde(default)]
    pub code: Value,
}

impl CreateLinkRequest {
    /// Returns the target URL if it is a non-empty string.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] when `url` is missing, empty or not a string.
    pub fn url(&self) -> Result<&str, AppError> {
        match &self.url {
            Value::String(s) if !s.is_empty() => Ok(s.as_str()),
            Value::Null => Err(AppError::invalid_url(
                "Invalid URL",
                json!({ "reason": "url is required" }),
            )),
            _ => Err(AppError::invalid_url(
                "Invalid URL",
                json!({ "reason": "url must be a non-empty string" }),
            )),
        }
    }

    /// Returns the custom code, treating `null`, absence and `""` as "none".
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCodeFormat`] when `code` is present but not a string.
    pub fn custom_code(&self) -> Result<Option<&str>, AppError> {
        match &self.code {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => Ok(Some(s.as_str())),
            _ => Err(AppError::invalid_code_format(
                "Custom code must match [A-Za-z0-9]{6,8}",
                json!({ "reason": "code must be a string" }),
            )),
        }
    }
}

/// JSON representation of a link, as consumed by the dashboard.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub clicks: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            short_code: link.short_code,
            original_url: link.original_url,
            clicks: link.clicks,
            last_clicked_at: link.last_clicked_at,
            created_at: link.created_at,
        }
    }
}

/// `{"ok": true}` acknowledgement.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: Value) -> CreateLinkRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_url_missing_or_wrong_type() {
        assert!(request(json!({})).url().is_err());
        assert!(request(json!({ "url": null })).url().is_err());
        assert!(request(json!({ "url": 42 })).url().is_err());
        assert!(request(json!({ "url": "" })).url().is_err());
        assert!(matches!(
            request(json!({ "url": ["https://example.com"] })).url(),
            Err(AppError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_url_string_passes_through() {
        let req = request(json!({ "url": "https://example.com/a" }));
        assert_eq!(req.url().unwrap(), "https://example.com/a");
    }

    #[test]
    fn test_custom_code_absent_variants() {
        assert_eq!(request(json!({})).custom_code().unwrap(), None);
        assert_eq!(request(json!({ "code": null })).custom_code().unwrap(), None);
        assert_eq!(request(json!({ "code": "" })).custom_code().unwrap(), None);
    }

    #[test]
    fn test_custom_code_non_string_is_format_error() {
        assert!(matches!(
            request(json!({ "code": 123456 })).custom_code(),
            Err(AppError::InvalidCodeFormat { .. })
        ));
    }

    #[test]
    fn test_link_response_uses_camel_case() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "abc123".to_string(),
            "https://example.com".to_string(),
            0,
            None,
            now,
        );

        let json = serde_json::to_value(LinkResponse::from(link)).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["shortCode"], "abc123");
        assert_eq!(json["originalUrl"], "https://example.com");
        assert_eq!(json["clicks"], 0);
        assert!(json["lastClickedAt"].is_null());
        assert!(json["createdAt"].is_string());
    }
}
