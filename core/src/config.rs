//! Client configuration.
//!
//! A `ClientConfig` carries the two pieces of state a client is configured
//! with before its first request: the API root and the request headers.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{ApiError, Result};

pub const BASE_URL_VAR: &str = "JSONABLE_BASE_URL";
pub const HEADERS_VAR: &str = "JSONABLE_HEADERS";

pub(crate) fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([("Content-Type".to_string(), "application/json".to_string())])
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Root of the API. Joined to an entity's URL name by plain
    /// concatenation, so it normally ends with `/`.
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_headers")]
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            headers: default_headers(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Read `JSONABLE_BASE_URL` and, optionally, `JSONABLE_HEADERS` (a JSON
    /// object whose entries are added on top of the default headers).
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_VAR).unwrap_or_default();
        let extra = std::env::var(HEADERS_VAR).ok();
        Self::from_parts(base_url, extra.as_deref())
    }

    fn from_parts(base_url: String, extra_headers: Option<&str>) -> Result<Self> {
        let mut config = Self::new(base_url);
        if let Some(raw) = extra_headers {
            let extra: BTreeMap<String, String> =
                serde_json::from_str(raw).map_err(ApiError::Deserialization)?;
            config.headers.extend(extra);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_json_content_type() {
        let config = ClientConfig::default();
        assert!(config.base_url.is_empty());
        assert_eq!(
            config.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn extra_headers_extend_defaults() {
        let config = ClientConfig::from_parts(
            "https://api.test/".to_string(),
            Some(r#"{"Authorization":"Bearer abc"}"#),
        )
        .unwrap();
        assert_eq!(config.base_url, "https://api.test/");
        assert_eq!(config.headers.len(), 2);
        assert_eq!(config.headers["Authorization"], "Bearer abc");
    }

    #[test]
    fn malformed_extra_headers_are_rejected() {
        let err = ClientConfig::from_parts(String::new(), Some("[1,2]")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"http://localhost:3000/"}"#).unwrap();
        assert_eq!(config, ClientConfig::new("http://localhost:3000/"));
    }
}
