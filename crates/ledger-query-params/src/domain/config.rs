//! Query layer configuration with validation.

use super::error::ConfigurationError;
use super::page::{Order, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::env;

/// Pagination and cursor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Page size when `limit` is omitted (default: 10)
    pub default_page_size: u64,
    /// Largest accepted `limit`, never above 200
    pub max_page_size: u64,
    /// Order when `order` is omitted
    pub default_order: Order,
    /// Cursor value meaning "resume from the latest ledger"
    pub now_sentinel: String,
    /// Header carrying the streaming resume token
    pub resume_header: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            default_order: Order::Asc,
            now_sentinel: "now".to_string(),
            resume_header: "Last-Event-ID".to_string(),
        }
    }
}

impl QueryConfig {
    /// Defaults overridden by environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LQ_DEFAULT_PAGE_SIZE`: page size when `limit` is omitted
    /// - `LQ_MAX_PAGE_SIZE`: largest accepted `limit`
    /// - `LQ_DEFAULT_ORDER`: `asc` or `desc`
    /// - `LQ_RESUME_HEADER`: header carrying the resume token
    ///
    /// Unparseable values are reported rather than silently dropped.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let mut config = Self::default();

        if let Ok(v) = env::var("LQ_DEFAULT_PAGE_SIZE") {
            config.default_page_size = v.parse().map_err(|_| {
                ConfigurationError::Invalid(format!("LQ_DEFAULT_PAGE_SIZE={:?}", v))
            })?;
        }
        if let Ok(v) = env::var("LQ_MAX_PAGE_SIZE") {
            config.max_page_size = v.parse().map_err(|_| {
                ConfigurationError::Invalid(format!("LQ_MAX_PAGE_SIZE={:?}", v))
            })?;
        }
        if let Ok(v) = env::var("LQ_DEFAULT_ORDER") {
            config.default_order = v
                .parse()
                .map_err(|_| ConfigurationError::Invalid(format!("LQ_DEFAULT_ORDER={:?}", v)))?;
        }

        if let Ok(v) = env::var("LQ_RESUME_HEADER") {
            config.resume_header = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_page_size == 0 || self.max_page_size > MAX_PAGE_SIZE {
            return Err(ConfigurationError::Invalid(format!(
                "max_page_size must be within 1..={}",
                MAX_PAGE_SIZE
            )));
        }

        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigurationError::Invalid(
                "default_page_size must be within 1..=max_page_size".into(),
            ));
        }

        if self.now_sentinel.is_empty() {
            return Err(ConfigurationError::Invalid(
                "now_sentinel cannot be empty".into(),
            ));
        }

        if self.resume_header.is_empty() {
            return Err(ConfigurationError::Invalid(
                "resume_header cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QueryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.max_page_size, 200);
        assert_eq!(config.default_order, Order::Asc);
    }

    #[test]
    fn test_max_page_size_capped() {
        let config = QueryConfig {
            max_page_size: 500,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::Invalid(_))
        ));
    }

    #[test]
    fn test_default_above_max_rejected() {
        let config = QueryConfig {
            default_page_size: 50,
            max_page_size: 20,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_resume_header_rejected() {
        let config = QueryConfig {
            resume_header: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: QueryConfig =
            serde_json::from_str(r#"{"default_order": "desc", "max_page_size": 100}"#).unwrap();
        assert_eq!(config.default_order, Order::Desc);
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.now_sentinel, "now");
    }
}
