//! Picker configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PICKER_API_BASE_URL` - Base URL of the commerce API (e.g., `https://api.example.com`)
//! - `PICKER_API_KEY` - API key sent as the `x-api-key` header
//!
//! ## Optional
//! - `PICKER_SEARCH_PATH` - Search endpoint path (default: `/task/products/search`)
//! - `PICKER_PAGE_LIMIT` - Products per page (default: 10, max: 250)
//! - `PICKER_SEARCH_DEBOUNCE_MS` - Quiet period before a search fires (default: 300)
//! - `PICKER_SCROLL_THRESHOLD` - Distance from the bottom that loads the next page (default: 50)
//! - `PICKER_SELECTION_IDENTITY` - `product_id` or `title` (default: `product_id`)

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_SEARCH_PATH: &str = "/task/products/search";
const DEFAULT_PAGE_LIMIT: u32 = 10;
const MAX_PAGE_LIMIT: u32 = 250;
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_SCROLL_THRESHOLD: f64 = 50.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// How search results are matched against the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionIdentity {
    /// Match by backend product id.
    #[default]
    ProductId,
    /// Match by display title. Distinct products sharing a title collide.
    Title,
}

impl FromStr for SelectionIdentity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product_id" | "id" => Ok(Self::ProductId),
            "title" => Ok(Self::Title),
            _ => Err(format!("invalid selection identity: {s}")),
        }
    }
}

/// Engine tuning, independent of any upstream API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickerSettings {
    /// Page size requested from the search port.
    pub page_limit: u32,
    /// Quiet period after the last keystroke before a search is issued.
    pub debounce: Duration,
    /// Layout units from the bottom edge that trigger the next page.
    pub scroll_threshold: f64,
    pub identity: SelectionIdentity,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            identity: SelectionIdentity::default(),
        }
    }
}

/// Product picker configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct PickerConfig {
    /// Upstream API base URL
    pub api_base_url: Url,
    /// API key for the `x-api-key` header
    pub api_key: SecretString,
    /// Path of the product search endpoint
    pub search_path: String,
    /// Engine tuning
    pub settings: PickerSettings,
}

impl std::fmt::Debug for PickerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickerConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("search_path", &self.search_path)
            .field("settings", &self.settings)
            .finish()
    }
}

impl PickerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = Url::parse(&get_required_env("PICKER_API_BASE_URL")?).map_err(|e| {
            ConfigError::InvalidEnvVar("PICKER_API_BASE_URL".to_string(), e.to_string())
        })?;
        let api_key = get_validated_secret("PICKER_API_KEY")?;
        let search_path = get_env_or_default("PICKER_SEARCH_PATH", DEFAULT_SEARCH_PATH);

        Ok(Self {
            api_base_url,
            api_key,
            search_path,
            settings: PickerSettings::from_env()?,
        })
    }

    /// Engine settings.
    #[must_use]
    pub const fn settings(&self) -> PickerSettings {
        self.settings
    }

    /// Expose the API key for building request headers.
    pub(crate) fn expose_api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl PickerSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let page_limit = parse_page_limit(get_optional_env("PICKER_PAGE_LIMIT").as_deref())?;
        let debounce = parse_debounce(get_optional_env("PICKER_SEARCH_DEBOUNCE_MS").as_deref())?;
        let scroll_threshold =
            parse_scroll_threshold(get_optional_env("PICKER_SCROLL_THRESHOLD").as_deref())?;
        let identity = get_optional_env("PICKER_SELECTION_IDENTITY")
            .map_or(Ok(SelectionIdentity::default()), |raw| raw.trim().parse())
            .map_err(|e| ConfigError::InvalidEnvVar("PICKER_SELECTION_IDENTITY".to_string(), e))?;

        Ok(Self {
            page_limit,
            debounce,
            scroll_threshold,
            identity,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse and bound the page limit.
fn parse_page_limit(raw: Option<&str>) -> Result<u32, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_PAGE_LIMIT);
    };
    let limit = raw.trim().parse::<u32>().map_err(|e| {
        ConfigError::InvalidEnvVar("PICKER_PAGE_LIMIT".to_string(), e.to_string())
    })?;
    if limit == 0 || limit > MAX_PAGE_LIMIT {
        return Err(ConfigError::InvalidEnvVar(
            "PICKER_PAGE_LIMIT".to_string(),
            format!("must be between 1 and {MAX_PAGE_LIMIT} (got {limit})"),
        ));
    }
    Ok(limit)
}

/// Parse the debounce quiet period in milliseconds.
fn parse_debounce(raw: Option<&str>) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_millis(DEFAULT_DEBOUNCE_MS));
    };
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("PICKER_SEARCH_DEBOUNCE_MS".to_string(), e.to_string())
        })
}

/// Parse the infinite-scroll threshold; must be finite and non-negative.
fn parse_scroll_threshold(raw: Option<&str>) -> Result<f64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SCROLL_THRESHOLD);
    };
    let threshold = raw.trim().parse::<f64>().map_err(|e| {
        ConfigError::InvalidEnvVar("PICKER_SCROLL_THRESHOLD".to_string(), e.to_string())
    })?;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ConfigError::InvalidEnvVar(
            "PICKER_SCROLL_THRESHOLD".to_string(),
            format!("must be a finite, non-negative number (got {threshold})"),
        ));
    }
    Ok(threshold)
}

/// Validate that an API key is present and not a placeholder.
fn validate_api_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    if key.trim().is_empty() {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "must not be empty".to_string(),
        ));
    }

    let lower = key.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_api_key(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = PickerSettings::default();
        assert_eq!(settings.page_limit, 10);
        assert_eq!(settings.debounce, Duration::from_millis(300));
        assert!((settings.scroll_threshold - 50.0).abs() < f64::EPSILON);
        assert_eq!(settings.identity, SelectionIdentity::ProductId);
    }

    #[test]
    fn test_parse_page_limit_default() {
        assert_eq!(parse_page_limit(None).unwrap(), 10);
        assert_eq!(parse_page_limit(Some(" 25 ")).unwrap(), 25);
    }

    #[test]
    fn test_parse_page_limit_out_of_range() {
        assert!(matches!(
            parse_page_limit(Some("0")),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_page_limit(Some("251")).is_err());
        assert!(parse_page_limit(Some("ten")).is_err());
    }

    #[test]
    fn test_parse_debounce() {
        assert_eq!(parse_debounce(None).unwrap(), Duration::from_millis(300));
        assert_eq!(parse_debounce(Some("150")).unwrap(), Duration::from_millis(150));
        assert!(parse_debounce(Some("-5")).is_err());
    }

    #[test]
    fn test_parse_scroll_threshold() {
        assert!((parse_scroll_threshold(None).unwrap() - 50.0).abs() < f64::EPSILON);
        assert!((parse_scroll_threshold(Some("0")).unwrap()).abs() < f64::EPSILON);
        assert!(parse_scroll_threshold(Some("-1")).is_err());
        assert!(parse_scroll_threshold(Some("NaN")).is_err());
        assert!(parse_scroll_threshold(Some("inf")).is_err());
        assert!(parse_scroll_threshold(Some("far")).is_err());
    }

    #[test]
    fn test_validate_api_key_placeholder() {
        let err = validate_api_key("your-api-key", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
        assert!(validate_api_key("   ", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_api_key_valid() {
        assert!(validate_api_key("k7Qm2vX9pL4tR8wZ", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_selection_identity_from_str() {
        assert_eq!(
            "title".parse::<SelectionIdentity>().unwrap(),
            SelectionIdentity::Title
        );
        assert_eq!(
            "product_id".parse::<SelectionIdentity>().unwrap(),
            SelectionIdentity::ProductId
        );
        assert!("sku".parse::<SelectionIdentity>().is_err());
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let config = PickerConfig {
            api_base_url: Url::parse("https://api.example.com").unwrap(),
            api_key: SecretString::from("super_secret_api_key"),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            settings: PickerSettings::default(),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("api.example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_key"));
    }
}
