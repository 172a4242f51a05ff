//! Configuration infrastructure
//!
//! Contains the markup markers the extraction engine dispatches on, the
//! logging settings, and loading of both from a config file layered with
//! `CATALOG_EXTRACTOR_*` environment variables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "CATALOG_EXTRACTOR";

/// Default base URL of the retailer whose listing pages are extracted
pub const DEFAULT_BASE_URL: &str = "https://www.jumbo.com";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config from file: {source}")]
    FileLoad {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },

    #[error(transparent)]
    Markers(#[from] ParsingError),
}

/// Class, tag and attribute names recognized in the listing markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingMarkers {
    /// Class marking one product card
    pub product_card: String,
    /// Data attribute on the product card holding the product identifier
    pub identifier_attr: String,
    /// Class of the element wrapping the product title
    pub title_wrapper: String,
    /// Class of the image container
    pub figure: String,
    /// Class of a price element
    pub price: String,
    /// Class of a comparative (per-kilo, per-liter) price, never captured
    pub comparative_price: String,
    /// Class of the pack size element
    pub pack_size: String,
    /// Class of the promotion validity element
    pub promotion_date: String,
    /// Class of the promotion badges container
    pub badges: String,
    pub image_tag: String,
    /// Image attribute holding the high resolution source
    pub image_src_attr: String,
    /// Badge image attribute holding the promotion text
    pub badge_text_attr: String,
}

impl Default for ListingMarkers {
    fn default() -> Self {
        Self {
            product_card: "jum-item-product".to_string(),
            identifier_attr: "data-jum-product-sku".to_string(),
            title_wrapper: "jum-item-titlewrap".to_string(),
            figure: "jum-item-figure".to_string(),
            price: "jum-price-format".to_string(),
            comparative_price: "jum-comparative-price".to_string(),
            pack_size: "jum-pack-size".to_string(),
            promotion_date: "jum-promotion-date".to_string(),
            badges: "jum-item-badges".to_string(),
            image_tag: "img".to_string(),
            image_src_attr: "data-jum-hr-src".to_string(),
            badge_text_attr: "alt".to_string(),
        }
    }
}

impl ListingMarkers {
    /// Reject markers that would never (or always) match
    pub fn validate(&self) -> ParsingResult<()> {
        let fields = [
            ("product_card", &self.product_card),
            ("identifier_attr", &self.identifier_attr),
            ("title_wrapper", &self.title_wrapper),
            ("figure", &self.figure),
            ("price", &self.price),
            ("comparative_price", &self.comparative_price),
            ("pack_size", &self.pack_size),
            ("promotion_date", &self.promotion_date),
            ("badges", &self.badges),
            ("image_tag", &self.image_tag),
            ("image_src_attr", &self.image_src_attr),
            ("badge_text_attr", &self.badge_text_attr),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ParsingError::ConfigurationError {
                    message: format!("marker '{name}' must not be empty"),
                    field: format!("markers.{name}"),
                });
            }
            if value.split_whitespace().count() > 1 {
                return Err(ParsingError::ConfigurationError {
                    message: format!("marker '{name}' must be a single token, got '{value}'"),
                    field: format!("markers.{name}"),
                });
            }
        }

        Ok(())
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Write logs to `file_name` inside `directory`
    pub file_output: bool,

    pub directory: String,

    pub file_name: String,

    /// Module-specific log level filters (e.g., "scraper": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut module_filters = HashMap::new();
        module_filters.insert("html5ever".to_string(), "warn".to_string());
        module_filters.insert("selectors".to_string(), "warn".to_string());

        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            directory: "logs".to_string(),
            file_name: "catalog-extractor.log".to_string(),
            module_filters,
        }
    }
}

/// Complete extractor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Base URL for resolving relative image references
    pub base_url: String,

    pub markers: ListingMarkers,

    pub logging: LoggingConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            markers: ListingMarkers::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Load from a config file, overridden by `CATALOG_EXTRACTOR_*` variables.
    ///
    /// Nested keys use a double underscore, e.g.
    /// `CATALOG_EXTRACTOR_MARKERS__PRODUCT_CARD`.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        info!("Loaded extractor configuration from {}", path);
        Ok(config)
    }

    /// Defaults overridden by `CATALOG_EXTRACTOR_*` variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.base_url).map_err(|e| ConfigError::Validation {
            message: format!("base_url '{}' is not a valid URL: {}", self.base_url, e),
        })?;

        if self.logging.file_output && self.logging.file_name.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "logging.file_name must be set when file_output is enabled".to_string(),
            });
        }

        self.markers.validate()?;
        Ok(())
    }
}
