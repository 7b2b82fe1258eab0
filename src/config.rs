//! Configuration management for `TravelWorld`
//!
//! Values come from built-in defaults, an optional TOML file and
//! `TRAVELWORLD_*` environment variables, in that order of precedence.

use crate::TravelError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Plain environment variable holding the GeoDB key, checked when the
/// layered config leaves `geodb.api_key` unset.
pub const API_KEY_ENV: &str = "GEODB_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelConfig {
    /// GeoDB (RapidAPI) settings
    #[serde(default)]
    pub geodb: GeoDbConfig,
    /// Flag image templating
    #[serde(default)]
    pub flags: FlagConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP API settings
    #[serde(default)]
    pub web: WebConfig,
}

/// GeoDB API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoDbConfig {
    /// RapidAPI key, sent as `X-RapidAPI-Key`
    pub api_key: Option<String>,
    /// Value of the `X-RapidAPI-Host` header
    #[serde(default = "default_geodb_host")]
    pub host: String,
    /// Base URL of the geo endpoints
    #[serde(default = "default_geodb_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_geodb_timeout")]
    pub timeout_seconds: u32,
    /// Number of cities requested per country
    #[serde(default = "default_city_limit")]
    pub city_limit: u32,
}

/// Flag image URL settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagConfig {
    #[serde(default = "default_flag_base_url")]
    pub base_url: String,
    /// Width segment of the flag path, e.g. `w320`
    #[serde(default = "default_flag_width")]
    pub width: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// HTTP API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_web_port")]
    pub port: u16,
}

// Default value functions
fn default_geodb_host() -> String {
    "wft-geo-db.p.rapidapi.com".to_string()
}

fn default_geodb_base_url() -> String {
    "https://wft-geo-db.p.rapidapi.com/v1/geo".to_string()
}

fn default_geodb_timeout() -> u32 {
    30
}

fn default_city_limit() -> u32 {
    10
}

fn default_flag_base_url() -> String {
    "https://flagcdn.com".to_string()
}

fn default_flag_width() -> String {
    "w320".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_web_port() -> u16 {
    8080
}

impl Default for GeoDbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            host: default_geodb_host(),
            base_url: default_geodb_base_url(),
            timeout_seconds: default_geodb_timeout(),
            city_limit: default_city_limit(),
        }
    }
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self {
            base_url: default_flag_base_url(),
            width: default_flag_width(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
        }
    }
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            geodb: GeoDbConfig::default(),
            flags: FlagConfig::default(),
            logging: LoggingConfig::default(),
            web: WebConfig::default(),
        }
    }
}

impl TravelConfig {
    /// Load configuration from the default file location and environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRAVELWORLD_GEODB__API_KEY -> geodb.api_key
        builder = builder.add_source(
            Environment::with_prefix("TRAVELWORLD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TravelConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        if config.geodb.api_key.is_none() {
            config.geodb.api_key = std::env::var(API_KEY_ENV).ok();
        }

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Without a key every GeoDB request fails authentication
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.geodb.api_key.is_some()
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travelworld").join("config.toml"))
    }

    /// Apply default values to empty or zeroed fields
    pub fn apply_defaults(&mut self) {
        if self.geodb.host.is_empty() {
            self.geodb.host = default_geodb_host();
        }
        if self.geodb.base_url.is_empty() {
            self.geodb.base_url = default_geodb_base_url();
        }
        if self.geodb.timeout_seconds == 0 {
            self.geodb.timeout_seconds = default_geodb_timeout();
        }
        if self.geodb.city_limit == 0 {
            self.geodb.city_limit = default_city_limit();
        }
        if self.flags.base_url.is_empty() {
            self.flags.base_url = default_flag_base_url();
        }
        if self.flags.width.is_empty() {
            self.flags.width = default_flag_width();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.web.port == 0 {
            self.web.port = default_web_port();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// A missing key is allowed; an empty one is a typo.
    pub fn validate_api_key(&self) -> Result<()> {
        if let Some(api_key) = &self.geodb.api_key {
            if api_key.trim().is_empty() {
                return Err(TravelError::config(
                    "GeoDB API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.geodb.timeout_seconds > 300 {
            return Err(TravelError::config("GeoDB timeout cannot exceed 300 seconds").into());
        }

        // The free GeoDB tier caps page size at 10.
        if self.geodb.city_limit > 10 {
            return Err(TravelError::config("City limit cannot exceed 10").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("GeoDB base URL", &self.geodb.base_url),
            ("Flag base URL", &self.flags.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TravelError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
