//! Configuration management for the hostel finder application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::HostelError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the hostel finder application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HostelConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream geocoding and map data services
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Identity provider project configuration
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Settings consumed by the browser client
    #[serde(default)]
    pub client: ClientConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen port
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory holding the built frontend bundle
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Upstream service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL for the geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,
    /// Base URL for the Overpass API interpreter
    #[serde(default = "default_overpass_base_url")]
    pub overpass_base_url: String,
    /// Request timeout in seconds applied to every upstream call
    #[serde(default = "default_upstream_timeout")]
    pub timeout_seconds: u32,
}

/// Identity provider project settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Provider web API key
    pub api_key: Option<String>,
    /// Provider auth domain
    pub auth_domain: Option<String>,
    /// Provider project id
    pub project_id: Option<String>,
    /// Base URL for the provider's account endpoints
    #[serde(default = "default_identity_base_url")]
    pub base_url: String,
    /// Google OAuth client id for the federated login flow
    pub google_client_id: Option<String>,
    /// Google OAuth client secret
    pub google_client_secret: Option<String>,
    /// Redirect URL registered for the federated login flow
    pub google_redirect_url: Option<String>,
}

/// Settings the browser client reads at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL the client uses to reach this backend
    #[serde(default = "default_backend_base_url")]
    pub backend_base_url: String,
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

// Default value functions
fn default_server_port() -> u16 {
    4000
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_overpass_base_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_upstream_timeout() -> u32 {
    30
}

fn default_identity_base_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_backend_base_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            geocoding_base_url: default_geocoding_base_url(),
            overpass_base_url: default_overpass_base_url(),
            timeout_seconds: default_upstream_timeout(),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            auth_domain: None,
            project_id: None,
            base_url: default_identity_base_url(),
            google_client_id: None,
            google_client_secret: None,
            google_redirect_url: None,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_base_url: default_backend_base_url(),
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

impl HostelConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
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

        // Add environment variable overrides with HOSTELFINDER_ prefix
        builder = builder.add_source(
            Environment::with_prefix("HOSTELFINDER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: HostelConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hostelfinder").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_identity()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(HostelError::config("Server port cannot be 0").into());
        }

        if self.upstream.timeout_seconds == 0 {
            return Err(
                HostelError::config("Upstream timeout must be at least 1 second").into(),
            );
        }

        if self.upstream.timeout_seconds > 300 {
            return Err(
                HostelError::config("Upstream timeout cannot exceed 300 seconds").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(HostelError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(HostelError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoding base URL", &self.upstream.geocoding_base_url),
            ("Overpass base URL", &self.upstream.overpass_base_url),
            ("Identity base URL", &self.identity.base_url),
            ("Backend base URL", &self.client.backend_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(HostelError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_identity(&self) -> Result<()> {
        if let Some(api_key) = &self.identity.api_key {
            if api_key.is_empty() {
                return Err(HostelError::config(
                    "Identity provider API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        // The federated login flow needs all three Google settings or none
        let google = [
            &self.identity.google_client_id,
            &self.identity.google_client_secret,
            &self.identity.google_redirect_url,
        ];
        let supplied = google.iter().filter(|value| value.is_some()).count();
        if supplied != 0 && supplied != google.len() {
            return Err(HostelError::config(
                "Google login requires client id, client secret, and redirect URL together",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HostelConfig::default();
        assert_eq!(config.server.port, 4000);
        assert_eq!(
            config.upstream.geocoding_base_url,
            "https://geocoding-api.open-meteo.com/v1"
        );
        assert_eq!(
            config.upstream.overpass_base_url,
            "https://overpass-api.de/api/interpreter"
        );
        assert_eq!(config.upstream.timeout_seconds, 30);
        assert_eq!(config.logging.level, "info");
        assert!(config.identity.api_key.is_none());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = HostelConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = HostelConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = HostelConfig::default();
        config.upstream.timeout_seconds = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("at least 1 second"));
    }

    #[test]
    fn test_config_validation_bad_base_url() {
        let mut config = HostelConfig::default();
        config.upstream.overpass_base_url = "overpass-api.de/api/interpreter".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("HTTP or HTTPS"));
    }

    #[test]
    fn test_config_validation_partial_google_settings() {
        let mut config = HostelConfig::default();
        config.identity.google_client_id = Some("client-id".to_string());
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Google login"));
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = HostelConfig::default();
        config.identity.api_key = Some(String::new());
        let result = config.validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_path_generation() {
        let path = HostelConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("hostelfinder"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
