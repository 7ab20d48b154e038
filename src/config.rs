//! Configuration system for wedding-rsvp
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (WEDDING_RSVP_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::backend::BackendKind;
use crate::error::{Error, Result};
use crate::persona::DEFAULT_STORAGE_KEY;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Site identity and data location
    pub site: SiteSettings,

    /// Persona persistence
    pub persona: PersonaSettings,

    /// Where RSVP responses are stored
    pub backend: BackendSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Site settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Couple's names, shown as the console heading
    pub title: String,

    /// Base data directory (persona storage, file backend)
    pub data_dir: String,
}

/// Persona persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaSettings {
    /// Key the selected persona is stored under
    pub storage_key: String,
}

/// RSVP backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Backend implementation: file or supabase
    pub kind: BackendKind,

    /// Project URL (supabase only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Anon/public API key (supabase only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Table (or file stem) responses are inserted into
    pub table: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

// Default implementations

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: "Wesley & Heather".to_string(),
            data_dir: "~/.wedding-rsvp".to_string(),
        }
    }
}

impl Default for PersonaSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            kind: BackendKind::File,
            url: None,
            api_key: None,
            table: "rsvp_responses".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
                message: format!("{}: {}", path.display(), e.message()),
                source: Some(e),
            })?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::config_not_found(path));
        }

        let search_paths = [
            // Current directory
            Some(PathBuf::from("wedding-rsvp.toml")),
            // User config directory
            dirs::config_dir().map(|p| p.join("wedding-rsvp").join("config.toml")),
            // Home directory
            dirs::home_dir().map(|p| p.join(".wedding-rsvp").join("config.toml")),
        ];

        for path in search_paths.iter().flatten() {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from `lookup`, keyed by environment variable name
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Site settings
        if let Some(val) = lookup("WEDDING_RSVP_TITLE") {
            self.site.title = val;
        }
        if let Some(val) = lookup("WEDDING_RSVP_DATA_DIR") {
            self.site.data_dir = val;
        }

        // Persona settings
        if let Some(val) = lookup("WEDDING_RSVP_STORAGE_KEY") {
            self.persona.storage_key = val;
        }

        // Backend settings
        if let Some(val) = lookup("WEDDING_RSVP_BACKEND") {
            if let Ok(kind) = val.parse() {
                self.backend.kind = kind;
            }
        }
        if let Some(val) = lookup("WEDDING_RSVP_BACKEND_URL") {
            self.backend.url = Some(val);
        }
        if let Some(val) = lookup("WEDDING_RSVP_API_KEY") {
            self.backend.api_key = Some(val);
        }
        if let Some(val) = lookup("WEDDING_RSVP_TABLE") {
            self.backend.table = val;
        }
        if let Some(val) = lookup("WEDDING_RSVP_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.backend.timeout_secs = n;
            }
        }

        // Logging settings
        if let Some(val) = lookup("WEDDING_RSVP_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("WEDDING_RSVP_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Some(val) = lookup("WEDDING_RSVP_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        self.site.data_dir = expand_path(&self.site.data_dir);

        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.site.data_dir.trim().is_empty() {
            return Err(Error::config_field_invalid("site.data_dir", "data_dir cannot be empty"));
        }
        if self.persona.storage_key.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "persona.storage_key",
                "storage_key cannot be empty",
            ));
        }

        if self.backend.table.trim().is_empty() {
            return Err(Error::config_field_invalid("backend.table", "table cannot be empty"));
        }
        if self.backend.timeout_secs == 0 {
            return Err(Error::config_field_invalid(
                "backend.timeout_secs",
                "timeout_secs must be greater than 0",
            ));
        }

        if self.backend.kind == BackendKind::Supabase {
            let url = self.backend.url.as_deref().unwrap_or_default();
            match Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                _ => {
                    return Err(Error::config_field_invalid(
                        "backend.url",
                        format!("Backend URL must be an http:// or https:// URL, got '{}'", url),
                    ))
                }
            }
            if self.backend.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
                return Err(Error::config_field_invalid(
                    "backend.api_key",
                    "api_key is required for the supabase backend",
                ));
            }
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Get the data directory as a PathBuf
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.site.data_dir)
    }

    /// Copy safe to print: the API key is masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.backend.api_key.is_some() {
            config.backend.api_key = Some("********".to_string());
        }
        config
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".wedding-rsvp")
                .join("config.toml")
        });

    // Check if file exists
    if config_path.exists() && !force {
        return Err(Error::config_validation(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
pub fn generate_default_config() -> String {
    r#"# Wedding RSVP Configuration

[site]
# Shown as the console heading
title = "Wesley & Heather"

# Base data directory (saved character, file backend responses)
data_dir = "~/.wedding-rsvp"

[persona]
# Storage key for the selected character
storage_key = "wedding-character"

[backend]
# Where responses go: "file" (JSON lines under data_dir) or "supabase"
kind = "file"

# Supabase project URL and anon key (supabase only)
# url = "https://your-project.supabase.co"
# api_key = ""

# Table (or file name) responses are inserted into
table = "rsvp_responses"

# Request timeout in seconds
timeout_secs = 30

[logging]
# Log level: trace, debug, info, warn, error
# Console logs go to stderr; raise to "info" to follow submissions
level = "warn"

# Log file path (comment out to disable file logging)
# file = "~/.wedding-rsvp/logs/wedding-rsvp.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#
    .to_string()
}
