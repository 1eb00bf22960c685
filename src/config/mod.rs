pub mod cli;

use crate::error::{Result, ShortlistError};
use crate::session::{DEFAULT_CRITERIA_KEY, DEFAULT_FAVOURITES_KEY};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const CATALOG_ENV: &str = "HOUSING_SHORTLIST_CATALOG";
pub const DATA_DIR_ENV: &str = "HOUSING_SHORTLIST_DATA_DIR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Local path or http(s) URL of the catalog document
    pub source: String,
    pub timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: "properties.json".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: String,
    pub favourites_key: String,
    pub criteria_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: ".housing-shortlist".to_string(),
            favourites_key: DEFAULT_FAVOURITES_KEY.to_string(),
            criteria_key: DEFAULT_CRITERIA_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration, expanding `${VAR}` references first
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content)?;
        Ok(toml::from_str(&processed)?)
    }

    /// Apply environment overrides for the catalog source and data directory
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup(CATALOG_ENV) {
            self.catalog.source = source;
        }
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            self.storage.dir = dir;
        }
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_seconds)
    }

    pub fn validate(&self) -> Result<()> {
        validate_non_empty("catalog.source", &self.catalog.source)?;
        if self.catalog.source.contains("://") {
            validate_url("catalog.source", &self.catalog.source)?;
        }
        if self.catalog.timeout_seconds == 0 {
            return Err(ShortlistError::InvalidConfigValue {
                field: "catalog.timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Value must be at least 1".to_string(),
            });
        }
        validate_non_empty("storage.dir", &self.storage.dir)?;
        validate_key("storage.favourites_key", &self.storage.favourites_key)?;
        validate_key("storage.criteria_key", &self.storage.criteria_key)?;
        if self.storage.favourites_key == self.storage.criteria_key {
            return Err(ShortlistError::Config {
                message: "storage.favourites_key and storage.criteria_key must differ".to_string(),
            });
        }
        Ok(())
    }
}

fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ShortlistError::Config {
        message: e.to_string(),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

fn validate_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ShortlistError::InvalidConfigValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    match Url::parse(value) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ShortlistError::InvalidConfigValue {
                field: field.to_string(),
                value: value.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ShortlistError::InvalidConfigValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

// Keys become file names in the data directory.
fn validate_key(field: &str, value: &str) -> Result<()> {
    validate_non_empty(field, value)?;
    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ShortlistError::InvalidConfigValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Only letters, digits, '-' and '_' are allowed".to_string(),
        });
    }
    Ok(())
}
