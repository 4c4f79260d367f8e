//! Spreadsheet connection settings
//!
//! Values come from an optional TOML file and are overridden by environment
//! variables (a `.env` file is loaded by `main` before this runs).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::api::auth::normalize_private_key;
use crate::api::constants::{DEFAULT_API_BASE, DEFAULT_TOKEN_URI};

pub const ENV_SERVICE_ACCOUNT_EMAIL: &str = "GOOGLE_SERVICE_ACCOUNT_EMAIL";
pub const ENV_PRIVATE_KEY: &str = "GOOGLE_PRIVATE_KEY";
pub const ENV_SPREADSHEET_ID: &str = "GOOGLE_SHEETS_SPREADSHEET_ID";
pub const ENV_API_BASE: &str = "GOOGLE_SHEETS_API_BASE";
pub const ENV_TOKEN_URI: &str = "GOOGLE_TOKEN_URI";

/// Resolved settings for reaching the spreadsheet
#[derive(Clone)]
pub struct SheetsConfig {
    pub service_account_email: String,
    pub private_key: String,
    pub spreadsheet_id: String,
    pub api_base: String,
    pub token_uri: String,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("service_account_email", &self.service_account_email)
            .field("private_key", &"<redacted>")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("api_base", &self.api_base)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Shape of the optional config file; every key may be omitted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub service_account_email: Option<String>,
    pub private_key: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub api_base: Option<String>,
    pub token_uri: Option<String>,
}

impl FileConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Read the file at `path`, or the default location when `path` is None.
    /// A missing default file is not an error; a missing explicit one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                anyhow::bail!("Config file does not exist: {}", path.display());
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

/// `<config dir>/sheets-billing/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sheets-billing").join("config.toml"))
}

impl SheetsConfig {
    /// Load from the config file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = FileConfig::load(path)?;
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge file values with an environment lookup (environment wins)
    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let pick = |key: &str, fallback: Option<String>| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or(fallback)
        };

        let service_account_email = pick(ENV_SERVICE_ACCOUNT_EMAIL, file.service_account_email)
            .with_context(|| format!("{} is not set", ENV_SERVICE_ACCOUNT_EMAIL))?;
        let private_key = pick(ENV_PRIVATE_KEY, file.private_key)
            .with_context(|| format!("{} is not set", ENV_PRIVATE_KEY))?;
        let spreadsheet_id = pick(ENV_SPREADSHEET_ID, file.spreadsheet_id)
            .with_context(|| format!("{} is not set", ENV_SPREADSHEET_ID))?;

        Ok(Self {
            service_account_email,
            private_key: normalize_private_key(&private_key),
            spreadsheet_id,
            api_base: pick(ENV_API_BASE, file.api_base)
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            token_uri: pick(ENV_TOKEN_URI, file.token_uri)
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
        })
    }
}
