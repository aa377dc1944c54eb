use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`AppConfig`].
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "DASHBOARD_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

const DATA_ENV: &str = "DASHBOARD_DATA";
const USER_ENV: &str = "DASHBOARD_USER";
const PASSWORD_ENV: &str = "DASHBOARD_PASSWORD";

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Everything the dashboard needs before the first frame.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Spreadsheet holding the delivery records.
    pub data_path: PathBuf,
    /// The single credential pair accepted by the access gate.
    pub credentials: Credentials,
    /// Header names used to locate each record attribute.
    pub columns: ColumnNames,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("dadss.xlsx"),
            credentials: Credentials::default(),
            columns: ColumnNames::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "1234".to_string(),
        }
    }
}

/// Spreadsheet header for each record attribute (exact, case-sensitive).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnNames {
    pub date: String,
    pub company: String,
    pub plate: String,
    pub client: String,
    pub delivered: String,
    pub quantity: String,
    pub invoice_value: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "DATA".to_string(),
            company: "EMPRESA".to_string(),
            plate: "PLACAS".to_string(),
            client: "CLIENTE".to_string(),
            delivered: "DT.ENTREGA".to_string(),
            quantity: "QUANT.".to_string(),
            invoice_value: "V.NF".to_string(),
        }
    }
}

impl AppConfig {
    /// Resolve the config file, read it, then apply environment overrides.
    ///
    /// Lookup order: `$DASHBOARD_CONFIG`, then `./dashboard.json` if it
    /// exists, otherwise built-in defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::load_from(&path)?,
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    Self::load_from(local)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a config file. Missing fields fall back to their defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override individual values from a key lookup (normally the process env).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(DATA_ENV) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(user) = lookup(USER_ENV) {
            self.credentials.username = user;
        }
        if let Some(password) = lookup(PASSWORD_ENV) {
            self.credentials.password = password;
        }
    }
}
