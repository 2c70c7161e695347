//! Application configuration
//!
//! Loaded once at startup and shared read-only afterwards. Sources, later
//! ones overriding earlier ones:
//! - built-in defaults
//! - a config file (`.json`, `.toml` or `.yaml`, picked by extension)
//! - plain environment variables (`TELEGRAM_TOKEN`, `ADMIN_ID`, ...)
//! - `FORESTBOT_`-prefixed environment variables

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Json, Toml, Yaml};
use figment::Figment;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::core::error::{AppError, AppResult};

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "configs/config.json";

/// Prefix for environment overrides of any key
pub const ENV_PREFIX: &str = "FORESTBOT_";

pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4";

/// Environment variables read without a prefix
const PLAIN_ENV_KEYS: [&str; 8] = [
    "TELEGRAM_TOKEN",
    "ADMIN_ID",
    "SPREADSHEET_ID",
    "CREDENTIALS_PATH",
    "SHEET_NAME",
    "SHEETS_ACCESS_TOKEN",
    "SHEETS_API_URL",
    "LOG_FILE_PATH",
];

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Bot API token from @BotFather
    pub telegram_token: SecretString,
    /// Telegram user ID of the only administrator
    pub admin_id: i64,
    pub spreadsheet_id: String,
    /// Service-account key file
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,
    /// Spreadsheet tab; the first tab when unset
    #[serde(default)]
    pub sheet_name: Option<String>,
    /// Ready-made OAuth token, used instead of the key file when set
    #[serde(default)]
    pub sheets_access_token: Option<SecretString>,
    #[serde(default = "default_sheets_api_url")]
    pub sheets_api_url: String,
    #[serde(default = "default_log_file_path")]
    pub log_file_path: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_credentials_path() -> PathBuf {
    PathBuf::from("./credentials.json")
}

fn default_sheets_api_url() -> String {
    DEFAULT_SHEETS_API_URL.to_string()
}

fn default_log_file_path() -> String {
    "forestbot.log".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Loads and validates the configuration.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        Self::from_figment(Self::figment(path))
    }

    /// Provider stack for `path` plus the environment.
    ///
    /// A missing config file is not an error; everything may come from the environment.
    pub fn figment(path: &Path) -> Figment {
        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Figment::new().merge(Toml::file(path)),
            Some("yaml") | Some("yml") => Figment::new().merge(Yaml::file(path)),
            _ => Figment::new().merge(Json::file(path)),
        };
        figment
            .merge(Env::raw().only(&PLAIN_ENV_KEYS))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> AppResult<Self> {
        let config: AppConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.telegram_token.expose_secret().trim().is_empty() {
            return Err(AppError::Validation("telegram_token must not be empty".to_string()));
        }
        if self.admin_id == 0 {
            return Err(AppError::Validation("admin_id must be set".to_string()));
        }
        if self.spreadsheet_id.trim().is_empty() {
            return Err(AppError::Validation("spreadsheet_id must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// One-line description safe for logs: secrets are never included.
    pub fn summary(&self) -> String {
        format!(
            "admin_id={}, spreadsheet_id={}, sheet={}, auth={}, api={}, timeout={}s",
            self.admin_id,
            self.spreadsheet_id,
            self.sheet_name.as_deref().unwrap_or("<first>"),
            if self.sheets_access_token.is_some() {
                "access token".to_string()
            } else {
                format!("service account ({})", self.credentials_path.display())
            },
            self.sheets_api_url,
            self.request_timeout_secs
        )
    }
}
