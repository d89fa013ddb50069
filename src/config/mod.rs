use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod messages;

pub use messages::Messages;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub telegram_token: String,
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub messages: Messages,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SheetsBackendKind {
    #[default]
    Google,
    Csv,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub backend: SheetsBackendKind,
    /// Google spreadsheet id (the long token in the sheet URL)
    pub spreadsheet_id: String,
    /// OAuth2 bearer token with the spreadsheets scope
    pub access_token: String,
    /// Worksheet duplicated when the month's worksheet is missing
    pub template_sheet: String,
    /// Directory holding one CSV file per worksheet (csv backend only)
    pub csv_dir: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            backend: SheetsBackendKind::Google,
            spreadsheet_id: String::new(),
            access_token: String::new(),
            template_sheet: default_template_sheet(),
            csv_dir: Config::config_dir()
                .join("sheets")
                .to_string_lossy()
                .to_string(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_timezone() -> String {
    "Asia/Jerusalem".to_string()
}
fn default_template_sheet() -> String {
    "Template".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram_token: String::new(),
            webhook_url: String::new(),
            listen_addr: default_listen_addr(),
            port: default_port(),
            timezone: default_timezone(),
            sheets: SheetsConfig::default(),
            messages: Messages::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rtimeclock")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".rtimeclock")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rtimeclock.conf")
    }

    /// Resolve the config path: explicit override first, standard location otherwise
    pub fn resolve_path(custom: Option<&str>) -> PathBuf {
        match custom {
            Some(p) => expand_tilde(p),
            None => Self::config_file(),
        }
    }

    /// Load configuration from file, or return defaults if not found.
    /// Environment overrides are applied on top.
    pub fn load(custom: Option<&str>) -> AppResult<Self> {
        let mut cfg = Self::load_file(&Self::resolve_path(custom))?;
        cfg.apply_env_overrides(|key| env::var(key).ok());
        Ok(cfg)
    }

    pub fn load_file(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Overlay the deployment environment variables on the loaded values.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty("TELEGRAM_TOKEN") {
            self.telegram_token = v;
        }
        if let Some(v) = non_empty("WEBHOOK_URL") {
            self.webhook_url = v;
        }
        if let Some(port) = non_empty("PORT").and_then(|v| v.trim().parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(v) = non_empty("GOOGLE_SPREADSHEET_ID") {
            self.sheets.spreadsheet_id = v;
        }
        if let Some(v) = non_empty("GOOGLE_ACCESS_TOKEN") {
            self.sheets.access_token = v;
        }
    }

    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::InvalidTimezone(self.timezone.clone()))
    }

    /// Bot token, required by anything that talks to Telegram
    pub fn require_token(&self) -> AppResult<&str> {
        if self.telegram_token.trim().is_empty() {
            return Err(AppError::Config(
                "telegram_token is not set (config file or TELEGRAM_TOKEN)".into(),
            ));
        }
        Ok(&self.telegram_token)
    }

    pub fn require_webhook_url(&self) -> AppResult<&str> {
        if self.webhook_url.trim().is_empty() {
            return Err(AppError::Config(
                "webhook_url is not set (config file or WEBHOOK_URL)".into(),
            ));
        }
        Ok(&self.webhook_url)
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Directory that relative paths in the config file are resolved against
    pub fn base_dir(path: &Path) -> PathBuf {
        match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Write the configuration file, keeping the values of an existing one.
    /// In test mode nothing is written.
    pub fn init_all(path: &Path, is_test: bool) -> AppResult<Self> {
        let config = Self::load_file(path)?;
        if !is_test {
            config.save(path)?;
        }
        Ok(config)
    }
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "********".to_string()
    }
}

impl Config {
    /// Copy safe to print: tokens replaced by a fixed mask
    pub fn masked(&self) -> Self {
        let mut c = self.clone();
        c.telegram_token = mask(&c.telegram_token);
        c.sheets.access_token = mask(&c.sheets.access_token);
        c
    }
}
