use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SummaryError};

pub const DB_FILE: &str = "txsummary.db";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_data_dir_string")]
    pub data_dir: String,
    /// Year stamped onto `month/day` dates from the input file.
    #[serde(default = "default_reference_year")]
    pub reference_year: i32,
    #[serde(default = "default_email_from")]
    pub email_from: String,
    /// Defaults to `<data_dir>/outbox`.
    #[serde(default)]
    pub outbox_dir: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Leap year, so 2/29 rows parse.
fn default_reference_year() -> i32 {
    2000
}

fn default_email_from() -> String {
    "summary@localhost".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_data_dir_string() -> String {
    default_data_dir().to_string_lossy().to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir_string(),
            reference_year: default_reference_year(),
            email_from: default_email_from(),
            outbox_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(DB_FILE)
    }

    pub fn outbox_path(&self) -> PathBuf {
        match &self.outbox_dir {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(&self.data_dir).join("outbox"),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("txsummary")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("txsummary")
}

/// Missing file means defaults; a file that does not parse is an error.
pub fn load_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| SummaryError::Settings(format!("reading {}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| SummaryError::Settings(format!("{}: {e}", path.display())))
}

pub fn save_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| SummaryError::Settings(format!("creating {}: {e}", dir.display())))?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(|e| SummaryError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))
        .map_err(|e| SummaryError::Settings(format!("writing {}: {e}", path.display())))?;
    Ok(())
}

pub fn load_settings() -> Result<Settings> {
    load_from(&settings_path())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_to(&settings_path(), settings)
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
