use std::path::PathBuf;

use tracing::warn;

use crate::error::{Result, SummaryError};
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path, Settings};
use crate::store::{SqliteStore, Store};

pub fn run(data_dir: Option<String>, reference_year: Option<i32>, email_from: Option<String>) -> Result<()> {
    let mut settings = load_settings().unwrap_or_else(|e| {
        warn!("replacing unreadable settings: {e}");
        Settings::default()
    });
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    if let Some(year) = reference_year {
        settings.reference_year = year;
    }
    if let Some(from) = email_from {
        settings.email_from = from;
    }
    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    for dir in [resolved.clone(), settings.outbox_path()] {
        std::fs::create_dir_all(&dir)
            .map_err(|e| SummaryError::Settings(format!("creating {}: {e}", dir.display())))?;
    }

    let mut store = SqliteStore::open(&settings.db_path())?;
    store.close()?;

    println!("Initialized txsummary at {}", resolved.display());
    println!("Settings:   {}", settings_path().display());
    Ok(())
}
