pub mod accounts;
pub mod import;
pub mod init;
pub mod run;
pub mod status;
pub mod summarize;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::error::{Result, SummaryError};
use crate::settings::Settings;
use crate::store::SqliteStore;

#[derive(Parser)]
#[command(name = "txsummary", about = "Summarize a transaction ledger by month and email the result.")]
pub struct Cli {
    /// Database file (default: <data_dir>/txsummary.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    /// Directory summary emails are written to (default: <data_dir>/outbox)
    #[arg(long, global = true)]
    pub outbox: Option<PathBuf>,
    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write settings and create the database.
    Init {
        /// Path for txsummary data (default: ~/Documents/txsummary)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Year given to month/day dates in imported files
        #[arg(long = "reference-year")]
        reference_year: Option<i32>,
        /// Sender address for summary emails
        #[arg(long = "email-from")]
        email_from: Option<String>,
    },
    /// Manage accounts.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// Import a CSV of Id,Date,Transaction rows into an account.
    Import {
        /// Path to the CSV file
        file: PathBuf,
        /// Account id to import into
        #[arg(long)]
        account: i64,
    },
    /// Compute and store the summary of an account.
    Summarize {
        #[arg(long)]
        account: i64,
    },
    /// Print the latest stored summary of an account.
    Show {
        #[arg(long)]
        account: i64,
    },
    /// Create an account, import FILE, summarize it and send the email.
    Run {
        /// Path to the CSV file
        file: PathBuf,
        /// Recipient address (repeatable)
        #[arg(long = "email-to", required = true)]
        email_to: Vec<String>,
        /// Keep everything in memory instead of the database
        #[arg(long = "in-memory")]
        in_memory: bool,
        /// Print the email instead of writing it to the outbox
        #[arg(long)]
        stdout: bool,
    },
    /// Show the database location and row counts.
    Status,
}

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// Create a new account and print its id.
    Create,
    /// Show an account's transaction count and latest summary.
    Show {
        id: i64,
    },
}

/// Settings plus the per-invocation overrides from the command line.
pub struct Context {
    pub settings: Settings,
    pub db: Option<PathBuf>,
    pub outbox: Option<PathBuf>,
}

impl Context {
    pub fn db_path(&self) -> PathBuf {
        self.db.clone().unwrap_or_else(|| self.settings.db_path())
    }

    pub fn outbox_path(&self) -> PathBuf {
        self.outbox.clone().unwrap_or_else(|| self.settings.outbox_path())
    }

    pub fn open_store(&self) -> Result<SqliteStore> {
        let path = self.db_path();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| SummaryError::Storage(format!("creating {}: {e}", dir.display())))?;
        }
        SqliteStore::open(&path)
    }
}
