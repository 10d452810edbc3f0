use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

// account_id / summary_id are soft foreign keys: indexed, never enforced.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id INTEGER NOT NULL,
    external_id INTEGER NOT NULL,
    date TEXT NOT NULL,
    amount REAL NOT NULL CHECK (amount >= 0),
    is_credit INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account_id);

CREATE TABLE IF NOT EXISTS summary (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    account_id INTEGER NOT NULL,
    total_balance REAL NOT NULL,
    total_transactions INTEGER NOT NULL,
    num_of_credit_transactions INTEGER NOT NULL,
    num_of_debit_transactions INTEGER NOT NULL,
    total_average_credit REAL NOT NULL,
    total_average_debit REAL NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);
CREATE INDEX IF NOT EXISTS idx_summary_account ON summary(account_id);

CREATE TABLE IF NOT EXISTS month_summary (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    summary_id INTEGER NOT NULL,
    month TEXT NOT NULL,
    total_balance REAL NOT NULL,
    total_transactions INTEGER NOT NULL,
    num_of_credit_transactions INTEGER NOT NULL,
    num_of_debit_transactions INTEGER NOT NULL,
    average_credit REAL NOT NULL,
    average_debit REAL NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_month_summary_summary ON month_summary(summary_id);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
