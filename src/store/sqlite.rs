use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row};
use tracing::{debug, warn};

use super::{check_amount, Store};
use crate::db::{get_connection, init_db};
use crate::error::{Result, SummaryError};
use crate::models::{Account, MonthSummary, Summary, Transaction};

const TRANSACTION_COLUMNS: &str = "id, account_id, external_id, date, amount, is_credit";
const SUMMARY_COLUMNS: &str = "id, account_id, total_balance, total_transactions, \
     num_of_credit_transactions, num_of_debit_transactions, total_average_credit, total_average_debit";
const MONTH_COLUMNS: &str = "id, summary_id, month, total_balance, total_transactions, \
     num_of_credit_transactions, num_of_debit_transactions, average_credit, average_debit";

/// [`Store`] over a SQLite database laid out by [`crate::db::SCHEMA`].
pub struct SqliteStore {
    conn: Option<Connection>,
}

impl SqliteStore {
    /// Open (creating if needed) the database file and make sure the schema exists.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = get_connection(db_path)?;
        init_db(&conn)?;
        debug!(path = %db_path.display(), "opened sqlite store");
        Ok(Self { conn: Some(conn) })
    }

    /// Throwaway database, gone when the store is closed.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self { conn: Some(conn) })
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| SummaryError::Storage("sqlite store is closed".to_string()))
    }

    fn conn_mut(&mut self) -> Result<&mut Connection> {
        self.conn
            .as_mut()
            .ok_or_else(|| SummaryError::Storage("sqlite store is closed".to_string()))
    }
}

fn transaction_from_row(row: &Row) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        external_id: row.get(2)?,
        date: row.get(3)?,
        amount: row.get(4)?,
        is_credit: row.get(5)?,
    })
}

fn summary_from_row(row: &Row) -> rusqlite::Result<Summary> {
    Ok(Summary {
        id: row.get(0)?,
        account_id: row.get(1)?,
        total_balance: row.get(2)?,
        total_transactions: row.get(3)?,
        num_of_credit_transactions: row.get(4)?,
        num_of_debit_transactions: row.get(5)?,
        total_average_credit: row.get(6)?,
        total_average_debit: row.get(7)?,
    })
}

fn month_from_row(row: &Row) -> rusqlite::Result<MonthSummary> {
    Ok(MonthSummary {
        id: row.get(0)?,
        summary_id: row.get(1)?,
        month: row.get(2)?,
        total_balance: row.get(3)?,
        total_transactions: row.get(4)?,
        num_of_credit_transactions: row.get(5)?,
        num_of_debit_transactions: row.get(6)?,
        average_credit: row.get(7)?,
        average_debit: row.get(8)?,
    })
}

fn insert_summary(conn: &Connection, s: &Summary) -> Result<i64> {
    conn.execute(
        "INSERT INTO summary (account_id, total_balance, total_transactions, num_of_credit_transactions, \
         num_of_debit_transactions, total_average_credit, total_average_debit) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            s.account_id,
            s.total_balance,
            s.total_transactions,
            s.num_of_credit_transactions,
            s.num_of_debit_transactions,
            s.total_average_credit,
            s.total_average_debit,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_month(conn: &Connection, m: &MonthSummary, summary_id: i64) -> Result<i64> {
    conn.execute(
        "INSERT INTO month_summary (summary_id, month, total_balance, total_transactions, \
         num_of_credit_transactions, num_of_debit_transactions, average_credit, average_debit) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            summary_id,
            m.month,
            m.total_balance,
            m.total_transactions,
            m.num_of_credit_transactions,
            m.num_of_debit_transactions,
            m.average_credit,
            m.average_debit,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl Store for SqliteStore {
    fn create_account(&mut self) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO accounts DEFAULT VALUES", [])?;
        let id = conn.last_insert_rowid();
        debug!(account_id = id, "created account");
        Ok(id)
    }

    fn get_account(&self, account_id: i64) -> Result<Account> {
        self.conn()?
            .query_row("SELECT id FROM accounts WHERE id = ?1", [account_id], |row| {
                Ok(Account { id: row.get(0)? })
            })
            .optional()?
            .ok_or_else(|| SummaryError::NotFound(format!("account {account_id}")))
    }

    fn save_transaction(&mut self, txn: &mut Transaction) -> Result<()> {
        let conn = self.conn()?;
        check_amount(txn)?;
        let mut stmt = conn.prepare_cached(
            "INSERT INTO transactions (account_id, external_id, date, amount, is_credit) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        stmt.execute(rusqlite::params![
            txn.account_id,
            txn.external_id,
            txn.date,
            txn.amount,
            txn.is_credit,
        ])?;
        txn.id = Some(conn.last_insert_rowid());
        Ok(())
    }

    fn get_transactions_by_account(&self, account_id: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE account_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map([account_id], transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY id"))?;
        let rows = stmt.query_map([], transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn save_summary(&mut self, summary: &mut Summary) -> Result<i64> {
        let id = insert_summary(self.conn()?, summary)?;
        summary.id = Some(id);
        Ok(id)
    }

    fn get_summary_by_account(&self, account_id: i64) -> Result<Summary> {
        self.conn()?
            .query_row(
                &format!("SELECT {SUMMARY_COLUMNS} FROM summary WHERE account_id = ?1 ORDER BY id DESC LIMIT 1"),
                [account_id],
                summary_from_row,
            )
            .optional()?
            .ok_or_else(|| SummaryError::NotFound(format!("summary for account {account_id}")))
    }

    fn list_summaries(&self) -> Result<Vec<Summary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {SUMMARY_COLUMNS} FROM summary ORDER BY id"))?;
        let rows = stmt.query_map([], summary_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn save_month_summary(&mut self, month: &mut MonthSummary, summary_id: i64) -> Result<()> {
        let id = insert_month(self.conn()?, month, summary_id)?;
        month.id = Some(id);
        month.summary_id = Some(summary_id);
        Ok(())
    }

    fn get_month_summaries_by_summary(&self, summary_id: i64) -> Result<Vec<MonthSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {MONTH_COLUMNS} FROM month_summary WHERE summary_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map([summary_id], month_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn list_month_summaries(&self) -> Result<Vec<MonthSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {MONTH_COLUMNS} FROM month_summary ORDER BY id"))?;
        let rows = stmt.query_map([], month_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// One SQLite transaction for the whole run. Ids are written back only
    /// after the commit succeeds.
    fn save_summary_bundle(&mut self, summary: &mut Summary, months: &mut [MonthSummary]) -> Result<i64> {
        let tx = self.conn_mut()?.transaction()?;
        let summary_id = insert_summary(&tx, summary)?;
        let mut month_ids = Vec::with_capacity(months.len());
        for month in months.iter() {
            month_ids.push(insert_month(&tx, month, summary_id)?);
        }
        tx.commit()?;

        summary.id = Some(summary_id);
        for (month, id) in months.iter_mut().zip(month_ids) {
            month.id = Some(id);
            month.summary_id = Some(summary_id);
        }
        debug!(summary_id, months = months.len(), "committed summary bundle");
        Ok(summary_id)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            if let Err((_, e)) = conn.close() {
                warn!("closing sqlite store failed: {e}");
                return Err(e.into());
            }
        }
        Ok(())
    }
}
