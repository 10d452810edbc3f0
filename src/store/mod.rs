//! Persistence for accounts, transactions and their summaries.
//!
//! [`Store`] is the only thing the aggregation code talks to. Two backends
//! implement it: [`MemoryStore`] keeps everything in maps and is what the
//! tests and `run --in-memory` use; [`SqliteStore`] writes to the four
//! tables created by [`crate::db::init_db`].
//!
//! Writes take `&mut self`. Wrap a store in a `Mutex` to share it.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::{Result, SummaryError};
use crate::models::{Account, MonthSummary, Summary, Transaction};

/// Amounts are finite magnitudes. Both backends refuse anything else before
/// touching storage.
fn check_amount(txn: &Transaction) -> Result<()> {
    if txn.amount.is_finite() && txn.amount >= 0.0 {
        Ok(())
    } else {
        Err(SummaryError::Storage(format!(
            "transaction {} has invalid amount {}",
            txn.external_id, txn.amount
        )))
    }
}

pub trait Store {
    /// Allocate a fresh account id.
    fn create_account(&mut self) -> Result<i64>;

    /// `NotFound` when no account has that id.
    fn get_account(&self, account_id: i64) -> Result<Account>;

    /// Append a transaction under `txn.account_id` and write the assigned id
    /// back onto `txn`. The account is not checked for existence. A negative
    /// or non-finite `amount` is a storage error and nothing is written.
    fn save_transaction(&mut self, txn: &mut Transaction) -> Result<()>;

    /// Every transaction saved for the account, oldest first. Empty when
    /// nothing was ever saved for it.
    fn get_transactions_by_account(&self, account_id: i64) -> Result<Vec<Transaction>>;

    fn list_transactions(&self) -> Result<Vec<Transaction>>;

    /// Insert a new summary row and return its id (also written onto `summary`).
    fn save_summary(&mut self, summary: &mut Summary) -> Result<i64>;

    /// Most recently saved summary for the account; `NotFound` if none.
    fn get_summary_by_account(&self, account_id: i64) -> Result<Summary>;

    fn list_summaries(&self) -> Result<Vec<Summary>>;

    fn save_month_summary(&mut self, month: &mut MonthSummary, summary_id: i64) -> Result<()>;

    /// Month rows of a summary. Empty, not an error, when there are none.
    fn get_month_summaries_by_summary(&self, summary_id: i64) -> Result<Vec<MonthSummary>>;

    fn list_month_summaries(&self) -> Result<Vec<MonthSummary>>;

    /// Persist one aggregation run: the summary, then each of its months.
    ///
    /// The default stops at the first failure and leaves earlier rows in
    /// place. Backends that can commit atomically override it.
    fn save_summary_bundle(&mut self, summary: &mut Summary, months: &mut [MonthSummary]) -> Result<i64> {
        let summary_id = self.save_summary(summary)?;
        for month in months.iter_mut() {
            self.save_month_summary(month, summary_id)?;
        }
        Ok(summary_id)
    }

    /// Release the backing resources. Safe to call more than once.
    fn close(&mut self) -> Result<()>;
}
