use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::{check_amount, Store};
use crate::error::{Result, SummaryError};
use crate::models::{Account, MonthSummary, Summary, Transaction};

/// Map-backed [`Store`]. Ids start at 1 per entity kind and are never reused.
#[derive(Debug)]
pub struct MemoryStore {
    accounts: BTreeSet<i64>,
    transactions: HashMap<i64, Vec<Transaction>>,
    summaries: HashMap<i64, Vec<Summary>>,
    month_summaries: HashMap<i64, Vec<MonthSummary>>,
    next_account_id: i64,
    next_transaction_id: i64,
    next_summary_id: i64,
    next_month_summary_id: i64,
    closed: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            accounts: BTreeSet::new(),
            transactions: HashMap::new(),
            summaries: HashMap::new(),
            month_summaries: HashMap::new(),
            next_account_id: 1,
            next_transaction_id: 1,
            next_summary_id: 1,
            next_month_summary_id: 1,
            closed: false,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(SummaryError::Storage("memory store is closed".to_string()));
        }
        Ok(())
    }
}

fn take_id(next: &mut i64) -> i64 {
    let id = *next;
    *next += 1;
    id
}

impl Store for MemoryStore {
    fn create_account(&mut self) -> Result<i64> {
        self.ensure_open()?;
        let id = take_id(&mut self.next_account_id);
        self.accounts.insert(id);
        debug!(account_id = id, "created account");
        Ok(id)
    }

    fn get_account(&self, account_id: i64) -> Result<Account> {
        self.ensure_open()?;
        if self.accounts.contains(&account_id) {
            Ok(Account { id: account_id })
        } else {
            Err(SummaryError::NotFound(format!("account {account_id}")))
        }
    }

    fn save_transaction(&mut self, txn: &mut Transaction) -> Result<()> {
        self.ensure_open()?;
        check_amount(txn)?;
        txn.id = Some(take_id(&mut self.next_transaction_id));
        self.transactions
            .entry(txn.account_id)
            .or_default()
            .push(txn.clone());
        Ok(())
    }

    fn get_transactions_by_account(&self, account_id: i64) -> Result<Vec<Transaction>> {
        self.ensure_open()?;
        Ok(self.transactions.get(&account_id).cloned().unwrap_or_default())
    }

    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.ensure_open()?;
        let mut all: Vec<Transaction> = self.transactions.values().flatten().cloned().collect();
        all.sort_by_key(|t| t.id);
        Ok(all)
    }

    fn save_summary(&mut self, summary: &mut Summary) -> Result<i64> {
        self.ensure_open()?;
        let id = take_id(&mut self.next_summary_id);
        summary.id = Some(id);
        self.summaries
            .entry(summary.account_id)
            .or_default()
            .push(summary.clone());
        debug!(summary_id = id, account_id = summary.account_id, "saved summary");
        Ok(id)
    }

    fn get_summary_by_account(&self, account_id: i64) -> Result<Summary> {
        self.ensure_open()?;
        self.summaries
            .get(&account_id)
            .and_then(|history| history.last())
            .cloned()
            .ok_or_else(|| SummaryError::NotFound(format!("summary for account {account_id}")))
    }

    fn list_summaries(&self) -> Result<Vec<Summary>> {
        self.ensure_open()?;
        let mut all: Vec<Summary> = self.summaries.values().flatten().cloned().collect();
        all.sort_by_key(|s| s.id);
        Ok(all)
    }

    fn save_month_summary(&mut self, month: &mut MonthSummary, summary_id: i64) -> Result<()> {
        self.ensure_open()?;
        month.id = Some(take_id(&mut self.next_month_summary_id));
        month.summary_id = Some(summary_id);
        self.month_summaries
            .entry(summary_id)
            .or_default()
            .push(month.clone());
        Ok(())
    }

    fn get_month_summaries_by_summary(&self, summary_id: i64) -> Result<Vec<MonthSummary>> {
        self.ensure_open()?;
        Ok(self.month_summaries.get(&summary_id).cloned().unwrap_or_default())
    }

    fn list_month_summaries(&self) -> Result<Vec<MonthSummary>> {
        self.ensure_open()?;
        let mut all: Vec<MonthSummary> = self.month_summaries.values().flatten().cloned().collect();
        all.sort_by_key(|m| m.id);
        Ok(all)
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.transactions.clear();
            self.summaries.clear();
            self.month_summaries.clear();
            self.closed = true;
        }
        Ok(())
    }
}
