//! Summary statistics over an account's transactions.
//!
//! Debits are magnitudes everywhere: `total_average_debit` and
//! `average_debit` are non-negative means, and the only place a debit
//! subtracts is `total_balance`.

use std::collections::BTreeMap;

use chrono::{Datelike, Month};
use tracing::info;

use crate::error::{Result, ResultExt, SummaryError};
use crate::models::{MonthSummary, Summary, Transaction};
use crate::store::Store;

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    balance: f64,
    credit_total: f64,
    debit_total: f64,
    credits: i64,
    debits: i64,
}

impl Tally {
    fn add(&mut self, txn: &Transaction) {
        self.balance += txn.signed_amount();
        if txn.is_credit {
            self.credit_total += txn.amount;
            self.credits += 1;
        } else {
            self.debit_total += txn.amount;
            self.debits += 1;
        }
    }

    fn count(&self) -> i64 {
        self.credits + self.debits
    }

    fn average_credit(&self) -> f64 {
        mean(self.credit_total, self.credits)
    }

    fn average_debit(&self) -> f64 {
        mean(self.debit_total, self.debits)
    }
}

fn mean(total: f64, n: i64) -> f64 {
    if n > 0 {
        total / n as f64
    } else {
        0.0
    }
}

/// Overall statistics. The account is taken from the first transaction;
/// callers pass a single account's ledger.
pub fn compute_summary(transactions: &[Transaction]) -> Result<Summary> {
    let first = transactions.first().ok_or_else(|| {
        SummaryError::InvalidArgument("cannot summarize an empty transaction list".to_string())
    })?;

    let mut tally = Tally::default();
    for txn in transactions {
        tally.add(txn);
    }

    Ok(Summary {
        id: None,
        account_id: first.account_id,
        total_balance: tally.balance,
        total_transactions: tally.count(),
        num_of_credit_transactions: tally.credits,
        num_of_debit_transactions: tally.debits,
        total_average_credit: tally.average_credit(),
        total_average_debit: tally.average_debit(),
    })
}

/// One entry per month-of-year present in `transactions`, years merged.
/// Entries come out January first, though callers should not depend on it.
pub fn compute_month_summaries(transactions: &[Transaction]) -> Vec<MonthSummary> {
    let mut buckets: BTreeMap<u32, Tally> = BTreeMap::new();
    for txn in transactions {
        buckets.entry(txn.date.month()).or_default().add(txn);
    }

    buckets
        .into_iter()
        .filter_map(|(number, tally)| {
            let month = Month::try_from(u8::try_from(number).ok()?).ok()?;
            Some(MonthSummary {
                id: None,
                summary_id: None,
                month: month.name().to_string(),
                total_balance: tally.balance,
                total_transactions: tally.count(),
                num_of_credit_transactions: tally.credits,
                num_of_debit_transactions: tally.debits,
                average_credit: tally.average_credit(),
                average_debit: tally.average_debit(),
            })
        })
        .collect()
}

/// Load the account's ledger, compute both summaries, persist them through
/// [`Store::save_summary_bundle`] and hand back what was computed.
///
/// An account without transactions is `InvalidArgument`; nothing is written.
/// Store errors keep their kind and gain the operation and id as context.
pub fn generate_summary<S: Store + ?Sized>(
    store: &mut S,
    account_id: i64,
) -> Result<(Summary, Vec<MonthSummary>)> {
    let transactions = store
        .get_transactions_by_account(account_id)
        .with_context(|| format!("loading transactions for account {account_id}"))?;
    if transactions.is_empty() {
        return Err(SummaryError::InvalidArgument(format!(
            "account {account_id} has no transactions to summarize"
        )));
    }

    let mut summary = compute_summary(&transactions)?;
    let mut months = compute_month_summaries(&transactions);

    let summary_id = store
        .save_summary_bundle(&mut summary, &mut months)
        .with_context(|| format!("saving summary for account {account_id}"))?;

    info!(
        account_id,
        summary_id,
        transactions = summary.total_transactions,
        months = months.len(),
        "generated summary"
    );
    Ok((summary, months))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{sort_by_calendar, Account};
    use crate::store::{MemoryStore, SqliteStore};

    fn txn(account_id: i64, y: i32, m: u32, d: u32, amount: f64, is_credit: bool) -> Transaction {
        Transaction::new(account_id, 0, NaiveDate::from_ymd_opt(y, m, d).unwrap(), amount, is_credit)
    }

    fn scenario_two() -> Vec<Transaction> {
        vec![
            txn(123, 2022, 1, 1, 100.0, true),
            txn(123, 2022, 1, 15, 50.0, false),
            txn(123, 2022, 2, 1, 75.0, true),
            txn(123, 2022, 2, 28, 25.0, false),
            txn(123, 2022, 3, 1, 200.0, true),
        ]
    }

    #[test]
    fn test_compute_summary() {
        let transactions = vec![
            txn(1, 2000, 1, 1, 100.0, true),
            txn(1, 2000, 1, 2, 200.0, true),
            txn(1, 2000, 1, 3, 50.0, false),
            txn(1, 2000, 1, 4, 75.0, false),
        ];
        let summary = compute_summary(&transactions).unwrap();
        assert_eq!(
            summary,
            Summary {
                id: None,
                account_id: 1,
                total_balance: 175.0,
                total_transactions: 4,
                num_of_credit_transactions: 2,
                num_of_debit_transactions: 2,
                total_average_credit: 150.0,
                total_average_debit: 62.5,
            }
        );
    }

    #[test]
    fn test_compute_summary_empty_is_invalid() {
        let err = compute_summary(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_compute_summary_only_credits() {
        let transactions = vec![txn(2, 2000, 5, 1, 10.0, true), txn(2, 2000, 5, 2, 30.0, true)];
        let summary = compute_summary(&transactions).unwrap();
        assert_eq!(summary.num_of_debit_transactions, 0);
        assert_eq!(summary.total_average_debit, 0.0);
        assert_eq!(summary.total_average_credit, 20.0);
        assert_eq!(summary.total_balance, 40.0);
    }

    #[test]
    fn test_compute_summary_only_debits() {
        let transactions = vec![txn(2, 2000, 5, 1, 10.0, false)];
        let summary = compute_summary(&transactions).unwrap();
        assert_eq!(summary.total_average_credit, 0.0);
        assert_eq!(summary.total_average_debit, 10.0);
        assert_eq!(summary.total_balance, -10.0);
    }

    #[test]
    fn test_summary_counts_and_balance_hold() {
        let transactions: Vec<Transaction> = (0..37)
            .map(|i| txn(4, 2000, (i % 12) + 1, 1, f64::from(i) * 1.5, i % 3 == 0))
            .collect();
        let summary = compute_summary(&transactions).unwrap();
        assert_eq!(summary.total_transactions, 37);
        assert_eq!(
            summary.total_transactions,
            summary.num_of_credit_transactions + summary.num_of_debit_transactions
        );
        let expected: f64 = transactions.iter().map(Transaction::signed_amount).sum();
        assert_eq!(summary.total_balance, expected);
    }

    #[test]
    fn test_compute_month_summaries() {
        let mut months = compute_month_summaries(&scenario_two());
        sort_by_calendar(&mut months);
        assert_eq!(months.len(), 3);

        let jan = &months[0];
        assert_eq!(jan.month, "January");
        assert_eq!(jan.total_transactions, 2);
        assert_eq!(jan.total_balance, 50.0);
        assert_eq!(jan.average_credit, 100.0);
        assert_eq!(jan.average_debit, 50.0);

        let feb = &months[1];
        assert_eq!(feb.month, "February");
        assert_eq!(feb.total_transactions, 2);
        assert_eq!(feb.total_balance, 50.0);
        assert_eq!(feb.average_credit, 75.0);
        assert_eq!(feb.average_debit, 25.0);

        let mar = &months[2];
        assert_eq!(mar.month, "March");
        assert_eq!(mar.total_transactions, 1);
        assert_eq!(mar.num_of_credit_transactions, 1);
        assert_eq!(mar.num_of_debit_transactions, 0);
        assert_eq!(mar.average_credit, 200.0);
        assert_eq!(mar.average_debit, 0.0);
    }

    #[test]
    fn test_month_bucketing_ignores_year() {
        let transactions = vec![
            txn(1, 2019, 1, 5, 10.0, true),
            txn(1, 2024, 1, 20, 4.0, false),
            txn(1, 2024, 7, 4, 1.0, true),
        ];
        let months = compute_month_summaries(&transactions);
        assert_eq!(months.len(), 2);
        let jan = months.iter().find(|m| m.month == "January").unwrap();
        assert_eq!(jan.total_transactions, 2);
        assert_eq!(jan.total_balance, 6.0);
        let total: i64 = months.iter().map(|m| m.total_transactions).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_month_summaries_of_empty_input() {
        assert!(compute_month_summaries(&[]).is_empty());
    }

    #[test]
    fn test_generate_summary_persists_results() {
        let mut store = MemoryStore::new();
        let account = store.create_account().unwrap();
        for mut t in scenario_two().into_iter().map(|t| Transaction { account_id: account, ..t }) {
            store.save_transaction(&mut t).unwrap();
        }

        let (summary, months) = generate_summary(&mut store, account).unwrap();
        let summary_id = summary.id.unwrap();
        assert_eq!(summary.total_transactions, 5);
        assert_eq!(summary.total_balance, 300.0);
        assert_eq!(store.get_summary_by_account(account).unwrap(), summary);

        let mut stored = store.get_month_summaries_by_summary(summary_id).unwrap();
        sort_by_calendar(&mut stored);
        assert_eq!(stored, months);
    }

    #[test]
    fn test_generate_summary_without_transactions() {
        let mut store = MemoryStore::new();
        let account = store.create_account().unwrap();
        let err = generate_summary(&mut store, account).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(store.list_summaries().unwrap().is_empty());
    }

    #[test]
    fn test_generate_summary_wraps_store_errors() {
        let mut store = MemoryStore::new();
        store.close().unwrap();
        let err = generate_summary(&mut store, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.to_string().contains("loading transactions for account 1"));
    }

    #[test]
    fn test_backends_agree() {
        let mut memory = MemoryStore::new();
        let mut sqlite = SqliteStore::open_in_memory().unwrap();
        let stores: [&mut dyn Store; 2] = [&mut memory, &mut sqlite];

        let mut results = Vec::new();
        for store in stores {
            let account = store.create_account().unwrap();
            assert_eq!(store.get_account(account).unwrap(), Account { id: 1 });
            for mut t in scenario_two().into_iter().map(|t| Transaction { account_id: account, ..t }) {
                store.save_transaction(&mut t).unwrap();
            }
            let (summary, mut months) = generate_summary(store, account).unwrap();
            sort_by_calendar(&mut months);
            results.push((summary, months));
        }
        assert_eq!(results[0], results[1]);
    }
}
