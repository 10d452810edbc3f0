use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
}

/// One dated movement on an account. `amount` is always a magnitude;
/// direction lives in `is_credit`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Option<i64>,
    pub account_id: i64,
    /// Id column of the source file. Not unique.
    pub external_id: i64,
    pub date: NaiveDate,
    pub amount: f64,
    pub is_credit: bool,
}

impl Transaction {
    pub fn new(account_id: i64, external_id: i64, date: NaiveDate, amount: f64, is_credit: bool) -> Self {
        Self {
            id: None,
            account_id,
            external_id,
            date,
            amount: amount.abs(),
            is_credit,
        }
    }

    pub fn signed_amount(&self) -> f64 {
        if self.is_credit {
            self.amount
        } else {
            -self.amount
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub id: Option<i64>,
    pub account_id: i64,
    pub total_balance: f64,
    pub total_transactions: i64,
    pub num_of_credit_transactions: i64,
    pub num_of_debit_transactions: i64,
    pub total_average_credit: f64,
    pub total_average_debit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub id: Option<i64>,
    pub summary_id: Option<i64>,
    /// English month name, e.g. "January".
    pub month: String,
    pub total_balance: f64,
    pub total_transactions: i64,
    pub num_of_credit_transactions: i64,
    pub num_of_debit_transactions: i64,
    pub average_credit: f64,
    pub average_debit: f64,
}

impl MonthSummary {
    /// 1-based month number, or 13 for a name chrono does not recognise.
    pub fn month_number(&self) -> u32 {
        self.month
            .parse::<chrono::Month>()
            .map(|m| m.number_from_month())
            .unwrap_or(13)
    }
}

/// Sort month summaries January first.
pub fn sort_by_calendar(months: &mut [MonthSummary]) {
    months.sort_by_key(MonthSummary::month_number);
}
