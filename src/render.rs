use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::{CellAlignment, Table};

use crate::fmt::money;
use crate::models::{sort_by_calendar, MonthSummary, Summary};

pub const EMAIL_SUBJECT: &str = "Transaction Summary";

/// Month rows in calendar order, one column per statistic.
pub fn month_table(months: &[MonthSummary]) -> Table {
    let mut sorted = months.to_vec();
    sort_by_calendar(&mut sorted);

    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN);
    table.set_header(vec!["Month", "Transactions", "Credits", "Debits", "Balance", "Avg credit", "Avg debit"]);
    for m in &sorted {
        table.add_row(vec![
            m.month.clone(),
            m.total_transactions.to_string(),
            m.num_of_credit_transactions.to_string(),
            m.num_of_debit_transactions.to_string(),
            money(m.total_balance),
            money(m.average_credit),
            money(m.average_debit),
        ]);
    }
    for idx in 1..7 {
        if let Some(col) = table.column_mut(idx) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

/// Totals block shared by the email body and `show`.
pub fn totals_lines(summary: &Summary) -> Vec<String> {
    vec![
        format!("Total balance:   {}", money(summary.total_balance)),
        format!(
            "Transactions:    {} ({} credit, {} debit)",
            summary.total_transactions, summary.num_of_credit_transactions, summary.num_of_debit_transactions
        ),
        format!("Average credit:  {}", money(summary.total_average_credit)),
        format!("Average debit:   {}", money(summary.total_average_debit)),
    ]
}

/// Plain-text email body. Only reads its inputs.
pub fn render_email(summary: &Summary, months: &[MonthSummary]) -> String {
    let mut body = format!("Transaction summary for account {}\n\n", summary.account_id);
    for line in totals_lines(summary) {
        body.push_str(&line);
        body.push('\n');
    }
    if !months.is_empty() {
        body.push_str("\nBy month\n\n");
        body.push_str(&month_table(months).to_string());
        body.push('\n');
    }
    body
}
