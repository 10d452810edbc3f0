use colored::Colorize;

use super::Context;
use crate::aggregate::generate_summary;
use crate::error::Result;
use crate::fmt::money;
use crate::models::{MonthSummary, Summary};
use crate::render::{month_table, totals_lines};
use crate::store::Store;

pub(crate) fn print_summary(summary: &Summary, months: &[MonthSummary]) {
    let title = format!("Account {} summary", summary.account_id);
    println!("{}", title.bold());
    let mut lines = totals_lines(summary).into_iter();
    if let Some(balance_line) = lines.next() {
        let amount = money(summary.total_balance);
        let colored = if summary.total_balance >= 0.0 {
            amount.as_str().green().bold()
        } else {
            amount.as_str().red().bold()
        };
        println!("{}", balance_line.replace(&amount, &colored.to_string()));
    }
    for line in lines {
        println!("{line}");
    }
    if !months.is_empty() {
        println!();
        println!("{}", month_table(months));
    }
}

pub fn summarize(ctx: &Context, account: i64) -> Result<()> {
    let mut store = ctx.open_store()?;
    let (summary, months) = generate_summary(&mut store, account)?;
    store.close()?;
    print_summary(&summary, &months);
    Ok(())
}

pub fn show(ctx: &Context, account: i64) -> Result<()> {
    let store = ctx.open_store()?;
    let summary = store.get_summary_by_account(account)?;
    let months = match summary.id {
        Some(id) => store.get_month_summaries_by_summary(id)?,
        None => Vec::new(),
    };
    print_summary(&summary, &months);
    Ok(())
}
