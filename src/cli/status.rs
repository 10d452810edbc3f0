use super::Context;
use crate::error::{Result, ResultExt};
use crate::settings::settings_path;
use crate::store::{SqliteStore, Store};

pub fn run(ctx: &Context) -> Result<()> {
    let db_path = ctx.db_path();
    println!("Settings:   {}", settings_path().display());
    println!("Database:   {}", db_path.display());
    println!("Outbox:     {}", ctx.outbox_path().display());
    println!("Ref. year:  {}", ctx.settings.reference_year);

    if !db_path.exists() {
        println!();
        println!("Database not found. Run `txsummary init` to set up.");
        return Ok(());
    }

    let mut store = SqliteStore::open(&db_path).context("opening database")?;
    let transactions = store.list_transactions()?;
    let summaries = store.list_summaries()?;
    let months = store.list_month_summaries()?;
    let mut accounts: Vec<i64> = transactions.iter().map(|t| t.account_id).collect();
    accounts.sort_unstable();
    accounts.dedup();
    store.close()?;

    println!();
    println!("Accounts with data:  {}", accounts.len());
    println!("Transactions:        {}", transactions.len());
    println!("Summaries:           {}", summaries.len());
    println!("Month summaries:     {}", months.len());
    Ok(())
}
