use super::Context;
use crate::error::{ErrorKind, Result};
use crate::store::Store;

pub fn create(ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let id = store.create_account()?;
    store.close()?;
    println!("Created account {id}");
    Ok(())
}

pub fn show(ctx: &Context, id: i64) -> Result<()> {
    let store = ctx.open_store()?;
    let account = store.get_account(id)?;
    let transactions = store.get_transactions_by_account(account.id)?;

    println!("Account:       {}", account.id);
    println!("Transactions:  {}", transactions.len());
    match store.get_summary_by_account(account.id) {
        Ok(summary) => println!("Last summary:  #{}", summary.id.unwrap_or_default()),
        Err(e) if e.kind() == ErrorKind::NotFound => println!("Last summary:  (none)"),
        Err(e) => return Err(e),
    }
    Ok(())
}
