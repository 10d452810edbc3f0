use std::path::Path;

use super::Context;
use crate::error::Result;
use crate::importer::import_file;
use crate::store::Store;

pub fn run(ctx: &Context, file: &Path, account: i64) -> Result<()> {
    let mut store = ctx.open_store()?;
    store.get_account(account)?;
    let imported = import_file(&mut store, file, account, ctx.settings.reference_year)?;
    store.close()?;
    println!("{imported} transactions imported into account {account}");
    Ok(())
}
