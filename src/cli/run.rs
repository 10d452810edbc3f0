use std::path::Path;

use tracing::info;

use super::summarize::print_summary;
use super::Context;
use crate::aggregate::generate_summary;
use crate::error::Result;
use crate::importer::import_file;
use crate::notify::{Message, Notifier, OutboxNotifier, StdoutNotifier};
use crate::render::{render_email, EMAIL_SUBJECT};
use crate::store::{MemoryStore, Store};

pub fn run(ctx: &Context, file: &Path, email_to: &[String], in_memory: bool, stdout: bool) -> Result<()> {
    // Bad addresses fail before anything is written.
    let mut message = Message::new(&ctx.settings.email_from, email_to, EMAIL_SUBJECT, String::new())?;

    let mut store: Box<dyn Store> = if in_memory {
        Box::new(MemoryStore::new())
    } else {
        Box::new(ctx.open_store()?)
    };

    let account = store.create_account()?;
    info!(account_id = account, "new account");
    let imported = import_file(store.as_mut(), file, account, ctx.settings.reference_year)?;
    let (summary, months) = generate_summary(store.as_mut(), account)?;
    store.close()?;

    message.body = render_email(&summary, &months);
    if stdout {
        StdoutNotifier.send(&message)?;
        return Ok(());
    }

    let outbox = OutboxNotifier::new(ctx.outbox_path());
    outbox.send(&message)?;
    println!("Account {account}: {imported} transactions imported");
    print_summary(&summary, &months);
    println!();
    println!("Summary email for {} written to {}", email_to.join(", "), outbox.dir().display());
    Ok(())
}
