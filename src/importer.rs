use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{Result, ResultExt, SummaryError};
use crate::models::Transaction;
use crate::store::Store;

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// `month/day` in the given year. One or two digits per part.
pub fn parse_date_md(raw: &str, year: i32) -> Option<NaiveDate> {
    let (m, d) = raw.trim().split_once('/')?;
    let m: u32 = m.trim().parse().ok()?;
    let d: u32 = d.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, m, d)
}

/// Returns `(magnitude, is_credit)`. Only a leading `+` makes a credit.
pub fn parse_amount(raw: &str) -> Option<(f64, bool)> {
    let s = raw.trim();
    let (digits, is_credit) = match s.as_bytes().first()? {
        b'+' => (&s[1..], true),
        b'-' => (&s[1..], false),
        _ => (s, false),
    };
    if digits.starts_with(['+', '-']) {
        return None;
    }
    let value: f64 = digits.parse().ok()?;
    value.is_finite().then_some((value, is_credit))
}

fn parse_error(line: u64, field: &str, raw: &str) -> SummaryError {
    SummaryError::Parse(format!("line {line}: invalid {field} {raw:?}"))
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Read `Id,Date,Transaction` rows (header first) and save each under
/// `account_id`. Stops at the first bad row; rows before it stay saved.
pub fn import_reader<S, R>(store: &mut S, reader: R, account_id: i64, reference_year: i32) -> Result<usize>
where
    S: Store + ?Sized,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut saved = 0usize;
    for result in rdr.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        // An unquoted `+1,000.50` arrives as four fields.
        if record.len() != 3 {
            return Err(SummaryError::Parse(format!(
                "line {line}: expected 3 fields, found {}",
                record.len()
            )));
        }

        let external_id: i64 = record[0]
            .parse()
            .map_err(|_| parse_error(line, "id", &record[0]))?;
        let date = parse_date_md(&record[1], reference_year)
            .ok_or_else(|| parse_error(line, "date", &record[1]))?;
        let (amount, is_credit) =
            parse_amount(&record[2]).ok_or_else(|| parse_error(line, "amount", &record[2]))?;

        let mut txn = Transaction::new(account_id, external_id, date, amount, is_credit);
        store
            .save_transaction(&mut txn)
            .with_context(|| format!("saving transaction {external_id} (line {line})"))?;
        debug!(external_id, %date, amount, is_credit, "saved transaction");
        saved += 1;
    }
    Ok(saved)
}

pub fn import_file<S: Store + ?Sized>(
    store: &mut S,
    file_path: &Path,
    account_id: i64,
    reference_year: i32,
) -> Result<usize> {
    let file = std::fs::File::open(file_path)
        .with_context(|| format!("opening {}", file_path.display()))?;
    let saved = import_reader(store, std::io::BufReader::new(file), account_id, reference_year)
        .with_context(|| format!("importing {}", file_path.display()))?;
    info!(account_id, saved, file = %file_path.display(), "imported transactions");
    Ok(saved)
}
