use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use csv::ByteRecord;
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::models::{PaymentMethod, Transaction, TransactionKind};

/// Canonical ledger header, in file order.
pub(crate) const COLUMNS: [&str; 7] = [
    "date",
    "type",
    "category",
    "description",
    "amount",
    "payment_method",
    "account",
];

const DATE: usize = 0;
const TYPE: usize = 1;
const CATEGORY: usize = 2;
const DESCRIPTION: usize = 3;
const AMOUNT: usize = 4;
const PAYMENT_METHOD: usize = 5;
const ACCOUNT: usize = 6;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Read the whole ledger. Columns are located by header name, so a reordered
/// file still loads; a missing column reads as empty on every row. Bytes that
/// are not valid UTF-8 are replaced rather than failing the load.
pub(crate) fn read_ledger(path: &Path) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open ledger: {}", path.display()))?;

    let headers = rdr
        .byte_headers()
        .with_context(|| format!("Failed to read ledger header: {}", path.display()))?
        .clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let positions: Vec<Option<usize>> = COLUMNS
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| String::from_utf8_lossy(h).trim() == *name)
        })
        .collect();
    for (name, _) in COLUMNS.iter().zip(&positions).filter(|(_, p)| p.is_none()) {
        warn!(column = name, path = %path.display(), "ledger is missing a column");
    }

    let mut ledger = Vec::new();
    for (i, result) in rdr.byte_records().enumerate() {
        let record = result.with_context(|| format!("Failed to read ledger row {}", i + 1))?;
        ledger.push(parse_record(i + 1, &record, &positions));
    }
    Ok(ledger)
}

/// Overwrite the ledger with `ledger`. The header is written even when empty.
pub(crate) fn write_ledger(path: &Path, ledger: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to write ledger: {}", path.display()))?;
    wtr.write_record(COLUMNS)?;
    for txn in ledger {
        wtr.write_record(to_record(txn))?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to flush ledger: {}", path.display()))?;
    Ok(())
}

fn field<'r>(record: &'r ByteRecord, positions: &[Option<usize>], column: usize) -> Cow<'r, str> {
    positions
        .get(column)
        .copied()
        .flatten()
        .and_then(|p| record.get(p))
        .map_or(Cow::Borrowed(""), String::from_utf8_lossy)
}

fn parse_record(row: usize, record: &ByteRecord, positions: &[Option<usize>]) -> Transaction {
    let raw_date = field(record, positions, DATE);
    let raw_type = field(record, positions, TYPE);
    let raw_amount = field(record, positions, AMOUNT);
    let raw_method = field(record, positions, PAYMENT_METHOD);

    let date = parse_date(&raw_date);
    if date.is_none() && !raw_date.trim().is_empty() {
        debug!(row, value = %raw_date, "unparseable date, treating as missing");
    }
    let amount = parse_amount(&raw_amount);
    if amount.is_none() && !raw_amount.trim().is_empty() {
        debug!(row, value = %raw_amount, "unparseable amount, treating as missing");
    }
    let kind = TransactionKind::parse(&raw_type);
    if kind.is_none() && !raw_type.trim().is_empty() {
        debug!(row, value = %raw_type, "unknown transaction type, treating as missing");
    }

    Transaction {
        date,
        kind,
        category: field(record, positions, CATEGORY).into_owned(),
        description: field(record, positions, DESCRIPTION).into_owned(),
        amount,
        payment_method: PaymentMethod::parse(&raw_method),
        account: field(record, positions, ACCOUNT).into_owned(),
    }
}

fn to_record(txn: &Transaction) -> [String; 7] {
    [
        txn.date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        txn.kind.map(|k| k.as_str().to_string()).unwrap_or_default(),
        txn.category.clone(),
        txn.description.clone(),
        txn.amount.map(|a| a.to_string()).unwrap_or_default(),
        txn.payment_method
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        txn.account.clone(),
    ]
}

/// Lenient date parsing; `None` marks a missing value.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in &[DATE_FORMAT, "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }
    // Timestamps keep only their calendar date
    for fmt in &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Plain or scientific decimal notation; `None` marks a missing value.
pub(crate) fn parse_amount(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

#[cfg(test)]
#[path = "ledger_csv_tests.rs"]
mod tests;
