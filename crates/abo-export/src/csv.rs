//! Management CSV export: the whole table, semicolon-separated, CRLF.
//!
//! The date column is rebuilt from the stored ISO text by token reversal
//! only, so an out-of-calendar stored value still prints as its own
//! digits instead of the read-boundary fallback.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use tracing::info;

use abo_format::naive_iso_to_fr;
use abo_store::{CsvExportRow, SubscriberStore};

const SEPARATOR: &str = ";";
const EOL: &str = "\r\n";

const HEADER: [&str; 8] = [
    "nom",
    "société",
    "ville/pays",
    "numeros à recevoir",
    "HS à recevoir",
    "prix abonnement",
    "prix cottisation",
    "date abonnement",
];

/// Writes every subscriber to a management spreadsheet extract.
pub fn export(store: &SubscriberStore, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let rows = store.csv_rows()?;

    let file = File::create(path)
        .with_context(|| format!("cannot create CSV file `{}`", path.display()))?;
    let mut out = BufWriter::new(file);

    write_line(&mut out, &HEADER.map(String::from), path)?;
    for row in &rows {
        write_line(&mut out, &row_fields(row), path)?;
    }
    out.flush()
        .with_context(|| format!("cannot write CSV file `{}`", path.display()))?;

    info!(lines = rows.len(), path = %path.display(), "CSV file written");
    Ok(())
}

fn write_line(out: &mut impl Write, fields: &[String], path: &Path) -> anyhow::Result<()> {
    write!(out, "{}{EOL}", fields.join(SEPARATOR))
        .with_context(|| format!("cannot write CSV file `{}`", path.display()))
}

fn row_fields(row: &CsvExportRow) -> Vec<String> {
    vec![
        format!("{} {}", row.firstname, row.lastname),
        row.company.clone(),
        row.city.clone(),
        row.issues_to_receive.to_string(),
        row.hors_serie1.to_string(),
        dot_decimal(row.subscription_price),
        dot_decimal(row.membership_price),
        row.subscription_date
            .as_deref()
            .map(naive_iso_to_fr)
            .unwrap_or_default(),
    ]
}

/// Prints a price the way a plain float display would: always at least
/// one decimal digit, never a comma (`20.0`, `37.2`).
fn dot_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
