//! Bulk importer for subscriber lists extracted from a spreadsheet.
//!
//! The input is a UTF-8 tab-separated file whose first line is a header.
//! Every non-blank line becomes one subscriber record and is persisted on
//! its own; a malformed typed cell never rejects the line, it falls back
//! to zero, is logged, and the raw line is echoed to the bad-lines file
//! for later inspection.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use chrono::Local;
use tracing::{error, info};

use abo_format::parse_date_fr;
use abo_model::{FieldKind, Subscriber};
use abo_store::SubscriberStore;

/// How the imported rows interact with existing records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Wipe the table, then insert every row.
    Truncate,
    /// Insert every row next to the existing records.
    Append,
    /// Match rows to existing records by email address; unmatched rows
    /// are inserted.
    Update,
}

/// Outcome of an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Lines turned into a saved record.
    pub imported: u64,
    /// Lines echoed to the bad-lines file (each counted once, however
    /// many cells were malformed).
    pub bad_lines: u64,
}

// Column positions in the spreadsheet extract, 0-indexed. Cells past the
// end of a short row read as empty.
const COL_DATE: usize = 0;
const COL_ISSUES_TO_RECEIVE: usize = 1;
const COL_SUBS_BEGINNING_ISSUE: usize = 2;
const COL_HORS_SERIE1: usize = 3;
const COL_MEMBER: usize = 6;
const COL_ORDERING_TYPE: usize = 7;
const COL_BANK: usize = 8;
const COL_LASTNAME: usize = 9;
const COL_FIRSTNAME: usize = 10;
const COL_COMPANY: usize = 11;
const COL_NAME_ADDITION: usize = 12;
const COL_ADDRESS: usize = 13;
const COL_ADDRESS_ADDITION: usize = 14;
const COL_POST_CODE: usize = 15;
const COL_CITY: usize = 16;
const COL_SUBSCRIPTION_PRICE: usize = 17;
const COL_MEMBERSHIP_PRICE: usize = 18;
const COL_COMMENT: usize = 19;
const COL_EMAIL: usize = 20;
const COL_SUBSCRIBER_SINCE_ISSUE: usize = 21;
const COL_STICKER_SENT: usize = 23;

/// Imports the given file into the store, echoing unparsable lines to
/// `bad_path`.
pub fn import_file(
    store: &SubscriberStore,
    path: &Path,
    mode: ImportMode,
    bad_path: &Path,
) -> anyhow::Result<ImportSummary> {
    let file =
        File::open(path).with_context(|| format!("cannot open import file `{}`", path.display()))?;
    let bad_file = File::create(bad_path)
        .with_context(|| format!("cannot create bad-lines file `{}`", bad_path.display()))?;

    let mut importer = Importer {
        store,
        bad: BufWriter::new(bad_file),
        bad_path,
        summary: ImportSummary::default(),
        line_number: 1,
        line_echoed: false,
    };
    importer.run(BufReader::new(file), mode)?;
    importer
        .bad
        .flush()
        .with_context(|| format!("cannot write bad-lines file `{}`", bad_path.display()))?;

    info!(
        imported = importer.summary.imported,
        bad_lines = importer.summary.bad_lines,
        "import finished"
    );
    Ok(importer.summary)
}

struct Importer<'a> {
    store: &'a SubscriberStore,
    bad: BufWriter<File>,
    bad_path: &'a Path,
    summary: ImportSummary,
    line_number: u64,
    line_echoed: bool,
}

impl Importer<'_> {
    fn run(&mut self, reader: impl BufRead, mode: ImportMode) -> anyhow::Result<()> {
        if mode == ImportMode::Truncate {
            self.store.truncate()?;
        }

        let mut lines = reader.lines();
        // First line is the spreadsheet header.
        if let Some(header) = lines.next() {
            header.context("cannot read import file")?;
        }

        for line in lines {
            let line = line.context("cannot read import file")?;
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            self.import_line(&line, mode)?;
        }
        Ok(())
    }

    fn import_line(&mut self, line: &str, mode: ImportMode) -> anyhow::Result<()> {
        self.line_echoed = false;
        let cells: Vec<&str> = line.split('\t').collect();

        let mut sub = match mode {
            ImportMode::Truncate | ImportMode::Append => Subscriber::default(),
            ImportMode::Update => self.matching_subscriber(&cells)?,
        };
        self.extract(&cells, line, &mut sub);
        self.store.save(&mut sub)?;
        self.summary.imported += 1;
        Ok(())
    }

    /// Update-mode lookup: the email address is the join key. Several
    /// matches mean the database already holds duplicates; the first one
    /// (rowid order) is updated and the rest are left alone.
    fn matching_subscriber(&self, cells: &[&str]) -> anyhow::Result<Subscriber> {
        let email = cell(cells, COL_EMAIL).to_lowercase();
        if email.is_empty() {
            info!(
                line = self.line_number,
                "line has no email address, a new record will be created"
            );
            return Ok(Subscriber::default());
        }

        let matches = self.store.find_by_email(&email)?;
        if matches.len() > 1 {
            error!(
                line = self.line_number,
                email, "email address found more than once, updating the first match"
            );
        }
        Ok(matches.into_iter().next().unwrap_or_default())
    }

    fn extract(&mut self, cells: &[&str], line: &str, sub: &mut Subscriber) {
        sub.lastname = cell(cells, COL_LASTNAME).to_owned();
        sub.firstname = cell(cells, COL_FIRSTNAME).to_owned();
        sub.email = cell(cells, COL_EMAIL).to_lowercase();
        sub.company = cell(cells, COL_COMPANY).to_owned();
        sub.name_addition = cell(cells, COL_NAME_ADDITION).to_owned();
        sub.address.street = cell(cells, COL_ADDRESS).to_owned();
        sub.address.street_addition = cell(cells, COL_ADDRESS_ADDITION).to_owned();
        sub.address.post_code = self.int_field(cell(cells, COL_POST_CODE), "post_code", line);
        sub.address.city = cell(cells, COL_CITY).to_owned();

        sub.subscription_date = Some(import_date(cell(cells, COL_DATE)));
        sub.issues_to_receive =
            self.int_field(cell(cells, COL_ISSUES_TO_RECEIVE), "issues_to_receive", line);
        sub.subs_beginning_issue = self.int_field(
            cell(cells, COL_SUBS_BEGINNING_ISSUE),
            "subs_beginning_issue",
            line,
        );
        sub.subscriber_since_issue =
            self.subscriber_since(cell(cells, COL_SUBSCRIBER_SINCE_ISSUE), sub.subs_beginning_issue, line);
        sub.hors_serie1 = self.int_field(cell(cells, COL_HORS_SERIE1), "hors_serie1", line);

        sub.ordering_type = cell(cells, COL_ORDERING_TYPE).to_lowercase();
        sub.subscription_price = self.float_field(
            cell(cells, COL_SUBSCRIPTION_PRICE),
            "subscription_price",
            line,
        );
        sub.bank = cell(cells, COL_BANK).to_owned();
        sub.membership_price =
            self.float_field(cell(cells, COL_MEMBERSHIP_PRICE), "membership_price", line);

        sub.member = cell(cells, COL_MEMBER).trim().eq_ignore_ascii_case("oui");
        sub.sticker_sent = self.int_field(cell(cells, COL_STICKER_SENT), "sticker_sent", line);
        sub.comment = cell(cells, COL_COMMENT).to_owned();
    }

    /// A renewal marked `oui` starts six issues before the current
    /// subscription period.
    fn subscriber_since(&mut self, raw: &str, beginning_issue: u32, line: &str) -> u32 {
        if raw.trim().eq_ignore_ascii_case("oui") {
            beginning_issue.saturating_sub(6)
        } else {
            self.int_field(raw, "subscriber_since_issue", line)
        }
    }

    /// Unsigned-digits cells only, the same rule the edit path applies;
    /// a signed or otherwise decorated number counts as malformed.
    fn int_field(&mut self, raw: &str, field: &str, line: &str) -> u32 {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return 0;
        }
        let parsed = FieldKind::Digits
            .accepts(trimmed)
            .then(|| trimmed.parse::<u32>().ok())
            .flatten();
        match parsed {
            Some(value) => value,
            None => {
                error!(
                    line = self.line_number,
                    field, value = raw, "int expected, falling back to 0"
                );
                self.echo_bad_line(line);
                0
            }
        }
    }

    fn float_field(&mut self, raw: &str, field: &str, line: &str) -> f64 {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return 0.0;
        }
        match trimmed.replace(',', ".").parse() {
            Ok(value) => value,
            Err(_) => {
                error!(
                    line = self.line_number,
                    field, value = raw, "float expected, falling back to 0.0"
                );
                self.echo_bad_line(line);
                0.0
            }
        }
    }

    /// Writes the raw line to the bad-lines file, once per line no matter
    /// how many of its cells are malformed.
    fn echo_bad_line(&mut self, line: &str) {
        if self.line_echoed {
            return;
        }
        self.line_echoed = true;
        self.summary.bad_lines += 1;
        if let Err(err) = writeln!(self.bad, "{line}") {
            error!(
                path = %self.bad_path.display(),
                %err,
                "cannot write to the bad-lines file"
            );
        }
    }
}

fn cell<'a>(cells: &[&'a str], index: usize) -> &'a str {
    cells.get(index).copied().unwrap_or("")
}

/// Import-path date policy: anything that does not parse as a French
/// date, including an empty cell, becomes today.
fn import_date(raw: &str) -> chrono::NaiveDate {
    match parse_date_fr(raw) {
        Ok(Some(date)) => date,
        _ => Local::now().date_naive(),
    }
}
