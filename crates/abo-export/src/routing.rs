//! Routing-vendor export: one tab-separated ASCII line per subscriber
//! still owed issues.
//!
//! The vendor's template has 16 columns: two empty lead columns, the
//! folded name and address fields in fixed widths, then six empty
//! trailing columns. The three address slots hold name addition, street
//! and street addition; when any of them overflows its 32-character slot
//! the whole address is repacked word by word across the three slots.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use tracing::info;

use abo_format::{SLOT_WIDTH, fold, fold_and_truncate, format_postcode, repack};
use abo_model::Subscriber;
use abo_store::SubscriberStore;

const LEFT_PADDING: usize = 2;
const RIGHT_PADDING: usize = 6;

/// Exports subscribers with regular issues left to receive.
pub fn export(store: &SubscriberStore, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let rows = store.find_receiving_regular()?;
    write_file(&rows, path.as_ref(), "regular")
}

/// Exports subscribers with special issues left to receive.
pub fn export_special(store: &SubscriberStore, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let rows = store.find_receiving_special()?;
    write_file(&rows, path.as_ref(), "special")
}

fn write_file(rows: &[Subscriber], path: &Path, kind: &str) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create routing file `{}`", path.display()))?;
    let mut out = BufWriter::new(file);

    for sub in rows {
        let line = output_line(sub);
        writeln!(out, "{}", line.join("\t"))
            .with_context(|| format!("cannot write routing file `{}`", path.display()))?;
    }
    out.flush()
        .with_context(|| format!("cannot write routing file `{}`", path.display()))?;

    info!(kind, lines = rows.len(), path = %path.display(), "routing file written");
    Ok(())
}

fn output_line(sub: &Subscriber) -> Vec<String> {
    let (slot1, slot2, slot3) = address_slots(sub);

    let mut line = Vec::with_capacity(16);
    line.extend(std::iter::repeat_n(String::new(), LEFT_PADDING));
    line.push(fold_and_truncate(&sub.lastname, 32));
    line.push(fold_and_truncate(&sub.firstname, 20));
    line.push(fold_and_truncate(&sub.company, 32));
    line.push(slot1);
    line.push(slot2);
    line.push(slot3);
    line.push(format_postcode(sub.address.post_code));
    line.push(fold_and_truncate(&sub.address.city, 26));
    line.extend(std::iter::repeat_n(String::new(), RIGHT_PADDING));
    line
}

/// The three 32-character address slots. When every folded field already
/// fits its slot the fields map one to one; otherwise the name addition
/// rides along with the street and the whole address is repacked.
fn address_slots(sub: &Subscriber) -> (String, String, String) {
    let name_addition = fold(&sub.name_addition);
    let street = fold(&sub.address.street);
    let street_addition = fold(&sub.address.street_addition);

    if name_addition.len() <= SLOT_WIDTH
        && street.len() <= SLOT_WIDTH
        && street_addition.len() <= SLOT_WIDTH
    {
        return (name_addition, street, street_addition);
    }

    let line1 = format!("{} {}", sub.name_addition, sub.address.street);
    repack(&line1, &sub.address.street_addition)
}
