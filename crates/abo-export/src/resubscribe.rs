//! Re-subscription mailing export: lapsed subscribers as a semicolon CSV
//! for the mail-merge campaign.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use tracing::info;

use abo_model::Subscriber;
use abo_store::SubscriberStore;

const HEADER: &str = "Destinataire;Adresse;Complement Adresse;Code Postal;Ville / Pays";

/// Writes the mailing file for subscribers whose subscription ran out.
pub fn export(store: &SubscriberStore, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let rows = store.find_lapsed()?;

    let file = File::create(path)
        .with_context(|| format!("cannot create mailing file `{}`", path.display()))?;
    let mut out = BufWriter::new(file);

    let write_err = || format!("cannot write mailing file `{}`", path.display());
    writeln!(out, "{HEADER}").with_context(write_err)?;
    for sub in &rows {
        let line = [
            recipient(sub),
            sub.address.street.to_uppercase(),
            sub.address.street_addition.to_uppercase(),
            plain_postcode(sub.address.post_code),
            sub.address.city.to_uppercase(),
        ];
        writeln!(out, "{}", line.join(";")).with_context(write_err)?;
    }
    out.flush().with_context(write_err)?;

    info!(lines = rows.len(), path = %path.display(), "mailing file written");
    Ok(())
}

/// Builds the envelope recipient. A private person gets their own name, a
/// company without a contact name gets the company alone, and a company
/// with a contact gets the `POUR` form.
fn recipient(sub: &Subscriber) -> String {
    let firstname = sub.firstname.to_uppercase();
    let lastname = sub.lastname.to_uppercase();
    let company = sub.company.to_uppercase();

    if company.is_empty() {
        format!("{firstname} {lastname}").trim().to_owned()
    } else if lastname.is_empty() {
        company
    } else {
        format!("{company}, POUR {firstname} {lastname}")
    }
}

/// Unlike the routing file, the mailing postcode is not zero-padded.
fn plain_postcode(post_code: u32) -> String {
    if post_code == 0 {
        String::new()
    } else {
        post_code.to_string()
    }
}
