//! Email-campaign export: one comma-joined line of lapsed subscribers'
//! addresses, lower-cased. An empty result set produces an empty file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use tracing::info;

use abo_store::SubscriberStore;

/// Writes the addresses of subscribers with neither regular nor special
/// issues left.
pub fn export(store: &SubscriberStore, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let emails: Vec<String> = store
        .lapsed_emails()?
        .iter()
        .map(|e| e.to_lowercase())
        .collect();

    let file = File::create(path)
        .with_context(|| format!("cannot create email file `{}`", path.display()))?;
    let mut out = BufWriter::new(file);

    if !emails.is_empty() {
        writeln!(out, "{}", emails.join(","))
            .with_context(|| format!("cannot write email file `{}`", path.display()))?;
    }
    out.flush()
        .with_context(|| format!("cannot write email file `{}`", path.display()))?;

    info!(addresses = emails.len(), path = %path.display(), "email file written");
    Ok(())
}
