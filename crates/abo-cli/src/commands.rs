//! One function per subcommand. Each opens the store, performs its
//! operation and prints a short human-readable result to stdout.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use tracing::info;

use abo_export::{csv, email, resubscribe, routing};
use abo_import::{ImportMode, import_file};
use abo_model::{FieldKey, Subscriber, to_fields};
use abo_store::SubscriberStore;

use crate::cli::{DecrementArgs, DeleteArgs, ImportArgs, ImportModeArg, RoutingArgs, SearchArgs};

fn open_store(db: &Path) -> Result<SubscriberStore> {
    SubscriberStore::open(db).with_context(|| format!("cannot open database `{}`", db.display()))
}

pub fn run_init(db: &Path) -> Result<()> {
    open_store(db)?;
    println!("Database ready at {}", db.display());
    Ok(())
}

pub fn run_import(db: &Path, args: &ImportArgs) -> Result<()> {
    let store = open_store(db)?;
    let mode = match args.mode {
        ImportModeArg::Truncate => ImportMode::Truncate,
        ImportModeArg::Append => ImportMode::Append,
        ImportModeArg::Update => ImportMode::Update,
    };
    let bad_file = args
        .bad_file
        .clone()
        .unwrap_or_else(|| args.file.with_extension("bad"));

    let summary = import_file(&store, &args.file, mode, &bad_file)?;
    println!("{} lines imported", summary.imported);
    if summary.bad_lines > 0 {
        println!(
            "{} lines had unreadable fields, see {}",
            summary.bad_lines,
            bad_file.display()
        );
    }
    Ok(())
}

pub fn run_export_routing(db: &Path, args: &RoutingArgs) -> Result<()> {
    let store = open_store(db)?;
    if args.special {
        routing::export_special(&store, &args.file)?;
    } else {
        routing::export(&store, &args.file)?;
    }
    println!("Routing file written to {}", args.file.display());
    Ok(())
}

pub fn run_export_csv(db: &Path, file: &Path) -> Result<()> {
    let store = open_store(db)?;
    csv::export(&store, file)?;
    println!("CSV file written to {}", file.display());
    Ok(())
}

pub fn run_export_resubscribe(db: &Path, file: &Path) -> Result<()> {
    let store = open_store(db)?;
    resubscribe::export(&store, file)?;
    println!("Mailing file written to {}", file.display());
    Ok(())
}

pub fn run_export_emails(db: &Path, file: &Path) -> Result<()> {
    let store = open_store(db)?;
    email::export(&store, file)?;
    println!("Email list written to {}", file.display());
    Ok(())
}

pub fn run_decrement(db: &Path, args: &DecrementArgs) -> Result<()> {
    let store = open_store(db)?;
    let touched = if args.special {
        store.decrement_special_issues()?
    } else {
        store.decrement_issues_to_receive()?
    };
    info!(touched, special = args.special, "issue counters decremented");
    println!("{touched} subscribers decremented");
    Ok(())
}

pub fn run_count(db: &Path) -> Result<()> {
    let store = open_store(db)?;
    println!("{}", store.count()?);
    Ok(())
}

pub fn run_expiring(db: &Path) -> Result<()> {
    let store = open_store(db)?;
    let found = store.find_expiring()?;
    if found.is_empty() {
        println!("No subscription about to end");
        return Ok(());
    }
    print_subscriber_table(&found);
    Ok(())
}

pub fn run_search(db: &Path, args: &SearchArgs) -> Result<()> {
    let store = open_store(db)?;
    let found = store.search(
        args.lastname.as_deref(),
        args.company.as_deref(),
        args.email.as_deref(),
    )?;

    if found.is_empty() {
        println!("No subscriber found");
        return Ok(());
    }
    print_subscriber_table(&found);
    Ok(())
}

pub fn run_delete(db: &Path, args: &DeleteArgs) -> Result<()> {
    let store = open_store(db)?;
    store.delete(args.id)?;
    println!("Subscriber {} deleted", args.id);
    Ok(())
}

// Columns shown by `search` and `expiring`, headed by their French labels.
const TABLE_COLUMNS: [FieldKey; 7] = [
    FieldKey::SubscriberId,
    FieldKey::Lastname,
    FieldKey::Firstname,
    FieldKey::Company,
    FieldKey::EmailAddress,
    FieldKey::IssuesToReceive,
    FieldKey::HorsSerie1,
];

fn print_subscriber_table(subs: &[Subscriber]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    table.set_header(TABLE_COLUMNS.map(FieldKey::label));
    for sub in subs {
        let fields = to_fields(sub);
        table.add_row(TABLE_COLUMNS.map(|f| fields.get(f.key()).cloned().unwrap_or_default()));
    }
    println!("{table}");
}
