//! CLI argument definitions for the subscriber register.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "abo",
    version,
    about = "Subscriber register for a small magazine",
    long_about = "Manage the subscriber database of a small magazine:\n\
                  bulk imports from spreadsheet extracts, routing-vendor and\n\
                  mailing exports, and issue bookkeeping."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the subscriber database file.
    #[arg(
        long = "db",
        value_name = "PATH",
        default_value = "abo.db",
        global = true
    )]
    pub db: PathBuf,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the database file and bring its schema up to date.
    Init,

    /// Import a tab-separated spreadsheet extract.
    Import(ImportArgs),

    /// Write the routing-vendor file for subscribers still owed issues.
    ExportRouting(RoutingArgs),

    /// Write the management CSV extract of the whole database.
    ExportCsv(ExportArgs),

    /// Write the re-subscription mailing file for lapsed subscribers.
    ExportResubscribe(ExportArgs),

    /// Write the email list of fully lapsed subscribers.
    ExportEmails(ExportArgs),

    /// Take one issue from every subscriber still owed some.
    Decrement(DecrementArgs),

    /// Print the number of subscriber records.
    Count,

    /// List subscribers on their last issue or already lapsed.
    Expiring,

    /// Search subscribers by lastname, company and/or email.
    Search(SearchArgs),

    /// Delete one subscriber by id.
    Delete(DeleteArgs),
}

#[derive(Parser)]
pub struct ImportArgs {
    /// The tab-separated file to import; its first line is a header.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// How imported rows interact with existing records.
    #[arg(long = "mode", value_enum, default_value = "append")]
    pub mode: ImportModeArg,

    /// Where to echo unparsable lines (default: <FILE> with a .bad extension).
    #[arg(long = "bad-file", value_name = "PATH")]
    pub bad_file: Option<PathBuf>,
}

#[derive(Parser)]
pub struct RoutingArgs {
    /// Destination file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Select on the special-issue counter instead of the regular one.
    #[arg(long = "special")]
    pub special: bool,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Destination file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct DecrementArgs {
    /// Decrement the special-issue counter instead of the regular one.
    #[arg(long = "special")]
    pub special: bool,
}

#[derive(Parser)]
pub struct SearchArgs {
    /// Exact lastname (case-insensitive).
    #[arg(long = "lastname")]
    pub lastname: Option<String>,

    /// Exact company name (case-insensitive).
    #[arg(long = "company")]
    pub company: Option<String>,

    /// Exact email address (case-insensitive).
    #[arg(long = "email")]
    pub email: Option<String>,
}

#[derive(Parser)]
pub struct DeleteArgs {
    /// Identifier of the record to delete.
    #[arg(value_name = "ID")]
    pub id: i64,
}

/// CLI import mode choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ImportModeArg {
    Truncate,
    Append,
    Update,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
