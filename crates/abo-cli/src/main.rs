//! Subscriber register CLI.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod logging;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::logging::{LogConfig, LogFormat, init_logging};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let result = match &cli.command {
        Command::Init => commands::run_init(&cli.db),
        Command::Import(args) => commands::run_import(&cli.db, args),
        Command::ExportRouting(args) => commands::run_export_routing(&cli.db, args),
        Command::ExportCsv(args) => commands::run_export_csv(&cli.db, &args.file),
        Command::ExportResubscribe(args) => commands::run_export_resubscribe(&cli.db, &args.file),
        Command::ExportEmails(args) => commands::run_export_emails(&cli.db, &args.file),
        Command::Decrement(args) => commands::run_decrement(&cli.db, args),
        Command::Count => commands::run_count(&cli.db),
        Command::Expiring => commands::run_expiring(&cli.db),
        Command::Search(args) => commands::run_search(&cli.db, args),
        Command::Delete(args) => commands::run_delete(&cli.db, args),
    };

    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
