mod commands;
mod error;
mod mailer;
mod server;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{
    completions, contacts, send, serve, sheets, templates, validate, Context,
};
use crate::error::{exit_code_for, report_error};
use sheetpost_config as config;

#[derive(Debug, Parser)]
#[command(
    name = "sheetpost",
    version,
    about = "Validate spreadsheet contacts and mail them certificates"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List classified contacts
    Contacts(contacts::ContactsArgs),
    /// List valid email addresses
    Emails(contacts::EmailsArgs),
    /// Report per-row data issues
    Validate(validate::ValidateArgs),
    /// Mail every eligible contact
    Send(send::SendArgs),
    /// Show a spreadsheet's title and sheet names
    Sheets(sheets::SheetsArgs),
    #[command(subcommand)]
    Templates(templates::TemplatesCommand),
    /// Serve the JSON API
    Serve(serve::ServeArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    if let Command::Completions(args) = command {
        return completions::emit(args);
    }

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
            Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
            Err(err) => debug!(error = %err, "config unavailable"),
        }
    }

    let ctx = Context {
        json,
        config: &app_config,
    };

    match command {
        Command::Contacts(args) => contacts::list_contacts(&ctx, args),
        Command::Emails(args) => contacts::list_emails(&ctx, args),
        Command::Validate(args) => validate::validate(&ctx, args),
        Command::Send(args) => send::send(&ctx, args),
        Command::Sheets(args) => sheets::show_sheets(&ctx, args),
        Command::Templates(cmd) => match cmd {
            templates::TemplatesCommand::List => templates::list_templates(&ctx),
            templates::TemplatesCommand::Show(args) => templates::show_template(&ctx, args),
        },
        Command::Serve(args) => serve::serve(&ctx, args),
        Command::Completions(_) => unreachable!("completions handled before config load"),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
