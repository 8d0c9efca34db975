use crate::commands::{run_audit, run_check, run_watch, AuditArgs, CheckArgs, WatchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use crm_accounts::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "CRM Account Intake",
    about = "Validate company names and detect duplicate accounts from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Check one company name against an accounts export
    Check(CheckArgs),
    /// Feed successive names from stdin through the debounced duplicate checker
    Watch(WatchArgs),
    /// List near-duplicate accounts in an export
    Audit(AuditArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Accounts CSV to preload into the in-memory directory
    #[arg(long)]
    pub(crate) accounts_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => run_check(args).await,
        Command::Watch(args) => run_watch(args).await,
        Command::Audit(args) => run_audit(args),
    }
}
