use crate::demo::{run_lookup, run_report, LookupArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use registry_sentinel::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Registry Sentinel",
    about = "Serve and inspect anomaly review summaries for the identity registry",
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
    /// Render the anomaly review dashboard to the terminal
    Report(ReportArgs),
    /// Search the summary table for a pincode
    Lookup(LookupArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured summary CSV path
    #[arg(long)]
    pub(crate) summary_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
        Command::Lookup(args) => run_lookup(args),
    }
}
