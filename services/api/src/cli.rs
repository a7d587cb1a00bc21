use crate::commands::{run_batch, run_diagnose, run_simulate, BatchArgs, DiagnoseArgs, SimulateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use finsight::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "FinSight",
    about = "Score business financial health and explore what-if scenarios",
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
    /// Diagnose one business from a JSON metrics file
    Diagnose(DiagnoseArgs),
    /// Apply percentage adjustments to a business and rescore it
    Simulate(SimulateArgs),
    /// Score every row of a CSV export without narration
    Batch(BatchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Diagnose(args) => run_diagnose(args).await,
        Command::Simulate(args) => run_simulate(args).await,
        Command::Batch(args) => run_batch(args),
    }
}
