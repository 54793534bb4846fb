mod commands;
mod lexer;
mod logging;

use clap::Parser;
use commands::Commands;

/// morsel-cli
#[derive(clap::Parser, Debug)]
pub struct Args {
    #[command(flatten)]
    pub log: logging::LogArgs,

    /// Subcommand to run.
    #[clap(subcommand)]
    pub command: Commands,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    args.log.setup_logging(3)?;

    args.command.run()
}
