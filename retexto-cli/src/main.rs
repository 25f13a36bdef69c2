//! `retexto` command-line entry point

use clap::Parser;
use retexto_cli::commands::Commands;
use retexto_cli::CliResult;

/// Split long texts into overlapping fragments, rewrite them and put them
/// back together
#[derive(Debug, Parser)]
#[command(name = "retexto", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    cli.command.execute()
}
