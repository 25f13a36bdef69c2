//! CLI command implementations

use clap::Subcommand;
use retexto_core::EstimatorKind;

pub mod generate_config;
pub mod list;
pub mod punctuate;
pub mod run;
pub mod split;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show how text files would be fragmented
    Split(split::SplitArgs),

    /// Restore punctuation in unpunctuated transcripts
    Punctuate(punctuate::PunctuateArgs),

    /// Fragment, rewrite and reassemble a document
    Run(run::RunArgs),

    /// Validate a configuration file
    Validate(validate::ValidateArgs),

    /// Write a configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Split(args) => args.execute(),
            Commands::Punctuate(args) => args.execute(),
            Commands::Run(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::List { subcommand } => subcommand.execute(),
        }
    }
}

/// List subcommands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum ListCommands {
    /// List embedded languages
    Languages,

    /// List available output formats
    Formats,

    /// List available length estimators
    Estimators,
}

/// Length estimator selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EstimatorArg {
    /// Whitespace-separated words
    Words,
    /// Unicode scalar values
    Chars,
    /// Approximate model tokens
    Tokens,
}

impl From<EstimatorArg> for EstimatorKind {
    fn from(value: EstimatorArg) -> Self {
        match value {
            EstimatorArg::Words => EstimatorKind::Words,
            EstimatorArg::Chars => EstimatorKind::Chars,
            EstimatorArg::Tokens => EstimatorKind::Tokens,
        }
    }
}

/// Initialize logging based on verbosity level.
///
/// `RUST_LOG` takes precedence over the verbosity flags. Library events
/// emitted through `tracing` reach this logger via its `log` feature.
pub fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // A second initialization (several commands in one test binary) is a no-op
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .try_init();
}
