//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;

/// Checks for available vaccination slots via Co-WIN API
#[derive(Debug, Parser)]
#[command(name = "cowin-cowboy", version)]
pub(crate) struct Args {
    /// Set logging verbosity (defaults to ERROR)
    #[arg(short, long, default_value = "ERROR")]
    pub(crate) log: String,

    /// Path to custom config file
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,
}
