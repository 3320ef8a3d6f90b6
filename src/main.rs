use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vigil::commands::{init, run};

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Change-detection daemon for remote collections", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a commented starter configuration file
    Init {
        /// Where to write the config (default: ./vigil.toml)
        path: Option<PathBuf>,
    },

    /// Monitor every configured watch until shutdown
    Run {
        /// Path to the configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Perform a single cycle per watch, then exit
        #[arg(long)]
        once: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => init::execute(path),
        Commands::Run { config, once } => run::execute(config, once),
    }
}
