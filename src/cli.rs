use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;

use commands::{check, precompute, serve};

#[derive(Parser)]
#[command(name = "natality")]
#[command(about = "Monthly births analytics service with CLI tools and web server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Path to the monthly births CSV file
        #[arg(short, long, env = "DATA_PATH", default_value = "monthly-region-data.csv")]
        data_path: PathBuf,

        /// Optional precomputed aggregate bundle used to warm the cache
        ///
        /// Produce one with the `precompute` subcommand. Ignored when the
        /// bundle is older than the source file.
        #[arg(long, env = "BUNDLE_PATH")]
        bundle_path: Option<PathBuf>,

        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
        #[arg(short, long, env = "BIND_ADDRESS", default_value = "0.0.0.0:3000")]
        bind_address: String,
    },
    /// Compute the unfiltered aggregates and write them as a JSON bundle
    Precompute {
        /// Path to the monthly births CSV file
        #[arg(short, long, env = "DATA_PATH", default_value = "monthly-region-data.csv")]
        data_path: PathBuf,

        /// Where to write the bundle
        #[arg(short, long, default_value = "natality-bundle.json")]
        output: PathBuf,
    },
    /// Load the CSV file and report its quality without serving
    Check {
        /// Path to the monthly births CSV file
        #[arg(short, long, env = "DATA_PATH", default_value = "monthly-region-data.csv")]
        data_path: PathBuf,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve { data_path, bundle_path, bind_address } => {
                serve(&data_path, bundle_path.as_deref(), &bind_address).await?;
            }
            Commands::Precompute { data_path, output } => {
                precompute(&data_path, &output)?;
            }
            Commands::Check { data_path } => {
                check(&data_path)?;
            }
        }
        Ok(())
    }
}
