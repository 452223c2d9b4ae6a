#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod command;

use command::{
    CommandStrategy, CompleteInput, CompleteStrategy, DecomposeStrategy, ExtractInput,
    ExtractStrategy, InfoStrategy, InitStrategy, ModelsStrategy, ParseStrategy, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "addrkit")]
#[command(about = "Chinese postal address extraction", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/addrkit/config.json
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a structured address; reads one input per line from stdin
    /// when no text is given
    Extract {
        text: Option<String>,

        /// Model to use
        #[arg(short = 'M', long)]
        model: Option<String>,

        /// Extraction schema forwarded to the backend, as JSON
        #[arg(short, long)]
        schema: Option<String>,

        /// Skip region completion
        #[arg(long)]
        no_complete: bool,
    },
    /// Split text into province, city, district, street and detail
    Parse { text: String },
    /// Split text into person name, phone and address
    Decompose { text: String },
    /// Validate and complete region fields against the region table
    Complete {
        #[arg(long, default_value = "")]
        province: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        district: String,
        #[arg(long, default_value = "")]
        street: String,
    },
    /// List configured models
    Models,
    /// Initialize configuration
    Init,
    /// Show configuration and connectivity
    Info,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    match cli.command {
        Commands::Extract {
            text,
            model,
            schema,
            no_complete,
        } => {
            ExtractStrategy
                .execute(ExtractInput {
                    config,
                    text,
                    model,
                    schema,
                    complete: !no_complete,
                })
                .await?;
        }
        Commands::Parse { text } => {
            ParseStrategy.execute(text).await?;
        }
        Commands::Decompose { text } => {
            DecomposeStrategy.execute(text).await?;
        }
        Commands::Complete {
            province,
            city,
            district,
            street,
        } => {
            CompleteStrategy
                .execute(CompleteInput {
                    config,
                    province,
                    city,
                    district,
                    street,
                })
                .await?;
        }
        Commands::Models => {
            ModelsStrategy.execute(config).await?;
        }
        Commands::Init => {
            InitStrategy.execute(config).await?;
        }
        Commands::Info => {
            InfoStrategy.execute(config).await?;
        }
        Commands::Version => {
            VersionStrategy.execute(()).await?;
        }
    }

    Ok(())
}
