//! propmap command line
//!
//! Usage:
//!   propmap inspect app.properties --root Customer
//!   propmap demo --config propmap.toml

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use propmap::{Properties, PropmapConfig};
use propmap_cli::{demo, inspect};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "propmap")]
#[command(about = "Inspect properties files and run the object mapping demo")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Group the records of a properties file by root and instance
    Inspect {
        /// Properties file to read
        file: PathBuf,

        /// Only inspect keys under this root
        #[arg(long)]
        root: Option<String>,
    },
    /// Marshal demo objects, read them back and print the document
    Demo {
        /// TOML file with a [marshaller] table
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match args.command {
        Command::Inspect { file, root } => {
            let reader = File::open(&file)
                .with_context(|| format!("failed to open {}", file.display()))?;
            let properties = Properties::load(BufReader::new(reader))
                .with_context(|| format!("failed to parse {}", file.display()))?;
            info!("Loaded {} records from {:?}", properties.len(), file);

            let report = inspect(&properties, root.as_deref());
            print!("{report}");
            if !report.malformed.is_empty() {
                warn!("{} keys do not match root.instance.field", report.malformed.len());
            }
        }
        Command::Demo { config } => {
            let config = match config {
                Some(path) => PropmapConfig::load_from(&path)?,
                None => PropmapConfig::default(),
            };
            print!("{}", demo(config)?);
        }
    }
    Ok(())
}
