//! Label Index CLI
//!
//! Loads series from a JSON-lines file into an in-memory index and answers
//! one query against it:
//! - Lookup fingerprints for a selector
//! - List label names or label values
//! - Show index statistics

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use label_index::config::generate_default_config;
use label_index::{parse_selector, Config, InvertedIndex, SeriesRecord, ShardAnnotation};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "label-index")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query an in-memory label index built from a series file")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find fingerprints matching a selector
    Query {
        /// JSON-lines series file
        #[arg(short, long)]
        series: PathBuf,
        /// Selector, e.g. 'http_requests{method=~"GET|POST"}'
        selector: String,
        /// Query shard in <shard>_of_<total> form
        #[arg(long)]
        shard: Option<ShardAnnotation>,
    },

    /// List label names
    LabelNames {
        #[arg(short, long)]
        series: PathBuf,
        #[arg(long)]
        shard: Option<ShardAnnotation>,
    },

    /// List values of one label
    LabelValues {
        #[arg(short, long)]
        series: PathBuf,
        /// Label name
        name: String,
        #[arg(long)]
        shard: Option<ShardAnnotation>,
    },

    /// Show index statistics
    Stats {
        #[arg(short, long)]
        series: PathBuf,
    },

    /// Print a default config file
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // config loading logs before the configured subscriber exists
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || match &cli.config {
        Some(path) => Config::load_with_env(path),
        None => Ok(Config::load_default()),
    })?;
    init_logging(&config);

    match cli.command {
        Commands::Query {
            series,
            selector,
            shard,
        } => {
            let index = load_index(&config, &series)?;
            let matchers = parse_selector(&selector)?;
            let mut fps = index.lookup(&matchers, shard)?;
            fps.sort_unstable();
            println!("{}", serde_json::to_string_pretty(&fps)?);
        }
        Commands::LabelNames { series, shard } => {
            let index = load_index(&config, &series)?;
            let names = index.label_names(shard)?;
            println!("{}", serde_json::to_string_pretty(&names)?);
        }
        Commands::LabelValues {
            series,
            name,
            shard,
        } => {
            let index = load_index(&config, &series)?;
            let values = index.label_values(&name, shard)?;
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        Commands::Stats { series } => {
            let index = load_index(&config, &series)?;
            println!("{}", serde_json::to_string_pretty(&index.stats())?);
        }
        Commands::InitConfig => {
            print!("{}", generate_default_config());
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    // logs go to stderr so stdout stays valid JSON
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Build an index from a JSON-lines series file, skipping blank lines
fn load_index(config: &Config, path: &Path) -> Result<InvertedIndex> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let index = InvertedIndex::from_config(&config.index);

    let mut loaded = 0usize;
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {:?}", path))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: SeriesRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => bail!("{:?} line {}: {}", path, line_no + 1, e),
        };
        index.add(&record.labels, record.fingerprint);
        loaded += 1;
    }

    tracing::info!(series = loaded, shards = index.total_shards(), "Loaded series from {:?}", path);
    Ok(index)
}
