//! Rockets CLI - Query launch history from a fixture
//!
//! Usage:
//!   rockets --fixture data.json most-launched -k 3
//!   rockets --fixture data.json most-recent -k 5
//!   rockets --fixture data.json most-expensive -k 5
//!   rockets --fixture data.json busiest --year 2017 --month 4 -k 2
//!   rockets --fixture data.json most-unreliable -k 3
//!   rockets --config rockets.json --json planned -k 2
//!
//! ## Wiring
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  main.rs (this file) - Dependency Injection & Wiring            │
//! │    │                                                            │
//! │    ├── Reads:   AppConfig (optional JSON file)                  │
//! │    ├── Creates: InMemoryRepository (adapter)                    │
//! │    ├── Loads:   FixtureLoader into the repository               │
//! │    └── Runs:    RocketMiner query (domain service)              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rockets_adapter::fixture::FixtureLoader;
use rockets_adapter::repository::InMemoryRepository;
use rockets_domain::service::rocket_miner::RocketMiner;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::Query;
use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "rockets")]
#[command(about = "Ranked queries over rockets, launches and launch service providers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    query: Query,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Fixture document to load (overrides the config file)
    #[arg(short, long, global = true)]
    fixture: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let fixture = cli
        .fixture
        .or(config.fixture)
        .context("no fixture given; pass --fixture or set \"fixture\" in the config file")?;

    let repo = InMemoryRepository::new();
    let summary = FixtureLoader::from_file(&fixture)?
        .load_into(&repo)
        .with_context(|| format!("failed to load fixture {}", fixture.display()))?;
    info!(
        fixture = %fixture.display(),
        rockets = summary.rockets,
        launches = summary.launches,
        "Repository ready"
    );

    let miner = RocketMiner::new(repo);
    let report = cli.query.run(&miner, config.default_k)?;
    if report.is_empty() {
        info!("No results");
    }

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        for line in report.to_lines() {
            println!("{}", line);
        }
    }
    Ok(())
}
