//! randomsys - quantum random numbers from the command line
//!
//! Draws values from the ANU quantum random number service (or a seeded
//! pseudo-random simulation) and prints them one per line.
//!
//! # Commands
//!
//! - `randomsys raw` / `bits` / `reals` / `ints` - uniform draws
//! - `randomsys seed` - a large integer from random decimal digits
//! - `randomsys gauss` - normal variates
//! - `randomsys index <end>` - uniform integer in [0, end] of any size
//! - `randomsys pick` / `shuffle` - selection from a list of items
//! - `randomsys check` - chi-square and Gaussian self-test
//! - `randomsys walk` - digit-angle walk as CSV
//!
//! # Configuration
//!
//! Defaults < `--config` TOML file < `RANDOMSYS_*` environment < flags.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use quantum_core::walk::WalkMode;
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use commands::walk::WalkOptions;
use config::{build_config, CliArgs};

/// Quantum random number CLI
#[derive(Parser)]
#[command(name = "randomsys")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Raw source: authentic or pseudo
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// Seed for the pseudo source
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Raw samples fetched per batch
    #[arg(long, global = true)]
    batch_length: Option<usize>,

    /// Fail instead of switching to pseudo simulation
    #[arg(long, global = true)]
    no_fallback: bool,

    /// Give up after this many consecutive rejections
    #[arg(long, global = true)]
    max_rejections: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Raw 16-bit samples
    Raw {
        /// Number of samples
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },

    /// Coin flips as 0/1
    Bits {
        /// Number of flips
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },

    /// Uniform reals in [0, endpoint)
    Reals {
        /// Number of values
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// Exclusive upper bound
        #[arg(short, long, default_value = "1.0")]
        endpoint: f64,
    },

    /// Uniform integers in [0, max]
    Ints {
        /// Number of values
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// Inclusive upper bound
        #[arg(short, long, default_value = "9")]
        max: u16,
    },

    /// Large integer from random decimal digits
    Seed {
        /// Number of digits
        #[arg(short, long, default_value = "19")]
        digits: usize,
    },

    /// Normal variates
    Gauss {
        /// Number of values
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// Mean
        #[arg(short, long, default_value = "0.0", allow_negative_numbers = true)]
        mean: f64,

        /// Standard deviation
        #[arg(long, default_value = "1.0")]
        sdev: f64,
    },

    /// Uniform integer in [0, end] for an arbitrarily large end
    Index {
        /// Inclusive upper bound, in decimal
        end: String,

        /// Number of values
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Pick items at random
    Pick {
        /// Number of items to pick
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Allow the same item more than once
        #[arg(short, long)]
        replace: bool,

        /// Items to choose from
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Random permutation of the items
    Shuffle {
        /// Items to permute
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Statistical self-test of the configured source
    Check {
        /// Observations per test
        #[arg(short = 'n', long, default_value = "2040")]
        observations: usize,
    },

    /// Digit-angle walk printed as CSV
    Walk {
        /// Read digits from this file instead of drawing them
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Direction mapping: circle or east
        #[arg(short, long, default_value = "circle")]
        mode: WalkMode,

        /// Segment length
        #[arg(long, default_value = "4.0")]
        step: f64,

        /// Maximum number of digits
        #[arg(short = 'n', long, default_value = "10000")]
        iterations: usize,
    },
}

impl Cli {
    fn config_args(&self) -> CliArgs {
        let log_level = match (&self.log_level, self.verbose) {
            (Some(level), _) => Some(level.clone()),
            (None, true) => Some("debug".to_string()),
            (None, false) => None,
        };
        CliArgs {
            config_file: self.config.clone(),
            source: self.source.clone(),
            batch_length: self.batch_length,
            seed: self.seed,
            no_fallback: self.no_fallback,
            max_rejections: self.max_rejections,
            log_level,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli.config_args()).context("invalid configuration")?;

    // RUST_LOG directives are layered over the configured level
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(config.log_level).into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    debug!(?config, "configuration loaded");

    let mut sampler = commands::build_sampler(&config).context("failed to build raw source")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Raw { count } => commands::draw::raw(&mut sampler, count, &mut out)?,
        Commands::Bits { count } => commands::draw::bits(&mut sampler, count, &mut out)?,
        Commands::Reals { count, endpoint } => {
            commands::draw::reals(&mut sampler, count, endpoint, &mut out)?
        }
        Commands::Ints { count, max } => commands::draw::ints(&mut sampler, count, max, &mut out)?,
        Commands::Seed { digits } => commands::draw::seed(&mut sampler, digits, &mut out)?,
        Commands::Gauss { count, mean, sdev } => {
            commands::draw::gauss(&mut sampler, count, mean, sdev, &mut out)?
        }
        Commands::Index { end, count } => {
            commands::draw::index(&mut sampler, &end, count, &mut out)?
        }
        Commands::Pick {
            count,
            replace,
            items,
        } => commands::draw::pick(&mut sampler, &items, count, replace, &mut out)?,
        Commands::Shuffle { items } => commands::draw::shuffle(&mut sampler, &items, &mut out)?,
        Commands::Check { observations } => {
            let report = commands::check::run(&mut sampler, observations, &mut out)?;
            if !report.is_acceptable() {
                out.flush()?;
                anyhow::bail!("statistical check failed");
            }
        }
        Commands::Walk {
            file,
            mode,
            step,
            iterations,
        } => {
            let options = WalkOptions {
                mode,
                step,
                iterations,
            };
            commands::walk::run(&mut sampler, file.as_deref(), options, &mut out)?
        }
    }

    out.flush()?;
    info!(
        draws = sampler.draws(),
        rejections = sampler.rejections(),
        refills = sampler.supply().refills(),
        "done"
    );
    Ok(())
}
