//! kvbase CLI
//!
//! Command-line driver for exercising the foundation components.

use clap::{Parser, Subcommand, ValueEnum};
use kvbase::{bytewise_comparator, Arena, Config, Random, Slice, Status};
use tracing_subscriber::{fmt, EnvFilter};

/// kvbase CLI
#[derive(Parser, Debug)]
#[command(name = "kvbase-cli")]
#[command(about = "Exercise kvbase arena, comparator and status components")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a randomized allocation workload and report arena usage
    Arena {
        /// Number of allocations to perform
        #[arg(short = 'n', long, default_value = "100000")]
        allocations: u32,

        /// Random seed
        #[arg(short, long, default_value = "301")]
        seed: u32,

        /// Standard block size in bytes
        #[arg(short, long, default_value = "4096")]
        block_size: usize,
    },

    /// Shorten START to a separator in [START, LIMIT)
    Separator {
        start: String,
        limit: String,
    },

    /// Shorten KEY to a successor >= KEY
    Successor {
        key: String,
    },

    /// Render a status value
    Status {
        /// Failure kind
        #[arg(value_enum)]
        kind: Kind,

        /// Primary message
        message: String,

        /// Optional secondary message
        detail: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Ok,
    NotFound,
    Corruption,
    NotSupported,
    InvalidArgument,
    IoError,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kvbase=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();
    tracing::debug!("kvbase CLI v{}", kvbase::VERSION);

    let result = match args.command {
        Commands::Arena {
            allocations,
            seed,
            block_size,
        } => run_arena(allocations, seed, block_size),
        Commands::Separator { start, limit } => {
            let mut key = start.into_bytes();
            bytewise_comparator().find_shortest_separator(&mut key, Slice::from(&limit));
            println!("{}", Slice::from(&key).to_string_lossy());
            Ok(())
        }
        Commands::Successor { key } => {
            let mut key = key.into_bytes();
            bytewise_comparator().find_short_successor(&mut key);
            println!("{}", Slice::from(&key).to_string_lossy());
            Ok(())
        }
        Commands::Status {
            kind,
            message,
            detail,
        } => {
            println!("{}", build_status(kind, &message, detail.as_deref().unwrap_or("")));
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Mixed workload: mostly tiny requests, occasional medium and rare large
/// ones, one in ten aligned.
fn run_arena(allocations: u32, seed: u32, block_size: usize) -> kvbase::Result<()> {
    let config = Config::builder()
        .arena_block_size(block_size)
        .random_seed(seed)
        .build()?;

    let arena = Arena::with_config(&config)?;
    let mut rnd = Random::new(config.random_seed);
    let mut requested: usize = 0;

    tracing::info!(allocations, seed, block_size, "running arena workload");

    for i in 0..allocations {
        let size = if rnd.one_in(4000) {
            rnd.uniform(6000)
        } else if rnd.one_in(10) {
            rnd.uniform(100)
        } else {
            rnd.uniform(20)
        };
        let size = size.max(1) as usize;

        let range = if rnd.one_in(10) {
            arena.allocate_aligned(size)
        } else {
            arena.allocate(size)
        };
        range.fill((i % 256) as u8);
        requested += size;
    }

    let usage = arena.memory_usage();
    println!("allocations:  {}", allocations);
    println!("requested:    {} bytes", requested);
    println!("memory usage: {} bytes", usage);
    println!("blocks:       {}", arena.block_count());
    if requested > 0 {
        println!("usage ratio:  {:.4}", usage as f64 / requested as f64);
    }
    Ok(())
}

fn build_status(kind: Kind, message: &str, detail: &str) -> Status {
    match kind {
        Kind::Ok => Status::ok(),
        Kind::NotFound => Status::not_found_with(message, detail),
        Kind::Corruption => Status::corruption_with(message, detail),
        Kind::NotSupported => Status::not_supported_with(message, detail),
        Kind::InvalidArgument => Status::invalid_argument_with(message, detail),
        Kind::IoError => Status::io_error_with(message, detail),
    }
}
