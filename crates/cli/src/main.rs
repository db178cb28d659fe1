mod args;
mod commands;
pub mod defaults;
mod printing;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};

use args::{InitArgs, RunArgs, StatsArgs};
use commands::{init, run, stats};

/// crisprmut: A CRISPR Array Mutation Simulator
///
/// This tool simulates how CRISPR repeat arrays change over time through
/// point mutations, repeat duplications and deletions, and summarises the
/// resulting arrays.
#[derive(Parser, Debug)]
#[command(name = "crisprmut")]
#[command(author, version, about = "Simulates mutations in CRISPR repeat arrays", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new simulation configuration.
    ///
    /// Writes the array dimensions, event generators and run count to a JSON
    /// file but does not run anything yet.
    Init(Box<InitArgs>),

    /// Run all trajectories of a configuration.
    ///
    /// Each run uses its own seed; results are written as JSON lines.
    Run(RunArgs),

    /// Compute statistics for an array.
    ///
    /// Reads a JSON list of repeat strings and reports the consensus,
    /// mutation diffs and mismatch patterns.
    Stats(StatsArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Init(args) => init::init_simulation(&args)?,
        Commands::Run(args) => run::run_simulation(&args)?,
        Commands::Stats(args) => stats::array_stats(&args)?,
    }

    Ok(())
}
