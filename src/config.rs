//! Startup parameters. Defaults reproduce the fixed constants of the
//! benchmark, so running without flags always measures the same workload.

use std::path::PathBuf;

use clap::Parser;

/// Repetitions of every comparison.
pub const COMPARISON_CYCLES: usize = 10;
/// Pointers drawn, with replacement, from the fixture.
pub const RANDOM_POINTER_COUNT: usize = 100_000;
pub const DEFAULT_FIXTURE: &str = "data.json";

/// Compare JSON pointer implementations on flatten, has and get.
#[derive(Parser, Debug)]
#[command(name = "ptrbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON document to benchmark against
    #[arg(long, default_value = DEFAULT_FIXTURE)]
    pub fixture: PathBuf,

    /// Repetitions of every comparison
    #[arg(long, default_value_t = COMPARISON_CYCLES as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub cycles: u64,

    /// Number of pointers to sample from the fixture
    #[arg(long, default_value_t = RANDOM_POINTER_COUNT as u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub samples: u64,

    /// Seed for the pointer sample; drawn from the OS when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub fixture: PathBuf,
    pub cycles: usize,
    pub sample_size: usize,
    pub seed: Option<u64>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            fixture: PathBuf::from(DEFAULT_FIXTURE),
            cycles: COMPARISON_CYCLES,
            sample_size: RANDOM_POINTER_COUNT,
            seed: None,
        }
    }
}

impl From<&Cli> for BenchConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            fixture: cli.fixture.clone(),
            cycles: cli.cycles as usize,
            sample_size: cli.samples as usize,
            seed: cli.seed,
        }
    }
}
