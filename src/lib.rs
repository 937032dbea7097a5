//! Benchmarks JSON pointer implementations against a fixture document.
//!
//! The flow is: load the fixture, enumerate every pointer it exposes, draw a
//! random sample of them, then for each operation time every capable
//! library over repeated cycles and print the raw samples next to a ranked
//! summary.

pub mod config;
pub mod error;
pub mod fixture;
pub mod libraries;
pub mod pointer;
pub mod report;
pub mod runner;
pub mod sampler;
pub mod summary;
pub mod timer;

use std::io::Write;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use tracing::info;

pub use config::{BenchConfig, COMPARISON_CYCLES, RANDOM_POINTER_COUNT};
pub use error::{BenchError, LoadError, PointerError, SampleError};
pub use libraries::{Library, Operation, registry};
pub use pointer::{JsonPointer, list_pointers};
pub use runner::Lookup;
pub use sampler::{PointerForm, SampledPointer, take_random_pointers};
pub use summary::{SummaryRow, summarize};
pub use timer::{Sample, timed};

/// The per-pointer comparisons, in the order they are reported.
pub const LOOKUP_COMPARISONS: [(Lookup, PointerForm, &str); 4] = [
    (Lookup::Has, PointerForm::Pointer, ".has(obj, pointer)"),
    (Lookup::Has, PointerForm::FragmentId, ".has(obj, fragmentId)"),
    (Lookup::Get, PointerForm::Pointer, ".get(obj, pointer)"),
    (Lookup::Get, PointerForm::FragmentId, ".get(obj, fragmentId)"),
];

fn print_comparison<W: Write>(
    out: &mut W,
    description: &str,
    samples: &[Sample],
    operation: Operation,
    libraries: &[Library],
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{description}")?;
    writeln!(out)?;
    write!(out, "{}", report::format_samples(samples))?;
    writeln!(out)?;
    write!(out, "{}", report::format_summary(&summarize(samples, operation, libraries)))?;
    writeln!(out)?;
    Ok(())
}

/// Runs flatten, then every lookup comparison, writing tables to `out`.
pub fn perform_comparisons<W: Write>(
    out: &mut W,
    data: &Value,
    pointers: &[SampledPointer],
    libraries: &[Library],
    cycles: usize,
) -> std::io::Result<()> {
    info!(cycles, "comparing .flatten(obj)");
    let report = runner::compare_flatten(data, libraries, cycles);
    print_comparison(out, ".flatten(obj)", &report, Operation::Flatten, libraries)?;

    for (lookup, form, description) in LOOKUP_COMPARISONS {
        info!(cycles, pointers = pointers.len(), "comparing {description}");
        let report = runner::compare_lookup(data, pointers, form, lookup, libraries, cycles);
        print_comparison(out, description, &report, lookup.into(), libraries)?;
    }
    Ok(())
}

/// Full benchmark run described by `config`, tables on stdout.
pub fn run(config: &BenchConfig) -> Result<(), BenchError> {
    let data = fixture::load_fixture(&config.fixture)?;
    let libraries = registry();

    let entries = list_pointers(&data);
    info!(pointers = entries.len(), "enumerated fixture");

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let pointers = take_random_pointers(&entries, config.sample_size, &libraries, &mut rng)?;
    info!(sampled = pointers.len(), "prepared pointer sample");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    perform_comparisons(&mut out, &data, &pointers, &libraries, config.cycles)?;
    Ok(())
}
