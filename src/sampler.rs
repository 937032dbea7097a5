//! Draws the pointer workload: a random sample, with replacement, of the
//! locations a document exposes.

use std::collections::HashMap;

use rand::Rng;
use tracing::debug;

use crate::error::BenchError;
use crate::libraries::{CompiledPointer, Library};
use crate::pointer::{JsonPointer, PointerEntry};

/// Which string form of a sampled pointer gets passed to plain operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerForm {
    Pointer,
    FragmentId,
}

impl PointerForm {
    pub fn label(self) -> &'static str {
        match self {
            PointerForm::Pointer => "pointer",
            PointerForm::FragmentId => "fragmentId",
        }
    }

    pub fn select(self, sampled: &SampledPointer) -> &str {
        match self {
            PointerForm::Pointer => &sampled.pointer,
            PointerForm::FragmentId => &sampled.fragment_id,
        }
    }
}

/// A sampled location with every library's compiled form of it.
pub struct SampledPointer {
    pub pointer: String,
    pub fragment_id: String,
    compiled: HashMap<&'static str, Box<dyn CompiledPointer>>,
}

impl SampledPointer {
    /// Normalizes `pointer` and compiles it for each library able to.
    ///
    /// A compile failure aborts preparation.
    pub fn prepare(pointer: &str, libraries: &[Library]) -> Result<Self, BenchError> {
        let parsed = JsonPointer::parse(pointer).map_err(|source| BenchError::InvalidPointer {
            pointer: pointer.to_string(),
            source,
        })?;
        let normalized = parsed.pointer();

        let mut compiled = HashMap::new();
        for library in libraries {
            let Some(compile) = library.compile else {
                continue;
            };
            let handle = (compile.call)(&normalized).map_err(|source| BenchError::Compile {
                library: library.name,
                pointer: normalized.clone(),
                source,
            })?;
            compiled.insert(library.name, handle);
        }

        Ok(Self {
            fragment_id: parsed.fragment_id(),
            pointer: normalized,
            compiled,
        })
    }

    pub fn compiled_for(&self, library: &str) -> Option<&dyn CompiledPointer> {
        self.compiled.get(library).map(|handle| &**handle)
    }
}

/// Exactly `n` uniform draws from `entries`, duplicates allowed.
pub fn take_random_pointers<R: Rng + ?Sized>(
    entries: &[PointerEntry],
    n: usize,
    libraries: &[Library],
    rng: &mut R,
) -> Result<Vec<SampledPointer>, BenchError> {
    if n == 0 {
        return Err(BenchError::ZeroSampleSize);
    }
    if entries.is_empty() {
        return Err(BenchError::EmptyPointerSet);
    }

    let sample = (0..n)
        .map(|_| {
            let entry = &entries[rng.random_range(0..entries.len())];
            SampledPointer::prepare(&entry.pointer, libraries)
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!(drawn = sample.len(), population = entries.len(), "sampled pointers");
    Ok(sample)
}
