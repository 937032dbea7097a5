use std::path::PathBuf;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PointerError {
    #[error("Parse error at position {0}")]
    NoParse(usize),
    #[error("Invalid percent-encoding at position {0}")]
    BadEncoding(usize),
    #[error("Pointer `{0}` has no parent location to write into")]
    Unresolvable(String),
}

/// Failure of a single timed action. Recorded on the sample, never propagated.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SampleError {
    #[error(transparent)]
    Pointer(#[from] PointerError),
    #[error("No compiled pointer for library `{0}`")]
    MissingCompiled(&'static str),
    #[error("Panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Cannot read fixture {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Fixture {} is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("Cannot sample from an empty pointer set")]
    EmptyPointerSet,
    #[error("Sample size must be at least 1")]
    ZeroSampleSize,
    #[error("Enumerated pointer `{pointer}` is malformed: {source}")]
    InvalidPointer {
        pointer: String,
        #[source]
        source: PointerError,
    },
    #[error("Library `{library}` failed to compile pointer `{pointer}`: {source}")]
    Compile {
        library: &'static str,
        pointer: String,
        #[source]
        source: PointerError,
    },
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
