use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, error};

use crate::error::SampleError;

thread_local! {
    static TIMING: Cell<bool> = const { Cell::new(false) };
}

/// Identifies what a sample measured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleKey {
    pub library: &'static str,
    pub operation: String,
    pub compiled: bool,
}

impl SampleKey {
    pub fn plain(library: &'static str, operation: impl Into<String>) -> Self {
        Self {
            library,
            operation: operation.into(),
            compiled: false,
        }
    }

    pub fn compiled(library: &'static str, operation: impl Into<String>) -> Self {
        Self {
            library,
            operation: operation.into(),
            compiled: true,
        }
    }
}

/// One measurement.
///
/// `duration_ns` is `None` exactly when `error` is set. `ea` is
/// `duration_ns / ops`, and `None` when there is no duration or `ops` is 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub library: &'static str,
    pub operation: String,
    pub compiled: bool,
    pub duration_ns: Option<u64>,
    pub ops: u64,
    pub ea: Option<f64>,
    pub error: Option<SampleError>,
}

impl Sample {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Runs `action` once and records how long it took per operation.
///
/// Errors and panics from `action` end up on the sample; they never escape.
pub fn timed<F>(key: SampleKey, ops: u64, action: F) -> Sample
where
    F: FnOnce() -> Result<(), SampleError>,
{
    TIMING.set(true);
    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(action));
    let elapsed_ns = start.elapsed().as_nanos() as u64;
    TIMING.set(false);

    let (duration_ns, ea, error) = match outcome {
        Ok(Ok(())) => {
            let ea = (ops > 0).then(|| elapsed_ns as f64 / ops as f64);
            (Some(elapsed_ns), ea, None)
        }
        Ok(Err(err)) => (None, None, Some(err)),
        Err(payload) => (None, None, Some(SampleError::Panicked(panic_message(&*payload)))),
    };

    Sample {
        library: key.library,
        operation: key.operation,
        compiled: key.compiled,
        duration_ns,
        ops,
        ea,
        error,
    }
}

/// [`timed`] with a single operation.
pub fn timed_once<F>(key: SampleKey, action: F) -> Sample
where
    F: FnOnce() -> Result<(), SampleError>,
{
    timed(key, 1, action)
}

/// Sends panic reports to `tracing` instead of raw stderr.
///
/// Panics caught by [`timed`] are already recorded on their sample, so they
/// only get a debug event; anything else is logged as an error.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        if TIMING.get() {
            debug!(%info, "timed action panicked");
        } else {
            error!(%info, "panicked");
        }
    }));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PointerError;

    #[test]
    fn test_timed_success() {
        let mut calls = 0;
        let sample = timed(SampleKey::plain("A", ".get(data, pointer)"), 4, || {
            calls += 1;
            std::thread::sleep(std::time::Duration::from_millis(1));
            Ok(())
        });
        assert_eq!(calls, 1);
        assert_eq!(sample.library, "A");
        assert_eq!(sample.operation, ".get(data, pointer)");
        assert!(!sample.compiled);
        assert_eq!(sample.ops, 4);
        assert!(sample.error.is_none());

        let duration = sample.duration_ns.unwrap();
        assert!(duration >= 1_000_000);
        assert_eq!(sample.ea, Some(duration as f64 / 4.0));
    }

    #[test]
    fn test_timed_once_defaults_to_one_op() {
        let sample = timed_once(SampleKey::compiled("B", ".get(data)"), || Ok(()));
        assert!(sample.compiled);
        assert_eq!(sample.ops, 1);
        assert_eq!(sample.ea, sample.duration_ns.map(|d| d as f64));
    }

    #[test]
    fn test_timed_error_is_recorded() {
        let sample = timed(SampleKey::plain("A", "op"), 10, || {
            Err(PointerError::NoParse(3).into())
        });
        assert_eq!(sample.duration_ns, None);
        assert_eq!(sample.ea, None);
        assert_eq!(sample.error, Some(SampleError::Pointer(PointerError::NoParse(3))));
        assert!(sample.failed());
    }

    #[test]
    fn test_timed_panic_is_recorded() {
        let sample = timed_once(SampleKey::plain("A", "op"), || panic!("boom"));
        assert_eq!(sample.ea, None);
        assert_eq!(sample.error, Some(SampleError::Panicked("boom".to_string())));

        let sample = timed_once(SampleKey::plain("A", "op"), || {
            panic!("{} failed", "lookup")
        });
        assert_eq!(sample.error, Some(SampleError::Panicked("lookup failed".to_string())));
    }

    #[test]
    fn test_timed_zero_ops_has_no_ea() {
        let sample = timed(SampleKey::plain("A", "op"), 0, || Ok(()));
        assert_eq!(sample.ops, 0);
        assert!(sample.duration_ns.is_some());
        assert_eq!(sample.ea, None);
        assert!(!sample.failed());
    }

    // the hook must not get in the way of recording a caught panic
    #[test]
    fn test_panic_hook_keeps_recording() {
        install_panic_hook();
        let sample = timed_once(SampleKey::plain("A", "op"), || panic!("quiet"));
        assert_eq!(sample.error, Some(SampleError::Panicked("quiet".to_string())));
        assert!(!TIMING.get());
    }
}
