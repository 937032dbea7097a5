//! Ranks libraries by average time per operation.
//!
//! Failed samples carry no duration. They are left out of both the sum and
//! the divisor and counted in [`SummaryRow::failed`] instead. A combination
//! with no successful sample has no average and ranks after every row that
//! has one.

use crate::libraries::{Library, Operation};
use crate::timer::Sample;

/// Method label used for libraries without the operation.
pub const NOT_APPLICABLE: &str = "n/a";

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub library: &'static str,
    pub method: &'static str,
    pub compiled: bool,
    /// Elementary operations measured; `None` for placeholder rows.
    pub samples: Option<u64>,
    /// Rounded mean nanoseconds per operation.
    pub avg: Option<u64>,
    pub failed: usize,
    /// Percent slower than the first row, rounded to two decimals.
    pub slower: Option<f64>,
}

impl SummaryRow {
    fn placeholder(library: &'static str) -> Self {
        Self {
            library,
            method: NOT_APPLICABLE,
            compiled: false,
            samples: None,
            avg: None,
            failed: 0,
            slower: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.samples.is_none()
    }
}

fn aggregate(
    report: &[Sample],
    library: &'static str,
    method: &'static str,
    compiled: bool,
) -> SummaryRow {
    let matching: Vec<&Sample> = report
        .iter()
        .filter(|s| s.library == library && s.compiled == compiled)
        .collect();
    let measured: Vec<f64> = matching.iter().filter_map(|s| s.ea).collect();
    let ops = matching.first().map_or(0, |s| s.ops);

    let avg = if measured.is_empty() {
        None
    } else {
        Some((measured.iter().sum::<f64>() / measured.len() as f64).round() as u64)
    };

    SummaryRow {
        library,
        method,
        compiled,
        samples: Some(measured.len() as u64 * ops),
        avg,
        failed: matching.iter().filter(|s| s.failed()).count(),
        slower: None,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One row per supported (library, variant), a placeholder per library
/// lacking `operation`, sorted fastest first.
pub fn summarize(report: &[Sample], operation: Operation, libraries: &[Library]) -> Vec<SummaryRow> {
    let mut rows = Vec::new();
    for library in libraries {
        match operation.plain_method(library) {
            Some(method) => rows.push(aggregate(report, library.name, method, false)),
            None => rows.push(SummaryRow::placeholder(library.name)),
        }
        if let Some(method) = operation.compiled_method(library) {
            rows.push(aggregate(report, library.name, method, true));
        }
    }

    // stable: ties keep registry order
    rows.sort_by_key(|row| (row.avg.is_none(), row.avg));

    // undefined against a zero fastest average
    if let Some(fastest) = rows.first().and_then(|row| row.avg).filter(|&avg| avg > 0) {
        for row in rows.iter_mut().skip(1) {
            if let Some(avg) = row.avg {
                let fastest = fastest as f64;
                row.slower = Some(round2((avg as f64 - fastest) / fastest * 100.0));
            }
        }
    }
    rows
}
