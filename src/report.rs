use crate::summary::SummaryRow;
use crate::timer::Sample;

const COLUMN_SPLITTER: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<(&'static str, Align)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[(&'static str, Align)]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, (header, _))| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header_cells: Vec<String> = self.headers.iter().map(|(h, _)| h.to_string()).collect();
        let mut output = String::new();
        for row in std::iter::once(&header_cells).chain(&self.rows) {
            let line = row
                .iter()
                .zip(&self.headers)
                .zip(&widths)
                .map(|((cell, (_, align)), &width)| match align {
                    Align::Left => format!("{:<width$}", cell),
                    Align::Right => format!("{:>width$}", cell),
                })
                .collect::<Vec<_>>()
                .join(COLUMN_SPLITTER);
            output.push_str(line.trim_end());
            output.push('\n');
        }
        output
    }
}

fn or_blank<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

pub fn format_samples(samples: &[Sample]) -> String {
    let mut table = Table::new(&[
        ("LIBRARY", Align::Left),
        ("OPERATION", Align::Left),
        ("COMPILED", Align::Left),
        ("DURATION", Align::Right),
        ("OPS", Align::Right),
        ("EA", Align::Right),
        ("ERR", Align::Left),
    ]);
    for sample in samples {
        table.push_row(vec![
            sample.library.to_string(),
            sample.operation.clone(),
            sample.compiled.to_string(),
            or_blank(sample.duration_ns),
            sample.ops.to_string(),
            or_blank(sample.ea.map(|ea| format!("{ea:.2}"))),
            or_blank(sample.error.as_ref()),
        ]);
    }
    table.render()
}

/// Slowdown as printed: at most two decimals, no trailing zeros.
pub fn format_slower(slower: f64) -> String {
    format!("{slower}%")
}

pub fn format_summary(rows: &[SummaryRow]) -> String {
    let mut table = Table::new(&[
        ("LIBRARY", Align::Left),
        ("METHOD", Align::Left),
        ("COMPILED", Align::Left),
        ("SAMPLES", Align::Left),
        ("AVG", Align::Right),
        ("FAILED", Align::Right),
        ("SLOWER", Align::Right),
    ]);
    for row in rows {
        let placeholder = row.is_placeholder();
        let dash_if_placeholder = |cell: Option<String>| match cell {
            Some(cell) => cell,
            None if placeholder => "-".to_string(),
            None => String::new(),
        };
        table.push_row(vec![
            row.library.to_string(),
            row.method.to_string(),
            if row.compiled { "compiled" } else { "" }.to_string(),
            dash_if_placeholder(row.samples.map(|n| n.to_string())),
            dash_if_placeholder(row.avg.map(|n| n.to_string())),
            if placeholder { String::new() } else { row.failed.to_string() },
            or_blank(row.slower.map(format_slower)),
        ]);
    }
    table.render()
}
