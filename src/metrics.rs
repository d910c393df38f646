//! Per-column summary statistics of a CSV file.

use std::io;

use tracing::{info, warn};

use crate::{csv_io, range::SampleRange};

/// Minimum, maximum and average of one column over the selected rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMetrics {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: usize,
}

impl ColumnMetrics {
    fn new(name: String) -> Self {
        ColumnMetrics {
            name,
            min: f64::NAN,
            max: f64::NAN,
            sum: 0.0,
            count: 0,
        }
    }

    fn push(&mut self, value: f64) {
        // f64::min/max ignore a NaN operand, so the NaN seed disappears on the first value
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    /// Arithmetic mean, `NaN` if no row was selected.
    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Reads `input` and computes metrics for every column.
///
/// Cells may be numbers or boolean words. A row with any other cell, or
/// with fewer cells than headers, is skipped as a whole so all columns
/// cover the same rows.
pub fn compute<R: io::Read>(input: R, range: &SampleRange) -> Result<Vec<ColumnMetrics>, csv::Error> {
    let mut rdr = csv_io::reader(input);
    let mut metrics: Vec<ColumnMetrics> = rdr
        .headers()?
        .iter()
        .map(|h| ColumnMetrics::new(h.to_string()))
        .collect();

    let mut values = Vec::with_capacity(metrics.len());
    for (index, record) in rdr.records().enumerate() {
        let record = record?;
        if range.is_past_end(index) {
            break;
        }
        if !range.contains(index) {
            continue;
        }

        if record.len() < metrics.len() {
            warn!(
                row = index,
                cells = record.len(),
                columns = metrics.len(),
                "row has fewer cells than headers, skipping row"
            );
            continue;
        }

        values.clear();
        let mut unsupported = None;
        for cell in record.iter().take(metrics.len()) {
            match csv_io::parse_cell(cell) {
                Some(value) => values.push(value),
                None => {
                    unsupported = Some(cell.to_string());
                    break;
                }
            }
        }
        if let Some(cell) = unsupported {
            warn!(row = index, cell = %cell, "unsupported value type, skipping row");
            continue;
        }

        for (column, value) in metrics.iter_mut().zip(values.iter()) {
            column.push(*value);
        }
    }

    let samples = metrics.iter().map(|m| m.count).max().unwrap_or(0);
    if samples == 0 {
        warn!("no relevant samples stored");
    } else {
        info!("finished: {samples} samples read");
    }
    Ok(metrics)
}
