//! CSV reading and writing helpers shared by the driver and the utilities.

use std::io;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use crate::evaluator::RowValues;

const TRUE_WORDS: [&str; 5] = ["true", "t", "1", "y", "yes"];
const FALSE_WORDS: [&str; 5] = ["false", "f", "0", "n", "no"];

/// Reader with a header row; cells and headers are trimmed and ragged rows are allowed.
pub fn reader<R: io::Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input)
}

pub fn writer<W: io::Write>(output: W) -> csv::Writer<W> {
    WriterBuilder::new().flexible(true).from_writer(output)
}

/// Trimmed header names of the first row.
pub fn read_headers<R: io::Read>(input: R) -> Result<Vec<String>, csv::Error> {
    let mut rdr = reader(input);
    Ok(rdr.headers()?.iter().map(|h| h.trim().to_string()).collect())
}

/// Parses a cell as a float, `NaN` if it is not a number.
pub fn number_or_nan(cell: &str) -> f64 {
    cell.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Parses a cell as a number or a boolean word (`yes` -> 1, `no` -> 0).
pub fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if let Ok(value) = cell.parse::<f64>() {
        return Some(value);
    }
    let lower = cell.to_lowercase();
    if TRUE_WORDS.contains(&lower.as_str()) {
        Some(1.0)
    } else if FALSE_WORDS.contains(&lower.as_str()) {
        Some(0.0)
    } else {
        None
    }
}

/// Pairs each header with its cell's numeric value.
///
/// Cells that are not numbers become `NaN`; headers without a cell are left out.
pub fn row_values(headers: &StringRecord, record: &StringRecord) -> RowValues {
    headers
        .iter()
        .zip(record.iter())
        .map(|(header, cell)| (header.to_string(), number_or_nan(cell)))
        .collect()
}

/// Shortest text that reads back as the same float; `nan`/`inf` spelled as the constants.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        value.to_string()
    }
}
