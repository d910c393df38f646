//! List the column headers of a CSV file

use std::io;

use crate::csv_io;

use super::CliError;

/// Reads the header row of `input` and formats the listing.
pub fn execute_headers<R: io::Read>(input: R) -> Result<String, CliError> {
    let headers = csv_io::read_headers(input)?;
    Ok(format_headers(&headers))
}

/// `Column headers found: N` followed by one `index : name` line per header.
///
/// Indices are right-aligned to the width of the largest index.
pub fn format_headers(headers: &[String]) -> String {
    let width = headers.len().saturating_sub(1).to_string().len();

    let mut out = format!("Column headers found: {}\n", headers.len());
    for (i, header) in headers.iter().enumerate() {
        out.push_str(&format!("  {i:>width$} : {header}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment() {
        let headers: Vec<String> = (0..11).map(|i| format!("h{i}")).collect();
        let out = format_headers(&headers);
        assert!(out.starts_with("Column headers found: 11\n"));
        assert!(out.contains("\n   0 : h0\n"));
        assert!(out.contains("\n  10 : h10\n"));
    }

    #[test]
    fn test_headers_are_trimmed() {
        let out = execute_headers("angle, sin , cos\n1,2,3\n".as_bytes()).unwrap();
        assert_eq!(out, "Column headers found: 3\n  0 : angle\n  1 : sin\n  2 : cos\n");
    }
}
