//! Selection of which data rows take part in a run.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("region string of the form '[START]:[END]' expected, got {0:?}")]
    InvalidRegion(String),

    #[error("positive integer expected as divider, got {0:?}")]
    InvalidDivider(String),
}

/// Data rows `start..end` (end exclusive, open if `None`), keeping every `divider`th index.
///
/// Indices are zero-based data-row indices, the header row is not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRange {
    pub start: usize,
    pub end: Option<usize>,
    pub divider: usize,
}

impl Default for SampleRange {
    fn default() -> Self {
        SampleRange {
            start: 0,
            end: None,
            divider: 1,
        }
    }
}

impl SampleRange {
    pub fn new(start: usize, end: Option<usize>, divider: usize) -> Self {
        SampleRange {
            start,
            end,
            divider: divider.max(1),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        index % self.divider == 0 && index >= self.start && !self.is_past_end(index)
    }

    /// True once `index` lies at or beyond the end; no later row can be selected.
    pub fn is_past_end(&self, index: usize) -> bool {
        self.end.is_some_and(|end| index >= end)
    }

    /// Builds a range from a `START:END` region and a divider.
    ///
    /// Either side of the region may be omitted. Negative values mean the
    /// first resp. the last sample, i.e. an open bound.
    pub fn parse(region: &str, divider: &str) -> Result<Self, RangeError> {
        let (start, end) = parse_region(region)?;
        let divider = parse_divider(divider)?;
        Ok(SampleRange::new(start, end, divider))
    }
}

fn region_regex() -> &'static Regex {
    static REGION: OnceLock<Regex> = OnceLock::new();
    REGION.get_or_init(|| {
        Regex::new(r"^\s*(-?\d*)\s*:\s*(-?\d*)\s*$").expect("region pattern is valid")
    })
}

/// Parses `[START]:[END]` into a start index and an optional exclusive end.
pub fn parse_region(region: &str) -> Result<(usize, Option<usize>), RangeError> {
    let invalid = || RangeError::InvalidRegion(region.to_string());
    let caps = region_regex().captures(region).ok_or_else(invalid)?;

    let bound = |idx: usize| -> Result<Option<i64>, RangeError> {
        match caps.get(idx).map(|m| m.as_str()) {
            None | Some("") => Ok(None),
            Some(text) => text.parse::<i64>().map(Some).map_err(|_| invalid()),
        }
    };

    let start = match bound(1)? {
        Some(n) if n > 0 => n as usize,
        _ => 0,
    };
    let end = match bound(2)? {
        Some(n) if n >= 0 => Some(n as usize),
        _ => None,
    };
    Ok((start, end))
}

pub fn parse_divider(divider: &str) -> Result<usize, RangeError> {
    match divider.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(RangeError::InvalidDivider(divider.to_string())),
    }
}
