//! Summary statistics per column

use std::io;

use serde_json::{Map, Value, json};

use crate::{
    SampleRange,
    metrics::{self, ColumnMetrics},
};

use super::CliError;

/// Options for the metrics command
#[derive(Debug, Clone, Default)]
pub struct MetricsOptions {
    pub range: SampleRange,
    /// Print a JSON object instead of the text report
    pub json: bool,
    /// Pretty-print the JSON output
    pub pretty: bool,
}

pub fn execute_metrics<R: io::Read>(input: R, options: &MetricsOptions) -> Result<String, CliError> {
    let columns = metrics::compute(input, &options.range)?;

    if options.json {
        let value = metrics_to_json(&columns);
        let text = if options.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        return Ok(text + "\n");
    }

    let mut out = String::new();
    for column in &columns {
        out.push_str(&format!("Column \"{}\"\n", column.name));
        out.push_str(&format!("    Min: {}\n", column.min));
        out.push_str(&format!("    Max: {}\n", column.max));
        out.push_str(&format!("    Avg: {}\n", column.avg()));
        out.push('\n');
    }
    Ok(out)
}

/// `{"<column>": {"min": .., "max": .., "avg": .., "count": ..}, ...}` in header order.
///
/// Non-finite numbers have no JSON form and become `null`.
pub fn metrics_to_json(columns: &[ColumnMetrics]) -> Value {
    let mut map = Map::new();
    for column in columns {
        map.insert(
            column.name.clone(),
            json!({
                "min": finite(column.min),
                "max": finite(column.max),
                "avg": finite(column.avg()),
                "count": column.count,
            }),
        );
    }
    Value::Object(map)
}

fn finite(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
