use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};

use csv_plotter::cli::{self, CliError, MetricsOptions, TransformOptions};
use csv_plotter::derive::DropReason;
use csv_plotter::{ColumnDeriver, DeriveError, DeriveOptions, EvalError, SampleRange};
use tempfile::tempdir;

const SENSOR_CSV: &str = "\
time, Signal (raw), offset
0, 1.5, 0.5
1, 2.5, 0.5
2, n/a, 1
3, 4, 1
4, 5, 2
";

fn derive(expressions: &[&str], input: &str, options: &DeriveOptions) -> Result<String, DeriveError> {
    let deriver = ColumnDeriver::new(expressions)?;
    let mut out = Vec::new();
    deriver.transform(input.as_bytes(), &mut out, options)?;
    Ok(String::from_utf8(out).unwrap())
}

// ============================================================================
// Transforming input
// ============================================================================

#[test]
fn test_appends_derived_columns_in_order() {
    let out = derive(
        &["corrected = $Signal (raw)$ - $offset$", "idx = #"],
        SENSOR_CSV,
        &DeriveOptions::default(),
    )
    .unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "time,Signal (raw),offset,corrected,idx");
    assert_eq!(lines[1], "0,1.5,0.5,1,0");
    assert_eq!(lines[2], "1,2.5,0.5,2,1");
    assert_eq!(lines[3], "2,n/a,1,nan,2");
    assert_eq!(lines.len(), 6);
}

#[test]
fn test_derived_only() {
    let options = DeriveOptions {
        derived_only: true,
        ..Default::default()
    };
    let out = derive(&["double = $time$ * 2"], SENSOR_CSV, &options).unwrap();
    assert_eq!(out, "double\n0\n2\n4\n6\n8\n");
}

#[test]
fn test_region_and_divider() {
    let options = DeriveOptions {
        range: SampleRange::parse("1:4", "1").unwrap(),
        derived_only: true,
    };
    let out = derive(&["t = $time$"], SENSOR_CSV, &options).unwrap();
    assert_eq!(out, "t\n1\n2\n3\n");

    let options = DeriveOptions {
        range: SampleRange::parse(":", "2").unwrap(),
        derived_only: true,
    };
    let out = derive(&["t = $time$", "i = #"], SENSOR_CSV, &options).unwrap();
    assert_eq!(out, "t,i\n0,0\n2,2\n4,4\n");
}

#[test]
fn test_summary_counts() {
    let deriver = ColumnDeriver::new(&["x = 1"]).unwrap();
    let options = DeriveOptions {
        range: SampleRange::new(0, Some(2), 1),
        derived_only: false,
    };
    let summary = deriver
        .transform(SENSOR_CSV.as_bytes(), Vec::new(), &options)
        .unwrap();
    assert_eq!(summary.rows_written, 2);
}

#[test]
fn test_missing_column_stops_the_run() {
    let err = derive(&["x = $missing$ + 1"], SENSOR_CSV, &DeriveOptions::default()).unwrap_err();
    match err {
        DeriveError::Row { row, column, error } => {
            assert_eq!(row, 0);
            assert_eq!(column, "x");
            assert_eq!(error, EvalError::ColumnNotFound("missing".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_function_fails_before_reading() {
    let err = ColumnDeriver::new(&["x = foo(1)"]).unwrap_err();
    assert!(matches!(err, DeriveError::Prefold { .. }));
    assert!(err.to_string().contains("x = foo(1)"));
}

#[test]
fn test_broken_expressions_are_dropped() {
    let deriver = ColumnDeriver::new(&["a = (1", "b = 2", "$time$ * 2"]).unwrap();
    assert_eq!(deriver.column_names().collect::<Vec<_>>(), vec!["b"]);
    assert_eq!(deriver.dropped().len(), 2);
    assert_eq!(deriver.dropped()[0].source, "a = (1");
    assert_eq!(deriver.dropped()[1].reason, DropReason::MissingTarget);
}

#[test]
fn test_non_finite_results_are_written_as_constants() {
    let out = derive(
        &["q = $time$ / 0", "big = 1 / 0 + inf", "neg = 0 - inf"],
        "time\n1\n",
        &DeriveOptions::default(),
    )
    .unwrap();
    assert_eq!(out, "time,q,big,neg\n1,nan,nan,-inf\n");
}

// ============================================================================
// Generating rows
// ============================================================================

#[test]
fn test_generate_without_input() {
    let deriver = ColumnDeriver::new(&["x = # / 2", "y = # ^ 2"]).unwrap();
    let mut out = Vec::new();
    let summary = deriver.generate(4, &mut out).unwrap();
    assert_eq!(summary.rows_written, 4);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "x,y\n0,0\n0.5,1\n1,4\n1.5,9\n"
    );
}

#[test]
fn test_generate_rejects_column_refs() {
    let deriver = ColumnDeriver::new(&["x = $a$"]).unwrap();
    let err = deriver.generate(1, Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        DeriveError::Row {
            error: EvalError::ColumnNotFound(_),
            ..
        }
    ));
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_transform_file_to_file() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("in.csv");
    let output_path = dir.path().join("out.csv");
    let expr_path = dir.path().join("columns.txt");

    fs::write(&input_path, "a,b\n1,2\n3,4\n").unwrap();
    {
        let mut file = File::create(&expr_path).unwrap();
        writeln!(file, "sum = $a$ + $b$").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  prod = $a$ * $b$  ").unwrap();
    }

    let options = TransformOptions {
        expressions: cli::read_expression_file(&expr_path).unwrap(),
        ..Default::default()
    };
    assert_eq!(options.expressions.len(), 2);

    let input = BufReader::new(File::open(&input_path).unwrap());
    let output = BufWriter::new(File::create(&output_path).unwrap());
    let summary = cli::execute_transform(Some(input), output, &options).unwrap();
    assert_eq!(summary.rows_written, 2);

    let written = fs::read_to_string(&output_path).unwrap();
    assert_eq!(written, "a,b,sum,prod\n1,2,3,2\n3,4,7,12\n");
}

#[test]
fn test_metrics_of_transformed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("derived.csv");

    let deriver = ColumnDeriver::new(&["x = #", "y = 10 - #"]).unwrap();
    deriver.generate(5, File::create(&path).unwrap()).unwrap();

    let options = MetricsOptions {
        json: true,
        ..Default::default()
    };
    let json = cli::execute_metrics(File::open(&path).unwrap(), &options).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["x"]["min"], 0.0);
    assert_eq!(value["x"]["max"], 4.0);
    assert_eq!(value["y"]["avg"], 8.0);
}

#[test]
fn test_missing_expression_file() {
    let dir = tempdir().unwrap();
    let result = cli::read_expression_file(&dir.path().join("nope.txt"));
    assert!(matches!(result, Err(CliError::Io(_))));
}
