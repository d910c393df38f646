use clap::{Args, Parser as ClapParser, Subcommand};
use csv_plotter::{
    DeriveOptions, Expr, SampleRange,
    cli::{
        self, CheckOptions, CliError, EvalOptions, MetricsOptions, TransformOptions,
    },
};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "csvplot")]
#[command(about = "csvplot - derive, inspect and summarize CSV columns")]
#[command(version)]
struct Cli {
    /// Log debug diagnostics (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RangeArgs {
    /// Data rows to process as 'START:END' (END exclusive); either side may be omitted
    #[arg(short, long, default_value = ":", allow_hyphen_values = true)]
    region: String,

    /// Only take every Nth row
    #[arg(short, long, default_value = "1")]
    divider: String,
}

impl RangeArgs {
    fn to_range(&self) -> Result<SampleRange, CliError> {
        Ok(SampleRange::parse(&self.region, &self.divider)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Append columns computed from column expressions
    Transform {
        /// Input CSV (reads from stdin if not provided)
        input: Option<PathBuf>,

        /// Output CSV (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column expression 'name = expression' (repeatable)
        #[arg(short, long = "expr")]
        expressions: Vec<String>,

        /// File with one column expression per line
        #[arg(long)]
        expr_file: Option<PathBuf>,

        /// Generate this many rows instead of reading an input CSV
        #[arg(long)]
        rows: Option<usize>,

        /// Only write the derived columns
        #[arg(long)]
        derived_only: bool,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// List the column headers of a CSV file
    Headers {
        input: PathBuf,
    },

    /// Print min, max and average of every column
    Metrics {
        input: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Parse a column expression and print its tree
    Check {
        expression: String,

        /// Also print the tree folded without row context
        #[arg(long)]
        fold: bool,
    },

    /// Evaluate a column expression for a hand-written row
    Eval {
        expression: String,

        /// Value of '#'
        #[arg(long)]
        row: Option<usize>,

        /// Column value 'NAME=VALUE' (repeatable)
        #[arg(short, long = "col")]
        columns: Vec<String>,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'csvplot docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Transform {
            input,
            output,
            expressions,
            expr_file,
            rows,
            derived_only,
            range,
        } => run_transform(input, output, expressions, expr_file, rows, derived_only, &range),
        Commands::Headers { input } => {
            open(&input).and_then(cli::execute_headers).map(|text| print!("{}", text))
        }
        Commands::Metrics {
            input,
            json,
            pretty,
            range,
        } => run_metrics(&input, json, pretty, &range),
        Commands::Check { expression, fold } => {
            cli::execute_check(&CheckOptions { expression, fold }).map(|text| print!("{}", text))
        }
        Commands::Eval {
            expression,
            row,
            columns,
        } => run_eval(expression, row, columns),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => {
            cli::get_doc_category(&category).map(|content| print!("{}", content))
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "csv_plotter=debug,warn"
    } else {
        "csv_plotter=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open(path: &Path) -> Result<BufReader<File>, CliError> {
    Ok(BufReader::new(File::open(path)?))
}

fn run_transform(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    mut expressions: Vec<String>,
    expr_file: Option<PathBuf>,
    rows: Option<usize>,
    derived_only: bool,
    range: &RangeArgs,
) -> Result<(), CliError> {
    if let Some(path) = expr_file {
        expressions.extend(cli::read_expression_file(&path)?);
    }

    let options = TransformOptions {
        expressions,
        rows,
        derive: DeriveOptions {
            range: range.to_range()?,
            derived_only,
        },
    };

    let input: Option<Box<dyn Read>> = match input {
        Some(path) => Some(Box::new(open(&path)?)),
        None if rows.is_none() && !atty::is(atty::Stream::Stdin) => {
            Some(Box::new(io::stdin().lock()))
        }
        None => None,
    };

    let output: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    cli::execute_transform(input, output, &options)?;
    Ok(())
}

fn run_metrics(input: &Path, json: bool, pretty: bool, range: &RangeArgs) -> Result<(), CliError> {
    let options = MetricsOptions {
        range: range.to_range()?,
        json,
        pretty,
    };
    print!("{}", cli::execute_metrics(open(input)?, &options)?);
    Ok(())
}

fn run_eval(expression: String, row: Option<usize>, columns: Vec<String>) -> Result<(), CliError> {
    let result = cli::execute_eval(&EvalOptions {
        expression,
        row,
        columns,
    })?;

    match result {
        Expr::Literal(value) => println!("{}", csv_plotter::csv_io::format_value(value)),
        other => println!("{}", other),
    }
    Ok(())
}
