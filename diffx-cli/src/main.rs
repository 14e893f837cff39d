//! diffx - token sequence differencing tool
//!
//! Compares two files line by line, word by word, character by character,
//! or as XML token streams, and prints the edit script.

mod tokenize;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};

use clap::{Parser, Subcommand};
use diffx::{
    Algorithm, DefaultEquality, DiffConfig, DiffProcessor, IgnoreAsciiCase, ShortFormatter,
    XmlToken,
};
use tracing_subscriber::EnvFilter;

use tokenize::Granularity;

/// Token sequence differencing tool
#[derive(Parser)]
#[command(name = "diffx")]
#[command(version)]
#[command(about = "Token sequence differencing tool", long_about = None)]
struct Cli {
    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the edit script turning one file into another
    #[command(visible_alias = "d")]
    Diff {
        /// Original file
        from: String,
        /// Modified file
        to: String,
        /// Output file (default: stdout)
        output: Option<String>,

        /// Algorithm (default: myers-linear, or matrix-xml for xml)
        #[arg(short, long)]
        algorithm: Option<Algorithm>,

        /// How the files are split into tokens
        #[arg(short, long, value_enum, default_value_t = Granularity::Line)]
        granularity: Granularity,

        /// Largest matrix, in cells, the matrix algorithms may build
        #[arg(short, long, default_value_t = diffx::DEFAULT_THRESHOLD)]
        threshold: usize,

        /// Do not strip the common prefix and suffix first
        #[arg(long)]
        no_slice: bool,

        /// Print matched tokens as they appear in the original file
        #[arg(long)]
        prefer_from: bool,

        /// Ignore ASCII case when comparing text
        #[arg(short = 'i', long)]
        ignore_case: bool,
    },

    /// List the available algorithms
    #[command(visible_alias = "a")]
    Algorithms,
}

/// Options of the diff subcommand.
struct DiffArgs {
    config: DiffConfig,
    granularity: Granularity,
    ignore_case: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Diff {
            from,
            to,
            output,
            algorithm,
            granularity,
            threshold,
            no_slice,
            prefer_from,
            ignore_case,
        } => {
            let algorithm = algorithm.unwrap_or(match granularity {
                Granularity::Xml => Algorithm::MatrixXml,
                _ => Algorithm::MyersLinear,
            });
            let args = DiffArgs {
                config: DiffConfig::new(algorithm)
                    .with_threshold(threshold)
                    .with_slice(!no_slice)
                    .with_prefer_from(prefer_from),
                granularity,
                ignore_case,
            };
            run_diff(&from, &to, output.as_deref(), &args)
        }
        Commands::Algorithms => run_algorithms(),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Runs the diff and writes the script.
fn run_diff(
    from_path: &str,
    to_path: &str,
    output_path: Option<&str>,
    args: &DiffArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output: Box<dyn Write> = match output_path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    let processor = DiffProcessor::new(args.config);

    eprintln!("Tokenizing: {} and {}", from_path, to_path);
    if args.granularity == Granularity::Xml {
        let from = tokenize::xml_file(from_path)?;
        let to = tokenize::xml_file(to_path)?;
        tracing::debug!(from = from.len(), to = to.len(), "tokenized xml");

        let mut formatter = ShortFormatter::new(output);
        if args.ignore_case {
            let eq = |a: &XmlToken, b: &XmlToken| a.eq_ignore_ascii_case(b);
            processor.diff_structured_with(&from, &to, eq, &mut formatter)?;
        } else {
            processor.diff_structured(&from, &to, &mut formatter)?;
        }
        formatter.finish()?;
    } else {
        let from = tokenize::text(&fs::read_to_string(from_path)?, args.granularity);
        let to = tokenize::text(&fs::read_to_string(to_path)?, args.granularity);
        tracing::debug!(from = from.len(), to = to.len(), "tokenized text");

        let mut formatter = ShortFormatter::new(output);
        if args.ignore_case {
            processor.diff_with(&from, &to, IgnoreAsciiCase, &mut formatter)?;
        } else {
            processor.diff_with(&from, &to, DefaultEquality, &mut formatter)?;
        }
        formatter.finish()?;
    }

    eprintln!("Diff complete.");
    Ok(())
}

fn run_algorithms() -> Result<(), Box<dyn std::error::Error>> {
    let mut out = io::stdout().lock();
    for algorithm in Algorithm::ALL {
        let note = if algorithm.is_structured() {
            " (xml only)"
        } else if !algorithm.is_minimal() {
            " (heuristic)"
        } else {
            ""
        };
        writeln!(out, "{}{}", algorithm, note)?;
    }
    Ok(())
}
