//! # tagson CLI
//!
//! Converts one markup file to JSON and optionally appends the run's
//! diagnostics to a log file.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tagson::{ConvertOptions, Converter, Profile, RunContext, WriteOutcome};

/// Convert tag-based markup to JSON.
#[derive(Parser, Debug)]
#[command(name = "tagson", version, about)]
struct Cli {
    /// Markup file to convert.
    #[arg(default_value = "input.xml")]
    input: PathBuf,

    /// JSON file to write; overwritten if it exists.
    #[arg(short, long, default_value = "output.json")]
    output: PathBuf,

    /// Append the run's diagnostics to the log file.
    #[arg(short, long)]
    logs: bool,

    /// Log file used with --logs.
    #[arg(long, default_value = "logs.txt")]
    log_file: PathBuf,

    /// JSON profile with a schema tree and output shape.
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Tokens the lexer may queue ahead of the validator.
    #[arg(long, default_value_t = 256)]
    capacity: usize,

    /// Spaces per nesting level in the output.
    #[arg(long, default_value_t = 2)]
    indent: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let run = RunContext::start();
    let cli = Cli::parse();

    let profile = match &cli.schema {
        Some(path) => match Profile::load(path) {
            Ok(profile) => profile,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Profile::default(),
    };
    let options = ConvertOptions::new()
        .with_channel_capacity(cli.capacity)
        .with_indent(cli.indent)
        .with_shape(profile.shape.clone());
    let converter = match profile
        .build_schema()
        .and_then(|schema| Converter::new(schema, options))
    {
        Ok(converter) => converter,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut status = ExitCode::SUCCESS;
    let mut chars = 0;
    match converter.convert_file(&cli.input) {
        Ok(conversion) => {
            chars = conversion.chars_read();
            if let Some(e) = conversion.input_error() {
                eprintln!("{e}");
                status = ExitCode::FAILURE;
            }
            match converter.write(&conversion, &cli.output) {
                Ok(WriteOutcome::Written { objects }) => {
                    tracing::debug!(objects, "conversion complete");
                }
                Ok(WriteOutcome::NothingToWrite) => {}
                Err(e) => {
                    eprintln!("{e}");
                    status = ExitCode::FAILURE;
                }
            }
        }
        Err(e) => {
            eprintln!("{e}");
            status = ExitCode::FAILURE;
        }
    }

    if cli.logs {
        if let Err(e) = converter.diagnostics().flush_to_path(&cli.log_file, &run, chars) {
            eprintln!("{e}");
            status = ExitCode::FAILURE;
        }
    }
    status
}
