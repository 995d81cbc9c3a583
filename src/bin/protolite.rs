//! Command line front-end for the schema parser.
//!
//! ```bash
//! # Dump the syntax tree as JSON
//! protolite parse --file schema.proto
//!
//! # Reformat from stdin
//! cat schema.proto | protolite fmt --indent 2
//!
//! # Fail if a file is not formatted
//! protolite fmt --file schema.proto --check
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use protolite::{FormatOptions, Formatter, ParseOptions};

#[derive(Parser)]
#[command(name = "protolite")]
#[command(version)]
#[command(about = "Parse and format protolite schema files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a schema and print its syntax tree as JSON
    Parse {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Maximum block nesting depth
        #[arg(long, default_value_t = protolite::parser::grammar::DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },

    /// Reformat a schema
    Fmt {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Spaces per nesting level
        #[arg(long, default_value_t = 4)]
        indent: usize,

        /// Maximum block nesting depth
        #[arg(long, default_value_t = protolite::parser::grammar::DEFAULT_MAX_DEPTH)]
        max_depth: usize,

        /// Exit with an error instead of printing when the input is not formatted
        #[arg(long)]
        check: bool,
    },
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => {
            tracing::debug!(path = %path.display(), "reading schema");
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            tracing::debug!("reading schema from stdin");
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Parse { file, max_depth } => {
            let source = read_input(file.as_ref())?;
            let block = protolite::parse_with(&source, &ParseOptions { max_depth })?;
            tracing::info!(statements = block.len(), depth = block.depth(), "parsed schema");
            println!("{}", serde_json::to_string_pretty(&block)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Fmt {
            file,
            indent,
            max_depth,
            check,
        } => {
            let source = read_input(file.as_ref())?;
            let options = ParseOptions { max_depth };
            let formatter = Formatter::with_options(FormatOptions {
                indent_width: indent,
            });

            if check {
                if formatter.check(&source, &options)? {
                    return Ok(ExitCode::SUCCESS);
                }
                let name = file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<stdin>".to_string());
                eprintln!("{} is not formatted", name);
                return Ok(ExitCode::FAILURE);
            }

            let block = protolite::parse_with(&source, &options)?;
            let output = formatter.render(&block);
            print!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            tracing::warn!(error = %e, "command failed");
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
