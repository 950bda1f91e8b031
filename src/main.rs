//! debt-settle CLI
//!
//! Read shared-expense statements and print who should pay whom.
//!
//! # Usage
//!
//! ```bash
//! # Settle a ledger file
//! debt-settle --input trip.txt
//!
//! # Read from stdin, output as JSON
//! cat trip.txt | debt-settle --format json
//!
//! # Make the odd-cent assignment reproducible
//! debt-settle --input trip.txt --seed 42
//! ```

use debt_settle::input::ledger::LedgerBook;
use debt_settle::output::report::SettlementReport;
use debt_settle::settlement::engine::SettlementError;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::io::{self, Read};
use std::process;
use thiserror::Error;

fn print_usage() {
    eprintln!(
        r#"debt-settle — settle shared expenses with few transfers

USAGE:
    debt-settle [OPTIONS]

Reads ledger statements from --input or stdin, one per line:

    PAYER [PAYER ...] -> RECIPIENT AMOUNT   # optional comment

meaning RECIPIENT paid AMOUNT, split evenly between the PAYERs.

OPTIONS:
    --input <FILE>      Read statements from FILE instead of stdin
    --format <FORMAT>   Output format: text (default) or json
    --seed <N>          Seed for assigning leftover cents
    -h, --help          Show this message

Set RUST_LOG=debug for diagnostics.

EXAMPLES:
    debt-settle --input trip.txt
    debt-settle --input trip.txt --format json --seed 7"#
    );
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("unknown format '{0}', expected 'text' or 'json'")]
    UnknownFormat(String),
    #[error("invalid seed '{0}'")]
    InvalidSeed(String),
    #[error("error reading '{path}': {source}")]
    Read { path: String, source: io::Error },
    #[error(transparent)]
    Settlement(#[from] SettlementError),
    #[error("error writing JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug)]
struct CliConfig {
    input_path: Option<String>,
    format: OutputFormat,
    seed: Option<u64>,
}

enum Command {
    Settle(CliConfig),
    Help,
}

fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let mut config = CliConfig {
        input_path: None,
        format: OutputFormat::Text,
        seed: None,
    };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                let path = args.get(i).ok_or(CliError::MissingValue("--input"))?;
                config.input_path = Some(path.clone());
            }
            "--format" => {
                i += 1;
                config.format = match args.get(i).map(String::as_str) {
                    Some("text") => OutputFormat::Text,
                    Some("json") => OutputFormat::Json,
                    Some(other) => return Err(CliError::UnknownFormat(other.to_string())),
                    None => return Err(CliError::MissingValue("--format")),
                };
            }
            "--seed" => {
                i += 1;
                let raw = args.get(i).ok_or(CliError::MissingValue("--seed"))?;
                let seed = raw
                    .parse()
                    .map_err(|_| CliError::InvalidSeed(raw.clone()))?;
                config.seed = Some(seed);
            }
            "help" | "--help" | "-h" => return Ok(Command::Help),
            other => return Err(CliError::UnknownOption(other.to_string())),
        }
        i += 1;
    }
    Ok(Command::Settle(config))
}

fn read_input(path: Option<&str>) -> Result<String, CliError> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_string(),
            source,
        }),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|source| CliError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(text)
        }
    }
}

fn cmd_settle(config: &CliConfig) -> Result<(), CliError> {
    let text = read_input(config.input_path.as_deref())?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let book = LedgerBook::parse(&text, &mut rng);
    let settlement = book.settle()?;
    info!(
        "{} participants settled with {} transfers",
        book.registry().len(),
        settlement.len()
    );

    let report = SettlementReport::new(book.registry(), settlement.transactions());
    match config.format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage();
        process::exit(1);
    });

    match command {
        Command::Help => print_usage(),
        Command::Settle(config) => {
            if let Err(e) = cmd_settle(&config) {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let Ok(Command::Settle(config)) = parse_args(&[]) else {
            panic!("expected settle command");
        };
        assert_eq!(config.input_path, None);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_parse_all_options() {
        let parsed = parse_args(&args(&["--input", "trip.txt", "--format", "json", "--seed", "9"]));
        let Ok(Command::Settle(config)) = parsed else {
            panic!("expected settle command");
        };
        assert_eq!(config.input_path.as_deref(), Some("trip.txt"));
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_args(&args(&["--input"])),
            Err(CliError::MissingValue("--input"))
        ));
        assert!(matches!(
            parse_args(&args(&["--format", "xml"])),
            Err(CliError::UnknownFormat(_))
        ));
        assert!(matches!(
            parse_args(&args(&["--seed", "abc"])),
            Err(CliError::InvalidSeed(_))
        ));
        assert!(matches!(
            parse_args(&args(&["--verbose"])),
            Err(CliError::UnknownOption(_))
        ));
    }

    #[test]
    fn test_parse_help() {
        assert!(matches!(parse_args(&args(&["-h"])), Ok(Command::Help)));
    }
}
