//! Command-line entry point for the Yada interpreter.

use clap::Parser as ClapParser;
use std::fs;
use std::path::PathBuf;

use crate::object::Environment;
use crate::style::Style;
use crate::{eval_program, repl};
use crate::parser::Parser;

#[derive(ClapParser)]
#[command(name = "yada")]
#[command(about = "A tree-walking interpreter for the Yada language", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Script file to run. Starts the REPL if omitted.
    pub file: Option<PathBuf>,
}

/// Entry point for the CLI
pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.file {
        Some(path) => run_file(&path),
        None => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            repl::start(stdin.lock(), stdout.lock());
            Ok(())
        }
    }
}

/// The result of running a single source file, kept separate from the
/// process-exiting `run_file` wrapper so the file-running path can be
/// exercised in tests without tearing down the test process.
pub enum FileOutcome {
    Ok(String),
    ParseErrors(Vec<String>),
    RuntimeError(String),
}

pub fn run_source(source: &str) -> FileOutcome {
    let mut parser = Parser::from_source(source);
    let program = parser.parse_program();

    if !parser.errors.is_empty() {
        let rendered = parser.errors.iter().map(|e| e.display_with_source(source)).collect();
        return FileOutcome::ParseErrors(rendered);
    }

    let env = Environment::new();
    let result = eval_program(&program, &env);
    match result {
        crate::object::Value::Error(message) => FileOutcome::RuntimeError(message),
        other => FileOutcome::Ok(other.to_string()),
    }
}

fn run_file(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(path)?;
    match run_source(&source) {
        FileOutcome::Ok(value) => {
            println!("{}", value);
            Ok(())
        }
        FileOutcome::ParseErrors(errors) => {
            eprintln!("{}", Style::bold_red("Parsing errors:"));
            for error in &errors {
                eprintln!("  {}", error);
            }
            std::process::exit(1);
        }
        FileOutcome::RuntimeError(message) => {
            eprintln!("ERROR: {}", message);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_source_evaluates_a_well_formed_program() {
        match run_source("let x = 2 + 3; x * 10") {
            FileOutcome::Ok(value) => assert_eq!(value, "50"),
            _ => panic!("expected Ok outcome"),
        }
    }

    #[test]
    fn run_source_reports_parse_errors_without_evaluating() {
        match run_source("let x 5;") {
            FileOutcome::ParseErrors(errors) => assert!(!errors.is_empty()),
            _ => panic!("expected ParseErrors outcome"),
        }
    }

    #[test]
    fn run_source_surfaces_runtime_errors() {
        match run_source("5 + true;") {
            FileOutcome::RuntimeError(message) => {
                assert_eq!(message, "type mismatch: INTEGER + BOOLEAN")
            }
            _ => panic!("expected RuntimeError outcome"),
        }
    }
}
