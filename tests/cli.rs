//! Integration tests for the file-running CLI path.
//!
//! Writes a scratch `.yada` source file to a temp directory and exercises
//! `yada::cli::run_source` against its contents, the way `run_file` would
//! after reading the file from disk.

use std::fs;
use tempfile::tempdir;

use yada::cli::{run_source, FileOutcome};

#[test]
fn runs_a_script_file_and_prints_its_value() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("program.yada");
    fs::write(&path, "let add = fn(a, b) { a + b }; add(19, 23);").unwrap();

    let source = fs::read_to_string(&path).unwrap();
    match run_source(&source) {
        FileOutcome::Ok(value) => assert_eq!(value, "42"),
        _ => panic!("expected the script to evaluate successfully"),
    }
}

#[test]
fn reports_parse_errors_from_a_malformed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.yada");
    fs::write(&path, "let x 5;").unwrap();

    let source = fs::read_to_string(&path).unwrap();
    match run_source(&source) {
        FileOutcome::ParseErrors(errors) => assert!(!errors.is_empty()),
        _ => panic!("expected a parse-error outcome"),
    }
}

#[test]
fn surfaces_a_runtime_error_from_a_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad_types.yada");
    fs::write(&path, r#""a" - "b""#).unwrap();

    let source = fs::read_to_string(&path).unwrap();
    match run_source(&source) {
        FileOutcome::RuntimeError(message) => {
            assert_eq!(message, "unknown operator: STRING - STRING")
        }
        _ => panic!("expected a runtime-error outcome"),
    }
}
