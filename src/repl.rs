//! The interactive `>> ` prompt loop.
//!
//! Each line is parsed and evaluated against a single [`Environment`] shared
//! across the whole session, so a `let` on one line is visible on the next.
//! A blank line or end-of-input ends the session.

use std::io::{BufRead, Write};

use crate::object::Environment;
use crate::run_with_env;

const PROMPT: &str = ">> ";

pub fn start<R: BufRead, W: Write>(mut input: R, mut output: W) {
    let env = Environment::new();

    loop {
        write!(output, "{}", PROMPT).ok();
        output.flush().ok();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        if line.trim().is_empty() {
            break;
        }

        match run_with_env(&line, &env) {
            Ok(result) => {
                writeln!(output, "{}", result).ok();
                writeln!(output).ok();
            }
            Err(errors) => {
                writeln!(output, "ERROR: Parsing errors:").ok();
                for error in &errors {
                    writeln!(output, "\t{}", error).ok();
                }
            }
        }
    }
}
