//! Yada entry point.

fn main() {
    if let Err(e) = yada::cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
