//! Pretty-printing diagnostics to the console.

use colored::Colorize;

/// Pretty-print an error message to stderr.
pub fn error(message: impl std::fmt::Display) {
    let tag = "error:".red().bold();
    eprintln!("{tag} {message}");
}

/// Pretty-print an informational message to stdout.
pub fn info(message: impl std::fmt::Display) {
    let tag = "info:".cyan().bold();
    println!("{tag} {message}");
}
