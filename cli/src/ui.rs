//! Shared UI utilities for consistent terminal output.

use colored::Colorize;

/// Standard symbols used throughout the CLI for consistent visual language.
pub mod symbols {
    pub const ARROW: &str = "→";
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "!";
    pub const BULLET: &str = "•";
    /// Written this run
    pub const PLUS: &str = "+";
    /// Unchanged since an earlier round
    pub const EQUALS: &str = "=";
}

pub fn print_step(message: &str) {
    println!("{} {}", symbols::ARROW.blue().bold(), message);
}

pub fn print_success(message: &str) {
    println!("{} {}", symbols::SUCCESS.green().bold(), message);
}

pub fn print_error(message: &str) {
    println!("{} {}", symbols::FAILURE.red().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", symbols::WARNING.yellow().bold(), message);
}

/// Print a dimmed info line (indented).
pub fn print_info(message: &str) {
    println!("  {}", message.dimmed());
}

pub fn print_bullet(message: &str) {
    println!("  {} {}", symbols::BULLET.dimmed(), message);
}

/// `1 unit` / `3 units`
pub fn plural(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}
