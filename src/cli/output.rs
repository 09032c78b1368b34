//! Colored terminal output
//!
//! `colored` honours NO_COLOR and CLICOLOR_FORCE. Diagnostics go to stderr,
//! replay reports and trees to stdout.

use std::fmt::Display;

use colored::Colorize;

pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Replayed step that added or changed a vessel, e.g. `extracted: LAD`
pub fn step(label: &str, msg: &(impl Display + ?Sized)) {
    println!("{} {}: {}", "✓".green(), label.green(), msg);
}

/// Replayed step that removed vessels
pub fn removal(label: &str, msg: &(impl Display + ?Sized)) {
    println!("{} {}: {}", "✗".red(), label.red(), msg);
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Indented line below a step
pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}

/// Uncolored data (trees, names, TOML)
pub fn data(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
