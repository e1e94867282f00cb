//! Colored status lines for the terminal.

use crossterm::style::Stylize;
use std::fmt::Display;

pub(crate) fn step(message: impl Display) {
    println!("{} {message}", "====>>".green().bold());
}

pub(crate) fn success(message: impl Display) {
    println!("{} {}", "====>>".green().bold(), message.to_string().green());
}

pub(crate) fn warn(message: impl Display) {
    println!("{} {}", "WARNING".yellow().bold(), message.to_string().yellow());
}
