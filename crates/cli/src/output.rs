//! Terminal output.
//!
//! Views and notices go to stdout; logs go to stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use core::fmt::Display;

use glc_client::views::Notice;

use crate::StartupError;

/// Print a rendered view.
pub fn show(view: &impl Display) {
    println!("{view}");
}

pub fn notice(notice: &Notice) {
    println!("{notice}");
}

pub fn startup_failure(err: &StartupError) {
    eprintln!("Error: {err}");
}
