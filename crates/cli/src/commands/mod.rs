//! Command handlers.
//!
//! Each handler runs one user action against the [`Context`](crate::context::Context)
//! and either prints a view or returns a notice. Errors are turned into
//! notices by `main`.

pub mod account;
pub mod cart;
pub mod customers;
pub mod reviews;
pub mod services;
pub mod session;
pub mod subscriptions;

use glc_client::views::Notice;

/// What a handler produced.
#[derive(Debug)]
pub enum Outcome {
    /// A view was printed.
    Shown,
    /// A view was printed that reports a failure.
    Failed,
    /// Print this notice.
    Notice(Notice),
}
