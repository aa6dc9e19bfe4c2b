//! Core types for the lawn care client.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod card;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use card::{CardNumber, CardNumberError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use status::*;
