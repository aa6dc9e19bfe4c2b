//! Greensboro Lawn Care Core - Shared types library.
//!
//! This crate provides the types shared by the client library and the `glc`
//! command-line front end:
//! - Typed entity ids (`CustomerId`, `ServiceId`, ...)
//! - Validated input values (`Email`, `CardNumber`)
//! - Money and the subscription price multiplier table
//! - Entity records and the partial-update payloads sent to the backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails and card numbers
//! - [`entity`] - Backend records and request payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod entity;
pub mod types;

pub use entity::*;
pub use types::*;
