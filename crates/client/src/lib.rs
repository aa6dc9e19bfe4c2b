//! Greensboro Lawn Care client library.
//!
//! Talks to the lawn care REST backend on behalf of one customer or provider:
//! - [`ResourceClient`] sends one request per call and classifies the outcome
//! - [`Session`] and the [`KeyValueStore`] keep the signed-in identity, the
//!   pending cart and cached service images between runs
//! - [`LocalCart`] holds purchases until checkout turns them into subscriptions
//! - [`views`] turns backend records into profile panels, card lists and notices
//! - [`flows`] validates forms and runs each user action end to end
//!
//! Every action returns `Result<_, ActionError>`; the caller turns failures
//! into a [`Notice`](views::Notice).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod flows;
pub mod image;
pub mod session;
pub mod store;
pub mod views;

pub use api::{Payload, ResourceClient, ResponseBody};
pub use cart::{CartError, CheckoutReport, LocalCart, Submitted, SubscriptionSink};
pub use config::{ClientConfig, ConfigError};
pub use error::{ActionError, ClientError, ValidationError};
pub use session::{Identity, Session};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
