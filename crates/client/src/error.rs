//! Error taxonomy for user actions.
//!
//! Every user-triggered operation returns `Result<T, ActionError>`. Errors are
//! recovered at the action boundary (the CLI command) and turned into a
//! [`Notice`](crate::views::Notice); none of them outlive a single action.

use glc_core::{CardNumberError, EmailError};
use thiserror::Error;

use crate::cart::CartError;
use crate::store::StoreError;
use crate::views::ListError;

/// Errors returned by [`ResourceClient`](crate::ResourceClient) requests.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Response status code.
        status: u16,
        /// Response body text, verbatim (may be empty).
        body: String,
    },

    /// The request could not complete (DNS, connection, timeout, abort).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The backend answered 2xx but the body lacks what the caller needs.
    #[error("{0}")]
    DataShape(String),

    /// The request payload could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The request URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// HTTP status code, when the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Form input rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("{0} is required.")]
    MissingField(&'static str),

    /// Several required fields are empty; carries the form's own message.
    #[error("{0}")]
    MissingFields(&'static str),

    /// Email failed validation.
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    /// Card number failed validation.
    #[error("{0}")]
    CardNumber(#[from] CardNumberError),

    /// Price is not a positive decimal.
    #[error("Price must be a positive number (got '{0}').")]
    Price(String),

    /// Rating outside 1..=5.
    #[error("Rating must be between 1 and 5 (got {0}).")]
    Rating(u8),

    /// The image file could not be read.
    #[error("Could not read image {path}: {reason}")]
    Image {
        /// Path that was given.
        path: String,
        /// Underlying I/O error text.
        reason: String,
    },

    /// The action needs a signed-in customer or provider.
    #[error("You must be logged in as a {0} to do that.")]
    NotSignedIn(&'static str),
}

/// Any failure of a single user action.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    List(#[from] ListError),
}

impl ActionError {
    /// The underlying request error, if this action failed on the network side.
    #[must_use]
    pub const fn as_client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Client(err) | Self::List(ListError::Client(err)) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for `ActionError`.
pub type Result<T> = std::result::Result<T, ActionError>;
