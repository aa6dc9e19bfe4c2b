//! Client-side temporary cart.
//!
//! Pending purchases live in the store under [`keys::CART`] as a JSON array,
//! in insertion order. Nothing reaches the backend until [`LocalCart::checkout`].
//!
//! # Checkout failure policy
//!
//! Checkout creates one subscription per item, strictly in cart order, and
//! stops at the first failure. Subscriptions created before the failure are
//! **not** rolled back and every item stays in the cart. The returned
//! [`CheckoutReport`] lists what was submitted so the caller can tell the user.

use core::fmt;

use chrono::NaiveDateTime;
use glc_core::{CartItem, CustomerId, NewSubscription, Price, Subscription, SubscriptionType};
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::error::ClientError;
use crate::store::{KeyValueStore, StoreError, keys};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Your cart is empty")]
    Empty,

    #[error("No cart item at position {index} (cart has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Where checkout sends new subscriptions.
///
/// Implemented by [`ResourceClient`](crate::ResourceClient).
#[allow(async_fn_in_trait)]
pub trait SubscriptionSink {
    /// Create one subscription.
    ///
    /// Any 2xx counts as created. The echoed record is returned when it can
    /// be read, and `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns the request error; checkout stops on the first one.
    async fn create(
        &self,
        subscription: &NewSubscription,
    ) -> Result<Option<Subscription>, ClientError>;
}

/// One cart row as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Position in the cart, used by `remove`.
    pub index: usize,
    pub service_name: String,
    pub kind: SubscriptionType,
    /// Price after the subscription adjustment.
    pub price: Price,
}

impl fmt::Display for CartLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.service_name.is_empty() {
            "Service"
        } else {
            &self.service_name
        };
        write!(
            f,
            "[{}] {name}: {} - {}",
            self.index,
            self.kind.label(),
            self.price
        )
    }
}

/// Why checkout stopped early.
#[derive(Debug)]
pub struct CheckoutFailure {
    /// Position of the item that failed.
    pub index: usize,
    pub item: CartItem,
    pub error: ClientError,
}

/// A cart item the backend accepted.
#[derive(Debug)]
pub struct Submitted {
    pub item: CartItem,
    /// The backend's copy of the new subscription, if its reply was readable.
    pub subscription: Option<Subscription>,
}

/// Per-step result of a checkout.
#[derive(Debug)]
pub struct CheckoutReport {
    /// Items created on the backend, in cart order.
    pub submitted: Vec<Submitted>,
    /// Set when checkout stopped before the end of the cart.
    pub failure: Option<CheckoutFailure>,
}

impl CheckoutReport {
    /// Whether every item was submitted.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// The pending cart stored in a [`KeyValueStore`].
#[derive(Debug)]
pub struct LocalCart<S> {
    store: S,
}

impl<S: KeyValueStore> LocalCart<S> {
    /// Wrap `store`; pass `&mut store` to keep using it afterwards.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Items in cart order.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be read or parsed.
    pub fn items(&self) -> Result<Vec<CartItem>, CartError> {
        let Some(raw) = self.store.get(keys::CART)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|source| {
            CartError::Store(StoreError::Corrupt {
                key: keys::CART.to_string(),
                source,
            })
        })
    }

    fn save(&mut self, items: &[CartItem]) -> Result<(), CartError> {
        let raw = serde_json::to_string(items).map_err(|source| StoreError::Corrupt {
            key: keys::CART.to_string(),
            source,
        })?;
        self.store.set(keys::CART, raw)?;
        Ok(())
    }

    /// Append `item`; returns its position.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be read or written.
    pub fn add(&mut self, item: CartItem) -> Result<usize, CartError> {
        let mut items = self.items()?;
        items.push(item);
        self.save(&items)?;
        Ok(items.len() - 1)
    }

    /// Remove the item at `index`; later items move down by one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::IndexOutOfRange`] for a bad index, or a store error.
    pub fn remove(&mut self, index: usize) -> Result<CartItem, CartError> {
        let mut items = self.items()?;
        if index >= items.len() {
            return Err(CartError::IndexOutOfRange {
                index,
                len: items.len(),
            });
        }
        let removed = items.remove(index);
        self.save(&items)?;
        Ok(removed)
    }

    /// Sum of adjusted prices, recomputed from the stored items.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be read.
    pub fn total(&self) -> Result<Price, CartError> {
        Ok(total_of(&self.items()?))
    }

    /// Display rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be read.
    pub fn lines(&self) -> Result<Vec<CartLine>, CartError> {
        Ok(self
            .items()?
            .into_iter()
            .enumerate()
            .map(|(index, item)| CartLine {
                index,
                price: item.display_price(),
                service_name: item.service_name,
                kind: item.kind,
            })
            .collect())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.store.remove(keys::CART)?;
        Ok(())
    }

    /// Turn every item into an active subscription for `customer`.
    ///
    /// Items are submitted one at a time in cart order, all stamped with
    /// `started_at`. On full success the cart is cleared. On failure the cart
    /// is left as it was; see the module docs for the policy.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Empty`] without contacting the backend when there
    /// is nothing to check out, or a store error. Request failures are
    /// reported in the [`CheckoutReport`], not as an `Err`.
    #[instrument(skip(self, sink))]
    pub async fn checkout(
        &mut self,
        sink: &impl SubscriptionSink,
        customer: CustomerId,
        started_at: NaiveDateTime,
    ) -> Result<CheckoutReport, CartError> {
        let items = self.items()?;
        if items.is_empty() {
            return Err(CartError::Empty);
        }

        let mut submitted = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let body = NewSubscription::active(customer, &item, started_at);
            match sink.create(&body).await {
                Ok(subscription) => submitted.push(Submitted { item, subscription }),
                Err(error) => {
                    error!(
                        index,
                        service = %item.service_id,
                        submitted = submitted.len(),
                        error = %error,
                        "Checkout stopped"
                    );
                    return Ok(CheckoutReport {
                        submitted,
                        failure: Some(CheckoutFailure { index, item, error }),
                    });
                }
            }
        }

        self.clear()?;
        info!(count = submitted.len(), "Checkout complete");
        Ok(CheckoutReport {
            submitted,
            failure: None,
        })
    }
}

/// Sum of adjusted prices; zero for an empty slice.
#[must_use]
pub fn total_of(items: &[CartItem]) -> Price {
    items.iter().map(CartItem::display_price).sum()
}
