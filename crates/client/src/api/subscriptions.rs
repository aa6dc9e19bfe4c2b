//! Subscription routes.

use glc_core::{CustomerId, NewSubscription, Subscription, SubscriptionId};
use reqwest::Method;
use tracing::{instrument, warn};

use super::{Payload, ResourceClient};
use crate::cart::SubscriptionSink;
use crate::error::ClientError;

impl ResourceClient {
    /// `GET /api/subscriptions/customer/{id}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a subscription list.
    pub async fn list_customer_subscriptions(
        &self,
        customer: CustomerId,
    ) -> Result<Vec<Subscription>, ClientError> {
        self.get_json(
            &format!("/api/subscriptions/customer/{customer}"),
            "subscription list",
        )
        .await
    }

    /// `POST /api/subscriptions`.
    ///
    /// Any 2xx means the subscription exists. The backend echoes the saved
    /// entity with its nested customer and service reduced to bare ids, so the
    /// echo is decoded when possible and otherwise dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the status is not 2xx.
    #[instrument(skip(self, subscription), fields(service = %subscription.services.id))]
    pub async fn create_subscription(
        &self,
        subscription: &NewSubscription,
    ) -> Result<Option<Subscription>, ClientError> {
        let body = self
            .request(
                Method::POST,
                "/api/subscriptions",
                Payload::json(subscription)?,
            )
            .await?;
        match body.decode::<Subscription>("subscription") {
            Ok(created) => Ok(Some(created)),
            Err(e) => {
                warn!(error = %e, "Subscription created but the reply was not readable");
                Ok(None)
            }
        }
    }

    /// `POST /api/subscriptions/{id}/cancel`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the status is not 2xx.
    #[instrument(skip(self))]
    pub async fn cancel_subscription(&self, id: SubscriptionId) -> Result<(), ClientError> {
        self.request(
            Method::POST,
            &format!("/api/subscriptions/{id}/cancel"),
            Payload::Empty,
        )
        .await
        .map(|_| ())
    }
}

impl SubscriptionSink for ResourceClient {
    async fn create(
        &self,
        subscription: &NewSubscription,
    ) -> Result<Option<Subscription>, ClientError> {
        self.create_subscription(subscription).await
    }
}
