//! Review routes.

use glc_core::{NewReview, ProviderId, Review, ReviewId, ServiceId};
use reqwest::Method;
use tracing::instrument;

use super::{Payload, ResourceClient, ResponseBody};
use crate::error::ClientError;

impl ResourceClient {
    /// `GET /api/reviews/service/{id}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a review list.
    pub async fn list_service_reviews(&self, service: ServiceId) -> Result<Vec<Review>, ClientError> {
        self.get_json(&format!("/api/reviews/service/{service}"), "review list")
            .await
    }

    /// `GET /api/reviews/provider/{id}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a review list.
    pub async fn list_provider_reviews(
        &self,
        provider: ProviderId,
    ) -> Result<Vec<Review>, ClientError> {
        self.get_json(&format!("/api/reviews/provider/{provider}"), "review list")
            .await
    }

    /// `POST /api/reviews`.
    ///
    /// Returns the raw body; the backend normally echoes the created review.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the status is not 2xx.
    #[instrument(skip(self, review), fields(service = %review.services.id))]
    pub async fn create_review(&self, review: &NewReview) -> Result<ResponseBody, ClientError> {
        self.request(Method::POST, "/api/reviews", Payload::json(review)?)
            .await
    }

    /// `POST /api/reviews/{id}/provider-response` with a plain-text body.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the status is not 2xx.
    #[instrument(skip(self, response))]
    pub async fn reply_to_review(&self, id: ReviewId, response: &str) -> Result<(), ClientError> {
        self.request(
            Method::POST,
            &format!("/api/reviews/{id}/provider-response"),
            Payload::Text(response.to_string()),
        )
        .await
        .map(|_| ())
    }
}
