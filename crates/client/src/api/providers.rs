//! Provider routes.

use glc_core::{Provider, ProviderId, ProviderUpdate};
use reqwest::Method;
use tracing::instrument;

use super::{Payload, ResourceClient, ResponseBody};
use crate::error::ClientError;

impl ResourceClient {
    /// `GET /api/providers/{id}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a provider.
    pub async fn get_provider(&self, id: ProviderId) -> Result<Provider, ClientError> {
        self.get_json(&format!("/api/providers/{id}"), "provider")
            .await
    }

    /// `PUT /api/providers/{id}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the status is not 2xx.
    #[instrument(skip(self, update))]
    pub async fn update_provider(
        &self,
        id: ProviderId,
        update: &ProviderUpdate,
    ) -> Result<ResponseBody, ClientError> {
        self.request(
            Method::PUT,
            &format!("/api/providers/{id}"),
            Payload::json(update)?,
        )
        .await
    }
}
