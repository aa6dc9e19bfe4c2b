//! Service routes.

use glc_core::{Service, ServiceId, ServiceInput};
use reqwest::Method;
use tracing::instrument;

use super::{Payload, ResourceClient};
use crate::error::ClientError;

impl ResourceClient {
    /// `GET /api/services` - services currently offered.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a service list.
    pub async fn list_services(&self) -> Result<Vec<Service>, ClientError> {
        self.get_json("/api/services", "service list").await
    }

    /// `GET /api/services/all` - every service, including unavailable ones.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a service list.
    pub async fn list_all_services(&self) -> Result<Vec<Service>, ClientError> {
        self.get_json("/api/services/all", "service list").await
    }

    /// `GET /api/services/{id}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a service.
    pub async fn get_service(&self, id: ServiceId) -> Result<Service, ClientError> {
        self.get_json(&format!("/api/services/{id}"), "service")
            .await
    }

    /// `POST /api/services`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not the created service.
    #[instrument(skip(self, service), fields(name = %service.name))]
    pub async fn create_service(&self, service: &ServiceInput) -> Result<Service, ClientError> {
        self.send_json(Method::POST, "/api/services", service, "service")
            .await
    }

    /// `PUT /api/services/{id}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not the updated service.
    #[instrument(skip(self, service))]
    pub async fn update_service(
        &self,
        id: ServiceId,
        service: &ServiceInput,
    ) -> Result<Service, ClientError> {
        self.send_json(
            Method::PUT,
            &format!("/api/services/{id}"),
            service,
            "service",
        )
        .await
    }

    /// `DELETE /api/services/{id}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the status is not 2xx.
    #[instrument(skip(self))]
    pub async fn delete_service(&self, id: ServiceId) -> Result<(), ClientError> {
        self.request(
            Method::DELETE,
            &format!("/api/services/{id}"),
            Payload::Empty,
        )
        .await
        .map(|_| ())
    }
}
