//! Customer routes.

use glc_core::{Customer, CustomerId, CustomerUpdate, NewCustomer};
use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use super::{Payload, ResourceClient, ResponseBody};
use crate::error::ClientError;

impl ResourceClient {
    /// `POST /api/customers`.
    ///
    /// Returns the raw response so the caller can look for the new id in
    /// whichever shape the backend used.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the status is not 2xx.
    #[instrument(skip(self, customer), fields(email = %customer.email))]
    pub async fn create_customer(&self, customer: &NewCustomer) -> Result<ResponseBody, ClientError> {
        self.request(Method::POST, "/api/customers", Payload::json(customer)?)
            .await
    }

    /// `GET /api/customers`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a customer list.
    pub async fn list_customers(&self) -> Result<Vec<Customer>, ClientError> {
        self.get_json("/api/customers", "customer list").await
    }

    /// `GET /api/customers/{id}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a customer.
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, ClientError> {
        self.get_json(&format!("/api/customers/{id}"), "customer")
            .await
    }

    /// `PUT /api/customers/{id}`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the status is not 2xx.
    #[instrument(skip(self, update))]
    pub async fn update_customer(
        &self,
        id: CustomerId,
        update: &CustomerUpdate,
    ) -> Result<ResponseBody, ClientError> {
        self.request(
            Method::PUT,
            &format!("/api/customers/{id}"),
            Payload::json(update)?,
        )
        .await
    }
}

/// Find the id of a newly created record.
///
/// Accepts `{ "id": n }` and `{ "data": { "id": n } }`; ids sent as strings
/// are accepted too.
#[must_use]
pub fn created_id(body: &ResponseBody) -> Option<i64> {
    let value = match body {
        ResponseBody::Json(value) => value.clone(),
        ResponseBody::Text(text) => serde_json::from_str::<Value>(text).ok()?,
    };
    let id = value
        .get("id")
        .filter(|v| !v.is_null())
        .or_else(|| value.get("data").and_then(|d| d.get("id")))?;
    match id {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|id| *id > 0)
}
