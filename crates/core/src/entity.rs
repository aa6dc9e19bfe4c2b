//! Backend records and the payloads sent to create or update them.
//!
//! Records mirror the JSON the backend returns (camelCase field names). Fields
//! the backend may omit are `Option` or `#[serde(default)]` so a sparse
//! response still decodes. Payload types carry only what a request needs;
//! optional fields are skipped entirely when absent, never sent as `""`.

use core::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{
    CardNumber, CustomerId, Email, EntityRef, Price, ProviderId, ReviewId, ServiceId,
    SubscriptionId, SubscriptionType,
};

/// Normalise an optional form field: trimmed, and `None` when empty.
#[must_use]
pub fn optional_field(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

// =============================================================================
// Records
// =============================================================================

/// A customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub card_number: Option<CardNumber>,
}

/// A service provider account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: ProviderId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// A lawn care service offered by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Image as a `data:` URL, when the provider uploaded one.
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub available: bool,
}

const fn default_true() -> bool {
    true
}

/// Decode an explicit `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// A customer's subscription to a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: SubscriptionId,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub services: Option<Service>,
    #[serde(rename = "type")]
    pub kind: SubscriptionType,
    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub end_date: Option<NaiveDateTime>,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub active: bool,
}

/// The customer shown on a review card.
///
/// Older records carry `firstName`/`lastName` instead of `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reviewer {
    #[serde(default)]
    pub id: Option<CustomerId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Reviewer {
    /// Name shown on a review: `name`, then first/last, then email, then `Anonymous`.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().and_then(optional_field) {
            return name;
        }
        let first = self.first_name.as_deref().unwrap_or("").trim();
        let last = self.last_name.as_deref().unwrap_or("").trim();
        let full = format!("{first} {last}");
        if let Some(full) = optional_field(&full) {
            return full;
        }
        self.email
            .as_deref()
            .and_then(optional_field)
            .unwrap_or_else(|| "Anonymous".to_string())
    }
}

/// A customer's review of a service, with the provider's optional reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    #[serde(default)]
    pub customer: Option<Reviewer>,
    #[serde(default)]
    pub services: Option<Service>,
    #[serde(default)]
    pub overall_rating: Option<f64>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub provider_response: Option<String>,
    #[serde(default)]
    pub provider_response_date: Option<NaiveDateTime>,
}

impl Review {
    /// Star count for display, clamped to 0..=5.
    #[must_use]
    pub fn stars(&self) -> usize {
        let rating = self.overall_rating.unwrap_or(0.0);
        if rating.is_nan() || rating <= 0.0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=5
        let stars = rating.min(5.0) as usize;
        stars
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A pending purchase kept only in the client store until checkout.
///
/// `price` is always the base price; the subscription discount is applied
/// when the cart is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub service_id: ServiceId,
    #[serde(default)]
    pub service_name: String,
    #[serde(rename = "type")]
    pub kind: SubscriptionType,
    #[serde(default)]
    pub price: Price,
}

impl CartItem {
    /// Price shown for this line.
    #[must_use]
    pub fn display_price(&self) -> Price {
        self.price.adjusted_for(self.kind)
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// A password typed into a form.
///
/// Serialized as a plain string, but never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    /// Wrap a non-empty password; `None` when the field was left blank.
    #[must_use]
    pub fn new(value: &str) -> Option<Self> {
        (!value.is_empty()).then(|| Self(value.to_owned()))
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

/// Body of `POST /api/customers`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub name: String,
    pub email: Email,
    pub password: Password,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Body of `PUT /api/customers/{id}`.
///
/// Each `None` field is left out of the JSON, so the backend keeps its value.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<CardNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<Password>,
}

/// Body of `PUT /api/providers/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUpdate {
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<Password>,
}

/// Body of `POST /api/services` and `PUT /api/services/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

/// Body of `POST /api/subscriptions`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub customer: EntityRef<CustomerId>,
    pub services: EntityRef<ServiceId>,
    #[serde(rename = "type")]
    pub kind: SubscriptionType,
    pub start_date: NaiveDateTime,
    pub active: bool,
}

impl NewSubscription {
    /// An active subscription starting at `start_date`.
    #[must_use]
    pub fn active(customer: CustomerId, item: &CartItem, start_date: NaiveDateTime) -> Self {
        Self {
            customer: customer.into(),
            services: item.service_id.into(),
            kind: item.kind,
            start_date,
            active: true,
        }
    }
}

/// Body of `POST /api/reviews`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub customer: EntityRef<CustomerId>,
    pub services: EntityRef<ServiceId>,
    pub overall_rating: u8,
    pub comment: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_optional_field() {
        assert_eq!(optional_field("  "), None);
        assert_eq!(optional_field(" 555-0100 "), Some("555-0100".to_string()));
    }

    #[test]
    fn test_customer_update_skips_absent_fields() {
        let update = CustomerUpdate {
            name: "Jo".to_string(),
            email: Email::parse("jo@lawn.example").unwrap(),
            phone_number: None,
            address: Some("1 Elm St".to_string()),
            card_number: None,
            password: Password::new(""),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value,
            json!({ "name": "Jo", "email": "jo@lawn.example", "address": "1 Elm St" })
        );
    }

    #[test]
    fn test_customer_update_includes_present_fields() {
        let update = CustomerUpdate {
            name: "Jo".to_string(),
            email: Email::parse("jo@lawn.example").unwrap(),
            phone_number: Some("555".to_string()),
            address: None,
            card_number: Some(CardNumber::parse("4111 1111 1111 1111").unwrap()),
            password: Password::new("hunter2"),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["cardNumber"], json!(4_111_111_111_111_111_u64));
        assert_eq!(value["password"], json!("hunter2"));
        assert_eq!(value["phoneNumber"], json!("555"));
    }

    #[test]
    fn test_password_debug_redacted() {
        let password = Password::new("hunter2").unwrap();
        assert!(!format!("{password:?}").contains("hunter2"));
    }

    #[test]
    fn test_new_subscription_shape() {
        let item = CartItem {
            service_id: ServiceId::new(9),
            service_name: "Mowing".to_string(),
            kind: SubscriptionType::Weekly,
            price: Price::from_cents(4000),
        };
        let start = NaiveDateTime::parse_from_str("2026-04-01 08:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let value = serde_json::to_value(NewSubscription::active(CustomerId::new(3), &item, start))
            .unwrap();
        assert_eq!(
            value,
            json!({
                "customer": { "id": 3 },
                "services": { "id": 9 },
                "type": "WEEKLY",
                "startDate": "2026-04-01T08:00:00",
                "active": true
            })
        );
    }

    #[test]
    fn test_cart_item_wire_format() {
        let item: CartItem = serde_json::from_value(json!({
            "serviceId": 4, "serviceName": "Edging", "type": "BIWEEKLY", "price": 100
        }))
        .unwrap();
        assert_eq!(item.display_price(), Price::from_cents(9300));
        // stored price is untouched by display
        assert_eq!(item.price, Price::from_cents(10000));
    }

    #[test]
    fn test_sparse_service_decodes() {
        let service: Service = serde_json::from_value(json!({ "id": 1, "name": "Mulch" })).unwrap();
        assert!(service.available);
        assert_eq!(service.price, None);
    }

    #[test]
    fn test_subscription_decodes_backend_shape() {
        let sub: Subscription = serde_json::from_value(json!({
            "id": 12,
            "customer": { "id": 3, "name": "Jo", "email": "jo@lawn.example", "password": "x" },
            "services": { "id": 9, "name": "Mowing", "price": 40.00, "available": true },
            "type": "ONE_TIME",
            "startDate": "2026-04-01T08:00:00.123",
            "endDate": null,
            "active": true
        }))
        .unwrap();
        assert_eq!(sub.kind, SubscriptionType::OneTime);
        assert_eq!(sub.services.unwrap().price, Some(Price::from_cents(4000)));
    }

    #[test]
    fn test_subscription_decodes_id_only_nested_records() {
        let sub: Subscription = serde_json::from_value(json!({
            "id": 13,
            "customer": {
                "id": 3, "name": null, "email": null, "password": null,
                "address": null, "phoneNumber": null, "cardNumber": null
            },
            "services": {
                "id": 9, "name": null, "description": null, "price": null,
                "imageData": null, "available": null
            },
            "type": "WEEKLY",
            "startDate": "2026-04-01T08:00:00",
            "endDate": null,
            "active": null
        }))
        .unwrap();
        assert_eq!(sub.kind, SubscriptionType::Weekly);
        assert!(sub.active);
        let customer = sub.customer.unwrap();
        assert_eq!(customer.id, CustomerId::new(3));
        assert!(customer.name.is_empty());
        assert_eq!(customer.card_number, None);
        let service = sub.services.unwrap();
        assert_eq!(service.id, ServiceId::new(9));
        assert!(service.name.is_empty());
        assert!(service.available);
        assert_eq!(service.price, None);
    }

    #[test]
    fn test_reviewer_display_name_fallbacks() {
        let named = Reviewer {
            name: Some(" Sam ".to_string()),
            ..Reviewer::default()
        };
        assert_eq!(named.display_name(), "Sam");

        let split = Reviewer {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            ..Reviewer::default()
        };
        assert_eq!(split.display_name(), "Ada Lovelace");

        let email_only = Reviewer {
            email: Some("x@y.z".to_string()),
            ..Reviewer::default()
        };
        assert_eq!(email_only.display_name(), "x@y.z");
        assert_eq!(Reviewer::default().display_name(), "Anonymous");
    }

    #[test]
    fn test_review_stars_clamped() {
        let mut review: Review = serde_json::from_value(json!({ "id": 1 })).unwrap();
        assert_eq!(review.stars(), 0);
        review.overall_rating = Some(7.0);
        assert_eq!(review.stars(), 5);
        review.overall_rating = Some(4.0);
        assert_eq!(review.stars(), 4);
    }
}
