//! User actions.
//!
//! Each action follows the same shape: validate the form, build the payload,
//! make the request, then update the session, store or view. Validation
//! failures are returned before anything is sent.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDateTime;
use glc_core::{
    CardNumber, CartItem, CustomerId, CustomerUpdate, Email, NewCustomer, NewReview, Password,
    Price, ProviderId, ProviderUpdate, Service, ServiceId, ServiceInput, SubscriptionType,
    optional_field,
};
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::api::{ResourceClient, created_id};
use crate::cart::{CheckoutReport, LocalCart};
use crate::error::{ClientError, Result, ValidationError};
use crate::image::{cache_service_image, load_data_url};
use crate::session::{Identity, Session};
use crate::store::KeyValueStore;
use crate::views::{ProfilePanel, render_profile};

// =============================================================================
// Forms
// =============================================================================

fn required(value: &str, label: &'static str) -> std::result::Result<String, ValidationError> {
    optional_field(value).ok_or(ValidationError::MissingField(label))
}

/// Sign-up form input.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub phone_number: String,
}

impl SignupForm {
    /// # Errors
    ///
    /// Returns the first missing or malformed field.
    pub fn validate(&self) -> std::result::Result<NewCustomer, ValidationError> {
        let name = required(&self.name, "Name")?;
        let email = Email::parse(&required(&self.email, "Email")?)?;
        let password = Password::new(&self.password).ok_or(ValidationError::MissingField("Password"))?;
        let address = required(&self.address, "Address")?;
        Ok(NewCustomer {
            name,
            email,
            password,
            address,
            phone_number: optional_field(&self.phone_number),
        })
    }
}

const NAME_AND_EMAIL: &str = "Name and email are required.";

fn name_and_email(name: &str, email: &str) -> std::result::Result<(String, Email), ValidationError> {
    match (optional_field(name), optional_field(email)) {
        (Some(name), Some(email)) => Ok((name, Email::parse(&email)?)),
        _ => Err(ValidationError::MissingFields(NAME_AND_EMAIL)),
    }
}

/// Customer profile edit form. Blank optional fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct EditCustomerForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub card_number: String,
    pub password: String,
}

impl EditCustomerForm {
    /// # Errors
    ///
    /// Returns an error if name or email is missing, or the card number is
    /// not 13 to 19 digits.
    pub fn validate(&self) -> std::result::Result<CustomerUpdate, ValidationError> {
        let (name, email) = name_and_email(&self.name, &self.email)?;
        let card_number = optional_field(&self.card_number)
            .map(|raw| CardNumber::parse(&raw))
            .transpose()?;
        Ok(CustomerUpdate {
            name,
            email,
            phone_number: optional_field(&self.phone_number),
            address: optional_field(&self.address),
            card_number,
            password: Password::new(&self.password),
        })
    }
}

/// Provider profile edit form.
#[derive(Debug, Clone, Default)]
pub struct EditProviderForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

impl EditProviderForm {
    /// # Errors
    ///
    /// Returns an error if name or email is missing or malformed.
    pub fn validate(&self) -> std::result::Result<ProviderUpdate, ValidationError> {
        let (name, email) = name_and_email(&self.name, &self.email)?;
        Ok(ProviderUpdate {
            name,
            email,
            phone_number: optional_field(&self.phone_number),
            password: Password::new(&self.password),
        })
    }
}

/// New service form. `image` is a local file to upload.
#[derive(Debug, Clone, Default)]
pub struct ServiceForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: Option<PathBuf>,
}

impl ServiceForm {
    /// Validate and read the image file, if one was given.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is blank, the price is not a
    /// positive number, or the image cannot be read.
    pub fn validate(&self) -> std::result::Result<ServiceInput, ValidationError> {
        const MISSING: &str = "Please fill in name, description and price.";
        let (Some(name), Some(description), Some(raw_price)) = (
            optional_field(&self.name),
            optional_field(&self.description),
            optional_field(&self.price),
        ) else {
            return Err(ValidationError::MissingFields(MISSING));
        };
        let amount = Decimal::from_str(raw_price.trim_start_matches('$'))
            .map_err(|_| ValidationError::Price(raw_price.clone()))?;
        if amount <= Decimal::ZERO {
            return Err(ValidationError::Price(raw_price));
        }
        let image_data = self.image.as_deref().map(load_data_url).transpose()?;
        Ok(ServiceInput {
            name,
            description,
            price: Price::new(amount),
            image_data,
            available: None,
        })
    }
}

/// Review form.
#[derive(Debug, Clone, Default)]
pub struct ReviewForm {
    pub service: Option<ServiceId>,
    pub rating: Option<u8>,
    pub comment: String,
}

impl ReviewForm {
    /// Build the review as `customer`.
    ///
    /// # Errors
    ///
    /// Returns an error if no service or rating was chosen, the rating is
    /// outside 1 to 5, or nobody is signed in.
    pub fn validate(
        &self,
        customer: Option<CustomerId>,
    ) -> std::result::Result<NewReview, ValidationError> {
        let service = self
            .service
            .ok_or(ValidationError::MissingFields("Please select a service."))?;
        let rating = self
            .rating
            .ok_or(ValidationError::MissingFields("Please select a rating."))?;
        if !(1..=5).contains(&rating) {
            return Err(ValidationError::Rating(rating));
        }
        let customer = customer.ok_or(ValidationError::NotSignedIn("customer"))?;
        Ok(NewReview {
            customer: customer.into(),
            services: service.into(),
            overall_rating: rating,
            comment: self.comment.trim().to_string(),
        })
    }
}

// =============================================================================
// Actions
// =============================================================================

fn signed_in_customer(session: &Session) -> std::result::Result<CustomerId, ValidationError> {
    session
        .customer_id()
        .ok_or(ValidationError::NotSignedIn("customer"))
}

/// Create an account and sign in as it.
///
/// # Errors
///
/// Returns a validation or request error, or [`ClientError::DataShape`] if
/// the backend accepted the account but returned no id.
#[instrument(skip_all)]
pub async fn signup(
    client: &ResourceClient,
    store: &mut impl KeyValueStore,
    session: &mut Session,
    form: &SignupForm,
) -> Result<CustomerId> {
    let payload = form.validate()?;
    let body = client.create_customer(&payload).await?;
    let id = created_id(&body)
        .map(CustomerId::new)
        .ok_or_else(|| ClientError::DataShape("Signup succeeded but no id returned.".to_string()))?;
    session.sign_in(store, Identity::Customer(id))?;
    info!(%id, "Account created");
    Ok(id)
}

/// Save the signed-in customer's profile.
///
/// # Errors
///
/// Returns a validation error, [`ValidationError::NotSignedIn`], or the
/// request error.
#[instrument(skip_all)]
pub async fn edit_customer(
    client: &ResourceClient,
    session: &Session,
    form: &EditCustomerForm,
) -> Result<()> {
    let id = signed_in_customer(session)?;
    let update = form.validate()?;
    client.update_customer(id, &update).await?;
    info!(%id, "Customer profile updated");
    Ok(())
}

/// Save the signed-in provider's profile.
///
/// # Errors
///
/// Returns a validation error, [`ValidationError::NotSignedIn`], or the
/// request error.
#[instrument(skip_all)]
pub async fn edit_provider(
    client: &ResourceClient,
    session: &Session,
    form: &EditProviderForm,
) -> Result<()> {
    let id = session
        .provider_id()
        .ok_or(ValidationError::NotSignedIn("provider"))?;
    let update = form.validate()?;
    client.update_provider(id, &update).await?;
    info!(%id, "Provider profile updated");
    Ok(())
}

/// Create a service and keep a local copy of its image.
///
/// # Errors
///
/// Returns a validation error, the request error, or a store error.
#[instrument(skip_all, fields(name = %form.name))]
pub async fn add_service(
    client: &ResourceClient,
    store: &mut impl KeyValueStore,
    form: &ServiceForm,
) -> Result<Service> {
    let input = form.validate()?;
    let created = client.create_service(&input).await?;
    if let Some(image) = &input.image_data {
        cache_service_image(store, created.id, image)?;
    }
    info!(id = %created.id, "Service added");
    Ok(created)
}

/// Replace a service's details.
///
/// The backend overwrites every column on update, so the current image and
/// availability are sent back unchanged unless a new image is given.
///
/// # Errors
///
/// Returns a validation error, the request error, or a store error.
#[instrument(skip(client, store, form), fields(name = %form.name))]
pub async fn edit_service(
    client: &ResourceClient,
    store: &mut impl KeyValueStore,
    id: ServiceId,
    form: &ServiceForm,
) -> Result<Service> {
    let mut input = form.validate()?;
    let current = client.get_service(id).await?;
    input.available = Some(current.available);
    let uploaded = input.image_data.clone();
    if uploaded.is_none() {
        input.image_data = current.image_data;
    }
    let updated = client.update_service(id, &input).await?;
    if let Some(image) = &uploaded {
        cache_service_image(store, updated.id, image)?;
    }
    info!(%id, "Service updated");
    Ok(updated)
}

/// Price of each subscription option for a base price.
#[must_use]
pub fn option_prices(base: Price) -> [(SubscriptionType, Price); 3] {
    SubscriptionType::ALL.map(|kind| (kind, base.adjusted_for(kind)))
}

/// Put a service in the signed-in customer's cart.
///
/// The cart keeps the base price; the option discount is applied on display.
///
/// # Errors
///
/// Returns [`ValidationError::NotSignedIn`] before fetching anything if no
/// customer is signed in, the request error, or a cart error.
#[instrument(skip(client, store, session))]
pub async fn select_service(
    client: &ResourceClient,
    store: &mut impl KeyValueStore,
    session: &Session,
    service: ServiceId,
    kind: SubscriptionType,
) -> Result<CartItem> {
    signed_in_customer(session)?;
    let fetched = client.get_service(service).await?;
    let item = CartItem {
        service_id: fetched.id,
        service_name: fetched.name,
        kind,
        price: fetched.price.unwrap_or(Price::ZERO),
    };
    LocalCart::new(store).add(item.clone())?;
    info!(%service, %kind, "Added to cart");
    Ok(item)
}

/// Check out the signed-in customer's cart.
///
/// # Errors
///
/// Returns [`ValidationError::NotSignedIn`], or a cart error such as an empty
/// cart. Request failures are reported in the [`CheckoutReport`].
pub async fn checkout(
    client: &ResourceClient,
    store: &mut impl KeyValueStore,
    session: &Session,
    now: NaiveDateTime,
) -> Result<CheckoutReport> {
    let customer = signed_in_customer(session)?;
    Ok(LocalCart::new(store).checkout(client, customer, now).await?)
}

/// Post a review as the signed-in customer.
///
/// # Errors
///
/// Returns a validation error or the request error.
#[instrument(skip_all)]
pub async fn submit_review(
    client: &ResourceClient,
    session: &Session,
    form: &ReviewForm,
) -> Result<()> {
    let review = form.validate(session.customer_id())?;
    client.create_review(&review).await?;
    info!(service = %review.services.id, "Review submitted");
    Ok(())
}

/// Load a customer profile; `id` defaults to the signed-in customer.
pub async fn customer_profile(
    client: &ResourceClient,
    session: &Session,
    id: Option<CustomerId>,
) -> ProfilePanel {
    let Some(id) = id.or_else(|| session.customer_id()) else {
        return ProfilePanel::SignedOut;
    };
    ProfilePanel::from_result(
        client
            .get_customer(id)
            .await
            .map(|c| render_profile(&c, session.owns_customer(id))),
    )
}

/// Load a provider profile; `id` defaults to the signed-in provider.
pub async fn provider_profile(
    client: &ResourceClient,
    session: &Session,
    id: Option<ProviderId>,
) -> ProfilePanel {
    let Some(id) = id.or_else(|| session.provider_id()) else {
        return ProfilePanel::SignedOut;
    };
    ProfilePanel::from_result(
        client
            .get_provider(id)
            .await
            .map(|p| render_profile(&p, session.owns_provider(id))),
    )
}
