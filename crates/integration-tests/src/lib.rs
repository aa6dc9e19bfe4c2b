//! End-to-end tests for the Greensboro Lawn Care client.
//!
//! [`StubBackend`] is an in-process axum server that implements the REST
//! routes the client uses, keeps records in memory, and logs every request it
//! receives so tests can check exactly what was sent (and what was not).
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p glc-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = StubBackend::new();
//! let base = backend.spawn().await?;
//! let client = client_for(&base, &Session::anonymous())?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::body::{Body, to_bytes};
use axum::extract::{Path, Request, State};
use axum::http::HeaderName;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use glc_client::{ClientConfig, ClientError, ConfigError, ResourceClient, Session};
use glc_core::{CustomerId, ProviderId, ReviewId, ServiceId, SubscriptionId};
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;

pub use axum::http::{Method, StatusCode};

/// Timestamp the stub stamps on records it creates.
pub const STUB_TIMESTAMP: &str = "2026-05-01T10:00:00";

/// One request as the stub received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// The body parsed as JSON, or `Value::Null`.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone)]
struct Canned {
    method: Method,
    path: String,
    status: StatusCode,
    content_type: String,
    body: String,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    customers: BTreeMap<i64, Value>,
    providers: BTreeMap<i64, Value>,
    services: BTreeMap<i64, Value>,
    subscriptions: BTreeMap<i64, Value>,
    reviews: BTreeMap<i64, Value>,
    requests: Vec<RecordedRequest>,
    canned: Vec<Canned>,
    fail_subscription_at: Option<usize>,
    subscription_posts: usize,
}

impl Inner {
    const fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory stand-in for the lawn care backend.
#[derive(Debug, Clone, Default)]
pub struct StubBackend {
    inner: Arc<Mutex<Inner>>,
}

impl StubBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The routes, with request recording and canned responses applied first.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/customers", get(list_customers).post(create_customer))
            .route(
                "/api/customers/{id}",
                get(get_customer).put(update_customer),
            )
            .route(
                "/api/providers/{id}",
                get(get_provider).put(update_provider),
            )
            .route("/api/services", get(list_services).post(create_service))
            .route("/api/services/all", get(list_all_services))
            .route(
                "/api/services/{id}",
                get(get_service).put(update_service).delete(delete_service),
            )
            .route("/api/subscriptions", post(create_subscription))
            .route(
                "/api/subscriptions/customer/{id}",
                get(list_customer_subscriptions),
            )
            .route("/api/subscriptions/{id}/cancel", post(cancel_subscription))
            .route("/api/reviews", post(create_review))
            .route("/api/reviews/service/{id}", get(list_service_reviews))
            .route("/api/reviews/provider/{id}", get(list_provider_reviews))
            .route(
                "/api/reviews/{id}/provider-response",
                post(reply_to_review),
            )
            .layer(middleware::from_fn_with_state(self.clone(), record))
            .with_state(self.clone())
    }

    /// Serve on an ephemeral localhost port; returns the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if no port can be bound.
    pub async fn spawn(&self) -> io::Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let router = self.router();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok(format!("http://{addr}"))
    }

    // -------------------------------------------------------------------------
    // Seeding
    // -------------------------------------------------------------------------

    pub fn add_customer(&self, name: &str, email: &str) -> CustomerId {
        let mut inner = self.lock();
        let id = inner.allocate();
        inner.customers.insert(
            id,
            json!({ "id": id, "name": name, "email": email, "address": "1 Elm St" }),
        );
        CustomerId::new(id)
    }

    pub fn add_provider(&self, name: &str, email: &str) -> ProviderId {
        let mut inner = self.lock();
        let id = inner.allocate();
        inner
            .providers
            .insert(id, json!({ "id": id, "name": name, "email": email }));
        ProviderId::new(id)
    }

    pub fn add_service(&self, name: &str, price: f64) -> ServiceId {
        let mut inner = self.lock();
        let id = inner.allocate();
        inner.services.insert(
            id,
            json!({
                "id": id,
                "name": name,
                "description": format!("{name} for your lawn"),
                "price": price,
                "available": true
            }),
        );
        ServiceId::new(id)
    }

    /// Mark a seeded service as withdrawn from the customer catalog.
    pub fn set_service_available(&self, id: ServiceId, available: bool) {
        if let Some(service) = self.lock().services.get_mut(&id.as_i64()) {
            merge(service, json!({ "available": available }));
        }
    }

    pub fn add_subscription(
        &self,
        customer: CustomerId,
        service: ServiceId,
        kind: &str,
    ) -> SubscriptionId {
        let mut inner = self.lock();
        let id = inner.allocate();
        let service = inner
            .services
            .get(&service.as_i64())
            .cloned()
            .unwrap_or_else(|| json!({ "id": service.as_i64() }));
        inner.subscriptions.insert(
            id,
            json!({
                "id": id,
                "customer": { "id": customer.as_i64() },
                "services": service,
                "type": kind,
                "startDate": STUB_TIMESTAMP,
                "active": true
            }),
        );
        SubscriptionId::new(id)
    }

    pub fn add_review(
        &self,
        customer: CustomerId,
        service: ServiceId,
        rating: u8,
        response: Option<&str>,
    ) -> ReviewId {
        let mut inner = self.lock();
        let id = inner.allocate();
        let review = build_review(
            &inner,
            id,
            customer.as_i64(),
            service.as_i64(),
            json!(rating),
            json!("Nice work"),
            response,
        );
        inner.reviews.insert(id, review);
        ReviewId::new(id)
    }

    // -------------------------------------------------------------------------
    // Failure injection
    // -------------------------------------------------------------------------

    /// Fail the `attempt`-th (0-based) `POST /api/subscriptions` with a 500.
    pub fn fail_subscription_at(&self, attempt: usize) {
        self.lock().fail_subscription_at = Some(attempt);
    }

    /// Answer every `method path` request with a fixed response.
    pub fn respond_with(
        &self,
        method: Method,
        path: &str,
        status: StatusCode,
        content_type: &str,
        body: &str,
    ) {
        self.lock().canned.push(Canned {
            method,
            path: path.to_string(),
            status,
            content_type: content_type.to_string(),
            body: body.to_string(),
        });
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests with `method` whose path starts with `prefix`.
    #[must_use]
    pub fn requests_matching(&self, method: &Method, prefix: &str) -> Vec<RecordedRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == *method && r.path.starts_with(prefix))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn service(&self, id: ServiceId) -> Option<Value> {
        self.lock().services.get(&id.as_i64()).cloned()
    }

    #[must_use]
    pub fn subscription(&self, id: SubscriptionId) -> Option<Value> {
        self.lock().subscriptions.get(&id.as_i64()).cloned()
    }

    #[must_use]
    pub fn review(&self, id: ReviewId) -> Option<Value> {
        self.lock().reviews.get(&id.as_i64()).cloned()
    }

    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.lock().subscriptions.len()
    }
}

/// Client configuration pointing at `base_url`.
///
/// # Errors
///
/// Returns an error if the URL is not http(s).
pub fn config_for(base_url: &str) -> Result<ClientConfig, ConfigError> {
    ClientConfig::for_base_url(base_url)
}

/// A client for `base_url` acting as `session`.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the HTTP client fails to build.
pub fn client_for(base_url: &str, session: &Session) -> Result<ResourceClient, ClientError> {
    let config = config_for(base_url).map_err(|e| ClientError::DataShape(e.to_string()))?;
    ResourceClient::new(&config, session)
}

// =============================================================================
// Middleware
// =============================================================================

async fn record(State(stub): State<StubBackend>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Ok(bytes) = to_bytes(body, usize::MAX).await else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let header = |name: HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = RecordedRequest {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        content_type: header(CONTENT_TYPE),
        authorization: header(AUTHORIZATION),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    };

    let canned = {
        let mut inner = stub.lock();
        inner.requests.push(recorded);
        inner
            .canned
            .iter()
            .find(|c| c.method == parts.method && c.path == parts.uri.path())
            .cloned()
    };
    if let Some(c) = canned {
        return (c.status, [(CONTENT_TYPE, c.content_type)], c.body).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

// =============================================================================
// Handlers
// =============================================================================

fn not_found(what: &str) -> Response {
    (StatusCode::NOT_FOUND, format!("{what} not found")).into_response()
}

/// Copy every field of `patch` over `target`, except `id`.
fn merge(target: &mut Value, patch: Value) {
    if let (Value::Object(target), Value::Object(patch)) = (target, patch) {
        for (key, value) in patch {
            if key != "id" {
                target.insert(key, value);
            }
        }
    }
}

fn with_id(body: Value, id: i64) -> Value {
    let mut map = match body {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    map.insert("id".to_string(), json!(id));
    Value::Object(map)
}

fn public(customer: &Value) -> Value {
    let mut customer = customer.clone();
    if let Value::Object(map) = &mut customer {
        map.remove("password");
    }
    customer
}

fn build_review(
    inner: &Inner,
    id: i64,
    customer: i64,
    service: i64,
    rating: Value,
    comment: Value,
    response: Option<&str>,
) -> Value {
    let customer = inner
        .customers
        .get(&customer)
        .map_or_else(|| json!({ "id": customer }), public);
    let service = inner
        .services
        .get(&service)
        .cloned()
        .unwrap_or_else(|| json!({ "id": service }));
    json!({
        "id": id,
        "customer": customer,
        "services": service,
        "overallRating": rating,
        "comment": comment,
        "createdAt": STUB_TIMESTAMP,
        "providerResponse": response,
        "providerResponseDate": response.map(|_| STUB_TIMESTAMP),
    })
}

async fn list_customers(State(stub): State<StubBackend>) -> Response {
    let customers: Vec<Value> = stub.lock().customers.values().map(public).collect();
    Json(customers).into_response()
}

async fn create_customer(State(stub): State<StubBackend>, Json(body): Json<Value>) -> Response {
    let mut inner = stub.lock();
    let email = body.get("email").cloned();
    if inner
        .customers
        .values()
        .any(|c| c.get("email").cloned() == email)
    {
        return (StatusCode::CONFLICT, "email taken").into_response();
    }
    let id = inner.allocate();
    let customer = with_id(body, id);
    let response = public(&customer);
    inner.customers.insert(id, customer);
    (StatusCode::CREATED, Json(response)).into_response()
}

async fn get_customer(State(stub): State<StubBackend>, Path(id): Path<i64>) -> Response {
    stub.lock()
        .customers
        .get(&id)
        .map_or_else(|| not_found("Customer"), |c| Json(public(c)).into_response())
}

async fn update_customer(
    State(stub): State<StubBackend>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut inner = stub.lock();
    let Some(customer) = inner.customers.get_mut(&id) else {
        return not_found("Customer");
    };
    merge(customer, body);
    Json(public(customer)).into_response()
}

async fn get_provider(State(stub): State<StubBackend>, Path(id): Path<i64>) -> Response {
    stub.lock()
        .providers
        .get(&id)
        .map_or_else(|| not_found("Provider"), |p| Json(public(p)).into_response())
}

async fn update_provider(
    State(stub): State<StubBackend>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut inner = stub.lock();
    let Some(provider) = inner.providers.get_mut(&id) else {
        return not_found("Provider");
    };
    merge(provider, body);
    Json(public(provider)).into_response()
}

fn is_available(service: &Value) -> bool {
    service
        .get("available")
        .and_then(Value::as_bool)
        .unwrap_or(true)
}

async fn list_services(State(stub): State<StubBackend>) -> Response {
    let services: Vec<Value> = stub
        .lock()
        .services
        .values()
        .filter(|s| is_available(s))
        .cloned()
        .collect();
    Json(services).into_response()
}

async fn list_all_services(State(stub): State<StubBackend>) -> Response {
    let services: Vec<Value> = stub.lock().services.values().cloned().collect();
    Json(services).into_response()
}

async fn get_service(State(stub): State<StubBackend>, Path(id): Path<i64>) -> Response {
    stub.lock()
        .services
        .get(&id)
        .map_or_else(|| not_found("Service"), |s| Json(s.clone()).into_response())
}

async fn create_service(State(stub): State<StubBackend>, Json(body): Json<Value>) -> Response {
    let mut inner = stub.lock();
    let id = inner.allocate();
    let mut service = with_id(body, id);
    if let Value::Object(map) = &mut service {
        map.entry("available").or_insert(Value::Bool(true));
    }
    inner.services.insert(id, service.clone());
    (StatusCode::CREATED, Json(service)).into_response()
}

async fn update_service(
    State(stub): State<StubBackend>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut inner = stub.lock();
    let Some(service) = inner.services.get_mut(&id) else {
        return not_found("Service");
    };
    merge(service, body);
    Json(service.clone()).into_response()
}

async fn delete_service(State(stub): State<StubBackend>, Path(id): Path<i64>) -> Response {
    if stub.lock().services.remove(&id).is_some() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found("Service")
    }
}

async fn create_subscription(State(stub): State<StubBackend>, Json(body): Json<Value>) -> Response {
    let mut inner = stub.lock();
    let attempt = inner.subscription_posts;
    inner.subscription_posts += 1;
    if inner.fail_subscription_at == Some(attempt) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Service unavailable").into_response();
    }

    let service = body
        .pointer("/services/id")
        .and_then(Value::as_i64)
        .and_then(|id| inner.services.get(&id).cloned());
    let Some(service) = service else {
        return (StatusCode::BAD_REQUEST, "Unknown service").into_response();
    };

    let id = inner.allocate();
    let echo = subscription_echo(&body, id);
    let mut subscription = with_id(body, id);
    if let Value::Object(map) = &mut subscription {
        map.insert("services".to_string(), service);
    }
    inner.subscriptions.insert(id, subscription);
    (StatusCode::CREATED, Json(echo)).into_response()
}

/// The reply to a subscription create: the saved entity with its customer
/// and service still the id-only references from the request, every other
/// nested column null.
fn subscription_echo(body: &Value, id: i64) -> Value {
    let customer_id = body.pointer("/customer/id").cloned().unwrap_or(Value::Null);
    let service_id = body.pointer("/services/id").cloned().unwrap_or(Value::Null);
    let field = |name: &str| body.get(name).cloned().unwrap_or(Value::Null);
    json!({
        "id": id,
        "customer": {
            "id": customer_id,
            "name": null,
            "email": null,
            "password": null,
            "address": null,
            "phoneNumber": null,
            "cardNumber": null
        },
        "services": {
            "id": service_id,
            "name": null,
            "description": null,
            "price": null,
            "imageData": null,
            "available": null
        },
        "type": field("type"),
        "startDate": field("startDate"),
        "endDate": null,
        "active": field("active")
    })
}

async fn list_customer_subscriptions(
    State(stub): State<StubBackend>,
    Path(id): Path<i64>,
) -> Response {
    let subscriptions: Vec<Value> = stub
        .lock()
        .subscriptions
        .values()
        .filter(|s| s.pointer("/customer/id").and_then(Value::as_i64) == Some(id))
        .filter(|s| s.get("active").and_then(Value::as_bool).unwrap_or(true))
        .cloned()
        .collect();
    Json(subscriptions).into_response()
}

async fn cancel_subscription(State(stub): State<StubBackend>, Path(id): Path<i64>) -> Response {
    let mut inner = stub.lock();
    let Some(subscription) = inner.subscriptions.get_mut(&id) else {
        return not_found("Subscription");
    };
    merge(
        subscription,
        json!({ "active": false, "endDate": STUB_TIMESTAMP }),
    );
    Json(subscription.clone()).into_response()
}

async fn create_review(State(stub): State<StubBackend>, Json(body): Json<Value>) -> Response {
    let mut inner = stub.lock();
    let (Some(customer), Some(service)) = (
        body.pointer("/customer/id").and_then(Value::as_i64),
        body.pointer("/services/id").and_then(Value::as_i64),
    ) else {
        return (StatusCode::BAD_REQUEST, "customer and service are required").into_response();
    };
    let id = inner.allocate();
    let review = build_review(
        &inner,
        id,
        customer,
        service,
        body.get("overallRating").cloned().unwrap_or(Value::Null),
        body.get("comment").cloned().unwrap_or(Value::Null),
        None,
    );
    inner.reviews.insert(id, review.clone());
    (StatusCode::CREATED, Json(review)).into_response()
}

async fn list_service_reviews(State(stub): State<StubBackend>, Path(id): Path<i64>) -> Response {
    let reviews: Vec<Value> = stub
        .lock()
        .reviews
        .values()
        .filter(|r| r.pointer("/services/id").and_then(Value::as_i64) == Some(id))
        .cloned()
        .collect();
    Json(reviews).into_response()
}

/// Single-provider backend: a known provider sees every review.
async fn list_provider_reviews(State(stub): State<StubBackend>, Path(id): Path<i64>) -> Response {
    let inner = stub.lock();
    if !inner.providers.contains_key(&id) {
        return not_found("Provider");
    }
    let reviews: Vec<Value> = inner.reviews.values().cloned().collect();
    Json(reviews).into_response()
}

async fn reply_to_review(
    State(stub): State<StubBackend>,
    Path(id): Path<i64>,
    body: String,
) -> Response {
    let mut inner = stub.lock();
    let Some(review) = inner.reviews.get_mut(&id) else {
        return not_found("Review");
    };
    merge(
        review,
        json!({ "providerResponse": body, "providerResponseDate": STUB_TIMESTAMP }),
    );
    Json(review.clone()).into_response()
}
