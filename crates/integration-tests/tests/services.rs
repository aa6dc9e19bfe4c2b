//! Adding services with images against the stub backend.

#![allow(clippy::unwrap_used)]

use std::fs;

use glc_client::flows::{self, ServiceForm};
use glc_client::image::{ImageSource, cached_service_image};
use glc_client::views::CardList;
use glc_client::{ActionError, MemoryStore, Session, ValidationError};
use glc_integration_tests::{Method, StubBackend, client_for};

fn form(price: &str) -> ServiceForm {
    ServiceForm {
        name: "Aeration".to_string(),
        description: "Core aeration".to_string(),
        price: price.to_string(),
        image: None,
    }
}

#[tokio::test]
async fn test_added_image_is_cached_and_shown() {
    let backend = StubBackend::new();
    let base = backend.spawn().await.unwrap();
    let client = client_for(&base, &Session::anonymous()).unwrap();
    let mut store = MemoryStore::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lawn.png");
    fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

    let mut with_image = form("$45.50");
    with_image.image = Some(path);
    let created = flows::add_service(&client, &mut store, &with_image)
        .await
        .unwrap();

    let body = backend
        .requests_matching(&Method::POST, "/api/services")
        .first()
        .unwrap()
        .json();
    assert_eq!(body.get("price").unwrap(), 45.5);
    let sent_image = body.get("imageData").unwrap().as_str().unwrap().to_string();
    assert!(sent_image.starts_with("data:image/png;base64,"));
    assert_eq!(
        cached_service_image(&store, created.id).unwrap(),
        Some(sent_image)
    );

    let services = client.list_all_services().await.unwrap();
    let list = CardList::provider_services(&services, &store).unwrap();
    let card = list.card(created.id.as_i64()).unwrap();
    assert_eq!(card.value("Image"), Some("uploaded from this device"));
    assert_eq!(card.value("Price"), Some("$45.50"));
}

#[tokio::test]
async fn test_service_without_image_uses_placeholder() {
    let backend = StubBackend::new();
    let base = backend.spawn().await.unwrap();
    let client = client_for(&base, &Session::anonymous()).unwrap();
    let mut store = MemoryStore::new();

    let created = flows::add_service(&client, &mut store, &form("20"))
        .await
        .unwrap();

    let source = ImageSource::resolve(&store, &created).unwrap();
    assert_eq!(source, ImageSource::Placeholder);
    assert!(
        backend
            .requests_matching(&Method::POST, "/api/services")
            .first()
            .unwrap()
            .json()
            .get("imageData")
            .is_none()
    );
}

#[tokio::test]
async fn test_invalid_price_sends_nothing() {
    let backend = StubBackend::new();
    let base = backend.spawn().await.unwrap();
    let client = client_for(&base, &Session::anonymous()).unwrap();
    let mut store = MemoryStore::new();

    for price in ["0", "-5", "abc"] {
        let err = flows::add_service(&client, &mut store, &form(price))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ActionError::Validation(ValidationError::Price(_))
        ));
    }
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_edit_replaces_details_and_keeps_availability() {
    let backend = StubBackend::new();
    let id = backend.add_service("Mowing", 40.0);
    backend.set_service_available(id, false);
    let base = backend.spawn().await.unwrap();
    let client = client_for(&base, &Session::anonymous()).unwrap();
    let mut store = MemoryStore::new();

    let updated = flows::edit_service(&client, &mut store, id, &form("$55"))
        .await
        .unwrap();

    assert_eq!(updated.id, id);
    assert_eq!(updated.name, "Aeration");
    assert!(!updated.available);

    let path = format!("/api/services/{id}");
    let put = backend.requests_matching(&Method::PUT, &path);
    let body = put.first().unwrap().json();
    assert_eq!(body.get("name").unwrap(), "Aeration");
    assert_eq!(body.get("description").unwrap(), "Core aeration");
    assert_eq!(body.get("price").unwrap(), 55.0);
    assert_eq!(body.get("available").unwrap(), false);
    assert!(body.get("imageData").is_none());

    let stored = backend.service(id).unwrap();
    assert_eq!(stored.get("name").unwrap(), "Aeration");
    assert_eq!(stored.get("price").unwrap(), 55.0);
    assert_eq!(cached_service_image(&store, id).unwrap(), None);
}

#[tokio::test]
async fn test_edit_with_new_image_caches_it() {
    let backend = StubBackend::new();
    let id = backend.add_service("Mowing", 40.0);
    let base = backend.spawn().await.unwrap();
    let client = client_for(&base, &Session::anonymous()).unwrap();
    let mut store = MemoryStore::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lawn.png");
    fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

    let mut with_image = form("40");
    with_image.image = Some(path);
    flows::edit_service(&client, &mut store, id, &with_image)
        .await
        .unwrap();

    let stored = backend.service(id).unwrap();
    let image = stored.get("imageData").unwrap().as_str().unwrap().to_string();
    assert!(image.starts_with("data:image/png;base64,"));
    assert_eq!(cached_service_image(&store, id).unwrap(), Some(image));
}

#[tokio::test]
async fn test_invalid_edit_sends_nothing() {
    let backend = StubBackend::new();
    let id = backend.add_service("Mowing", 40.0);
    let base = backend.spawn().await.unwrap();
    let client = client_for(&base, &Session::anonymous()).unwrap();
    let mut store = MemoryStore::new();

    let err = flows::edit_service(&client, &mut store, id, &form("free"))
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::Validation(ValidationError::Price(_))));
    assert!(backend.requests().is_empty());
}
