//! Card list actions (delete, cancel, reply) against the stub backend.

#![allow(clippy::unwrap_used)]

use glc_client::image::{cache_service_image, cached_service_image};
use glc_client::views::{Action, CardList, ListError, ReplyState};
use glc_client::flows::{self, ReviewForm};
use glc_client::{ClientError, Identity, MemoryStore, ResourceClient, Session};
use glc_core::{ProviderId, ReviewId};
use glc_integration_tests::{Method, StatusCode, StubBackend, client_for};

async fn connect(backend: &StubBackend) -> ResourceClient {
    let base = backend.spawn().await.unwrap();
    client_for(&base, &Session::anonymous()).unwrap()
}

async fn provider_reviews(client: &ResourceClient, provider: ProviderId) -> CardList {
    CardList::reviews(&client.list_provider_reviews(provider).await.unwrap(), true)
}

// =============================================================================
// Services
// =============================================================================

#[tokio::test]
async fn test_delete_removes_card_and_cached_image() {
    let backend = StubBackend::new();
    let mow = backend.add_service("Mowing", 40.0);
    let edge = backend.add_service("Edging", 25.0);
    let client = connect(&backend).await;
    let mut store = MemoryStore::new();
    cache_service_image(&mut store, mow, "data:image/png;base64,AAAA").unwrap();

    let services = client.list_all_services().await.unwrap();
    let mut list = CardList::provider_services(&services, &store).unwrap();
    assert_eq!(
        list.card(mow.as_i64()).unwrap().value("Image"),
        Some("uploaded from this device")
    );

    list.delete_service(&client, &mut store, mow).await.unwrap();

    assert!(list.card(mow.as_i64()).is_none());
    assert!(list.card(edge.as_i64()).is_some());
    assert_eq!(cached_service_image(&store, mow).unwrap(), None);
    assert!(backend.service(mow).is_none());
    assert_eq!(
        backend
            .requests_matching(&Method::DELETE, "/api/services/")
            .len(),
        1
    );
}

#[tokio::test]
async fn test_failed_delete_keeps_card() {
    let backend = StubBackend::new();
    let mow = backend.add_service("Mowing", 40.0);
    backend.respond_with(
        Method::DELETE,
        &format!("/api/services/{mow}"),
        StatusCode::INTERNAL_SERVER_ERROR,
        "text/plain",
        "boom",
    );
    let client = connect(&backend).await;
    let mut store = MemoryStore::new();
    cache_service_image(&mut store, mow, "data:image/png;base64,AAAA").unwrap();

    let services = client.list_all_services().await.unwrap();
    let mut list = CardList::provider_services(&services, &store).unwrap();
    let err = list
        .delete_service(&client, &mut store, mow)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ListError::Client(ClientError::Http { status: 500, .. })
    ));
    assert!(list.card(mow.as_i64()).is_some());
    assert!(cached_service_image(&store, mow).unwrap().is_some());
}

#[tokio::test]
async fn test_unavailable_services_hidden_from_customers() {
    let backend = StubBackend::new();
    let mow = backend.add_service("Mowing", 40.0);
    let snow = backend.add_service("Snow Removal", 15.0);
    backend.set_service_available(snow, false);
    let client = connect(&backend).await;

    let list = CardList::customer_services(&client.list_services().await.unwrap());

    assert!(list.card(snow.as_i64()).is_none());
    let card = list.card(mow.as_i64()).unwrap();
    assert_eq!(card.actions, vec![Action::Select]);

    let all = client.list_all_services().await.unwrap();
    assert_eq!(all.len(), 2);
}

// =============================================================================
// Subscriptions
// =============================================================================

#[tokio::test]
async fn test_cancel_removes_card_and_ends_subscription() {
    let backend = StubBackend::new();
    let ada = backend.add_customer("Ada", "ada@example.com");
    let mow = backend.add_service("Mowing", 40.0);
    let sub = backend.add_subscription(ada, mow, "WEEKLY");
    let client = connect(&backend).await;

    let mut list =
        CardList::subscriptions(&client.list_customer_subscriptions(ada).await.unwrap());
    let card = list.card(sub.as_i64()).unwrap();
    assert_eq!(card.value("Type"), Some("WEEKLY"));
    assert_eq!(card.value("Service"), Some("Mowing"));

    list.cancel_subscription(&client, sub).await.unwrap();

    assert!(list.is_empty());
    assert!(list.to_string().contains("No active subscriptions"));
    assert_eq!(
        backend.subscription(sub).unwrap().get("active").unwrap(),
        false
    );
    let reloaded = client.list_customer_subscriptions(ada).await.unwrap();
    assert!(reloaded.is_empty());
}

// =============================================================================
// Reviews
// =============================================================================

#[tokio::test]
async fn test_reply_is_plain_text_and_one_shot() {
    let backend = StubBackend::new();
    let provider = backend.add_provider("Greensboro Lawn", "pro@example.com");
    let ada = backend.add_customer("Ada", "ada@example.com");
    let mow = backend.add_service("Mowing", 40.0);
    let review = backend.add_review(ada, mow, 4, None);
    let client = connect(&backend).await;

    let mut list = provider_reviews(&client, provider).await;
    let card = list.card(review.as_i64()).unwrap();
    assert_eq!(card.reply, ReplyState::Available);
    assert_eq!(card.value("Reviewer"), Some("Ada"));
    assert_eq!(card.value("Rating"), Some("⭐⭐⭐⭐"));

    list.open_reply(review).unwrap();
    list.submit_reply(&client, review, "  Thanks, Ada!  ")
        .await
        .unwrap();

    let sent = backend.requests_matching(&Method::POST, "/api/reviews/");
    assert_eq!(sent.len(), 1);
    let request = sent.first().unwrap();
    assert_eq!(request.path, format!("/api/reviews/{review}/provider-response"));
    assert_eq!(request.content_type.as_deref(), Some("text/plain"));
    assert_eq!(request.body, "Thanks, Ada!");

    let card = list.card(review.as_i64()).unwrap();
    assert_eq!(card.reply, ReplyState::Replied("Thanks, Ada!".to_string()));
    assert!(!card.actions.contains(&Action::Reply));

    let again = list.submit_reply(&client, review, "Second").await;
    assert!(matches!(again, Err(ListError::AlreadyReplied(_))));
    assert_eq!(
        backend
            .requests_matching(&Method::POST, "/api/reviews/")
            .len(),
        1
    );

    // A fresh load sees the stored reply.
    let mut reloaded = provider_reviews(&client, provider).await;
    assert!(matches!(
        reloaded.open_reply(review),
        Err(ListError::AlreadyReplied(_))
    ));
    assert_eq!(
        backend.review(review).unwrap().get("providerResponse").unwrap(),
        "Thanks, Ada!"
    );
}

#[tokio::test]
async fn test_failed_reply_keeps_form_open() {
    let backend = StubBackend::new();
    let provider = backend.add_provider("Greensboro Lawn", "pro@example.com");
    let ada = backend.add_customer("Ada", "ada@example.com");
    let mow = backend.add_service("Mowing", 40.0);
    let review = backend.add_review(ada, mow, 5, None);
    backend.respond_with(
        Method::POST,
        &format!("/api/reviews/{review}/provider-response"),
        StatusCode::SERVICE_UNAVAILABLE,
        "text/plain",
        "try later",
    );
    let client = connect(&backend).await;

    let mut list = provider_reviews(&client, provider).await;
    list.open_reply(review).unwrap();
    let err = list
        .submit_reply(&client, review, "Thanks")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ListError::Client(ClientError::Http { status: 503, .. })
    ));
    assert_eq!(list.card(review.as_i64()).unwrap().reply, ReplyState::Open);
    assert!(backend.review(review).unwrap().get("providerResponse").unwrap().is_null());
}

#[tokio::test]
async fn test_reply_needs_open_form_and_text() {
    let backend = StubBackend::new();
    let provider = backend.add_provider("Greensboro Lawn", "pro@example.com");
    let ada = backend.add_customer("Ada", "ada@example.com");
    let mow = backend.add_service("Mowing", 40.0);
    let review = backend.add_review(ada, mow, 3, None);
    let client = connect(&backend).await;

    let mut list = provider_reviews(&client, provider).await;
    let closed = list.submit_reply(&client, review, "Thanks").await;
    assert!(matches!(closed, Err(ListError::ReplyNotOpen(_))));

    list.open_reply(review).unwrap();
    let blank = list.submit_reply(&client, review, "   ").await;
    assert!(matches!(blank, Err(ListError::EmptyReply)));

    list.cancel_reply(review).unwrap();
    assert_eq!(
        list.card(review.as_i64()).unwrap().reply,
        ReplyState::Available
    );
    assert!(
        backend
            .requests_matching(&Method::POST, "/api/reviews/")
            .is_empty()
    );
}

#[tokio::test]
async fn test_submitted_review_appears_on_service() {
    let backend = StubBackend::new();
    let ada = backend.add_customer("Ada", "ada@example.com");
    let mow = backend.add_service("Mowing", 40.0);
    let base = backend.spawn().await.unwrap();
    let mut store = MemoryStore::new();
    let mut session = Session::anonymous();
    session.sign_in(&mut store, Identity::Customer(ada)).unwrap();
    let client = client_for(&base, &session).unwrap();

    let form = ReviewForm {
        service: Some(mow),
        rating: Some(5),
        comment: "Great edges".to_string(),
    };
    flows::submit_review(&client, &session, &form).await.unwrap();

    let body = backend
        .requests_matching(&Method::POST, "/api/reviews")
        .first()
        .unwrap()
        .json();
    assert_eq!(body.pointer("/customer/id").unwrap(), ada.as_i64());
    assert_eq!(body.pointer("/services/id").unwrap(), mow.as_i64());
    assert_eq!(body.get("overallRating").unwrap(), 5);

    let list = CardList::reviews(&client.list_service_reviews(mow).await.unwrap(), false);
    let card = list.cards().first().unwrap();
    assert_eq!(card.value("Reviewer"), Some("Ada"));
    assert_eq!(card.value("Comment"), Some("Great edges"));
    assert_eq!(card.reply, ReplyState::Unavailable);
}

#[tokio::test]
async fn test_service_reviews_offer_no_reply() {
    let backend = StubBackend::new();
    let ada = backend.add_customer("Ada", "ada@example.com");
    let mow = backend.add_service("Mowing", 40.0);
    let answered = backend.add_review(ada, mow, 5, Some("Glad to help"));
    let client = connect(&backend).await;

    let mut list = CardList::reviews(&client.list_service_reviews(mow).await.unwrap(), false);

    let card = list.card(answered.as_i64()).unwrap();
    assert_eq!(card.reply, ReplyState::Replied("Glad to help".to_string()));
    assert!(list.to_string().contains("Provider reply: Glad to help"));
    assert!(list.open_reply(ReviewId::new(999)).is_err());
}

#[tokio::test]
async fn test_unknown_provider_reviews_fail_with_status() {
    let backend = StubBackend::new();
    let client = connect(&backend).await;

    let err = client
        .list_provider_reviews(ProviderId::new(404))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
}

// =============================================================================
// Empty lists
// =============================================================================

#[tokio::test]
async fn test_empty_lists_show_messages() {
    let backend = StubBackend::new();
    let client = connect(&backend).await;
    let store = MemoryStore::new();

    let customers = CardList::customers(&client.list_customers().await.unwrap());
    assert!(customers.to_string().contains("No customers found."));

    let services =
        CardList::provider_services(&client.list_all_services().await.unwrap(), &store).unwrap();
    assert!(services.to_string().contains("No services yet."));

    let reviews = CardList::reviews(&[], false);
    assert!(reviews.to_string().contains("No reviews yet."));
}
