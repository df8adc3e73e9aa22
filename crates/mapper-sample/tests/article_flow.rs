//! Full flow through the typed client against the mock transport, with the
//! configuration supplied per call so the test never touches global state.

use mapper_framework::{ConfigOverride, HttpMethod, MockTransport, TransportError};
use mapper_sample::binding::article_resource;
use mapper_sample::clients::{ArticleClient, ArticleError};
use mapper_sample::model::Article;
use serde_json::json;
use time::macros::datetime;

fn client(mock: &MockTransport) -> ArticleClient {
    let resource = article_resource("https://my-api.com/v2").expect("valid base URL");
    ArticleClient::new(resource)
        .with_overrides(ConfigOverride::empty().transport(mock.transport()))
}

#[tokio::test]
async fn create_fetch_update_delete_round_trip() {
    let mock = MockTransport::new();
    let client = client(&mock);

    mock.expect(HttpMethod::Post, "/v2/articles")
        .return_json(201, json!({"id": 7, "title": "Intro"}));
    mock.expect(HttpMethod::Get, "/v2/articles/7").return_json(
        200,
        json!({
            "id": 7,
            "title": "Intro",
            "body": "Welcome.",
            "published": false,
            "rating": 4.5,
            "createdAt": "2024-06-01T10:00:00Z"
        }),
    );
    mock.expect(HttpMethod::Put, "/v2/articles/7")
        .return_json(200, json!({"id": 7, "title": "Intro", "published": true}));
    mock.expect(HttpMethod::Delete, "/v2/articles/7").return_status(204);

    let id = client
        .create(&Article::draft("Intro").with_body("Welcome."))
        .await
        .expect("create succeeds")
        .expect("server assigns an id");
    assert_eq!(id, 7);

    let fetched = client.fetch(id).await.expect("fetch succeeds");
    assert_eq!(fetched.title, "Intro");
    assert_eq!(fetched.body.as_deref(), Some("Welcome."));
    assert_eq!(fetched.rating, Some(4.5));
    assert_eq!(fetched.created_at, Some(datetime!(2024-06-01 10:00:00 UTC)));
    assert!(!fetched.published);

    let updated = client
        .update(id, &fetched.clone().publish())
        .await
        .expect("update succeeds");
    assert!(updated.published);

    client.delete(id).await.expect("delete succeeds");
    mock.verify();
}

#[tokio::test]
async fn invalid_drafts_never_reach_the_wire() {
    // No expectations queued: a dispatch would panic inside the mock.
    let mock = MockTransport::new();
    let client = client(&mock);

    let err = client
        .create(&Article::draft("  "))
        .await
        .expect_err("whitespace title is invalid");
    match err {
        ArticleError::Invalid(reasons) => assert_eq!(reasons, ["must not be empty"]),
        other => panic!("expected a validation rejection, got {other:?}"),
    }
    mock.verify();
}

#[tokio::test]
async fn missing_articles_surface_as_not_found() {
    let mock = MockTransport::new();
    let client = client(&mock);

    mock.expect(HttpMethod::Get, "/v2/articles/404").return_status(404);

    let err = client.fetch(404).await.expect_err("article is gone");
    assert!(matches!(err, ArticleError::NotFound(_)));
    mock.verify();
}

#[tokio::test]
async fn list_maps_every_element_into_the_domain_type() {
    let mock = MockTransport::new();
    let client = client(&mock);

    mock.expect(HttpMethod::Get, "/v2/articles").return_json(
        200,
        json!([
            {"id": 1, "title": "One"},
            {"id": 2, "title": "Two", "published": true}
        ]),
    );

    let articles = client.list().await.expect("list succeeds");
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title, "One");
    assert!(articles[1].published);
    mock.verify();
}

#[tokio::test]
async fn transport_failures_surface_through_the_client() {
    let mock = MockTransport::new();
    let client = client(&mock);

    mock.expect(HttpMethod::Get, "/v2/articles/1")
        .return_err(TransportError::Failed("connection refused".to_string()));

    let err = client.fetch(1).await.expect_err("transport failed");
    assert!(matches!(err, ArticleError::Binding(_)));
    mock.verify();
}
