//! Demo flow for the article binding.
//!
//! Wires the process the intended way: tracing first, then the global
//! configuration (here a mock transport standing in for a real backend),
//! then resource declaration, then traffic. Shows a successful
//! create/fetch/update round-trip and a validation rejection.

use mapper_framework::tracing::setup_tracing;
use mapper_framework::{set_global_config, ConfigOverride, HttpMethod, MockTransport};
use mapper_sample::binding::article_resource;
use mapper_sample::clients::{ArticleClient, ArticleError};
use mapper_sample::model::Article;
use serde_json::json;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ArticleError> {
    setup_tracing();

    // A canned backend so the demo runs without a server.
    let mock = MockTransport::new();
    mock.expect(HttpMethod::Post, "/v2/articles").return_json(
        201,
        json!({"id": 1, "title": "Hello, wire", "createdAt": "2024-06-01T10:00:00Z"}),
    );
    mock.expect(HttpMethod::Get, "/v2/articles/1").return_json(
        200,
        json!({
            "id": 1,
            "title": "Hello, wire",
            "published": false,
            "createdAt": "2024-06-01T10:00:00Z"
        }),
    );
    mock.expect(HttpMethod::Put, "/v2/articles/1").return_json(
        200,
        json!({"id": 1, "title": "Hello, wire", "published": true}),
    );

    // Global configuration: set once, before traffic begins.
    set_global_config(ConfigOverride::empty().transport(mock.transport()));

    let resource = article_resource("https://my-api.com/v2").map_err(|e| {
        ArticleError::Binding(e.into())
    })?;
    let client = ArticleClient::new(resource);

    info!("creating article");
    let article = Article::draft("Hello, wire").with_body("First post.");
    let id = client.create(&article).await?.expect("server assigns an id");
    info!(id, "article created");

    let fetched = client.fetch(id).await?;
    info!(title = %fetched.title, published = fetched.published, "fetched");

    let updated = client.update(id, &fetched.clone().publish()).await?;
    info!(published = updated.published, "updated");

    // A draft with a whitespace title trips the declared checks; the
    // reasons come back as data and no request is sent.
    match client.create(&Article::draft("   ")).await {
        Err(ArticleError::Invalid(reasons)) => info!(?reasons, "rejected as expected"),
        other => panic!("expected a validation rejection, got {other:?}"),
    }

    mock.verify();
    info!("demo complete");
    Ok(())
}
