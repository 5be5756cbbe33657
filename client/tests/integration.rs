//! Full lifecycle tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on an ephemeral port and exercises the
//! client operations over real HTTP, validating path construction, body
//! shapes, and error propagation end-to-end.

use reader_client::{ApiClient, ApiError, ArticleQuery, FeedInput};
use serde_json::json;

async fn live_client() -> ApiClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        mock_server::run(listener).await.unwrap();
    });
    ApiClient::new(&format!("http://{addr}/api"))
}

fn input(title: &str, url: &str) -> FeedInput {
    FeedInput {
        title: title.to_string(),
        url: url.to_string(),
        description: None,
    }
}

#[tokio::test]
async fn feed_lifecycle() {
    let client = live_client().await;

    // Empty to start.
    assert!(client.list_feeds().await.unwrap().is_empty());

    // Create and read back.
    let created = client
        .create_feed(&input("Example", "https://example.com/rss"))
        .await
        .unwrap();
    assert_eq!(created.title, "Example");
    let fetched = client.get_feed(created.id).await.unwrap();
    assert_eq!(fetched, created);

    // Update.
    let updated = client
        .update_feed(created.id, &input("Renamed", "https://example.com/rss"))
        .await
        .unwrap();
    assert_eq!(updated.title, "Renamed");
    assert!(updated.last_updated.is_some());

    // Delete, then the feed is gone.
    let status = client.delete_feed(created.id).await.unwrap();
    assert!(status.success);
    assert!(client.list_feeds().await.unwrap().is_empty());
    let err = client.get_feed(created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
}

#[tokio::test]
async fn refresh_populates_articles() {
    let client = live_client().await;
    let feed = client
        .create_feed(&input("Example", "https://example.com/rss"))
        .await
        .unwrap();

    assert!(client
        .list_articles(&ArticleQuery::default())
        .await
        .unwrap()
        .is_empty());

    let status = client.refresh_feeds(None).await.unwrap();
    assert!(status.success);

    let articles = client.list_articles(&ArticleQuery::default()).await.unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].feed_id, feed.id);
    assert!(!articles[0].read);

    // Targeted refresh of an unknown feed propagates the server's rejection.
    let err = client.refresh_feeds(Some(feed.id + 1)).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 400, .. }));
}

#[tokio::test]
async fn read_flag_and_full_content() {
    let client = live_client().await;
    let feed = client
        .create_feed(&input("Example", "https://example.com/rss"))
        .await
        .unwrap();
    client.refresh_feeds(Some(feed.id)).await.unwrap();
    let articles = client.list_articles(&ArticleQuery::default()).await.unwrap();
    let article = &articles[0];

    // Mark read, confirm the unread filter hides it.
    client.mark_article_read(article.id, true).await.unwrap();
    let unread_query = ArticleQuery {
        unread_only: Some(true),
        ..ArticleQuery::default()
    };
    assert!(client.list_articles(&unread_query).await.unwrap().is_empty());

    // Back to unread.
    client.mark_article_read(article.id, false).await.unwrap();
    let unread = client.list_articles(&unread_query).await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].id, article.id);

    // Full content is fetched on demand.
    let full = client.article_full_content(article.id).await.unwrap();
    assert!(full.full_content.unwrap().starts_with("Full text of"));
}

#[tokio::test]
async fn sync_lifecycle() {
    let client = live_client().await;

    let key = client.sync_key().await.unwrap();
    assert!(!key.is_empty());
    // The key is returned bare, not wrapped in the response envelope.
    assert!(!key.contains("sync_key"));

    let err = client.sync_data(&key).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));

    let payload = json!({"feeds": [1, 2], "theme": "retro"});
    let status = client.update_sync_data(&key, &payload).await.unwrap();
    assert!(status.success);
    assert_eq!(client.sync_data(&key).await.unwrap(), payload);
}

#[tokio::test]
async fn export_import_roundtrip() {
    let source = live_client().await;
    source
        .create_feed(&input("A", "https://a.example/rss"))
        .await
        .unwrap();
    source
        .create_feed(&input("B", "https://b.example/rss"))
        .await
        .unwrap();
    let export = source.export_feeds().await.unwrap();
    assert!(export.data.contains("xmlUrl=\"https://a.example/rss\""));

    let target = live_client().await;
    let status = target.import_feeds(&export.data).await.unwrap();
    assert!(status.success);
    let feeds = target.list_feeds().await.unwrap();
    assert_eq!(feeds.len(), 2);
}

#[tokio::test]
async fn network_failure_surfaces_transport_error() {
    // Bind then drop to obtain a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("http://{addr}/api"));
    let err = client.list_feeds().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
