//! Asynchronous HTTP client for the reader API.
//!
//! # Design
//! `ApiClient` holds only the transport configuration (base URL and default
//! headers) and carries no mutable state between calls. Every operation is
//! split into a private `*_request` builder that produces the outgoing
//! request and a public async method that sends it and decodes the response,
//! so the exact method, path, and query string of each endpoint can be
//! asserted without a running server. Non-success statuses are surfaced
//! unchanged as [`ApiError::Status`]; there is no retry and no local
//! classification of failures.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ApiError;
use crate::types::{
    Article, ArticleQuery, ExportPayload, Feed, FeedInput, StatusResponse, SyncKeyResponse,
};

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "READER_API_URL";

/// Base URL used when [`BASE_URL_ENV`] is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Asynchronous client for the reader backend.
///
/// One method per endpoint; each issues exactly one HTTP request and returns
/// the decoded response body. The transport configuration is immutable after
/// construction, so a client can be cloned and shared across tasks freely.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    default_headers: HeaderMap,
}

impl ApiClient {
    /// Create a client against `base_url`. A trailing slash is stripped so
    /// paths concatenate cleanly.
    pub fn new(base_url: &str) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers,
        }
    }

    /// Create a client from the environment, falling back to
    /// [`DEFAULT_BASE_URL`] when [`BASE_URL_ENV`] is unset.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) => Self::new(&url),
            Err(_) => Self::new(DEFAULT_BASE_URL),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .headers(self.default_headers.clone())
    }

    /// Execute a built request and decode the JSON response body.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let request = builder.build()?;
        debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    // ---- Feeds ----

    fn list_feeds_request(&self) -> RequestBuilder {
        self.request(Method::GET, "/feeds")
    }

    /// Fetch all subscribed feeds.
    pub async fn list_feeds(&self) -> Result<Vec<Feed>, ApiError> {
        self.send(self.list_feeds_request()).await
    }

    fn get_feed_request(&self, id: i64) -> RequestBuilder {
        self.request(Method::GET, &format!("/feeds/{id}"))
    }

    /// Fetch a single feed by id.
    pub async fn get_feed(&self, id: i64) -> Result<Feed, ApiError> {
        self.send(self.get_feed_request(id)).await
    }

    fn create_feed_request(&self, input: &FeedInput) -> RequestBuilder {
        self.request(Method::POST, "/feeds").json(input)
    }

    /// Subscribe to a new feed and return the created record.
    pub async fn create_feed(&self, input: &FeedInput) -> Result<Feed, ApiError> {
        self.send(self.create_feed_request(input)).await
    }

    fn update_feed_request(&self, id: i64, input: &FeedInput) -> RequestBuilder {
        self.request(Method::PUT, &format!("/feeds/{id}")).json(input)
    }

    /// Update a feed and return the updated record.
    pub async fn update_feed(&self, id: i64, input: &FeedInput) -> Result<Feed, ApiError> {
        self.send(self.update_feed_request(id, input)).await
    }

    fn delete_feed_request(&self, id: i64) -> RequestBuilder {
        self.request(Method::DELETE, &format!("/feeds/{id}"))
    }

    /// Unsubscribe from a feed.
    pub async fn delete_feed(&self, id: i64) -> Result<StatusResponse, ApiError> {
        self.send(self.delete_feed_request(id)).await
    }

    fn refresh_feeds_request(&self, feed_id: Option<i64>) -> RequestBuilder {
        let builder = self.request(Method::POST, "/feeds/refresh");
        match feed_id {
            Some(id) => builder.query(&[("feed_id", id)]),
            None => builder,
        }
    }

    /// Re-fetch articles for one feed, or for every feed when `feed_id` is
    /// `None`.
    pub async fn refresh_feeds(&self, feed_id: Option<i64>) -> Result<StatusResponse, ApiError> {
        self.send(self.refresh_feeds_request(feed_id)).await
    }

    // ---- Articles ----

    fn list_articles_request(&self, query: &ArticleQuery) -> RequestBuilder {
        self.request(Method::GET, "/articles").query(query)
    }

    /// Fetch articles matching `query`.
    pub async fn list_articles(&self, query: &ArticleQuery) -> Result<Vec<Article>, ApiError> {
        self.send(self.list_articles_request(query)).await
    }

    fn get_article_request(&self, id: i64) -> RequestBuilder {
        self.request(Method::GET, &format!("/articles/{id}"))
    }

    /// Fetch a single article by id.
    pub async fn get_article(&self, id: i64) -> Result<Article, ApiError> {
        self.send(self.get_article_request(id)).await
    }

    fn mark_article_read_request(&self, id: i64, read: bool) -> RequestBuilder {
        self.request(Method::PUT, &format!("/articles/{id}/read"))
            .query(&[("read", read)])
    }

    /// Set an article's read flag.
    pub async fn mark_article_read(
        &self,
        id: i64,
        read: bool,
    ) -> Result<StatusResponse, ApiError> {
        self.send(self.mark_article_read_request(id, read)).await
    }

    fn article_full_content_request(&self, id: i64) -> RequestBuilder {
        self.request(Method::GET, &format!("/articles/{id}/full-content"))
    }

    /// Fetch an article with its extracted full text.
    pub async fn article_full_content(&self, id: i64) -> Result<Article, ApiError> {
        self.send(self.article_full_content_request(id)).await
    }

    // ---- Sync ----

    fn sync_key_request(&self) -> RequestBuilder {
        self.request(Method::GET, "/sync/key")
    }

    /// Obtain a fresh sync key. Returns the `sync_key` field alone, not the
    /// response envelope.
    pub async fn sync_key(&self) -> Result<String, ApiError> {
        let envelope: SyncKeyResponse = self.send(self.sync_key_request()).await?;
        Ok(envelope.sync_key)
    }

    fn sync_data_request(&self, sync_key: &str) -> RequestBuilder {
        self.request(Method::GET, &format!("/sync/{sync_key}"))
    }

    /// Fetch the payload stored under `sync_key`, schema-free.
    pub async fn sync_data(&self, sync_key: &str) -> Result<Value, ApiError> {
        self.send(self.sync_data_request(sync_key)).await
    }

    fn update_sync_data_request(&self, sync_key: &str, data: &Value) -> RequestBuilder {
        self.request(Method::POST, &format!("/sync/{sync_key}"))
            .json(data)
    }

    /// Store `data` under `sync_key`.
    pub async fn update_sync_data(
        &self,
        sync_key: &str,
        data: &Value,
    ) -> Result<StatusResponse, ApiError> {
        self.send(self.update_sync_data_request(sync_key, data)).await
    }

    fn export_feeds_request(&self) -> RequestBuilder {
        self.request(Method::GET, "/export")
    }

    /// Export all subscriptions as an OPML document.
    pub async fn export_feeds(&self) -> Result<ExportPayload, ApiError> {
        self.send(self.export_feeds_request()).await
    }

    fn import_feeds_request(&self, data: &str) -> RequestBuilder {
        self.request(Method::POST, "/import")
            .json(&json!({ "data": data }))
    }

    /// Import subscriptions from an OPML document.
    pub async fn import_feeds(&self, data: &str) -> Result<StatusResponse, ApiError> {
        self.send(self.import_feeds_request(data)).await
    }
}
