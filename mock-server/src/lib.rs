//! In-memory mock of the reader backend.
//!
//! Reproduces the REST contract the client is written against: feeds,
//! articles, and sync payloads over a shared `Arc<RwLock<Store>>`, with the
//! same paths, status codes, and error bodies as the real service. Used by
//! the client's integration tests and as a local development backend.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Timestamp stamped on feeds by update operations. Fixed so responses stay
/// deterministic for tests.
const UPDATED_AT: &str = "2026-01-01T00:00:00Z";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Feed {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub last_updated: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FeedInput {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub feed_id: i64,
    pub feed_title: Option<String>,
    pub title: String,
    pub url: String,
    pub content: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<String>,
    pub read: bool,
    pub full_content: Option<String>,
}

#[derive(Serialize)]
struct Status {
    success: bool,
}

#[derive(Serialize)]
struct SyncKey {
    sync_key: String,
}

#[derive(Deserialize)]
struct RefreshParams {
    feed_id: Option<i64>,
}

#[derive(Deserialize)]
struct ArticleListParams {
    #[serde(default = "default_page")]
    page: usize,
    #[serde(default = "default_per_page")]
    per_page: usize,
    feed_id: Option<i64>,
    #[serde(default)]
    unread_only: bool,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    20
}

#[derive(Deserialize)]
struct ReadParams {
    #[serde(default = "default_read")]
    read: bool,
}

fn default_read() -> bool {
    true
}

#[derive(Deserialize)]
struct ImportRequest {
    data: String,
}

#[derive(Default)]
pub struct Store {
    feeds: HashMap<i64, Feed>,
    articles: HashMap<i64, Article>,
    sync: HashMap<String, Value>,
    next_feed_id: i64,
    next_article_id: i64,
}

impl Store {
    fn insert_feed(&mut self, input: FeedInput) -> Feed {
        self.next_feed_id += 1;
        let feed = Feed {
            id: self.next_feed_id,
            title: input.title,
            url: input.url,
            description: input.description,
            last_updated: None,
        };
        self.feeds.insert(feed.id, feed.clone());
        feed
    }

    fn seed_article(&mut self, feed: &Feed) -> Article {
        self.next_article_id += 1;
        let id = self.next_article_id;
        let article = Article {
            id,
            feed_id: feed.id,
            feed_title: Some(feed.title.clone()),
            title: format!("{} item {id}", feed.title),
            url: format!("{}/items/{id}", feed.url),
            content: Some(format!("Summary of {} item {id}", feed.title)),
            author: None,
            published_at: None,
            read: false,
            full_content: None,
        };
        self.articles.insert(id, article.clone());
        article
    }
}

pub type Db = Arc<RwLock<Store>>;

type ErrorBody = (StatusCode, Json<Value>);

fn error(status: StatusCode, message: &str) -> ErrorBody {
    (status, Json(json!({ "error": message })))
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/health", get(health))
        .route("/api/feeds", get(list_feeds).post(create_feed))
        .route("/api/feeds/refresh", post(refresh_feeds))
        .route(
            "/api/feeds/{id}",
            get(get_feed).put(update_feed).delete(delete_feed),
        )
        .route("/api/articles", get(list_articles))
        .route("/api/articles/{id}", get(get_article))
        .route("/api/articles/{id}/read", put(mark_article_read))
        .route("/api/articles/{id}/full-content", get(article_full_content))
        .route("/api/sync/key", get(sync_key))
        .route("/api/sync/{key}", get(get_sync_data).post(update_sync_data))
        .route("/api/export", get(export_feeds))
        .route("/api/import", post(import_feeds))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ---- Feeds ----

async fn list_feeds(State(db): State<Db>) -> Json<Vec<Feed>> {
    let store = db.read().await;
    let mut feeds: Vec<Feed> = store.feeds.values().cloned().collect();
    feeds.sort_by(|a, b| a.title.cmp(&b.title));
    Json(feeds)
}

async fn create_feed(
    State(db): State<Db>,
    Json(input): Json<FeedInput>,
) -> Result<(StatusCode, Json<Feed>), ErrorBody> {
    if input.title.is_empty() || input.url.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "URL and title are required"));
    }
    let mut store = db.write().await;
    if store.feeds.values().any(|f| f.url == input.url) {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "Feed already exists or invalid URL",
        ));
    }
    let feed = store.insert_feed(input);
    Ok((StatusCode::CREATED, Json(feed)))
}

async fn get_feed(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Feed>, ErrorBody> {
    let store = db.read().await;
    store
        .feeds
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Feed not found"))
}

async fn update_feed(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<FeedInput>,
) -> Result<Json<Feed>, ErrorBody> {
    if input.title.is_empty() || input.url.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "URL and title are required"));
    }
    let mut store = db.write().await;
    let feed = store
        .feeds
        .get_mut(&id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Feed not found"))?;
    feed.title = input.title;
    feed.url = input.url;
    feed.description = input.description;
    feed.last_updated = Some(UPDATED_AT.to_string());
    Ok(Json(feed.clone()))
}

async fn delete_feed(State(db): State<Db>, Path(id): Path<i64>) -> Json<Status> {
    let mut store = db.write().await;
    store.feeds.remove(&id);
    store.articles.retain(|_, article| article.feed_id != id);
    Json(Status { success: true })
}

async fn refresh_feeds(
    State(db): State<Db>,
    Query(params): Query<RefreshParams>,
) -> Result<Json<Status>, ErrorBody> {
    let mut store = db.write().await;
    let targets: Vec<Feed> = match params.feed_id {
        Some(id) => match store.feeds.get(&id) {
            Some(feed) => vec![feed.clone()],
            None => return Err(error(StatusCode::BAD_REQUEST, "Failed to refresh feeds")),
        },
        None => store.feeds.values().cloned().collect(),
    };
    for feed in &targets {
        store.seed_article(feed);
    }
    Ok(Json(Status { success: true }))
}

// ---- Articles ----

async fn list_articles(
    State(db): State<Db>,
    Query(params): Query<ArticleListParams>,
) -> Json<Vec<Article>> {
    let store = db.read().await;
    let mut articles: Vec<Article> = store
        .articles
        .values()
        .filter(|a| params.feed_id.is_none_or(|id| a.feed_id == id))
        .filter(|a| !params.unread_only || !a.read)
        .cloned()
        .collect();
    // Newest first, mirroring the real service's published-date ordering.
    articles.sort_by(|a, b| b.id.cmp(&a.id));
    let page = params.page.max(1);
    let articles = articles
        .into_iter()
        .skip((page - 1) * params.per_page)
        .take(params.per_page)
        .collect();
    Json(articles)
}

async fn get_article(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Article>, ErrorBody> {
    let store = db.read().await;
    store
        .articles
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Article not found"))
}

async fn mark_article_read(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(params): Query<ReadParams>,
) -> Json<Status> {
    let mut store = db.write().await;
    if let Some(article) = store.articles.get_mut(&id) {
        article.read = params.read;
    }
    Json(Status { success: true })
}

async fn article_full_content(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Article>, ErrorBody> {
    let mut store = db.write().await;
    let article = store
        .articles
        .get_mut(&id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Article not found"))?;
    if article.full_content.is_none() {
        article.full_content = Some(format!("Full text of {}", article.title));
    }
    Ok(Json(article.clone()))
}

// ---- Sync ----

async fn sync_key() -> Json<SyncKey> {
    Json(SyncKey {
        sync_key: Uuid::new_v4().to_string(),
    })
}

async fn get_sync_data(
    State(db): State<Db>,
    Path(key): Path<String>,
) -> Result<Json<Value>, ErrorBody> {
    let store = db.read().await;
    store
        .sync
        .get(&key)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Sync key not found"))
}

async fn update_sync_data(
    State(db): State<Db>,
    Path(key): Path<String>,
    Json(data): Json<Value>,
) -> Result<Json<Status>, ErrorBody> {
    if data.is_null() {
        return Err(error(StatusCode::BAD_REQUEST, "No data provided"));
    }
    db.write().await.sync.insert(key, data);
    Ok(Json(Status { success: true }))
}

async fn export_feeds(State(db): State<Db>) -> Json<Value> {
    let store = db.read().await;
    let mut feeds: Vec<Feed> = store.feeds.values().cloned().collect();
    feeds.sort_by(|a, b| a.title.cmp(&b.title));
    Json(json!({ "data": opml(&feeds) }))
}

async fn import_feeds(
    State(db): State<Db>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<Status>, ErrorBody> {
    if request.data.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "No data provided"));
    }
    let mut store = db.write().await;
    for (title, url) in parse_opml(&request.data) {
        if store.feeds.values().any(|f| f.url == url) {
            continue;
        }
        store.insert_feed(FeedInput {
            title,
            url,
            description: None,
        });
    }
    Ok(Json(Status { success: true }))
}

/// Render the current subscriptions as an OPML 2.0 document.
fn opml(feeds: &[Feed]) -> String {
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<opml version=\"2.0\">\n  <head>\n    <title>Feed subscriptions</title>\n  </head>\n  <body>\n",
    );
    for feed in feeds {
        out.push_str(&format!(
            "    <outline type=\"rss\" text=\"{}\" xmlUrl=\"{}\"/>\n",
            feed.title, feed.url
        ));
    }
    out.push_str("  </body>\n</opml>\n");
    out
}

/// Extract `(text, xmlUrl)` pairs from an OPML document. Attribute scanning
/// is enough for the documents this server itself produces.
fn parse_opml(data: &str) -> Vec<(String, String)> {
    let mut feeds = Vec::new();
    for segment in data.split("<outline").skip(1) {
        let attr = |name: &str| -> Option<String> {
            let marker = format!("{name}=\"");
            let start = segment.find(&marker)? + marker.len();
            let end = segment[start..].find('"')? + start;
            Some(segment[start..end].to_string())
        };
        if let Some(url) = attr("xmlUrl") {
            let title = attr("text").unwrap_or_else(|| url.clone());
            feeds.push((title, url));
        }
    }
    feeds
}
