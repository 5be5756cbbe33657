//! DTOs for the reader API.
//!
//! # Design
//! These types mirror the backend's JSON schema but are defined
//! independently; the integration tests against the mock server catch
//! schema drift. Fields the server may omit are `Option` with serde
//! defaults so responses pass through without local validation, and request
//! payloads skip `None` fields entirely.

use serde::{Deserialize, Serialize};

/// A subscribed feed as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feed {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Request payload for creating or updating a feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedInput {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An article belonging to a feed, with its read/unread status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    pub id: i64,
    pub feed_id: i64,
    #[serde(default)]
    pub feed_title: Option<String>,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub full_content: Option<String>,
}

/// Filters for listing articles. Omitted fields are left out of the query
/// string; the server applies its own defaults.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_only: Option<bool>,
}

/// Acknowledgement payload returned by mutating endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
}

/// OPML document wrapper returned by the export endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportPayload {
    pub data: String,
}

/// Envelope for `GET /sync/key`; callers receive only the key itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncKeyResponse {
    pub sync_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_roundtrips_through_json() {
        let feed = Feed {
            id: 3,
            title: "Example".to_string(),
            url: "https://example.com/rss".to_string(),
            description: Some("An example feed".to_string()),
            last_updated: None,
        };
        let json = serde_json::to_string(&feed).unwrap();
        let back: Feed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, feed);
    }

    #[test]
    fn feed_tolerates_missing_optional_fields() {
        let feed: Feed =
            serde_json::from_str(r#"{"id":1,"title":"T","url":"https://t.example"}"#).unwrap();
        assert!(feed.description.is_none());
        assert!(feed.last_updated.is_none());
    }

    #[test]
    fn feed_input_skips_absent_description() {
        let input = FeedInput {
            title: "T".to_string(),
            url: "https://t.example/rss".to_string(),
            description: None,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("description").is_none());
    }

    #[test]
    fn article_read_defaults_to_false() {
        let article: Article = serde_json::from_str(
            r#"{"id":9,"feed_id":1,"title":"A","url":"https://t.example/a"}"#,
        )
        .unwrap();
        assert!(!article.read);
        assert!(article.full_content.is_none());
    }

    #[test]
    fn empty_article_query_serializes_to_nothing() {
        let json = serde_json::to_value(ArticleQuery::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn article_query_keeps_set_fields_only() {
        let query = ArticleQuery {
            feed_id: Some(2),
            unread_only: Some(true),
            ..ArticleQuery::default()
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({"feed_id": 2, "unread_only": true}));
    }

    #[test]
    fn sync_key_envelope_extracts_field() {
        let envelope: SyncKeyResponse =
            serde_json::from_str(r#"{"sync_key":"abc-123"}"#).unwrap();
        assert_eq!(envelope.sync_key, "abc-123");
    }
}
