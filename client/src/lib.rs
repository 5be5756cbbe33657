//! Asynchronous API client for the news reader backend.
//!
//! # Overview
//! Thin wrappers around the reader service's REST API: one async method per
//! endpoint, grouped by resource (feeds, articles, sync). Each method issues
//! a single HTTP request and returns the decoded response body — nothing is
//! cached, retried, or validated beyond deserialization.
//!
//! # Design
//! - `ApiClient` holds only the transport configuration (base URL plus
//!   default headers), fixed at construction and shared by every call.
//! - Each operation is split into a `*_request` builder and a public async
//!   method that sends it, so the exact method, path, and query string are
//!   testable without a running server.
//! - DTOs in [`types`] mirror the backend schema but stay tolerant; response
//!   bodies pass through as the server sent them.
//! - Errors carry the HTTP status and response body when available and are
//!   propagated unchanged to the caller.

pub mod client;
pub mod error;
pub mod theme;
pub mod types;

pub use client::{ApiClient, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use theme::Theme;
pub use types::{Article, ArticleQuery, ExportPayload, Feed, FeedInput, StatusResponse};
