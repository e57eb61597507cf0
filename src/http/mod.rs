//! HTTP Module
//!
//! REST binding over any [`Storer`](crate::Storer).
//!
//! ## Routes
//! All routes live under `HttpConfig::base_path` and address the single
//! collection `HttpConfig::collection`. The last path segment is the key;
//! no segment (or a trailing slash) addresses the collection.
//!
//! | method          | target     | action | success            |
//! |-----------------|------------|--------|--------------------|
//! | GET             | key        | get    | 200, document body |
//! | GET             | collection | list   | 200, page as JSON  |
//! | POST / PUT      | key        | set    | 201, empty         |
//! | DELETE          | key        | delete | 200, empty         |
//! | anything else   |            |        | 405                |
//!
//! Missing items and collections map to 404, validation errors to 400, all
//! other backend errors to 500. Error bodies are plain text.

mod handler;

use std::sync::Arc;

use axum::routing::any;
use axum::Router;

use crate::config::HttpConfig;
use crate::storer::Storer;

pub use handler::ListResponse;

/// State shared by all handlers of one binding
pub struct HttpState {
    pub store: Arc<dyn Storer>,
    pub config: HttpConfig,
}

/// Build the router for `store` as configured by `config`
pub fn routes(store: Arc<dyn Storer>, config: HttpConfig) -> Router {
    let base = normalize_base(&config.base_path);
    let state = Arc::new(HttpState { store, config });

    let router = if base.is_empty() {
        Router::new()
            .route("/", any(handler::collection_handler))
            .route("/*path", any(handler::item_handler))
    } else {
        Router::new()
            .route(&base, any(handler::collection_handler))
            .route(&format!("{}/", base), any(handler::collection_handler))
            .route(&format!("{}/*path", base), any(handler::item_handler))
    };

    router.with_state(state)
}

/// `"/"` → `""`, `"db/"` → `"/db"`
fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Key addressed by a wildcard capture: its last segment, if non-empty
fn key_from_path(path: &str) -> Option<&str> {
    path.rsplit('/').next().filter(|segment| !segment.is_empty())
}
