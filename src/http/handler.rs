//! Request handlers
//!
//! Translate HTTP requests into `Storer` calls and results into responses.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{Result, StoreError};
use crate::storer::Storer;

use super::{key_from_path, HttpState};

/// Pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// Body of a successful List
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: BTreeMap<String, Document>,
    pub total: u64,
    pub page: i64,
    pub limit: i64,
}

pub(super) async fn collection_handler(
    State(state): State<Arc<HttpState>>,
    method: Method,
    Query(params): Query<ListParams>,
    body: Bytes,
) -> Response {
    dispatch(state, method, None, params, body).await
}

pub(super) async fn item_handler(
    State(state): State<Arc<HttpState>>,
    method: Method,
    Path(path): Path<String>,
    Query(params): Query<ListParams>,
    body: Bytes,
) -> Response {
    let key = key_from_path(&path).map(str::to_string);
    dispatch(state, method, key, params, body).await
}

async fn dispatch(
    state: Arc<HttpState>,
    method: Method,
    key: Option<String>,
    params: ListParams,
    body: Bytes,
) -> Response {
    tracing::debug!(
        method = method.as_str(),
        key = key.as_deref().unwrap_or(""),
        "http request"
    );

    match (method, key) {
        (Method::GET, Some(key)) => get_item(state, key).await,
        (Method::GET, None) => list_items(state, params).await,
        (Method::POST | Method::PUT, key) => set_item(state, key.unwrap_or_default(), body).await,
        (Method::DELETE, key) => delete_item(state, key.unwrap_or_default()).await,
        _ => (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed\n").into_response(),
    }
}

async fn get_item(state: Arc<HttpState>, key: String) -> Response {
    let collection = state.config.collection.clone();
    let lookup_key = key.clone();
    let result = run_blocking(&state, move |store| store.get(&collection, &lookup_key)).await;

    match result {
        Ok(Some(doc)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            doc.as_str().to_owned(),
        )
            .into_response(),
        Ok(None) => error_response(
            "Failed to retrieve item",
            StoreError::ItemNotFound {
                collection: state.config.collection.clone(),
                key,
            },
        ),
        Err(e) => error_response("Failed to retrieve item", e),
    }
}

async fn set_item(state: Arc<HttpState>, key: String, body: Bytes) -> Response {
    let doc = match Document::from_slice(&body) {
        Ok(doc) => doc,
        Err(e) => return error_response("Failed to store data", e),
    };

    let collection = state.config.collection.clone();
    match run_blocking(&state, move |store| store.set(&collection, &key, doc)).await {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => error_response("Failed to store data", e),
    }
}

async fn delete_item(state: Arc<HttpState>, key: String) -> Response {
    let collection = state.config.collection.clone();
    match run_blocking(&state, move |store| store.delete(&collection, &key)).await {
        Ok(true) => StatusCode::OK.into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Item not found\n").into_response(),
        Err(e) => error_response("Failed to delete data", e),
    }
}

async fn list_items(state: Arc<HttpState>, params: ListParams) -> Response {
    let limit = params.limit.unwrap_or(state.config.default_list_limit);
    let page = params.page.unwrap_or(1);

    let collection = state.config.collection.clone();
    match run_blocking(&state, move |store| store.list(&collection, limit, page)).await {
        Ok(listing) => Json(ListResponse {
            items: listing.items,
            total: listing.total,
            page,
            limit,
        })
        .into_response(),
        Err(e) => error_response("Failed to fetch items", e),
    }
}

/// Run a store call on the blocking pool; the engine does synchronous file I/O
async fn run_blocking<T, F>(state: &Arc<HttpState>, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn Storer) -> Result<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| StoreError::Runtime(format!("store task failed: {}", e)))?
}

fn status_for(err: &StoreError) -> StatusCode {
    if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn error_response(action: &str, err: StoreError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        tracing::warn!(action, error = %err, "request failed");
    }
    (status, format!("{}: {}\n", action, err)).into_response()
}
