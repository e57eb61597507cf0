//! docstore Server Binary
//!
//! Serves one collection of a document store over HTTP.

use std::sync::Arc;

use clap::Parser;
use docstore::config::{FlushPolicy, HttpConfig, JsonFormat, StoreConfig};
use docstore::{FileStore, Storer};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

/// docstore Server
#[derive(Parser, Debug)]
#[command(name = "docstore-server")]
#[command(about = "JSON document store over HTTP")]
#[command(version)]
struct Args {
    /// Backing JSON file ("memory" for an in-memory store)
    #[arg(short, long, default_value = "./docstore.json")]
    file: String,

    /// Only write the file on shutdown instead of on every change
    #[arg(long)]
    manual_flush: bool,

    /// Write compact JSON instead of indented
    #[arg(long)]
    compact: bool,

    /// Largest page a List request can return
    #[arg(long, default_value = "20")]
    max_page_size: usize,

    /// Collection substituted for empty collection names
    #[arg(long, default_value = "default")]
    default_collection: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Path prefix of the REST routes
    #[arg(short, long, default_value = "/")]
    base_path: String,

    /// Collection served by the REST routes
    #[arg(short, long, default_value = "default")]
    collection: String,

    /// List limit used when a request gives none
    #[arg(long, default_value = "10")]
    default_limit: i64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,docstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("docstore Server v{}", docstore::VERSION);
    tracing::info!("Backing file: {}", args.file);
    tracing::info!("Listen address: {}", args.listen);

    // Build configs from args
    let store_config = StoreConfig::builder()
        .path(&args.file)
        .flush_policy(if args.manual_flush {
            FlushPolicy::Manual
        } else {
            FlushPolicy::Auto
        })
        .json_format(if args.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        })
        .max_page_size(args.max_page_size)
        .default_collection(&args.default_collection)
        .build();

    let http_config = HttpConfig::builder()
        .listen_addr(&args.listen)
        .base_path(&args.base_path)
        .collection(&args.collection)
        .default_list_limit(args.default_limit)
        .build();

    // Open store
    let store = match FileStore::open(store_config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Store initialized successfully");

    let listener = match TcpListener::bind(&http_config.listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", http_config.listen_addr, e);
            std::process::exit(1);
        }
    };

    let storer: Arc<dyn Storer> = store.clone();
    let router = docstore::http::routes(storer, http_config);

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
    }

    // Only matters under manual flush; write-through already persisted everything
    if let Err(e) = store.flush() {
        tracing::error!("Final flush failed: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}

/// Resolve on Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Unable to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, initiating shutdown...");
}
