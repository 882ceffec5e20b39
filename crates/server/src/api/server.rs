use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::Method;
use axum::routing::{get, post};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{
    check_slug, create_page, home, list_pages, missing_asset, search, show_page, view_page,
    write_form,
};
use crate::page::SlugRegistry;

pub fn build_router(registry: Arc<SlugRegistry>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/write", get(write_form))
        .route("/search", get(search))
        .route("/create", post(create_page))
        .route("/check-slug", get(check_slug))
        .route("/list", get(list_pages))
        .route("/api/pages/{slug}", get(show_page))
        .route("/favicon.ico", get(missing_asset))
        .route("/robots.txt", get(missing_asset))
        .route("/sitemap.xml", get(missing_asset))
        .route("/{slug}", get(view_page))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS]),
        )
        .with_state(registry)
}

pub async fn run_api(
    registry: Arc<SlugRegistry>,
    addr: SocketAddr,
    shutdown: CancellationToken,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Doxify listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(registry))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    Ok(())
}
