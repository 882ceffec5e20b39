//! HTTP handlers for page viewing, creation, availability and listing

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};

use super::errors::{ApiError, PageError};
use super::render;
use crate::page::{Availability, PageRecord, SlugRegistry};
use crate::validation::slug::SlugError;

const PAGE_CACHE_CONTROL: &str = "public, max-age=300";
const MISSING_FIELDS: &str = "All fields are required: slug, title, and content.";

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckSlugParams {
    pub slug: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreatePageRequest {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatePageResponse {
    pub success: bool,
    pub slug: String,
    pub title: String,
    pub url: String,
    pub message: &'static str,
}

pub async fn home(
    State(registry): State<Arc<SlugRegistry>>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    let pages = registry.list(None, params.q.as_deref()).await;
    Html(render::home(params.q.as_deref(), &pages))
}

pub async fn write_form() -> Html<String> {
    Html(render::write_form())
}

/// Browser and crawler asset paths, which never name a page.
pub async fn missing_asset() -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(render::message("404 - Not found", "Doxify does not serve this file.")),
    )
}

pub async fn search(Query(params): Query<SearchParams>) -> Redirect {
    match params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => Redirect::to(&format!("/?q={}", urlencoding::encode(q))),
        None => Redirect::to("/"),
    }
}

pub async fn view_page(
    State(registry): State<Arc<SlugRegistry>>,
    Path(slug): Path<String>,
) -> Result<Response, PageError> {
    let page = registry.get(&slug).await?;
    Ok((
        [(CACHE_CONTROL, PAGE_CACHE_CONTROL)],
        Html(render::page(&page)),
    )
        .into_response())
}

pub async fn show_page(
    State(registry): State<Arc<SlugRegistry>>,
    Path(slug): Path<String>,
) -> Result<Json<PageRecord>, ApiError> {
    Ok(Json(registry.get(&slug).await?))
}

pub async fn check_slug(
    State(registry): State<Arc<SlugRegistry>>,
    Query(params): Query<CheckSlugParams>,
) -> Result<Json<Availability>, ApiError> {
    let Some(slug) = params.slug.filter(|s| !s.is_empty()) else {
        return Err(ApiError(SlugError::Missing.into()));
    };
    Ok(Json(registry.check_available(&slug).await?))
}

pub async fn create_page(
    State(registry): State<Arc<SlugRegistry>>,
    payload: Result<Json<CreatePageRequest>, JsonRejection>,
) -> Result<Json<CreatePageResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| match rejection {
        JsonRejection::JsonDataError(_) => ApiError::bad_request("All fields must be strings."),
        other => ApiError::bad_request(other.body_text()),
    })?;

    let (Some(slug), Some(title), Some(content)) = (request.slug, request.title, request.content)
    else {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    };

    let page = registry.create(&slug, &title, &content).await?;
    Ok(Json(CreatePageResponse {
        success: true,
        url: page.url(),
        slug: page.slug,
        title: page.title,
        message: "Page created successfully",
    }))
}

pub async fn list_pages(
    State(registry): State<Arc<SlugRegistry>>,
    Query(params): Query<ListParams>,
) -> Json<Vec<PageRecord>> {
    Json(registry.list(params.limit, params.q.as_deref()).await)
}
