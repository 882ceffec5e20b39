use axum::Json;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde_json::json;

use super::render;
use crate::page::RegistryError;

const INTERNAL_MESSAGE: &str = "Internal server error. Please try again later.";

/// Registry failure rendered as a JSON body `{success: false, error}`.
pub struct ApiError(pub RegistryError);

/// Registry failure rendered as a browser page.
pub struct PageError(pub RegistryError);

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        ApiError(err)
    }
}

impl From<RegistryError> for PageError {
    fn from(err: RegistryError) -> Self {
        PageError(err)
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError(RegistryError::InvalidInput(message.into()))
    }
}

fn status_of(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::InvalidSlug(_)
        | RegistryError::InvalidInput(_)
        | RegistryError::DuplicateSlug(_) => StatusCode::BAD_REQUEST,
        RegistryError::Reserved(_) | RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
        RegistryError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_of(&self.0);
        let message = match self.0 {
            RegistryError::StorageUnavailable(err) => {
                tracing::error!("Storage failure while serving API request: {}", err);
                INTERNAL_MESSAGE.to_string()
            }
            RegistryError::DuplicateSlug(_) => {
                "Page name already exists. Please choose a different URL name.".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self.0 {
            RegistryError::Reserved(_) => Redirect::to("/").into_response(),
            RegistryError::NotFound(slug) => (
                StatusCode::NOT_FOUND,
                Html(render::message(
                    "404 - Page not found",
                    &format!("No page lives at /{slug} yet."),
                )),
            )
                .into_response(),
            RegistryError::StorageUnavailable(err) => {
                tracing::error!("Storage failure while serving page: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(render::message("500 - Server error", INTERNAL_MESSAGE)),
                )
                    .into_response()
            }
            other => (
                status_of(&other),
                Html(render::message("400 - Bad request", &other.to_string())),
            )
                .into_response(),
        }
    }
}
