//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the shop's HTTP surface under a single Axum router:
//! static HTML pages from the site directory, the JSON checkout and catalog
//! endpoints, and the session-guarded admin area. Pages carry the wasm client
//! bundle from `/pkg`, which keeps the header cart badge in sync.

pub mod admin;
pub mod pages;
pub mod shop;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, put};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::services::catalog::CatalogError;
use crate::services::orders::OrderError;
use crate::services::uploads::{UPLOAD_URL_PREFIX, UploadError};
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let site_dir = state.config.site_dir.clone();
    let upload_dir = state.config.upload_dir.clone();
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(pages::home))
        .route("/products/{category}", get(pages::products))
        .route("/cart", get(pages::cart))
        .route("/checkout", get(pages::checkout).post(shop::checkout))
        .route("/api/products/{category}", get(shop::category_products))
        .route("/admin/login", get(admin::login_page).post(admin::login))
        .route("/admin/logout", get(admin::logout))
        .route("/admin/dashboard", get(admin::dashboard_page))
        .route("/admin/products", get(admin::products_page))
        .route("/admin/orders", get(admin::orders_page))
        .route("/admin/api/dashboard", get(admin::dashboard))
        .route(
            "/admin/api/products",
            get(admin::list_products)
                .post(admin::create_product)
                .put(admin::update_product)
                .delete(admin::delete_product),
        )
        .route("/admin/api/orders", get(admin::list_orders))
        .route("/admin/api/orders/{id}", put(admin::update_order))
        .route("/healthz", get(healthz))
        .nest_service("/static", ServeDir::new(site_dir.join("static")))
        .nest_service("/pkg", ServeDir::new(site_dir.join("pkg")))
        .nest_service(UPLOAD_URL_PREFIX, ServeDir::new(upload_dir))
        .fallback(pages::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// JSON ERRORS
// =============================================================================

/// `{"success": false, "error": message}` with the given status.
pub(crate) fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "success": false, "error": message.into() });
    (status, Json(body)).into_response()
}

pub(crate) fn json_ok(extra: serde_json::Value) -> Response {
    let mut body = serde_json::json!({ "success": true });
    if let (Some(obj), serde_json::Value::Object(fields)) = (body.as_object_mut(), extra) {
        obj.extend(fields);
    }
    Json(body).into_response()
}

/// Malformed or mistyped JSON bodies answer 400 in the shop's error shape.
pub(crate) fn json_rejection_response(rejection: JsonRejection) -> Response {
    tracing::debug!(error = %rejection.body_text(), "rejected JSON body");
    json_error(StatusCode::BAD_REQUEST, rejection.body_text())
}

fn internal_error(err: &dyn std::error::Error) -> Response {
    tracing::error!(error = %err, "request failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

pub(crate) fn catalog_error_response(err: CatalogError) -> Response {
    match err {
        CatalogError::Validation(message) => json_error(StatusCode::BAD_REQUEST, message),
        CatalogError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "Product not found"),
        CatalogError::Database(e) => internal_error(&e),
    }
}

pub(crate) fn order_error_response(err: OrderError) -> Response {
    match err {
        OrderError::Validation(message) => json_error(StatusCode::BAD_REQUEST, message),
        OrderError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "Order not found"),
        OrderError::Database(e) => internal_error(&e),
    }
}

pub(crate) fn upload_error_response(err: UploadError) -> Response {
    match err {
        UploadError::DisallowedExtension(_) | UploadError::EmptyFilename => {
            json_error(StatusCode::BAD_REQUEST, err.to_string())
        }
        UploadError::Io(e) => internal_error(&e),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
