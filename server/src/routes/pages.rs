//! Static HTML pages from the site directory.

use std::path::Path;

use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::services::catalog::Category;
use crate::state::AppState;

const NOT_FOUND_PAGE: &str = "404.html";

/// Read `page` from `site_dir` and answer with `status`.
pub(crate) async fn serve_page(site_dir: &Path, page: &str, status: StatusCode) -> Response {
    match tokio::fs::read_to_string(site_dir.join(page)).await {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(%page, error = %e, "page missing from site directory");
            (StatusCode::INTERNAL_SERVER_ERROR, "page unavailable").into_response()
        }
    }
}

/// The site's 404 page, also used to hide the admin area.
pub(crate) async fn not_found_response(site_dir: &Path) -> Response {
    match tokio::fs::read_to_string(site_dir.join(NOT_FOUND_PAGE)).await {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Page not found").into_response(),
    }
}

/// `GET /`: category landing page.
pub async fn home(State(state): State<AppState>) -> Response {
    serve_page(&state.config.site_dir, "index.html", StatusCode::OK).await
}

/// `GET /products/{category}`: product grid; unknown categories go home.
pub async fn products(State(state): State<AppState>, UrlPath(category): UrlPath<String>) -> Response {
    if category.parse::<Category>().is_err() {
        return Redirect::to("/").into_response();
    }
    serve_page(&state.config.site_dir, "products.html", StatusCode::OK).await
}

/// `GET /cart`
pub async fn cart(State(state): State<AppState>) -> Response {
    serve_page(&state.config.site_dir, "cart.html", StatusCode::OK).await
}

/// `GET /checkout`
pub async fn checkout(State(state): State<AppState>) -> Response {
    serve_page(&state.config.site_dir, "checkout.html", StatusCode::OK).await
}

pub async fn not_found(State(state): State<AppState>) -> Response {
    not_found_response(&state.config.site_dir).await
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
