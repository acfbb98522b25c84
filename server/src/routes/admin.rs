//! Admin routes: login, the session guard, catalog and order management.
//!
//! Every admin route except login answers with the site's 404 page when the
//! request carries no valid session, so the admin area is not discoverable.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, FromRequestParts, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::routes::pages::{not_found_response, serve_page};
use crate::routes::{
    catalog_error_response, json_error, json_ok, json_rejection_response, order_error_response, upload_error_response,
};
use crate::services::catalog::{self, ProductForm};
use crate::services::orders::{self, Order};
use crate::services::{session, uploads};
use crate::state::AppState;

const COOKIE_NAME: &str = "admin_session";
const RECENT_ORDERS_LIMIT: i64 = 10;

// =============================================================================
// SESSION EXTRACTOR
// =============================================================================

/// Proof of a valid admin session. Use as a handler parameter to guard it.
pub struct AdminSession;

impl<S> FromRequestParts<S> for AdminSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(not_found_response(&app_state.config.site_dir).await);
        }

        match session::validate_session(&app_state.pool, token).await {
            Ok(true) => Ok(Self),
            Ok(false) => Err(not_found_response(&app_state.config.site_dir).await),
            Err(e) => {
                tracing::error!(error = %e, "admin session validation failed");
                Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
            }
        }
    }
}

fn session_cookie(value: String, secure: bool, max_age: Option<Duration>) -> Cookie<'static> {
    let mut cookie = Cookie::build((COOKIE_NAME, value))
        .path("/admin")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();
    if let Some(max_age) = max_age {
        cookie.set_max_age(max_age);
    }
    cookie
}

// =============================================================================
// LOGIN / LOGOUT
// =============================================================================

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// `GET /admin/login`
pub async fn login_page(State(state): State<AppState>) -> Response {
    serve_page(&state.config.site_dir, "admin/login.html", StatusCode::OK).await
}

/// `POST /admin/login`: check credentials, start a session, go to the dashboard.
pub async fn login(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginForm>) -> Response {
    let Some(admin) = &state.config.admin else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Admin login not configured").into_response();
    };

    if !session::credentials_match(admin, &form.username, &form.password) {
        tracing::warn!(username = %form.username, "admin login rejected");
        return Redirect::to("/admin/login?error=invalid").into_response();
    }

    let token = match session::create_session(&state.pool, state.config.admin_session_ttl_hours).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "admin session creation failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session").into_response();
        }
    };

    tracing::info!("admin logged in");
    let ttl = Duration::hours(state.config.admin_session_ttl_hours);
    let jar = jar.add(session_cookie(token, state.config.cookie_secure, Some(ttl)));
    (jar, Redirect::to("/admin/dashboard")).into_response()
}

/// `GET /admin/logout`: drop the session and clear the cookie.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(token) = jar.get(COOKIE_NAME).map(Cookie::value).filter(|t| !t.is_empty()) {
        if let Err(e) = session::delete_session(&state.pool, token).await {
            tracing::warn!(error = %e, "admin session delete failed");
        }
    }

    let jar = jar.add(session_cookie(String::new(), state.config.cookie_secure, Some(Duration::ZERO)));
    (jar, Redirect::to("/")).into_response()
}

// =============================================================================
// PAGES
// =============================================================================

/// `GET /admin/dashboard`
pub async fn dashboard_page(State(state): State<AppState>, _admin: AdminSession) -> Response {
    serve_page(&state.config.site_dir, "admin/dashboard.html", StatusCode::OK).await
}

/// `GET /admin/products`
pub async fn products_page(State(state): State<AppState>, _admin: AdminSession) -> Response {
    serve_page(&state.config.site_dir, "admin/products.html", StatusCode::OK).await
}

/// `GET /admin/orders`
pub async fn orders_page(State(state): State<AppState>, _admin: AdminSession) -> Response {
    serve_page(&state.config.site_dir, "admin/orders.html", StatusCode::OK).await
}

// =============================================================================
// DASHBOARD
// =============================================================================

#[derive(Serialize)]
pub struct DashboardResponse {
    pub total_products: i64,
    pub total_orders: i64,
    pub total_revenue: f64,
    pub recent_orders: Vec<Order>,
}

/// `GET /admin/api/dashboard`: headline counts plus the newest orders.
pub async fn dashboard(State(state): State<AppState>, _admin: AdminSession) -> Response {
    let total_products = match catalog::count_products(&state.pool).await {
        Ok(n) => n,
        Err(e) => return catalog_error_response(e),
    };
    let (total_orders, total_revenue) = match orders::order_totals(&state.pool).await {
        Ok(totals) => totals,
        Err(e) => return order_error_response(e),
    };
    let recent_orders = match orders::list_orders(&state.pool, Some(RECENT_ORDERS_LIMIT)).await {
        Ok(list) => list,
        Err(e) => return order_error_response(e),
    };

    Json(DashboardResponse { total_products, total_orders, total_revenue, recent_orders }).into_response()
}

// =============================================================================
// PRODUCTS
// =============================================================================

#[derive(Deserialize)]
pub struct ProductQuery {
    category: Option<String>,
}

#[derive(Deserialize)]
pub struct ProductIdQuery {
    id: Option<String>,
}

/// Image bytes held until the rest of the form validates.
pub(crate) struct PendingImage {
    filename: String,
    bytes: Vec<u8>,
}

/// Parsed multipart product form.
#[derive(Default)]
pub(crate) struct ProductUpload {
    pub(crate) id: Option<String>,
    pub(crate) form: ProductForm,
    pub(crate) image: Option<PendingImage>,
}

fn bad_multipart(e: impl std::fmt::Display) -> Response {
    json_error(StatusCode::BAD_REQUEST, format!("invalid form data: {e}"))
}

async fn read_product_upload(mut multipart: Multipart) -> Result<ProductUpload, Response> {
    let mut upload = ProductUpload::default();
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == "image" {
            let filename = field.file_name().unwrap_or_default().to_owned();
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            if !filename.is_empty() && !bytes.is_empty() {
                upload.image = Some(PendingImage { filename, bytes: bytes.to_vec() });
            }
            continue;
        }

        let value = field.text().await.map_err(bad_multipart)?;
        let slot = match name.as_str() {
            "id" => &mut upload.id,
            "name" => &mut upload.form.name,
            "category" => &mut upload.form.category,
            "description" => &mut upload.form.description,
            "price" => &mut upload.form.price,
            "stock" => &mut upload.form.stock,
            "image_url" => &mut upload.form.image_url,
            _ => continue,
        };
        *slot = Some(value);
    }
    Ok(upload)
}

pub(crate) fn parse_product_id(raw: Option<&str>) -> Result<i32, Response> {
    raw.map(str::trim)
        .and_then(|id| id.parse::<i32>().ok())
        .ok_or_else(|| json_error(StatusCode::BAD_REQUEST, "product id is required"))
}

async fn store_pending_image(state: &AppState, image: Option<PendingImage>) -> Result<Option<String>, Response> {
    let Some(image) = image else {
        return Ok(None);
    };
    uploads::store_image(&state.config.upload_dir, &image.filename, &image.bytes)
        .await
        .map(Some)
        .map_err(upload_error_response)
}

/// Undo [`store_pending_image`] after the row write failed.
async fn discard_stored_image(state: &AppState, url: Option<&str>) {
    if let Some(url) = url {
        uploads::discard_image(&state.config.upload_dir, url).await;
    }
}

/// `GET /admin/api/products[?category=]`
pub async fn list_products(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<ProductQuery>,
) -> Response {
    let category = query.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
    match catalog::list_products(&state.pool, category).await {
        Ok(products) => Json(products).into_response(),
        Err(e) => catalog_error_response(e),
    }
}

/// `POST /admin/api/products`: multipart create; an uploaded image wins
/// over `image_url`.
pub async fn create_product(State(state): State<AppState>, _admin: AdminSession, multipart: Multipart) -> Response {
    let upload = match read_product_upload(multipart).await {
        Ok(upload) => upload,
        Err(resp) => return resp,
    };
    let mut product = match upload.form.into_new_product() {
        Ok(product) => product,
        Err(e) => return catalog_error_response(e),
    };
    let stored = match store_pending_image(&state, upload.image).await {
        Ok(stored) => stored,
        Err(resp) => return resp,
    };
    if let Some(url) = &stored {
        product.image_url = Some(url.clone());
    }

    match catalog::create_product(&state.pool, &product).await {
        Ok(id) => {
            tracing::info!(product_id = id, name = %product.name, "product created");
            json_ok(serde_json::json!({ "id": id }))
        }
        Err(e) => {
            discard_stored_image(&state, stored.as_deref()).await;
            catalog_error_response(e)
        }
    }
}

/// `PUT /admin/api/products`: multipart update by `id`; blank fields keep
/// their stored value.
pub async fn update_product(State(state): State<AppState>, _admin: AdminSession, multipart: Multipart) -> Response {
    let upload = match read_product_upload(multipart).await {
        Ok(upload) => upload,
        Err(resp) => return resp,
    };
    let id = match parse_product_id(upload.id.as_deref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let mut patch = match upload.form.into_patch() {
        Ok(patch) => patch,
        Err(e) => return catalog_error_response(e),
    };
    if let Err(e) = catalog::get_product(&state.pool, id).await {
        return catalog_error_response(e);
    }
    let stored = match store_pending_image(&state, upload.image).await {
        Ok(stored) => stored,
        Err(resp) => return resp,
    };
    if let Some(url) = &stored {
        patch.image_url = Some(url.clone());
    }

    match catalog::update_product(&state.pool, id, &patch).await {
        Ok(()) => {
            tracing::info!(product_id = id, "product updated");
            json_ok(serde_json::json!({}))
        }
        Err(e) => {
            discard_stored_image(&state, stored.as_deref()).await;
            catalog_error_response(e)
        }
    }
}

/// `DELETE /admin/api/products?id=`
pub async fn delete_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<ProductIdQuery>,
) -> Response {
    let id = match parse_product_id(query.id.as_deref()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match catalog::delete_product(&state.pool, id).await {
        Ok(()) => {
            tracing::info!(product_id = id, "product deleted");
            json_ok(serde_json::json!({}))
        }
        Err(e) => catalog_error_response(e),
    }
}

// =============================================================================
// ORDERS
// =============================================================================

#[derive(Deserialize)]
pub struct UpdateOrderBody {
    status: Option<String>,
}

/// `GET /admin/api/orders`: every order, newest first.
pub async fn list_orders(State(state): State<AppState>, _admin: AdminSession) -> Response {
    match orders::list_orders(&state.pool, None).await {
        Ok(list) => Json(list).into_response(),
        Err(e) => order_error_response(e),
    }
}

/// `PUT /admin/api/orders/{id}`: set the order status.
pub async fn update_order(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
    body: Result<Json<UpdateOrderBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection_response(rejection),
    };
    match orders::update_order_status(&state.pool, id, body.status.as_deref()).await {
        Ok(()) => {
            tracing::info!(order_id = id, status = ?body.status, "order updated");
            json_ok(serde_json::json!({}))
        }
        Err(e) => order_error_response(e),
    }
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
