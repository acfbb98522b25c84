//! Shopper-facing JSON endpoints for category listings and checkout.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json, Response};

use crate::routes::{catalog_error_response, json_ok, json_rejection_response, order_error_response};
use crate::services::orders::{self, CheckoutRequest};
use crate::services::{catalog, notify};
use crate::state::AppState;

pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully! We will contact you on WhatsApp shortly.";

/// `GET /api/products/{category}`: products in a category; unknown is empty.
pub async fn category_products(State(state): State<AppState>, Path(category): Path<String>) -> Response {
    match catalog::list_products(&state.pool, Some(&category)).await {
        Ok(products) => Json(products).into_response(),
        Err(e) => catalog_error_response(e),
    }
}

/// `POST /checkout`: persist an order and notify the shop owner.
pub async fn checkout(
    State(state): State<AppState>,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection_response(rejection),
    };
    let order = match body.into_new_order() {
        Ok(order) => order,
        Err(e) => return order_error_response(e),
    };

    let order_id = match orders::create_order(&state.pool, &order).await {
        Ok(id) => id,
        Err(e) => return order_error_response(e),
    };
    tracing::info!(order_id, total = order.total_amount, "order placed");

    let notifier = state.notifier.clone();
    let recipient = state.config.notify.whatsapp_number.clone();
    tokio::spawn(async move {
        notify::notify_new_order(notifier.as_ref(), recipient.as_deref(), order_id, &order).await;
    });

    json_ok(serde_json::json!({ "order_id": order_id, "message": ORDER_PLACED_MESSAGE }))
}

#[cfg(test)]
#[path = "shop_test.rs"]
mod tests;
