//! Orders placed at checkout and their admin status updates.
//!
//! ARCHITECTURE
//! ============
//! Checkout posts the browser cart as JSON line items. Items are rendered
//! into a fixed text block at order time and stored with the order, so later
//! catalog edits never rewrite what a customer bought.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;

pub const DEFAULT_ORDER_STATUS: &str = "pending";

const MAX_NAME_LEN: usize = 200;
const MAX_PHONE_LEN: usize = 20;
const MAX_STATUS_LEN: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("invalid order: {0}")]
    Validation(String),
    #[error("order not found: {0}")]
    NotFound(i32),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// CHECKOUT
// =============================================================================

/// One cart line as posted by the checkout page.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutItem {
    pub name: String,
    pub quantity: u32,
    /// Kept as the number the client sent so `450` and `450.5` render as typed.
    pub price: serde_json::Number,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
    pub total: Option<f64>,
    pub notes: Option<String>,
}

/// A validated order ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    pub products: String,
    pub total_amount: f64,
    pub notes: Option<String>,
}

fn present(field: Option<String>) -> Option<String> {
    field.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

fn required(field: Option<String>, label: &str, max_len: usize) -> Result<String, OrderError> {
    let value = present(field).ok_or_else(|| OrderError::Validation(format!("{label} is required")))?;
    if value.chars().count() > max_len {
        return Err(OrderError::Validation(format!("{label} is longer than {max_len} characters")));
    }
    Ok(value)
}

/// Render cart lines as `- {name} x{quantity} @ ₹{price}`, one per line.
#[must_use]
pub fn render_line_items(items: &[CheckoutItem]) -> String {
    items
        .iter()
        .map(|item| format!("- {} x{} @ ₹{}", item.name, item.quantity, item.price))
        .collect::<Vec<_>>()
        .join("\n")
}

impl CheckoutRequest {
    /// # Errors
    ///
    /// Returns [`OrderError::Validation`] when name, phone, or total is
    /// missing, too long, or out of range.
    pub fn into_new_order(self) -> Result<NewOrder, OrderError> {
        let customer_name = required(self.name, "name", MAX_NAME_LEN)?;
        let customer_phone = required(self.phone, "phone", MAX_PHONE_LEN)?;
        let total_amount = self
            .total
            .filter(|t| t.is_finite() && *t >= 0.0)
            .ok_or_else(|| OrderError::Validation("total must be a non-negative number".into()))?;

        Ok(NewOrder {
            customer_name,
            customer_phone,
            customer_email: present(self.email),
            customer_address: present(self.address),
            products: render_line_items(&self.items),
            total_amount,
            notes: present(self.notes),
        })
    }
}

// =============================================================================
// ORDER
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: i32,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub customer_address: Option<String>,
    pub products: String,
    pub total_amount: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub order_date: OffsetDateTime,
    pub status: String,
    pub notes: Option<String>,
}

fn order_from_row(row: &PgRow) -> Order {
    Order {
        id: row.get("id"),
        customer_name: row.get("customer_name"),
        customer_phone: row.get("customer_phone"),
        customer_email: row.get("customer_email"),
        customer_address: row.get("customer_address"),
        products: row.get("products"),
        total_amount: row.get("total_amount"),
        order_date: row.get("order_date"),
        status: row.get("status"),
        notes: row.get("notes"),
    }
}

/// Trim and bound an admin-supplied status. Any label is accepted.
///
/// # Errors
///
/// Returns [`OrderError::Validation`] for blank or overlong values.
pub fn normalize_status(raw: &str) -> Result<String, OrderError> {
    let status = raw.trim();
    if status.is_empty() {
        return Err(OrderError::Validation("status must not be blank".into()));
    }
    if status.chars().count() > MAX_STATUS_LEN {
        return Err(OrderError::Validation(format!("status is longer than {MAX_STATUS_LEN} characters")));
    }
    Ok(status.to_owned())
}

// =============================================================================
// QUERIES
// =============================================================================

/// Insert an order with status `pending` and return its id.
pub async fn create_order(pool: &PgPool, order: &NewOrder) -> Result<i32, OrderError> {
    let row = sqlx::query(
        r"INSERT INTO orders
              (customer_name, customer_phone, customer_email, customer_address, products, total_amount, status, notes)
          VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
          RETURNING id",
    )
    .bind(&order.customer_name)
    .bind(&order.customer_phone)
    .bind(&order.customer_email)
    .bind(&order.customer_address)
    .bind(&order.products)
    .bind(order.total_amount)
    .bind(DEFAULT_ORDER_STATUS)
    .bind(&order.notes)
    .fetch_one(pool)
    .await?;
    Ok(row.get("id"))
}

/// Orders newest first, optionally capped at `limit`.
pub async fn list_orders(pool: &PgPool, limit: Option<i64>) -> Result<Vec<Order>, OrderError> {
    let rows = sqlx::query(
        r"SELECT id, customer_name, customer_phone, customer_email, customer_address,
                 products, total_amount, order_date, status, notes
          FROM orders
          ORDER BY order_date DESC, id DESC
          LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(order_from_row).collect())
}

/// Set an order's status. `None` leaves it unchanged but still checks the
/// order exists.
pub async fn update_order_status(pool: &PgPool, id: i32, status: Option<&str>) -> Result<(), OrderError> {
    let status = status.map(normalize_status).transpose()?;
    sqlx::query("UPDATE orders SET status = COALESCE($2, status) WHERE id = $1 RETURNING id")
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?
        .ok_or(OrderError::NotFound(id))?;
    Ok(())
}

/// Order count and summed revenue across all orders.
pub async fn order_totals(pool: &PgPool) -> Result<(i64, f64), OrderError> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS n, COALESCE(SUM(total_amount), 0)::DOUBLE PRECISION AS revenue FROM orders",
    )
    .fetch_one(pool)
    .await?;
    Ok((row.get("n"), row.get("revenue")))
}

#[cfg(test)]
#[path = "orders_test.rs"]
mod tests;
