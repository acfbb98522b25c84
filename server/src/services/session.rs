//! Admin login sessions.
//!
//! ARCHITECTURE
//! ============
//! The shop has a single admin identity configured through the environment.
//! A successful login mints a random token stored in `admin_sessions` and
//! handed to the browser as an `HttpOnly` cookie; every admin request
//! re-validates it against the table.
//!
//! TRADE-OFFS
//! ==========
//! Credentials are compared as SHA-256 digests so the comparison length does
//! not depend on the submitted input. There is no lockout or rate limit.

use std::fmt::Write;

use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::config::AdminCredentials;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

/// Check a submitted username/password pair against the configured admin.
#[must_use]
pub fn credentials_match(expected: &AdminCredentials, username: &str, password: &str) -> bool {
    let user_ok = digest(&expected.username) == digest(username);
    let pass_ok = digest(&expected.password) == digest(password);
    user_ok & pass_ok
}

/// Create an admin session valid for `ttl_hours`, returning the token.
pub async fn create_session(pool: &PgPool, ttl_hours: i64) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query("INSERT INTO admin_sessions (token, expires_at) VALUES ($1, now() + make_interval(hours => $2))")
        .bind(&token)
        .bind(i32::try_from(ttl_hours).unwrap_or(i32::MAX))
        .execute(pool)
        .await?;
    Ok(token)
}

/// Whether `token` names an unexpired admin session.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 AS ok FROM admin_sessions WHERE token = $1 AND expires_at > now()")
        .bind(token)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Delete a session by token.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM admin_sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Remove expired sessions, returning how many were deleted.
pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= now()")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
