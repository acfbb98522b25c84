//! Product image uploads.
//!
//! Files land in the configured upload directory under a sanitized,
//! timestamp-prefixed name and are served back from [`UPLOAD_URL_PREFIX`].

use std::path::Path;

use time::OffsetDateTime;

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// URL prefix the router mounts the upload directory under.
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("file type not allowed: {0:?}")]
    DisallowedExtension(String),
    #[error("upload has no usable file name")]
    EmptyFilename,
    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Whether `filename` has one of [`ALLOWED_EXTENSIONS`] (case-insensitive).
#[must_use]
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Reduce a client-supplied name to `[A-Za-z0-9._-]`, dropping any directory
/// part. Returns an empty string when nothing usable is left.
#[must_use]
pub fn secure_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    cleaned.trim_matches(|c| c == '.' || c == '_').to_owned()
}

fn timestamped(name: &str, now: OffsetDateTime) -> String {
    let micros = now.unix_timestamp_nanos() / 1_000;
    format!("{}.{:06}_{name}", micros / 1_000_000, micros % 1_000_000)
}

/// Validate and write an uploaded image, returning its public URL.
pub async fn store_image(upload_dir: &Path, filename: &str, bytes: &[u8]) -> Result<String, UploadError> {
    let safe = secure_filename(filename);
    if safe.is_empty() {
        return Err(UploadError::EmptyFilename);
    }
    if !allowed_file(&safe) {
        return Err(UploadError::DisallowedExtension(safe));
    }

    let stored = timestamped(&safe, OffsetDateTime::now_utc());
    tokio::fs::create_dir_all(upload_dir).await?;
    tokio::fs::write(upload_dir.join(&stored), bytes).await?;
    tracing::info!(file = %stored, size = bytes.len(), "stored product image");

    Ok(format!("{UPLOAD_URL_PREFIX}/{stored}"))
}

/// Remove an image written by [`store_image`], given its public URL. URLs
/// outside [`UPLOAD_URL_PREFIX`] are left alone.
pub async fn discard_image(upload_dir: &Path, url: &str) {
    let Some(stored) = url.strip_prefix(UPLOAD_URL_PREFIX).and_then(|rest| rest.strip_prefix('/')) else {
        return;
    };
    if stored.is_empty() || secure_filename(stored) != stored {
        return;
    }
    match tokio::fs::remove_file(upload_dir.join(stored)).await {
        Ok(()) => tracing::info!(file = %stored, "discarded product image"),
        Err(e) => tracing::warn!(file = %stored, error = %e, "failed to discard product image"),
    }
}

#[cfg(test)]
#[path = "uploads_test.rs"]
mod tests;
