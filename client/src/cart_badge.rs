//! Header cart badge.
//!
//! SYSTEM CONTEXT
//! ==============
//! Cart pages persist the shopper's cart as a JSON array in `localStorage`
//! under [`CART_STORAGE_KEY`]. Every page carries a `#cart-count` badge that
//! shows how many entries the cart holds. This module reads the snapshot and
//! writes its length into the badge once the document is ready.
//!
//! DESIGN
//! ======
//! Storage, element lookup, and the ready signal are injected capabilities so
//! the updater runs the same way against `web-sys` and against in-memory
//! fakes. The snapshot is never written from here.
//!
//! TRADE-OFFS
//! ==========
//! A snapshot that is not a JSON array counts as empty and logs a warning.
//! The badge then reads `0` instead of leaving a stale value or aborting the
//! page script.

use serde_json::Value;

/// `localStorage` key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Element id of the header badge.
pub const CART_COUNT_ELEMENT_ID: &str = "cart-count";

const EMPTY_SNAPSHOT: &str = "[]";

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Read access to a string key-value store.
pub trait KeyValueStore {
    /// Return the value stored under `key`, or `None` when absent or unreadable.
    fn get_item(&self, key: &str) -> Option<String>;
}

/// A node whose visible text can be replaced.
pub trait TextSink {
    fn set_text_content(&self, text: &str);
}

/// Element lookup by id.
pub trait ElementLookup {
    type Element: TextSink;

    fn find_element_by_id(&self, id: &str) -> Option<Self::Element>;
}

/// Registration point for the document-ready signal.
pub trait ReadySignal {
    /// Run `callback` once when the document is ready.
    fn on_ready(&self, callback: Box<dyn FnOnce()>);
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Read-only view of the stored cart at the moment it was loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSnapshot {
    entries: Vec<Value>,
}

impl CartSnapshot {
    /// Parse a raw stored value. `None` parses as the empty cart.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when `raw` is not a JSON array.
    pub fn parse(raw: Option<&str>) -> Result<Self, serde_json::Error> {
        let entries = serde_json::from_str::<Vec<Value>>(raw.unwrap_or(EMPTY_SNAPSHOT))?;
        Ok(Self { entries })
    }

    /// Load the snapshot from `storage`, falling back to the empty cart when
    /// the stored value is malformed.
    pub fn load<S: KeyValueStore + ?Sized>(storage: &S) -> Self {
        let raw = storage.get_item(CART_STORAGE_KEY);
        match Self::parse(raw.as_deref()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("ignoring malformed cart snapshot under {CART_STORAGE_KEY:?}: {e}");
                Self::default()
            }
        }
    }

    /// Number of entries in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// UPDATER
// =============================================================================

/// Write the stored cart's entry count into the `#cart-count` badge.
///
/// Returns the count written, or `None` when the page has no badge.
pub fn update_cart_count<S, D>(storage: &S, document: &D) -> Option<usize>
where
    S: KeyValueStore + ?Sized,
    D: ElementLookup + ?Sized,
{
    let count = CartSnapshot::load(storage).len();
    let Some(badge) = document.find_element_by_id(CART_COUNT_ELEMENT_ID) else {
        log::debug!("no #{CART_COUNT_ELEMENT_ID} element on this page");
        return None;
    };
    badge.set_text_content(&count.to_string());
    Some(count)
}

/// Register the badge updater with the page's ready signal.
pub fn install<R, S, D>(ready: &R, storage: S, document: D)
where
    R: ReadySignal + ?Sized,
    S: KeyValueStore + 'static,
    D: ElementLookup + 'static,
{
    ready.on_ready(Box::new(move || {
        update_cart_count(&storage, &document);
    }));
}

#[cfg(test)]
#[path = "cart_badge_test.rs"]
mod tests;
