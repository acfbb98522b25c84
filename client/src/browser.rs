//! `web-sys` implementations of the cart badge capabilities.
//!
//! Requires a browser environment; compiled only with the `hydrate` feature.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::cart_badge::{self, ElementLookup, KeyValueStore, ReadySignal, TextSink};

/// `window.localStorage`, read-only.
pub struct BrowserStorage {
    storage: Option<web_sys::Storage>,
}

impl BrowserStorage {
    /// Resolve `localStorage` from `window`. Private-mode browsers and
    /// sandboxed frames may refuse access; that reads as an empty store.
    #[must_use]
    pub fn from_window(window: &web_sys::Window) -> Self {
        Self { storage: window.local_storage().ok().flatten() }
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }
}

/// Element handle backed by a live DOM node.
pub struct BrowserElement(web_sys::Element);

impl TextSink for BrowserElement {
    fn set_text_content(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }
}

/// `window.document` as an element lookup and ready signal.
#[derive(Clone)]
pub struct BrowserDocument {
    document: web_sys::Document,
}

impl BrowserDocument {
    #[must_use]
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

impl ElementLookup for BrowserDocument {
    type Element = BrowserElement;

    fn find_element_by_id(&self, id: &str) -> Option<BrowserElement> {
        self.document.get_element_by_id(id).map(BrowserElement)
    }
}

/// Fires on `DOMContentLoaded`, or immediately when parsing already finished.
pub struct DomReady {
    document: web_sys::Document,
}

impl DomReady {
    #[must_use]
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }
}

impl ReadySignal for DomReady {
    fn on_ready(&self, callback: Box<dyn FnOnce()>) {
        // The wasm module usually finishes loading after the event fired.
        if self.document.ready_state() != "loading" {
            callback();
            return;
        }

        let listener = Closure::once_into_js(move || callback());
        if let Err(e) = self
            .document
            .add_event_listener_with_callback("DOMContentLoaded", listener.unchecked_ref::<js_sys::Function>())
        {
            log::warn!("failed to attach DOMContentLoaded listener: {e:?}");
        }
    }
}

/// Wire the cart badge to the current page.
pub fn install_cart_badge() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let storage = BrowserStorage::from_window(&window);
    let ready = DomReady::new(document.clone());
    cart_badge::install(&ready, storage, BrowserDocument::new(document));
}
