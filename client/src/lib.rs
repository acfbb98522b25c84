//! Storefront browser client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Server-rendered shop pages load this crate as a wasm module. The only
//! behavior it owns is keeping the header cart badge in sync with the cart
//! snapshot in `localStorage`. Everything outside the `hydrate` feature builds
//! natively so the badge logic is tested without a browser.

pub mod cart_badge;

#[cfg(feature = "hydrate")]
pub mod browser;

/// Wasm entry point, called by the page loader once the module is fetched.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    browser::install_cart_badge();
}
