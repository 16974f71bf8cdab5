//! NetForge webhook admin console.
//!
//! Pure Rust + WASM single-page console for managing webhook subscriptions.
//! The host page provides `#consoleMenu`, `#consoleView`, and
//! `#consoleStatus`; routing runs over the location hash
//! (`#webhooks.html?filter=...`).

pub mod api;
pub mod dom;
pub mod router;
pub mod state;
pub mod views;

use wasm_bindgen::prelude::*;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    let shell = dom::Shell::bind()?;
    router::render_menu(&shell);
    router::install(&shell)?;

    // Render whatever the location already names.
    router::dispatch(&shell);

    Ok(())
}
