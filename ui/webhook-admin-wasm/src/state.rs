//! Console state.
//!
//! WASM is single-threaded, so a `RefCell` in `thread_local!` storage holds
//! the little state the console keeps between events: the navigation
//! generation used to drop stale responses.

use std::cell::RefCell;

#[derive(Default)]
struct AppState {
    generation: u64,
}

thread_local! {
    static STATE: RefCell<AppState> = RefCell::new(AppState::default());
}

/// Start a new navigation and return its generation.
pub fn next_generation() -> u64 {
    STATE.with(|state| {
        let mut state = state.borrow_mut();
        state.generation += 1;
        state.generation
    })
}

/// Whether the given generation is still the active navigation. Responses
/// from a superseded navigation must not render.
pub fn is_current(generation: u64) -> bool {
    STATE.with(|state| state.borrow().generation == generation)
}

// ── localStorage helpers ──

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

pub fn local_get(key: &str) -> Option<String> {
    storage()?.get_item(key).ok()?
}

pub fn local_set(key: &str, value: &str) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(key, value);
    }
}
