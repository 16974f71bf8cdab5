//! DOM glue.
//!
//! The host page provides three static elements: `#consoleMenu`,
//! `#consoleView`, and `#consoleStatus`. Everything else is rendered by the
//! views and looked up by id or class afterwards.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

// ── Helpers ──

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

pub fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

pub fn by_id(id: &str) -> Option<Element> {
    doc().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|el| el.dyn_into::<T>().ok())
}

pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    let nodes = parent.query_selector_all(selector).unwrap();
    let mut elements = Vec::new();
    for i in 0..nodes.length() {
        if let Some(node) = nodes.item(i) {
            if let Ok(el) = node.dyn_into::<Element>() {
                elements.push(el);
            }
        }
    }
    elements
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_inner_html(el: &Element, html: &str) {
    el.set_inner_html(html);
}

pub fn input_value(id: &str) -> String {
    by_id_typed::<HtmlInputElement>(id)
        .map(|el| el.value().trim().to_string())
        .unwrap_or_default()
}

pub fn select_value(id: &str) -> String {
    by_id_typed::<HtmlSelectElement>(id)
        .map(|el| el.value())
        .unwrap_or_default()
}

pub fn textarea_value(id: &str) -> String {
    by_id_typed::<HtmlTextAreaElement>(id)
        .map(|el| el.value())
        .unwrap_or_default()
}

pub fn set_input_value(id: &str, value: &str) {
    if let Some(el) = by_id_typed::<HtmlInputElement>(id) {
        el.set_value(value);
    }
}

/// Escape a value for interpolation into rendered HTML.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Attach a click handler to an element.
macro_rules! on_click {
    ($el:expr, $cb:expr) => {{
        let cb = wasm_bindgen::closure::Closure::wrap(
            Box::new($cb) as Box<dyn FnMut(web_sys::MouseEvent)>
        );
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }};
}
pub(crate) use on_click;

// ── Shell ──

/// The static frame of the console. All views render into `view`.
#[derive(Clone)]
pub struct Shell {
    pub menu: Element,
    pub view: Element,
    pub status: Element,
}

impl Shell {
    /// Resolve the static elements. Call once after the page loaded.
    pub fn bind() -> Result<Shell, JsValue> {
        Ok(Shell {
            menu: required("consoleMenu")?,
            view: required("consoleView")?,
            status: required("consoleStatus")?,
        })
    }

    pub fn show_error(&self, message: &str) {
        gloo_console::error!(message.to_owned());
        set_text(&self.status, message);
    }

    pub fn clear_status(&self) {
        set_text(&self.status, "");
    }
}

fn required(id: &str) -> Result<Element, JsValue> {
    by_id(id).ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))
}
