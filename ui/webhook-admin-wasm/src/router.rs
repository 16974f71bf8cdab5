//! Route table and hash navigation.
//!
//! Views are named after their route (`webhooks.html?filter=...` in the
//! location hash). The master/detail composition is an explicit table handed
//! to the router at startup; the menu is rendered from the same table.

use crate::dom::{self, Shell, on_click};
use crate::state;
use crate::views;
use nf_resource::Params;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewName {
    WebhookList,
    NewWebhook,
    WebhookDetail,
    ConfirmRemove,
    WebhookTemplate,
    WebhookStatistics,
    MessageQueue,
    MessageDetail,
}

impl ViewName {
    pub fn path(&self) -> &'static str {
        match self {
            ViewName::WebhookList => "webhooks.html",
            ViewName::NewWebhook => "new-webhook.html",
            ViewName::WebhookDetail => "webhook.html",
            ViewName::ConfirmRemove => "confirm-remove.html",
            ViewName::WebhookTemplate => "webhook-template.html",
            ViewName::WebhookStatistics => "webhook-statistics.html",
            ViewName::MessageQueue => "message-queue.html",
            ViewName::MessageDetail => "message.html",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewName::WebhookList => "Webhooks",
            ViewName::NewWebhook => "New webhook",
            ViewName::WebhookDetail => "Webhook",
            ViewName::ConfirmRemove => "Remove webhook",
            ViewName::WebhookTemplate => "Template",
            ViewName::WebhookStatistics => "Statistics",
            ViewName::MessageQueue => "Message queue",
            ViewName::MessageDetail => "Message",
        }
    }
}

/// A master view and the detail views reached from it.
pub struct ViewTree {
    pub master: ViewName,
    pub details: &'static [ViewName],
}

/// The console menu: all view trees, in display order.
pub struct Menu {
    pub trees: &'static [ViewTree],
}

pub const MENU: Menu = Menu {
    trees: &[
        ViewTree {
            master: ViewName::WebhookList,
            details: &[ViewName::NewWebhook],
        },
        ViewTree {
            master: ViewName::WebhookDetail,
            details: &[ViewName::ConfirmRemove],
        },
        ViewTree {
            master: ViewName::MessageQueue,
            details: &[ViewName::MessageDetail],
        },
        ViewTree {
            master: ViewName::WebhookTemplate,
            details: &[],
        },
        ViewTree {
            master: ViewName::WebhookStatistics,
            details: &[],
        },
    ],
};

impl Menu {
    /// Resolve a route path against the table.
    pub fn resolve(&self, path: &str) -> Option<ViewName> {
        self.trees.iter().find_map(|tree| {
            if tree.master.path() == path {
                return Some(tree.master);
            }
            tree.details.iter().copied().find(|view| view.path() == path)
        })
    }
}

// ── Navigation ──

/// Navigate to a view, carrying the given route parameters.
pub fn navigate(view: ViewName, params: &Params) {
    let hash = if params.is_empty() {
        format!("#{}", view.path())
    } else {
        format!("#{}?{}", view.path(), params.to_query())
    };
    let _ = dom::window().location().set_hash(&hash);
}

/// The route encoded in the current location hash. An unknown or empty hash
/// falls back to the webhook list.
pub fn current_route() -> (ViewName, Params) {
    let hash = dom::window()
        .location()
        .hash()
        .unwrap_or_default();
    let route = hash.trim_start_matches('#');
    let (path, query) = route.split_once('?').unwrap_or((route, ""));
    match MENU.resolve(path) {
        Some(view) => (view, Params::parse_query(query)),
        None => (ViewName::WebhookList, Params::new()),
    }
}

/// Wire hash navigation. Every hash change re-dispatches.
pub fn install(shell: &Shell) -> Result<(), JsValue> {
    let shell = shell.clone();
    let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
        dispatch(&shell);
    }) as Box<dyn FnMut(_)>);
    dom::window()
        .add_event_listener_with_callback("hashchange", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

/// Render the route the location currently names.
///
/// Starts a new navigation generation; in-flight loads of older navigations
/// drop their responses when they complete.
pub fn dispatch(shell: &Shell) {
    let (view, params) = current_route();
    let generation = state::next_generation();
    shell.clear_status();
    gloo_console::log!("view", view.path());

    let shell = shell.clone();
    wasm_bindgen_futures::spawn_local(async move {
        match view {
            ViewName::WebhookList => views::webhook_list::show(shell, params, generation).await,
            ViewName::NewWebhook => views::new_webhook::show(shell, params, generation).await,
            ViewName::WebhookDetail => {
                views::webhook_settings::show(shell, params, generation).await
            }
            ViewName::ConfirmRemove => {
                views::webhook_settings::show_confirm(shell, params, generation).await
            }
            ViewName::WebhookTemplate => {
                views::webhook_template::show(shell, params, generation).await
            }
            ViewName::WebhookStatistics => {
                views::statistics::show(shell, params, generation).await
            }
            ViewName::MessageQueue => views::message_queue::show(shell, params, generation).await,
            ViewName::MessageDetail => views::message_view::show(shell, params, generation).await,
        }
    });
}

// ── Menu rendering ──

/// Render the console menu. Only masters that need no route parameters are
/// linked; the rest is reached through list rows.
pub fn render_menu(shell: &Shell) {
    dom::set_inner_html(
        &shell.menu,
        &format!(
            r##"<span class="menu-title">Webhook administration</span>
            <a id="menuWebhooks" href="#{}">{}</a>"##,
            ViewName::WebhookList.path(),
            ViewName::WebhookList.title(),
        ),
    );

    if let Some(link) = dom::by_id("menuWebhooks") {
        on_click!(link, move |_: web_sys::MouseEvent| {
            navigate(ViewName::WebhookList, &Params::new());
        });
    }
}
