//! Webhook list view.

use crate::api::FetchTransport;
use crate::dom::{self, Shell, on_click};
use crate::router::{self, ViewName};
use crate::state;
use nf_api_types::WebhookReference;
use nf_console_model::WebhookListModel;
use nf_resource::Params;
use nf_webhook_client::Webhooks;
use wasm_bindgen::JsCast;

pub async fn show(shell: Shell, params: Params, generation: u64) {
    let loaded = Webhooks::new(FetchTransport).load(&params).await;
    if !state::is_current(generation) {
        return;
    }
    let hooks: Vec<WebhookReference> = match loaded {
        Ok(value) => match serde_json::from_value(value) {
            Ok(hooks) => hooks,
            Err(err) => {
                shell.show_error(&format!("malformed webhook list: {err}"));
                return;
            }
        },
        Err(err) => {
            shell.show_error(&err.to_string());
            return;
        }
    };

    let model = WebhookListModel::new(hooks, params.get("filter").unwrap_or(""));
    render(&shell, &model);
    wire(&shell);
}

fn render(shell: &Shell, model: &WebhookListModel) {
    let rows: String = if model.rows.is_empty() {
        r#"<tr><td colspan="5" class="empty">No webhooks configured.</td></tr>"#.to_owned()
    } else {
        model
            .rows
            .iter()
            .map(|row| {
                let id = row.hook.hook_id.0.to_string();
                format!(
                    r#"<tr>
                      <td><a class="hook-link" data-hook="{id}">{name}</a></td>
                      <td>{topic}</td>
                      <td class="state state-{state}">{state}</td>
                      <td>{description}</td>
                      <td>
                        <button class="queue-btn" data-hook="{id}">Messages</button>
                        <button class="template-btn" data-hook="{id}">Template</button>
                        <button class="statistics-btn" data-hook="{id}">Statistics</button>
                      </td>
                    </tr>"#,
                    name = dom::escape(&row.hook.hook_name.0),
                    topic = row.hook.topic_name.as_str(),
                    state = row.state,
                    description = dom::escape(row.hook.description.as_deref().unwrap_or("")),
                )
            })
            .collect()
    };

    let html = format!(
        r#"
        <h2>Webhooks</h2>
        <div class="toolbar">
          <input id="filterInput" value="{filter}" placeholder="filter by name">
          <button id="filterBtn">Filter</button>
          <button id="newWebhookBtn" class="primary">New webhook</button>
        </div>
        <table class="list">
          <thead>
            <tr><th>Name</th><th>Topic</th><th>State</th><th>Description</th><th></th></tr>
          </thead>
          <tbody>{rows}</tbody>
        </table>
        "#,
        filter = dom::escape(&model.filter),
    );
    dom::set_inner_html(&shell.view, &html);
}

fn wire(shell: &Shell) {
    if let Some(btn) = dom::by_id("filterBtn") {
        on_click!(btn, move |_: web_sys::MouseEvent| {
            let filter = dom::input_value("filterInput");
            let mut params = Params::new();
            if !filter.is_empty() {
                params.set("filter", filter);
            }
            router::navigate(ViewName::WebhookList, &params);
        });
    }
    if let Some(btn) = dom::by_id("newWebhookBtn") {
        on_click!(btn, move |_: web_sys::MouseEvent| {
            router::navigate(ViewName::NewWebhook, &Params::new());
        });
    }

    wire_hook_links(shell, "hook-link", ViewName::WebhookDetail);
    wire_hook_links(shell, "queue-btn", ViewName::MessageQueue);
    wire_hook_links(shell, "template-btn", ViewName::WebhookTemplate);
    wire_hook_links(shell, "statistics-btn", ViewName::WebhookStatistics);
}

fn wire_hook_links(shell: &Shell, class: &str, target: ViewName) {
    for el in dom::query_all_within(&shell.view, &format!(".{class}")) {
        let hook = el.get_attribute("data-hook").unwrap_or_default();
        on_click!(el, move |_: web_sys::MouseEvent| {
            router::navigate(target, &Params::new().with("hook", hook.clone()));
        });
    }
}
