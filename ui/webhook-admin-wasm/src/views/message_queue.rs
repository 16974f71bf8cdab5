//! Message queue view.

use crate::api::FetchTransport;
use crate::dom::{self, Shell, on_click};
use crate::router::{self, ViewName};
use crate::state;
use nf_api_types::WebhookMessages;
use nf_console_model::{MESSAGE_STATES, MessageQueueModel};
use nf_resource::Params;
use nf_webhook_client::{Scope, Webhook};
use wasm_bindgen::JsCast;

pub async fn show(shell: Shell, params: Params, generation: u64) {
    let loaded = Webhook::with_scope(FetchTransport, Scope::Messages)
        .load(&params)
        .await;
    if !state::is_current(generation) {
        return;
    }
    let queue: WebhookMessages = match loaded {
        Ok(value) => match serde_json::from_value(value) {
            Ok(queue) => queue,
            Err(err) => {
                shell.show_error(&format!("malformed message queue: {err}"));
                return;
            }
        },
        Err(err) => {
            shell.show_error(&err.to_string());
            return;
        }
    };

    let model = MessageQueueModel::new(
        queue,
        params.get("state").unwrap_or(""),
        params.get("correlationId").unwrap_or(""),
    );
    render(&shell, &model);
    wire(&shell, &params);
}

fn render(shell: &Shell, model: &MessageQueueModel) {
    let state_options: String = MESSAGE_STATES
        .iter()
        .map(|option| {
            let chosen = if option.value == model.state_filter {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                option.value, chosen, option.label
            )
        })
        .collect();

    let rows: String = if model.queue.messages.is_empty() {
        r#"<tr><td colspan="6" class="empty">No messages queued.</td></tr>"#.to_owned()
    } else {
        model
            .queue
            .messages
            .iter()
            .map(|message| {
                format!(
                    r#"<tr>
                      <td><a class="message-link" data-event="{event}">{event}</a></td>
                      <td>{name}</td>
                      <td>{correlation}</td>
                      <td class="state state-{state}">{state}</td>
                      <td>{status}</td>
                      <td>{exec_time}</td>
                    </tr>"#,
                    event = message.event_id.0,
                    name = dom::escape(&message.event_name),
                    correlation =
                        dom::escape(message.correlation_id.as_deref().unwrap_or("")),
                    state = message.state.as_str(),
                    status = message
                        .http_status
                        .map(|status| status.to_string())
                        .unwrap_or_default(),
                    exec_time = message
                        .exec_time
                        .map(|time| format!("{time} ms"))
                        .unwrap_or_default(),
                )
            })
            .collect()
    };

    let html = format!(
        r#"
        <h2>Message queue {name}</h2>
        <div class="toolbar">
          <select id="stateSelect">{state_options}</select>
          <input id="correlationInput" value="{correlation}" placeholder="correlation ID">
          <button id="filterBtn">Filter</button>
        </div>
        <table class="list">
          <thead>
            <tr><th>Event</th><th>Name</th><th>Correlation</th><th>State</th><th>HTTP</th><th>Time</th></tr>
          </thead>
          <tbody>{rows}</tbody>
        </table>
        "#,
        name = dom::escape(&model.queue.hook_name.0),
        correlation = dom::escape(&model.correlation_id),
    );
    dom::set_inner_html(&shell.view, &html);
}

fn wire(shell: &Shell, params: &Params) {
    if let Some(btn) = dom::by_id("filterBtn") {
        let params = params.clone();
        on_click!(btn, move |_: web_sys::MouseEvent| {
            let mut next = params.clone();
            let state = dom::select_value("stateSelect");
            if state.is_empty() {
                next.remove("state");
            } else {
                next.set("state", state);
            }
            let correlation = dom::input_value("correlationInput");
            if correlation.is_empty() {
                next.remove("correlationId");
            } else {
                next.set("correlationId", correlation);
            }
            router::navigate(ViewName::MessageQueue, &next);
        });
    }

    let hook = params.get("hook").unwrap_or("").to_owned();
    for link in dom::query_all_within(&shell.view, ".message-link") {
        let event = link.get_attribute("data-event").unwrap_or_default();
        let hook = hook.clone();
        on_click!(link, move |_: web_sys::MouseEvent| {
            let params = Params::new()
                .with("hook", hook.clone())
                .with("event", event.clone());
            router::navigate(ViewName::MessageDetail, &params);
        });
    }
}
