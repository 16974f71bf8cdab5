//! Message detail view.
//!
//! A message that is no longer queued renders as an empty state instead of
//! an error; everything else on this view assumes a loaded message.

use crate::api::FetchTransport;
use crate::dom::{self, Shell, on_click};
use crate::router::{self, ViewName};
use crate::state;
use nf_api_types::WebhookMessage;
use nf_console_model::MessageModel;
use nf_resource::Params;
use nf_webhook_client::{ClientError, Message, Webhook};
use wasm_bindgen::JsCast;

pub async fn show(shell: Shell, params: Params, generation: u64) {
    let loaded = Message::new(FetchTransport).load(&params).await;
    if !state::is_current(generation) {
        return;
    }

    let message: WebhookMessage = match loaded {
        Ok(value) => match serde_json::from_value(value) {
            Ok(message) => message,
            Err(err) => {
                shell.show_error(&format!("malformed message: {err}"));
                return;
            }
        },
        Err(ClientError::NotFound) => {
            render_empty(&shell, &params);
            return;
        }
        Err(err) => {
            shell.show_error(&err.to_string());
            return;
        }
    };

    let model = MessageModel::new(message);
    render(&shell, &model);
    wire(&shell, &params, &model);
}

fn render(shell: &Shell, model: &MessageModel) {
    let message = &model.message;
    let html = format!(
        r#"
        <h2>Message {event}</h2>
        <table class="properties">
          <tr><th>Webhook</th><td>{hook}</td></tr>
          <tr><th>Event</th><td>{name}</td></tr>
          <tr><th>Correlation</th><td>{correlation}</td></tr>
          <tr><th>State</th><td class="state state-{state}">{state}</td></tr>
          <tr><th>HTTP status</th><td>{status}</td></tr>
          <tr><th>Execution time</th><td>{exec_time}</td></tr>
          <tr><th>Content type</th><td>{content_type}</td></tr>
        </table>
        <h3>Sent message</h3>
        <pre id="messageBody">{body}</pre>
        <h3>Event payload</h3>
        <pre id="eventPayload">{payload}</pre>
        <div class="toolbar">
          <button id="retryBtn" class="primary">Retry</button>
          <button id="resetBtn">Reset queue to this event</button>
          <button id="backBtn">Back to queue</button>
        </div>
        "#,
        event = message.event_id.0,
        hook = dom::escape(&message.hook_name.0),
        name = dom::escape(&message.event_name),
        correlation = dom::escape(message.correlation_id.as_deref().unwrap_or("")),
        state = message.state.as_str(),
        status = message
            .http_status
            .map(|status| status.to_string())
            .unwrap_or_default(),
        exec_time = message
            .exec_time
            .map(|time| format!("{time} ms"))
            .unwrap_or_default(),
        content_type = dom::escape(&message.content_type),
        body = dom::escape(&model.rewritten_message()),
        payload = dom::escape(&model.json_payload()),
    );
    dom::set_inner_html(&shell.view, &html);
}

fn render_empty(shell: &Shell, params: &Params) {
    dom::set_inner_html(
        &shell.view,
        r#"
        <h2>Message</h2>
        <p class="empty">This message is no longer queued.</p>
        <div class="toolbar"><button id="backBtn">Back to queue</button></div>
        "#,
    );
    wire_back(shell, params);
}

fn wire(shell: &Shell, params: &Params, model: &MessageModel) {
    let hook = params.get("hook").unwrap_or("").to_owned();
    let event = model.message.event_id.0.to_string();

    // Retry and reset both rewind the queue cursor to this event.
    for id in ["retryBtn", "resetBtn"] {
        if let Some(btn) = dom::by_id(id) {
            let shell = shell.clone();
            let hook = hook.clone();
            let event = event.clone();
            on_click!(btn, move |_: web_sys::MouseEvent| {
                let shell = shell.clone();
                let hook = hook.clone();
                let event = event.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let params = Params::new()
                        .with("hook", hook.clone())
                        .with("event", event);
                    match Webhook::new(FetchTransport).reset_hook(&params).await {
                        Ok(()) => router::navigate(
                            ViewName::MessageQueue,
                            &Params::new().with("hook", hook),
                        ),
                        Err(err) => shell.show_error(&err.to_string()),
                    }
                });
            });
        }
    }

    wire_back(shell, params);
}

fn wire_back(_shell: &Shell, params: &Params) {
    if let Some(btn) = dom::by_id("backBtn") {
        let hook = params.get("hook").unwrap_or("").to_owned();
        on_click!(btn, move |_: web_sys::MouseEvent| {
            router::navigate(
                ViewName::MessageQueue,
                &Params::new().with("hook", hook.clone()),
            );
        });
    }
}
