//! Webhook template view.

use crate::api::FetchTransport;
use crate::dom::{self, Shell, on_click};
use crate::router::{self, ViewName};
use crate::state;
use nf_api_types::WebhookTemplate;
use nf_resource::Params;
use nf_webhook_client::{Scope, Webhook};
use wasm_bindgen::JsCast;

pub async fn show(shell: Shell, params: Params, generation: u64) {
    let loaded = Webhook::with_scope(FetchTransport, Scope::Template)
        .load(&params)
        .await;
    if !state::is_current(generation) {
        return;
    }
    let template: WebhookTemplate = match loaded {
        Ok(value) => serde_json::from_value(value).unwrap_or_default(),
        Err(err) => {
            shell.show_error(&err.to_string());
            return;
        }
    };

    let html = format!(
        r#"
        <h2>Request template</h2>
        <p>The template rewrites the event payload before the webhook is
        invoked. An empty template sends the event as-is.</p>
        <div class="form-row">
          <label for="contentTypeInput">Content type</label>
          <input id="contentTypeInput" value="{content_type}">
        </div>
        <div class="form-row">
          <label for="templateInput">Template</label>
          <textarea id="templateInput" rows="12">{template}</textarea>
        </div>
        <div class="toolbar">
          <button id="saveTemplateBtn" class="primary">Save template</button>
          <button id="removeTemplateBtn" class="danger">Remove template</button>
        </div>
        "#,
        content_type = dom::escape(&template.content_type),
        template = dom::escape(template.template.as_deref().unwrap_or("")),
    );
    dom::set_inner_html(&shell.view, &html);
    wire(&shell, &params);
}

fn wire(shell: &Shell, params: &Params) {
    if let Some(btn) = dom::by_id("saveTemplateBtn") {
        let shell = shell.clone();
        let params = params.clone();
        on_click!(btn, move |_: web_sys::MouseEvent| {
            let template = dom::textarea_value("templateInput");
            let payload = WebhookTemplate {
                content_type: dom::input_value("contentTypeInput"),
                template: if template.trim().is_empty() {
                    None
                } else {
                    Some(template)
                },
            };
            save(shell.clone(), params.clone(), payload);
        });
    }
    if let Some(btn) = dom::by_id("removeTemplateBtn") {
        let shell = shell.clone();
        let params = params.clone();
        on_click!(btn, move |_: web_sys::MouseEvent| {
            dom::set_input_value("contentTypeInput", nf_api_types::DEFAULT_CONTENT_TYPE);
            if let Some(el) = dom::by_id_typed::<web_sys::HtmlTextAreaElement>("templateInput") {
                el.set_value("");
            }
            save(shell.clone(), params.clone(), WebhookTemplate::default());
        });
    }
}

fn save(shell: Shell, params: Params, payload: WebhookTemplate) {
    wasm_bindgen_futures::spawn_local(async move {
        match Webhook::with_scope(FetchTransport, Scope::Template)
            .save_settings(&params, &payload)
            .await
        {
            Ok(()) => router::navigate(ViewName::WebhookList, &Params::new()),
            Err(err) => shell.show_error(&err.to_string()),
        }
    });
}
