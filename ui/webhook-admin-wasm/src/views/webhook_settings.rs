//! Webhook detail view and its remove confirmation.

use crate::api::FetchTransport;
use crate::dom::{self, Shell, on_click};
use crate::router::{self, ViewName};
use crate::state;
use crate::views::settings_form;
use nf_api_types::WebhookSettings;
use nf_console_model::SettingsModel;
use nf_resource::Params;
use nf_webhook_client::Webhook;
use wasm_bindgen::JsCast;

async fn load_settings(shell: &Shell, params: &Params) -> Option<WebhookSettings> {
    match Webhook::new(FetchTransport).load(params).await {
        Ok(value) => match serde_json::from_value(value) {
            Ok(settings) => Some(settings),
            Err(err) => {
                shell.show_error(&format!("malformed webhook settings: {err}"));
                None
            }
        },
        Err(err) => {
            shell.show_error(&err.to_string());
            None
        }
    }
}

// ── Detail ──

pub async fn show(shell: Shell, params: Params, generation: u64) {
    let Some(settings) = load_settings(&shell, &params).await else {
        return;
    };
    if !state::is_current(generation) {
        return;
    }
    let model = SettingsModel::new(settings);
    render(&shell, &model);
    settings_form::sync_auth_visibility();
    settings_form::wire_auth_toggle();
    wire(&shell, &params, model);
}

fn render(shell: &Shell, model: &SettingsModel) {
    let lifecycle_btn = if model.enabled() {
        r#"<button id="disableBtn">Disable</button>"#
    } else {
        r#"<button id="enableBtn">Enable</button>"#
    };
    let html = format!(
        r#"
        <h2>Webhook {name} <span class="state state-{state}">{state}</span></h2>
        {form}
        <div class="toolbar">
          <button id="saveSettingsBtn" class="primary">Save settings</button>
          {lifecycle_btn}
          <button id="confirmRemoveBtn" class="danger">Remove...</button>
        </div>
        "#,
        name = dom::escape(&model.hook.hook_name.0),
        state = if model.enabled() { "UP" } else { "DOWN" },
        form = settings_form::render(model),
    );
    dom::set_inner_html(&shell.view, &html);
}

fn wire(shell: &Shell, params: &Params, model: SettingsModel) {
    if let Some(btn) = dom::by_id("saveSettingsBtn") {
        let shell = shell.clone();
        let params = params.clone();
        let base = model.hook.clone();
        on_click!(btn, move |_: web_sys::MouseEvent| {
            let shell = shell.clone();
            let params = params.clone();
            let base = base.clone();
            wasm_bindgen_futures::spawn_local(async move {
                save(&shell, &params, &base).await;
            });
        });
    }

    for (id, enable) in [("enableBtn", true), ("disableBtn", false)] {
        if let Some(btn) = dom::by_id(id) {
            let shell = shell.clone();
            let params = params.clone();
            on_click!(btn, move |_: web_sys::MouseEvent| {
                let shell = shell.clone();
                let params = params.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let hook = Webhook::new(FetchTransport);
                    let result = if enable {
                        hook.enable_hook(&params).await
                    } else {
                        hook.disable_hook(&params).await
                    };
                    match result {
                        Ok(()) => router::navigate(ViewName::WebhookList, &Params::new()),
                        Err(err) => shell.show_error(&err.to_string()),
                    }
                });
            });
        }
    }

    if let Some(btn) = dom::by_id("confirmRemoveBtn") {
        let params = params.clone();
        on_click!(btn, move |_: web_sys::MouseEvent| {
            router::navigate(ViewName::ConfirmRemove, &params);
        });
    }
}

async fn save(shell: &Shell, params: &Params, base: &WebhookSettings) {
    let model = match settings_form::read(base) {
        Ok(model) => model,
        Err(message) => {
            shell.show_error(&message);
            return;
        }
    };
    match Webhook::new(FetchTransport)
        .save_settings(params, &model.submission())
        .await
    {
        Ok(()) => router::navigate(ViewName::WebhookList, &Params::new()),
        Err(err) => shell.show_error(&err.to_string()),
    }
}

// ── Remove confirmation ──

pub async fn show_confirm(shell: Shell, params: Params, generation: u64) {
    let Some(settings) = load_settings(&shell, &params).await else {
        return;
    };
    if !state::is_current(generation) {
        return;
    }

    let html = format!(
        r#"
        <h2>Remove webhook</h2>
        <p>Remove the webhook <strong>{name}</strong>? Its queued messages are
        discarded. This cannot be undone.</p>
        <div class="toolbar">
          <button id="removeBtn" class="danger">Remove webhook</button>
          <button id="cancelBtn">Cancel</button>
        </div>
        "#,
        name = dom::escape(&settings.hook_name.0),
    );
    dom::set_inner_html(&shell.view, &html);

    if let Some(btn) = dom::by_id("removeBtn") {
        let shell = shell.clone();
        let params = params.clone();
        on_click!(btn, move |_: web_sys::MouseEvent| {
            let shell = shell.clone();
            let params = params.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match Webhook::new(FetchTransport).remove_hook(&params).await {
                    Ok(()) => router::navigate(ViewName::WebhookList, &Params::new()),
                    Err(err) => shell.show_error(&err.to_string()),
                }
            });
        });
    }
    if let Some(btn) = dom::by_id("cancelBtn") {
        let params = params.clone();
        on_click!(btn, move |_: web_sys::MouseEvent| {
            router::navigate(ViewName::WebhookDetail, &params);
        });
    }
}
