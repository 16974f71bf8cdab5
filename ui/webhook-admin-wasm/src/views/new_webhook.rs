//! Webhook creation view.

use crate::api::FetchTransport;
use crate::dom::{self, Shell, on_click};
use crate::router::{self, ViewName};
use crate::views::settings_form;
use nf_api_types::{HookName, Topic, WebhookSettings};
use nf_console_model::SettingsModel;
use nf_resource::Params;
use nf_webhook_client::Webhooks;
use wasm_bindgen::JsCast;

fn blank_settings() -> WebhookSettings {
    WebhookSettings {
        hook_id: None,
        hook_name: HookName(String::new()),
        topic_name: Topic::Element,
        selector: None,
        description: None,
        enabled: true,
        endpoint: String::new(),
        method: Default::default(),
        batch_size: None,
        accesskey: None,
        user_id: None,
        password: None,
        confirm_password: None,
    }
}

pub async fn show(shell: Shell, _params: Params, _generation: u64) {
    let model = SettingsModel::new(blank_settings());
    let html = format!(
        r#"
        <h2>New webhook</h2>
        {form}
        <div class="toolbar">
          <button id="saveSettingsBtn" class="primary">Save webhook</button>
          <button id="cancelBtn">Cancel</button>
        </div>
        "#,
        form = settings_form::render(&model),
    );
    dom::set_inner_html(&shell.view, &html);

    // The blank form shows a topic; clear the select back to the empty
    // choice so the user has to pick one.
    if let Some(select) = dom::by_id_typed::<web_sys::HtmlSelectElement>("topicSelect") {
        select.set_value("");
    }
    settings_form::sync_auth_visibility();
    settings_form::wire_auth_toggle();
    wire(&shell);
}

fn wire(shell: &Shell) {
    if let Some(btn) = dom::by_id("saveSettingsBtn") {
        let shell = shell.clone();
        on_click!(btn, move |_: web_sys::MouseEvent| {
            let shell = shell.clone();
            wasm_bindgen_futures::spawn_local(async move {
                save(&shell).await;
            });
        });
    }
    if let Some(btn) = dom::by_id("cancelBtn") {
        on_click!(btn, move |_: web_sys::MouseEvent| {
            router::navigate(ViewName::WebhookList, &Params::new());
        });
    }
}

async fn save(shell: &Shell) {
    let model = match settings_form::read(&blank_settings()) {
        Ok(model) => model,
        Err(message) => {
            shell.show_error(&message);
            return;
        }
    };
    match Webhooks::new(FetchTransport)
        .add_hook(&model.submission())
        .await
    {
        Ok(()) => router::navigate(ViewName::WebhookList, &Params::new()),
        Err(err) => shell.show_error(&err.to_string()),
    }
}
