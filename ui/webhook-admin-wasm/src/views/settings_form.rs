//! The settings form shared by the create and detail views.

use crate::dom;
use nf_api_types::{HookName, HttpMethod, Topic, WebhookSettings};
use nf_console_model::{
    AuthMode, HTTP_METHODS, SelectOption, SettingsModel, TOPICS, batch_sizes,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

fn options_html(options: &[SelectOption], selected: &str) -> String {
    options
        .iter()
        .map(|option| {
            let chosen = if option.value == selected
                || (selected.is_empty() && option.default)
            {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                option.value, chosen, option.label
            )
        })
        .collect()
}

fn batch_options_html(selected: u8) -> String {
    batch_sizes()
        .iter()
        .map(|option| {
            let chosen = if option.value == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                option.value, chosen, option.label
            )
        })
        .collect()
}

/// Render the form prefilled from the model.
pub fn render(model: &SettingsModel) -> String {
    let hook = &model.hook;
    let topic = hook.topic_name.as_str();
    let auth_mode = model.auth_mode.as_str();
    let basic_hidden = if model.basic_auth() { "" } else { " hidden" };
    let bearer_hidden = if model.bearer_auth() { "" } else { " hidden" };

    format!(
        r#"
        <div class="form-row">
          <label for="hookNameInput">Name</label>
          <input id="hookNameInput" value="{name}">
        </div>
        <div class="form-row">
          <label for="topicSelect">Topic</label>
          <select id="topicSelect">{topics}</select>
        </div>
        <div class="form-row">
          <label for="selectorInput">Selector</label>
          <input id="selectorInput" value="{selector}" placeholder="regular expression">
        </div>
        <div class="form-row">
          <label for="descriptionInput">Description</label>
          <input id="descriptionInput" value="{description}">
        </div>
        <div class="form-row">
          <label for="endpointInput">Endpoint</label>
          <input id="endpointInput" value="{endpoint}" placeholder="http://...">
        </div>
        <div class="form-row">
          <label for="methodSelect">Method</label>
          <select id="methodSelect">{methods}</select>
        </div>
        <div class="form-row">
          <label for="batchSizeSelect">Batch size</label>
          <select id="batchSizeSelect">{batch_sizes}</select>
        </div>
        <div class="form-row">
          <label for="authModeSelect">Authentication</label>
          <select id="authModeSelect">
            <option value=""{none_sel}>None</option>
            <option value="basic"{basic_sel}>HTTP basic</option>
            <option value="bearer"{bearer_sel}>Bearer token</option>
          </select>
        </div>
        <div id="bearerAuthGroup"{bearer_hidden}>
          <div class="form-row">
            <label for="accesskeyInput">Access key</label>
            <input id="accesskeyInput" value="{accesskey}">
          </div>
        </div>
        <div id="basicAuthGroup"{basic_hidden}>
          <div class="form-row">
            <label for="userIdInput">User</label>
            <input id="userIdInput" value="{user_id}">
          </div>
          <div class="form-row">
            <label for="passwordInput">Password</label>
            <input id="passwordInput" type="password" value="{password}">
          </div>
          <div class="form-row">
            <label for="confirmPasswordInput">Confirm password</label>
            <input id="confirmPasswordInput" type="password" value="{confirm_password}">
          </div>
        </div>
        "#,
        name = dom::escape(&hook.hook_name.0),
        topics = options_html(TOPICS, topic),
        selector = dom::escape(hook.selector.as_deref().unwrap_or("")),
        description = dom::escape(hook.description.as_deref().unwrap_or("")),
        endpoint = dom::escape(&hook.endpoint),
        methods = options_html(HTTP_METHODS, hook.method.as_str()),
        batch_sizes = batch_options_html(hook.batch_size()),
        none_sel = selected_attr(auth_mode, ""),
        basic_sel = selected_attr(auth_mode, "basic"),
        bearer_sel = selected_attr(auth_mode, "bearer"),
        accesskey = dom::escape(hook.accesskey.as_deref().unwrap_or("")),
        user_id = dom::escape(hook.user_id.as_deref().unwrap_or("")),
        password = dom::escape(hook.password.as_deref().unwrap_or("")),
        confirm_password = dom::escape(hook.confirm_password.as_deref().unwrap_or("")),
    )
}

fn selected_attr(current: &str, value: &str) -> &'static str {
    if current == value { " selected" } else { "" }
}

/// Show the auth-field group matching the selected mode.
pub fn sync_auth_visibility() {
    let mode = AuthMode::parse(&dom::select_value("authModeSelect"));
    toggle_group("basicAuthGroup", mode == AuthMode::Basic);
    toggle_group("bearerAuthGroup", mode == AuthMode::Bearer);
}

fn toggle_group(id: &str, visible: bool) {
    if let Some(group) = dom::by_id(id) {
        if visible {
            let _ = group.remove_attribute("hidden");
        } else {
            let _ = group.set_attribute("hidden", "hidden");
        }
    }
}

/// Re-sync group visibility whenever the auth mode changes.
pub fn wire_auth_toggle() {
    if let Some(select) = dom::by_id("authModeSelect") {
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            sync_auth_visibility();
        }) as Box<dyn FnMut(_)>);
        select
            .add_event_listener_with_callback("change", cb.as_ref().unchecked_ref())
            .unwrap();
        cb.forget();
    }
}

/// Read the edited form back into a model.
///
/// `base` supplies the fields the form does not edit: the immutable hook id
/// and the lifecycle state.
pub fn read(base: &WebhookSettings) -> Result<SettingsModel, String> {
    let hook_name = dom::input_value("hookNameInput");
    if hook_name.is_empty() {
        return Err("a webhook name is required".to_owned());
    }
    let topic_name = Topic::parse(&dom::select_value("topicSelect"))
        .ok_or_else(|| "a topic is required".to_owned())?;
    let endpoint = dom::input_value("endpointInput");
    if endpoint.is_empty() {
        return Err("an endpoint is required".to_owned());
    }
    let method = HttpMethod::parse(&dom::select_value("methodSelect")).unwrap_or_default();
    let batch_size = dom::select_value("batchSizeSelect")
        .parse()
        .map_err(|_| "invalid batch size".to_owned())?;

    let hook = WebhookSettings {
        hook_id: base.hook_id.clone(),
        hook_name: HookName(hook_name),
        topic_name,
        selector: non_empty(dom::input_value("selectorInput")),
        description: non_empty(dom::input_value("descriptionInput")),
        enabled: base.enabled,
        endpoint,
        method,
        batch_size: Some(batch_size),
        accesskey: non_empty(dom::input_value("accesskeyInput")),
        user_id: non_empty(dom::input_value("userIdInput")),
        password: non_empty(dom::input_value("passwordInput")),
        confirm_password: non_empty(dom::input_value("confirmPasswordInput")),
    };
    let auth_mode = AuthMode::parse(&dom::select_value("authModeSelect"));

    if auth_mode == AuthMode::Basic && hook.password != hook.confirm_password {
        return Err("passwords do not match".to_owned());
    }

    Ok(SettingsModel { hook, auth_mode })
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
