//! Client wrappers for the webhook admin API.
//!
//! One wrapper per REST entity: [`Webhooks`] (the collection), [`Webhook`]
//! (a configured hook, addressable under different scopes), and [`Message`]
//! (a single queued message). Wrappers build paths through the template
//! resolver and delegate to a pluggable [`RestTransport`], so the same code
//! drives the browser fetch transport and the native `reqwest` one.

use async_trait::async_trait;
use nf_api_types::WebhookSettings;
use nf_resource::{Params, resolve};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("resource not found")]
    NotFound,
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }
}

/// Executes one JSON request against the admin API.
///
/// Futures are not required to be `Send`: the browser implementation runs on
/// a single-threaded event loop.
#[async_trait(?Send)]
pub trait RestTransport {
    /// Issue the request and return the decoded JSON body, `Value::Null`
    /// for empty responses. A 404 maps to [`ClientError::NotFound`].
    async fn execute(
        &self,
        verb: Verb,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ClientError>;
}

/// Sub-resource of a webhook addressed by the [`Webhook`] wrapper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Settings,
    Template,
    Messages,
    Statistics,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Settings => "settings",
            Scope::Template => "template",
            Scope::Messages => "messages",
            Scope::Statistics => "statistics",
        }
    }
}

// ── Collection wrapper ──

/// The webhook collection.
pub struct Webhooks<T> {
    transport: T,
}

impl<T: RestTransport> Webhooks<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Load all configured webhooks, optionally narrowed by a `filter`
    /// parameter.
    pub async fn load(&self, params: &Params) -> Result<Value, ClientError> {
        let path = resolve("/api/v1/webhooks?filter={{filter}}", &[params]);
        self.transport.execute(Verb::Get, &path, None).await
    }

    /// Add a new webhook.
    pub async fn add_hook(&self, settings: &WebhookSettings) -> Result<(), ClientError> {
        let body = serde_json::to_value(settings)?;
        self.transport
            .execute(Verb::Post, "/api/v1/webhooks/", Some(body))
            .await?;
        Ok(())
    }
}

// ── Entity wrapper ──

/// A configured webhook.
///
/// The scope selects which sub-resource `load` and `save_settings` address;
/// lifecycle actions always target the hook itself.
pub struct Webhook<T> {
    transport: T,
    scope: Scope,
}

impl<T: RestTransport> Webhook<T> {
    pub fn new(transport: T) -> Self {
        Self::with_scope(transport, Scope::Settings)
    }

    pub fn with_scope(transport: T, scope: Scope) -> Self {
        Self { transport, scope }
    }

    fn scope_params(&self) -> Params {
        Params::new().with("scope", self.scope.as_str())
    }

    /// Read the scoped sub-resource. `params.hook` is the hook id or name.
    ///
    /// The messages scope is paginated; `offset` defaults to 0 and `limit`
    /// to 100 unless overridden by `params`.
    pub async fn load(&self, params: &Params) -> Result<Value, ClientError> {
        let path = if self.scope == Scope::Messages {
            let defaults: Params = [("offset", "0"), ("limit", "100")].into_iter().collect();
            resolve(
                "/api/v1/webhooks/{{hook}}/messages?state={{state}}&correlationId={{correlationId}}&offset={{&offset}}&limit={{limit}}",
                &[&defaults, &self.scope_params(), params],
            )
        } else {
            resolve(
                "/api/v1/webhooks/{{hook}}/{{scope}}",
                &[&self.scope_params(), params],
            )
        };
        self.transport.execute(Verb::Get, &path, None).await
    }

    /// Write the scoped sub-resource. The payload also acts as a parameter
    /// source, so a hook can be addressed by fields of the body being sent.
    pub async fn save_settings<S: Serialize>(
        &self,
        params: &Params,
        payload: &S,
    ) -> Result<(), ClientError> {
        let body = serde_json::to_value(payload)?;
        let mut payload_params = Params::new();
        payload_params.merge_json(&body);
        let path = resolve(
            "/api/v1/webhooks/{{hook}}/{{scope}}",
            &[&self.scope_params(), &payload_params, params],
        );
        self.transport.execute(Verb::Put, &path, Some(body)).await?;
        Ok(())
    }

    /// Remove the webhook. Terminal; the hook cannot be addressed afterwards.
    pub async fn remove_hook(&self, params: &Params) -> Result<(), ClientError> {
        let path = resolve("/api/v1/webhooks/{{hook}}", &[params]);
        self.transport.execute(Verb::Delete, &path, None).await?;
        Ok(())
    }

    /// Enable the webhook. A no-op on an already enabled hook.
    pub async fn enable_hook(&self, params: &Params) -> Result<(), ClientError> {
        self.lifecycle("_enable", params).await
    }

    /// Disable the webhook. A no-op on an already disabled hook.
    pub async fn disable_hook(&self, params: &Params) -> Result<(), ClientError> {
        self.lifecycle("_disable", params).await
    }

    /// Rewind the queue cursor: the event named by `params.event` and all
    /// subsequent events are processed again.
    pub async fn reset_hook(&self, params: &Params) -> Result<(), ClientError> {
        let path = resolve(
            "/api/v1/webhooks/{{hook}}/_reset?event_id={{event}}",
            &[params],
        );
        self.transport.execute(Verb::Post, &path, None).await?;
        Ok(())
    }

    /// Re-queue all failed messages of the webhook.
    pub async fn retry_failed(&self, params: &Params) -> Result<(), ClientError> {
        self.lifecycle("_retry", params).await
    }

    async fn lifecycle(&self, action: &str, params: &Params) -> Result<(), ClientError> {
        let template = format!("/api/v1/webhooks/{{{{hook}}}}/{action}");
        let path = resolve(&template, &[params]);
        self.transport.execute(Verb::Post, &path, None).await?;
        Ok(())
    }
}

// ── Message wrapper ──

/// A single queued message of a webhook.
pub struct Message<T> {
    transport: T,
}

impl<T: RestTransport> Message<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Read one message. `params.hook` and `params.event` address it.
    pub async fn load(&self, params: &Params) -> Result<Value, ClientError> {
        let path = resolve("/api/v1/webhooks/{{hook}}/messages/{{event}}", &[params]);
        self.transport.execute(Verb::Get, &path, None).await
    }

    /// Re-queue this message for delivery.
    pub async fn retry_failed(&self, params: &Params) -> Result<(), ClientError> {
        let path = resolve(
            "/api/v1/webhooks/{{hook}}/messages/{{event}}/_retry",
            &[params],
        );
        self.transport.execute(Verb::Post, &path, None).await?;
        Ok(())
    }
}

// ── Native transport ──

/// `reqwest`-backed transport for tools and tests running outside the
/// browser.
#[cfg(feature = "native")]
#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

#[cfg(feature = "native")]
impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(feature = "native")]
#[async_trait(?Send)]
impl RestTransport for HttpTransport {
    async fn execute(
        &self,
        verb: Verb,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = match verb {
            Verb::Get => self.client.get(&url),
            Verb::Post => self.client.post(&url),
            Verb::Put => self.client.put(&url),
            Verb::Delete => self.client.delete(&url),
        };
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ClientError::Transport(err.to_string()))?;

        if status.as_u16() == 404 {
            return Err(ClientError::NotFound);
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nf_api_types::{HookName, HttpMethod, Topic};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingTransport {
        calls: RefCell<Vec<(Verb, String, Option<Value>)>>,
        response: Value,
    }

    impl RecordingTransport {
        fn returning(response: Value) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                response,
            }
        }

        fn calls(&self) -> Vec<(Verb, String, Option<Value>)> {
            self.calls.borrow().clone()
        }
    }

    #[async_trait(?Send)]
    impl RestTransport for &RecordingTransport {
        async fn execute(
            &self,
            verb: Verb,
            path: &str,
            body: Option<Value>,
        ) -> Result<Value, ClientError> {
            self.calls.borrow_mut().push((verb, path.to_owned(), body));
            Ok(self.response.clone())
        }
    }

    fn settings(name: &str) -> WebhookSettings {
        WebhookSettings {
            hook_id: None,
            hook_name: HookName(name.into()),
            topic_name: Topic::Element,
            selector: None,
            description: None,
            enabled: true,
            endpoint: "http://callback.example/hook".into(),
            method: HttpMethod::Post,
            batch_size: None,
            accesskey: None,
            user_id: None,
            password: None,
            confirm_password: None,
        }
    }

    #[tokio::test]
    async fn list_collapses_missing_filter() {
        let transport = RecordingTransport::returning(Value::Array(Vec::new()));
        Webhooks::new(&transport).load(&Params::new()).await.unwrap();
        let calls = transport.calls();
        assert_eq!(calls[0].0, Verb::Get);
        assert_eq!(calls[0].1, "/api/v1/webhooks?filter=");
    }

    #[tokio::test]
    async fn list_percent_encodes_the_filter() {
        let transport = RecordingTransport::returning(Value::Array(Vec::new()));
        let params = Params::new().with("filter", "order hooks");
        Webhooks::new(&transport).load(&params).await.unwrap();
        assert_eq!(transport.calls()[0].1, "/api/v1/webhooks?filter=order%20hooks");
    }

    #[tokio::test]
    async fn add_hook_posts_to_the_collection() {
        let transport = RecordingTransport::default();
        Webhooks::new(&transport)
            .add_hook(&settings("inventory"))
            .await
            .unwrap();
        let calls = transport.calls();
        assert_eq!(calls[0].0, Verb::Post);
        assert_eq!(calls[0].1, "/api/v1/webhooks/");
        assert_eq!(calls[0].2.as_ref().unwrap()["hook_name"], "inventory");
    }

    #[tokio::test]
    async fn load_defaults_to_the_settings_scope() {
        let transport = RecordingTransport::default();
        let params = Params::new().with("hook", "inventory");
        Webhook::new(&transport).load(&params).await.unwrap();
        assert_eq!(transport.calls()[0].1, "/api/v1/webhooks/inventory/settings");
    }

    #[tokio::test]
    async fn messages_scope_applies_pagination_defaults() {
        let transport = RecordingTransport::default();
        let params = Params::new().with("hook", "inventory");
        Webhook::with_scope(&transport, Scope::Messages)
            .load(&params)
            .await
            .unwrap();
        assert_eq!(
            transport.calls()[0].1,
            "/api/v1/webhooks/inventory/messages?state=&correlationId=&offset=0&limit=100"
        );
    }

    #[tokio::test]
    async fn route_params_override_pagination_defaults() {
        let transport = RecordingTransport::default();
        let params = Params::new()
            .with("hook", "inventory")
            .with("offset", "200")
            .with("state", "FAILED");
        Webhook::with_scope(&transport, Scope::Messages)
            .load(&params)
            .await
            .unwrap();
        assert_eq!(
            transport.calls()[0].1,
            "/api/v1/webhooks/inventory/messages?state=FAILED&correlationId=&offset=200&limit=100"
        );
    }

    #[tokio::test]
    async fn save_settings_addresses_the_hook_from_the_payload() {
        let transport = RecordingTransport::default();
        Webhook::new(&transport)
            .save_settings(&Params::new(), &settings("inventory"))
            .await
            .unwrap();
        let calls = transport.calls();
        assert_eq!(calls[0].0, Verb::Put);
        assert_eq!(calls[0].1, "/api/v1/webhooks/inventory/settings");
    }

    #[tokio::test]
    async fn route_params_override_the_payload_source() {
        let transport = RecordingTransport::default();
        let params = Params::new().with("hook", "4f6e");
        Webhook::new(&transport)
            .save_settings(&params, &settings("inventory"))
            .await
            .unwrap();
        assert_eq!(transport.calls()[0].1, "/api/v1/webhooks/4f6e/settings");
    }

    #[tokio::test]
    async fn lifecycle_actions_post_to_their_sub_resources() {
        let transport = RecordingTransport::default();
        let hook = Webhook::new(&transport);
        let params = Params::new().with("hook", "inventory");
        hook.enable_hook(&params).await.unwrap();
        hook.disable_hook(&params).await.unwrap();
        hook.retry_failed(&params).await.unwrap();
        hook.remove_hook(&params).await.unwrap();

        let paths: Vec<_> = transport.calls().into_iter().map(|c| (c.0, c.1)).collect();
        assert_eq!(
            paths,
            vec![
                (Verb::Post, "/api/v1/webhooks/inventory/_enable".to_owned()),
                (Verb::Post, "/api/v1/webhooks/inventory/_disable".to_owned()),
                (Verb::Post, "/api/v1/webhooks/inventory/_retry".to_owned()),
                (Verb::Delete, "/api/v1/webhooks/inventory".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn reset_carries_the_event_cursor() {
        let transport = RecordingTransport::default();
        let params = Params::new()
            .with("hook", "inventory")
            .with("event", "11111111-2222-3333-4444-555555555555");
        Webhook::new(&transport).reset_hook(&params).await.unwrap();
        assert_eq!(
            transport.calls()[0].1,
            "/api/v1/webhooks/inventory/_reset?event_id=11111111-2222-3333-4444-555555555555"
        );
    }

    #[tokio::test]
    async fn message_wrapper_addresses_a_single_event() {
        let transport = RecordingTransport::default();
        let params = Params::new().with("hook", "inventory").with("event", "e1");
        let message = Message::new(&transport);
        message.load(&params).await.unwrap();
        message.retry_failed(&params).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].1, "/api/v1/webhooks/inventory/messages/e1");
        assert_eq!(calls[1].0, Verb::Post);
        assert_eq!(calls[1].1, "/api/v1/webhooks/inventory/messages/e1/_retry");
    }
}
