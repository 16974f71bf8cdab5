//! Browser transport.
//!
//! Implements the client's `RestTransport` over `fetch`, so the resource
//! wrappers drive the admin API directly from the console.

use crate::dom;
use crate::state;
use async_trait::async_trait;
use nf_webhook_client::{ClientError, RestTransport, Verb};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

/// Determine the API base URL.
///
/// A `nf_base_url` localStorage entry overrides; the default is the serving
/// host on port 8080, where the stub listens.
pub fn base_url() -> String {
    if let Some(saved) = state::local_get("nf_base_url") {
        let saved = saved.trim().trim_end_matches('/').to_string();
        if !saved.is_empty() {
            return saved;
        }
    }

    let location = dom::window().location();
    let host = location.hostname().unwrap_or_default();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".into());
    format!("{}//{}:8080", protocol, host)
}

/// `fetch`-backed transport.
#[derive(Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl RestTransport for FetchTransport {
    async fn execute(
        &self,
        verb: Verb,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}{}", base_url(), path);

        let opts = RequestInit::new();
        opts.set_method(verb.as_str());
        opts.set_mode(RequestMode::Cors);

        let headers = Headers::new().map_err(js_error)?;
        if let Some(ref body) = body {
            headers
                .set("Content-Type", "application/json")
                .map_err(js_error)?;
            opts.set_body(&JsValue::from_str(&body.to_string()));
        }
        opts.set_headers(&headers);

        let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
        let response = JsFuture::from(dom::window().fetch_with_request(&request))
            .await
            .map_err(js_error)?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| ClientError::Transport("response is not a Response".into()))?;

        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        let text = text.as_string().unwrap_or_default();

        if response.status() == 404 {
            return Err(ClientError::NotFound);
        }
        if !response.ok() {
            return Err(ClientError::Status {
                status: response.status(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn js_error(err: JsValue) -> ClientError {
    ClientError::Transport(format!("{:?}", err))
}
