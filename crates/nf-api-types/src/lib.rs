//! Wire types of the webhook admin API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Smallest admissible batch size.
pub const MIN_BATCH_SIZE: u8 = 1;
/// Largest admissible batch size.
pub const MAX_BATCH_SIZE: u8 = 10;
/// Batch size applied when none is configured.
pub const DEFAULT_BATCH_SIZE: u8 = 10;

/// Content type assumed for request templates unless configured otherwise.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct HookId(pub Uuid);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct HookName(pub String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct EventId(pub Uuid);

/// Domain event topics a webhook can subscribe to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Element,
    Image,
    Metric,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Element => "element",
            Topic::Image => "image",
            Topic::Metric => "metric",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "element" => Some(Topic::Element),
            "image" => Some(Topic::Image),
            "metric" => Some(Topic::Metric),
            _ => None,
        }
    }
}

/// HTTP methods supported for webhook invocations.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Put,
    #[default]
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PUT" => Some(HttpMethod::Put),
            "POST" => Some(HttpMethod::Post),
            _ => None,
        }
    }
}

/// Delivery state of a queued message.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageState {
    Ready,
    InProgress,
    Processed,
    Failed,
}

impl MessageState {
    /// All states in queue-processing order.
    pub const ALL: [MessageState; 4] = [
        MessageState::Ready,
        MessageState::InProgress,
        MessageState::Processed,
        MessageState::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageState::Ready => "READY",
            MessageState::InProgress => "IN_PROGRESS",
            MessageState::Processed => "PROCESSED",
            MessageState::Failed => "FAILED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "READY" => Some(MessageState::Ready),
            "IN_PROGRESS" => Some(MessageState::InProgress),
            "PROCESSED" => Some(MessageState::Processed),
            "FAILED" => Some(MessageState::Failed),
            _ => None,
        }
    }
}

/// Read-only summary of a configured webhook, as returned by list views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookReference {
    pub hook_id: HookId,
    pub hook_name: HookName,
    pub topic_name: Topic,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

/// Full webhook configuration.
///
/// At most one auth-field group is persisted: `accesskey` (sent as bearer
/// token) or `user_id`/`password`/`confirm_password` (HTTP basic auth).
/// `hook_id` is absent on creation and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook_id: Option<HookId>,
    pub hook_name: HookName,
    pub topic_name: Topic,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    pub endpoint: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accesskey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_password: Option<String>,
}

impl WebhookSettings {
    /// Effective batch size, applying the default when unset.
    pub fn batch_size(&self) -> u8 {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    /// Summary projection used by list views.
    pub fn reference(&self) -> Option<WebhookReference> {
        Some(WebhookReference {
            hook_id: self.hook_id.clone()?,
            hook_name: self.hook_name.clone(),
            topic_name: self.topic_name,
            selector: self.selector.clone(),
            description: self.description.clone(),
            enabled: self.enabled,
        })
    }
}

/// Request body template of a webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookTemplate {
    #[serde(default = "content_type_default")]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl Default for WebhookTemplate {
    fn default() -> Self {
        Self {
            content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            template: None,
        }
    }
}

/// Summary of a queued message, as listed by the message queue view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageReference {
    pub event_id: EventId,
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub topic_name: Topic,
    pub state: MessageState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_time: Option<u64>,
    pub date_modified: DateTime<Utc>,
}

/// A page of a webhook's message queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookMessages {
    pub hook_id: HookId,
    pub hook_name: HookName,
    #[serde(default)]
    pub messages: Vec<MessageReference>,
}

/// A single queued message with its raw and parsed payloads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookMessage {
    pub hook_id: HookId,
    pub hook_name: HookName,
    pub event_id: EventId,
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub content_type: String,
    pub message: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub state: MessageState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_time: Option<u64>,
}

/// Execution statistics for one message state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageStateStatistics {
    pub message_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_exec_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_exec_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_exec_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stddev_exec_time: Option<f64>,
}

/// Per-state message statistics of a webhook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebhookStatistics {
    pub hook_id: HookId,
    pub hook_name: HookName,
    #[serde(default)]
    pub statistics: BTreeMap<MessageState, MessageStateStatistics>,
    pub total_message_count: u64,
}

fn enabled_default() -> bool {
    true
}

fn content_type_default() -> String {
    DEFAULT_CONTENT_TYPE.to_owned()
}
