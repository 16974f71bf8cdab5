//! Display models of the webhook console.
//!
//! Each view works on a typed model computed from the loaded resource at
//! construction time: derived state labels, detected auth mode, formatted
//! payloads. Nothing here is persisted; submission shapes are derived from
//! the models when an action fires.

use nf_api_types::{
    DEFAULT_BATCH_SIZE, DEFAULT_CONTENT_TYPE, MAX_BATCH_SIZE, MIN_BATCH_SIZE, MessageState,
    MessageStateStatistics, WebhookMessage, WebhookMessages, WebhookReference, WebhookSettings,
    WebhookStatistics,
};

// ── Select option tables ──

/// One entry of a form `<select>`.
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
    pub default: bool,
}

/// Subscribable topics, led by the empty choice.
pub const TOPICS: &[SelectOption] = &[
    SelectOption { value: "", label: "", default: false },
    SelectOption { value: "element", label: "Element", default: false },
    SelectOption { value: "image", label: "Image", default: false },
    SelectOption { value: "metric", label: "Metric", default: false },
];

/// HTTP methods offered for webhook invocations.
pub const HTTP_METHODS: &[SelectOption] = &[
    SelectOption { value: "PUT", label: "PUT", default: false },
    SelectOption { value: "POST", label: "POST", default: true },
];

/// Message states offered by the queue filter, led by the empty choice.
pub const MESSAGE_STATES: &[SelectOption] = &[
    SelectOption { value: "", label: "", default: false },
    SelectOption { value: "READY", label: "Ready", default: false },
    SelectOption { value: "IN_PROGRESS", label: "In progress", default: false },
    SelectOption { value: "PROCESSED", label: "Processed", default: false },
    SelectOption { value: "FAILED", label: "Failed", default: false },
];

/// One entry of the batch-size `<select>`.
pub struct BatchSizeOption {
    pub value: u8,
    pub label: String,
    pub default: bool,
}

/// Admissible batch sizes with the default flagged.
pub fn batch_sizes() -> Vec<BatchSizeOption> {
    (MIN_BATCH_SIZE..=MAX_BATCH_SIZE)
        .map(|value| BatchSizeOption {
            value,
            label: if value == 1 {
                "1 message".to_owned()
            } else {
                format!("{value} messages")
            },
            default: value == DEFAULT_BATCH_SIZE,
        })
        .collect()
}

// ── Auth mode ──

/// Transient auth selector of the settings form. Never persisted; the
/// persisted shape is whichever auth-field group the mode keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    None,
    Basic,
    Bearer,
}

impl AuthMode {
    /// Derive the mode from stored settings: an access key means bearer,
    /// a user id means basic.
    pub fn detect(settings: &WebhookSettings) -> Self {
        if settings.accesskey.is_some() {
            AuthMode::Bearer
        } else if settings.user_id.is_some() {
            AuthMode::Basic
        } else {
            AuthMode::None
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "basic" => AuthMode::Basic,
            "bearer" => AuthMode::Bearer,
            _ => AuthMode::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::None => "",
            AuthMode::Basic => "basic",
            AuthMode::Bearer => "bearer",
        }
    }
}

// ── Webhook list ──

/// A list row: the reference plus its derived state label.
pub struct WebhookRow {
    pub hook: WebhookReference,
    pub state: &'static str,
}

/// Model of the webhook list view.
pub struct WebhookListModel {
    pub filter: String,
    pub rows: Vec<WebhookRow>,
}

impl WebhookListModel {
    pub fn new(hooks: Vec<WebhookReference>, filter: &str) -> Self {
        let rows = hooks
            .into_iter()
            .map(|hook| WebhookRow {
                state: if hook.enabled { "UP" } else { "DOWN" },
                hook,
            })
            .collect();
        Self {
            filter: filter.to_owned(),
            rows,
        }
    }
}

// ── Settings ──

/// Model of the settings form, for both the create and the detail view.
pub struct SettingsModel {
    pub hook: WebhookSettings,
    pub auth_mode: AuthMode,
}

impl SettingsModel {
    pub fn new(hook: WebhookSettings) -> Self {
        let auth_mode = AuthMode::detect(&hook);
        Self { hook, auth_mode }
    }

    pub fn basic_auth(&self) -> bool {
        self.auth_mode == AuthMode::Basic
    }

    pub fn bearer_auth(&self) -> bool {
        self.auth_mode == AuthMode::Bearer
    }

    pub fn enabled(&self) -> bool {
        self.hook.enabled
    }

    pub fn disabled(&self) -> bool {
        !self.hook.enabled
    }

    /// The payload to submit: auth fields not covered by the selected mode
    /// are stripped, so at most one auth group leaves the form.
    pub fn submission(mut self) -> WebhookSettings {
        if self.auth_mode != AuthMode::Basic {
            self.hook.user_id = None;
            self.hook.password = None;
            self.hook.confirm_password = None;
        }
        if self.auth_mode != AuthMode::Bearer {
            self.hook.accesskey = None;
        }
        self.hook
    }
}

// ── Message queue ──

/// Model of the message queue view with its active filters.
pub struct MessageQueueModel {
    pub queue: WebhookMessages,
    pub state_filter: String,
    pub correlation_id: String,
}

impl MessageQueueModel {
    pub fn new(queue: WebhookMessages, state_filter: &str, correlation_id: &str) -> Self {
        Self {
            queue,
            state_filter: state_filter.to_owned(),
            correlation_id: correlation_id.to_owned(),
        }
    }
}

// ── Message detail ──

/// Model of the message detail view.
pub struct MessageModel {
    pub message: WebhookMessage,
}

impl MessageModel {
    pub fn new(message: WebhookMessage) -> Self {
        Self { message }
    }

    /// The parsed event payload, pretty-printed.
    pub fn json_payload(&self) -> String {
        serde_json::to_string_pretty(&self.message.payload)
            .unwrap_or_else(|_| self.message.payload.to_string())
    }

    /// The rewritten request body: pretty-printed when the content type is
    /// JSON, the raw text otherwise.
    pub fn rewritten_message(&self) -> String {
        if self.message.content_type == DEFAULT_CONTENT_TYPE {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&self.message.message) {
                if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                    return pretty;
                }
            }
        }
        self.message.message.clone()
    }
}

// ── Statistics ──

/// A statistics row for one message state.
pub struct StatisticsRow {
    pub state: MessageState,
    pub statistics: MessageStateStatistics,
}

/// Model of the statistics view: one row per state in fixed order, absent
/// states shown as zero counts.
pub struct StatisticsModel {
    pub statistics: WebhookStatistics,
}

impl StatisticsModel {
    pub fn new(statistics: WebhookStatistics) -> Self {
        Self { statistics }
    }

    pub fn rows(&self) -> Vec<StatisticsRow> {
        MessageState::ALL
            .iter()
            .map(|state| StatisticsRow {
                state: *state,
                statistics: self
                    .statistics
                    .statistics
                    .get(state)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect()
    }

    pub fn total(&self) -> u64 {
        self.statistics.total_message_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nf_api_types::{EventId, HookId, HookName, HttpMethod, Topic};
    use serde_json::json;
    use uuid::Uuid;

    fn nil_uuid() -> Uuid {
        Uuid::nil()
    }

    fn settings() -> WebhookSettings {
        WebhookSettings {
            hook_id: Some(HookId(nil_uuid())),
            hook_name: HookName("inventory".into()),
            topic_name: Topic::Element,
            selector: None,
            description: None,
            enabled: true,
            endpoint: "http://callback.example/hook".into(),
            method: HttpMethod::Post,
            batch_size: None,
            accesskey: Some("token".into()),
            user_id: Some("operator".into()),
            password: Some("secret".into()),
            confirm_password: Some("secret".into()),
        }
    }

    #[test]
    fn detect_prefers_bearer_over_basic() {
        assert_eq!(AuthMode::detect(&settings()), AuthMode::Bearer);

        let mut basic = settings();
        basic.accesskey = None;
        assert_eq!(AuthMode::detect(&basic), AuthMode::Basic);

        let mut none = basic.clone();
        none.user_id = None;
        assert_eq!(AuthMode::detect(&none), AuthMode::None);
    }

    #[test]
    fn submission_strips_basic_fields_unless_basic() {
        for mode in [AuthMode::None, AuthMode::Bearer] {
            let model = SettingsModel {
                hook: settings(),
                auth_mode: mode,
            };
            let submitted = serde_json::to_value(model.submission()).unwrap();
            assert!(submitted.get("user_id").is_none());
            assert!(submitted.get("password").is_none());
            assert!(submitted.get("confirm_password").is_none());
        }
    }

    #[test]
    fn submission_strips_accesskey_unless_bearer() {
        for mode in [AuthMode::None, AuthMode::Basic] {
            let model = SettingsModel {
                hook: settings(),
                auth_mode: mode,
            };
            let submitted = serde_json::to_value(model.submission()).unwrap();
            assert!(submitted.get("accesskey").is_none());
        }
    }

    #[test]
    fn submission_keeps_the_selected_auth_group() {
        let bearer = SettingsModel {
            hook: settings(),
            auth_mode: AuthMode::Bearer,
        }
        .submission();
        assert_eq!(bearer.accesskey.as_deref(), Some("token"));
        assert!(bearer.user_id.is_none());

        let basic = SettingsModel {
            hook: settings(),
            auth_mode: AuthMode::Basic,
        }
        .submission();
        assert_eq!(basic.user_id.as_deref(), Some("operator"));
        assert!(basic.accesskey.is_none());
    }

    #[test]
    fn enabled_and_disabled_are_complements() {
        let mut model = SettingsModel::new(settings());
        assert!(model.enabled() != model.disabled());
        model.hook.enabled = false;
        assert!(model.enabled() != model.disabled());
    }

    #[test]
    fn list_rows_derive_up_down_state() {
        let up = settings().reference().unwrap();
        let mut down = up.clone();
        down.enabled = false;

        let model = WebhookListModel::new(vec![up, down], "inv");
        assert_eq!(model.filter, "inv");
        assert_eq!(model.rows[0].state, "UP");
        assert_eq!(model.rows[1].state, "DOWN");
    }

    #[test]
    fn batch_size_options_default_to_ten() {
        let options = batch_sizes();
        assert_eq!(options.len(), 10);
        assert_eq!(options[0].label, "1 message");
        assert_eq!(options[9].label, "10 messages");
        let defaults: Vec<u8> = options.iter().filter(|o| o.default).map(|o| o.value).collect();
        assert_eq!(defaults, vec![DEFAULT_BATCH_SIZE]);
    }

    fn message(content_type: &str, raw: &str, payload: serde_json::Value) -> WebhookMessage {
        WebhookMessage {
            hook_id: HookId(nil_uuid()),
            hook_name: HookName("inventory".into()),
            event_id: EventId(nil_uuid()),
            event_name: "element-changed".into(),
            correlation_id: None,
            content_type: content_type.into(),
            message: raw.into(),
            payload,
            state: MessageState::Processed,
            http_status: Some(200),
            exec_time: Some(12),
        }
    }

    #[test]
    fn payload_pretty_printing_round_trips() {
        let payload = json!({"unit": "spine-1", "ports": [1, 2, 3]});
        let model = MessageModel::new(message(
            DEFAULT_CONTENT_TYPE,
            &payload.to_string(),
            payload.clone(),
        ));

        let reparsed: serde_json::Value = serde_json::from_str(&model.json_payload()).unwrap();
        assert_eq!(reparsed, payload);

        let rewritten: serde_json::Value =
            serde_json::from_str(&model.rewritten_message()).unwrap();
        assert_eq!(rewritten, payload);
    }

    #[test]
    fn non_json_messages_render_raw() {
        let model = MessageModel::new(message("text/plain", "unit spine-1 down", json!(null)));
        assert_eq!(model.rewritten_message(), "unit spine-1 down");
    }

    #[test]
    fn statistics_rows_cover_every_state() {
        let statistics = WebhookStatistics {
            hook_id: HookId(nil_uuid()),
            hook_name: HookName("inventory".into()),
            statistics: [(
                MessageState::Failed,
                MessageStateStatistics {
                    message_count: 2,
                    ..Default::default()
                },
            )]
            .into_iter()
            .collect(),
            total_message_count: 2,
        };
        let model = StatisticsModel::new(statistics);
        let rows = model.rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].state, MessageState::Ready);
        assert_eq!(rows[0].statistics.message_count, 0);
        assert_eq!(rows[3].state, MessageState::Failed);
        assert_eq!(rows[3].statistics.message_count, 2);
        assert_eq!(model.total(), 2);
    }
}
