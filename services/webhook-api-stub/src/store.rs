//! In-memory webhook store.
//!
//! Backs the stub API with plain vectors. Hooks are addressable by id or
//! name. Each created hook is seeded with a handful of demo messages so the
//! console has a queue to browse.

use chrono::{DateTime, Utc};
use nf_api_types::{
    EventId, HookId, HookName, MAX_BATCH_SIZE, MIN_BATCH_SIZE, MessageReference, MessageState,
    MessageStateStatistics, Topic, WebhookMessage, WebhookMessages, WebhookReference,
    WebhookSettings, WebhookStatistics, WebhookTemplate,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("webhook not found")]
    HookNotFound,
    #[error("message not found")]
    MessageNotFound,
    #[error("webhook name already in use")]
    DuplicateName,
    #[error("{0}")]
    Validation(String),
}

#[derive(Debug, Clone)]
pub struct MessageRecord {
    pub event_id: EventId,
    pub event_name: String,
    pub correlation_id: Option<String>,
    pub topic_name: Topic,
    pub content_type: String,
    pub message: String,
    pub payload: serde_json::Value,
    pub state: MessageState,
    pub http_status: Option<u16>,
    pub exec_time: Option<u64>,
    pub date_modified: DateTime<Utc>,
}

#[derive(Debug)]
pub struct HookRecord {
    pub settings: WebhookSettings,
    pub template: WebhookTemplate,
    /// Queue order; reset rewinds by index within this vector.
    pub messages: Vec<MessageRecord>,
}

#[derive(Debug, Default)]
pub struct Store {
    hooks: Vec<HookRecord>,
}

impl Store {
    // ── Collection ──

    pub fn list(&self, filter: Option<&str>) -> Vec<WebhookReference> {
        let needle = filter.unwrap_or("").trim().to_lowercase();
        self.hooks
            .iter()
            .filter(|record| {
                needle.is_empty()
                    || record
                        .settings
                        .hook_name
                        .0
                        .to_lowercase()
                        .contains(&needle)
            })
            .filter_map(|record| record.settings.reference())
            .collect()
    }

    pub fn create(&mut self, mut settings: WebhookSettings) -> Result<WebhookReference, StoreError> {
        validate(&settings)?;
        if self.position(&settings.hook_name.0).is_some() {
            return Err(StoreError::DuplicateName);
        }
        let hook_id = settings
            .hook_id
            .take()
            .unwrap_or_else(|| HookId(Uuid::new_v4()));
        settings.hook_id = Some(hook_id);

        let messages = seed_messages(settings.topic_name);
        let record = HookRecord {
            settings,
            template: WebhookTemplate::default(),
            messages,
        };
        let reference = record.settings.reference().ok_or_else(|| {
            StoreError::Validation("webhook id missing after creation".to_owned())
        })?;
        self.hooks.push(record);
        Ok(reference)
    }

    // ── Entity ──

    pub fn settings(&self, hook: &str) -> Result<WebhookSettings, StoreError> {
        Ok(self.record(hook)?.settings.clone())
    }

    /// Replace the settings. `hook_id` is immutable: whatever the payload
    /// carries, the stored id survives.
    pub fn save_settings(
        &mut self,
        hook: &str,
        mut incoming: WebhookSettings,
    ) -> Result<(), StoreError> {
        validate(&incoming)?;
        let index = self.position(hook).ok_or(StoreError::HookNotFound)?;
        let clash = self.position(&incoming.hook_name.0);
        if clash.is_some_and(|other| other != index) {
            return Err(StoreError::DuplicateName);
        }
        incoming.hook_id = self.hooks[index].settings.hook_id.clone();
        self.hooks[index].settings = incoming;
        Ok(())
    }

    pub fn template(&self, hook: &str) -> Result<WebhookTemplate, StoreError> {
        Ok(self.record(hook)?.template.clone())
    }

    pub fn save_template(
        &mut self,
        hook: &str,
        template: WebhookTemplate,
    ) -> Result<(), StoreError> {
        self.record_mut(hook)?.template = template;
        Ok(())
    }

    pub fn remove(&mut self, hook: &str) -> Result<(), StoreError> {
        let index = self.position(hook).ok_or(StoreError::HookNotFound)?;
        self.hooks.remove(index);
        Ok(())
    }

    /// Returns whether the state changed; enabling an enabled hook is a
    /// no-op.
    pub fn enable(&mut self, hook: &str) -> Result<bool, StoreError> {
        let record = self.record_mut(hook)?;
        let changed = !record.settings.enabled;
        record.settings.enabled = true;
        Ok(changed)
    }

    /// Returns whether the state changed; disabling a disabled hook is a
    /// no-op.
    pub fn disable(&mut self, hook: &str) -> Result<bool, StoreError> {
        let record = self.record_mut(hook)?;
        let changed = record.settings.enabled;
        record.settings.enabled = false;
        Ok(changed)
    }

    // ── Message queue ──

    pub fn messages(
        &self,
        hook: &str,
        state: Option<MessageState>,
        correlation_id: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> Result<WebhookMessages, StoreError> {
        let record = self.record(hook)?;
        let messages = record
            .messages
            .iter()
            .filter(|message| state.is_none_or(|wanted| message.state == wanted))
            .filter(|message| {
                correlation_id.is_none_or(|wanted| {
                    message.correlation_id.as_deref() == Some(wanted)
                })
            })
            .skip(offset)
            .take(limit)
            .map(reference_of)
            .collect();
        Ok(WebhookMessages {
            hook_id: hook_id_of(record),
            hook_name: record.settings.hook_name.clone(),
            messages,
        })
    }

    pub fn message(&self, hook: &str, event: &str) -> Result<WebhookMessage, StoreError> {
        let record = self.record(hook)?;
        let message = record
            .messages
            .iter()
            .find(|message| message.event_id.0.to_string() == event)
            .ok_or(StoreError::MessageNotFound)?;
        Ok(WebhookMessage {
            hook_id: hook_id_of(record),
            hook_name: record.settings.hook_name.clone(),
            event_id: message.event_id.clone(),
            event_name: message.event_name.clone(),
            correlation_id: message.correlation_id.clone(),
            content_type: message.content_type.clone(),
            message: message.message.clone(),
            payload: message.payload.clone(),
            state: message.state,
            http_status: message.http_status,
            exec_time: message.exec_time,
        })
    }

    /// Rewind the queue cursor: the named event and everything after it
    /// goes back to `READY`.
    pub fn reset(&mut self, hook: &str, event: &str) -> Result<(), StoreError> {
        let record = self.record_mut(hook)?;
        let index = record
            .messages
            .iter()
            .position(|message| message.event_id.0.to_string() == event)
            .ok_or(StoreError::MessageNotFound)?;
        let now = Utc::now();
        for message in &mut record.messages[index..] {
            requeue(message, now);
        }
        Ok(())
    }

    /// Re-queue all failed messages.
    pub fn retry_failed(&mut self, hook: &str) -> Result<usize, StoreError> {
        let record = self.record_mut(hook)?;
        let now = Utc::now();
        let mut requeued = 0;
        for message in &mut record.messages {
            if message.state == MessageState::Failed {
                requeue(message, now);
                requeued += 1;
            }
        }
        Ok(requeued)
    }

    /// Re-queue a single failed message; a no-op in any other state.
    pub fn retry_message(&mut self, hook: &str, event: &str) -> Result<(), StoreError> {
        let record = self.record_mut(hook)?;
        let message = record
            .messages
            .iter_mut()
            .find(|message| message.event_id.0.to_string() == event)
            .ok_or(StoreError::MessageNotFound)?;
        if message.state == MessageState::Failed {
            requeue(message, Utc::now());
        }
        Ok(())
    }

    // ── Statistics ──

    pub fn statistics(&self, hook: &str) -> Result<WebhookStatistics, StoreError> {
        let record = self.record(hook)?;
        let mut statistics = WebhookStatistics {
            hook_id: hook_id_of(record),
            hook_name: record.settings.hook_name.clone(),
            statistics: Default::default(),
            total_message_count: record.messages.len() as u64,
        };
        for state in MessageState::ALL {
            let exec_times: Vec<u64> = record
                .messages
                .iter()
                .filter(|message| message.state == state)
                .filter_map(|message| message.exec_time)
                .collect();
            let count = record
                .messages
                .iter()
                .filter(|message| message.state == state)
                .count() as u64;
            if count > 0 {
                statistics
                    .statistics
                    .insert(state, state_statistics(count, &exec_times));
            }
        }
        Ok(statistics)
    }

    // ── Lookup ──

    fn position(&self, hook: &str) -> Option<usize> {
        self.hooks.iter().position(|record| {
            record.settings.hook_name.0 == hook
                || record
                    .settings
                    .hook_id
                    .as_ref()
                    .is_some_and(|id| id.0.to_string() == hook)
        })
    }

    fn record(&self, hook: &str) -> Result<&HookRecord, StoreError> {
        let index = self.position(hook).ok_or(StoreError::HookNotFound)?;
        Ok(&self.hooks[index])
    }

    fn record_mut(&mut self, hook: &str) -> Result<&mut HookRecord, StoreError> {
        let index = self.position(hook).ok_or(StoreError::HookNotFound)?;
        Ok(&mut self.hooks[index])
    }
}

fn validate(settings: &WebhookSettings) -> Result<(), StoreError> {
    if settings.hook_name.0.trim().is_empty() {
        return Err(StoreError::Validation("hook_name must not be empty".to_owned()));
    }
    if settings.endpoint.trim().is_empty() {
        return Err(StoreError::Validation("endpoint must not be empty".to_owned()));
    }
    if let Some(batch_size) = settings.batch_size {
        if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&batch_size) {
            return Err(StoreError::Validation(format!(
                "batch_size must be between {MIN_BATCH_SIZE} and {MAX_BATCH_SIZE}"
            )));
        }
    }
    Ok(())
}

fn requeue(message: &mut MessageRecord, now: DateTime<Utc>) {
    message.state = MessageState::Ready;
    message.http_status = None;
    message.exec_time = None;
    message.date_modified = now;
}

fn hook_id_of(record: &HookRecord) -> HookId {
    record
        .settings
        .hook_id
        .clone()
        .unwrap_or(HookId(Uuid::nil()))
}

fn reference_of(message: &MessageRecord) -> MessageReference {
    MessageReference {
        event_id: message.event_id.clone(),
        event_name: message.event_name.clone(),
        correlation_id: message.correlation_id.clone(),
        topic_name: message.topic_name,
        state: message.state,
        http_status: message.http_status,
        exec_time: message.exec_time,
        date_modified: message.date_modified,
    }
}

fn state_statistics(count: u64, exec_times: &[u64]) -> MessageStateStatistics {
    if exec_times.is_empty() {
        return MessageStateStatistics {
            message_count: count,
            ..Default::default()
        };
    }
    let sum: u64 = exec_times.iter().sum();
    let avg = sum as f64 / exec_times.len() as f64;
    let variance = exec_times
        .iter()
        .map(|time| {
            let delta = *time as f64 - avg;
            delta * delta
        })
        .sum::<f64>()
        / exec_times.len() as f64;
    MessageStateStatistics {
        message_count: count,
        min_exec_time: exec_times.iter().min().copied(),
        avg_exec_time: Some(avg),
        max_exec_time: exec_times.iter().max().copied(),
        stddev_exec_time: Some(variance.sqrt()),
    }
}

/// Demo queue contents for a freshly created hook.
fn seed_messages(topic: Topic) -> Vec<MessageRecord> {
    let event_name = match topic {
        Topic::Element => "element-config-changed",
        Topic::Image => "image-state-changed",
        Topic::Metric => "metric-threshold-crossed",
    };
    let entries = [
        (MessageState::Processed, Some(200), Some(12), Some("batch-1")),
        (MessageState::Processed, Some(200), Some(18), Some("batch-1")),
        (MessageState::Failed, Some(502), Some(45), Some("batch-2")),
        (MessageState::InProgress, None, None, None),
        (MessageState::Ready, None, None, None),
    ];
    entries
        .into_iter()
        .enumerate()
        .map(|(sequence, (state, http_status, exec_time, correlation_id))| {
            let payload = serde_json::json!({
                "event": event_name,
                "sequence": sequence,
            });
            MessageRecord {
                event_id: EventId(Uuid::new_v4()),
                event_name: event_name.to_owned(),
                correlation_id: correlation_id.map(str::to_owned),
                topic_name: topic,
                content_type: "application/json".to_owned(),
                message: payload.to_string(),
                payload,
                state,
                http_status,
                exec_time,
                date_modified: Utc::now(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nf_api_types::HttpMethod;

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

    #[test]
    fn created_hooks_are_addressable_by_id_and_name() {
        let mut store = Store::default();
        let reference = store.create(settings("inventory")).unwrap();

        assert!(store.settings("inventory").is_ok());
        assert!(store.settings(&reference.hook_id.0.to_string()).is_ok());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut store = Store::default();
        store.create(settings("inventory")).unwrap();
        assert!(matches!(
            store.create(settings("inventory")),
            Err(StoreError::DuplicateName)
        ));
    }

    #[test]
    fn batch_size_outside_the_range_is_rejected() {
        let mut store = Store::default();
        let mut invalid = settings("inventory");
        invalid.batch_size = Some(11);
        assert!(matches!(
            store.create(invalid),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn removed_hooks_disappear_from_the_list() {
        let mut store = Store::default();
        store.create(settings("inventory")).unwrap();
        store.create(settings("alarms")).unwrap();

        store.remove("inventory").unwrap();

        let names: Vec<String> = store
            .list(None)
            .into_iter()
            .map(|reference| reference.hook_name.0)
            .collect();
        assert_eq!(names, vec!["alarms".to_owned()]);
        assert!(matches!(
            store.settings("inventory"),
            Err(StoreError::HookNotFound)
        ));
    }

    #[test]
    fn list_filters_by_name() {
        let mut store = Store::default();
        store.create(settings("inventory")).unwrap();
        store.create(settings("alarms")).unwrap();

        let hits = store.list(Some("inven"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].hook_name.0, "inventory");
        assert_eq!(store.list(Some("")).len(), 2);
    }

    #[test]
    fn enable_and_disable_report_no_ops() {
        let mut store = Store::default();
        store.create(settings("inventory")).unwrap();

        assert!(!store.enable("inventory").unwrap());
        assert!(store.disable("inventory").unwrap());
        assert!(!store.disable("inventory").unwrap());
        assert!(store.enable("inventory").unwrap());
    }

    #[test]
    fn hook_id_survives_settings_updates() {
        let mut store = Store::default();
        let reference = store.create(settings("inventory")).unwrap();

        let mut update = settings("inventory-renamed");
        update.hook_id = Some(HookId(Uuid::new_v4()));
        store
            .save_settings(&reference.hook_id.0.to_string(), update)
            .unwrap();

        let stored = store.settings("inventory-renamed").unwrap();
        assert_eq!(stored.hook_id, Some(reference.hook_id));
    }

    #[test]
    fn reset_requeues_the_cursor_event_and_everything_after_it() {
        let mut store = Store::default();
        store.create(settings("inventory")).unwrap();

        let queue = store.messages("inventory", None, None, 0, 100).unwrap();
        let cursor = queue.messages[2].event_id.0.to_string();
        store.reset("inventory", &cursor).unwrap();

        let states: Vec<MessageState> = store
            .messages("inventory", None, None, 0, 100)
            .unwrap()
            .messages
            .iter()
            .map(|message| message.state)
            .collect();
        assert_eq!(
            states,
            vec![
                MessageState::Processed,
                MessageState::Processed,
                MessageState::Ready,
                MessageState::Ready,
                MessageState::Ready,
            ]
        );
    }

    #[test]
    fn retry_failed_requeues_failed_messages_only() {
        let mut store = Store::default();
        store.create(settings("inventory")).unwrap();

        assert_eq!(store.retry_failed("inventory").unwrap(), 1);

        let queue = store.messages("inventory", None, None, 0, 100).unwrap();
        assert!(queue
            .messages
            .iter()
            .all(|message| message.state != MessageState::Failed));
        assert_eq!(
            queue
                .messages
                .iter()
                .filter(|message| message.state == MessageState::Processed)
                .count(),
            2
        );
    }

    #[test]
    fn message_filters_narrow_by_state_and_correlation() {
        let mut store = Store::default();
        store.create(settings("inventory")).unwrap();

        let failed = store
            .messages("inventory", Some(MessageState::Failed), None, 0, 100)
            .unwrap();
        assert_eq!(failed.messages.len(), 1);

        let batch = store
            .messages("inventory", None, Some("batch-1"), 0, 100)
            .unwrap();
        assert_eq!(batch.messages.len(), 2);

        let paged = store.messages("inventory", None, None, 1, 2).unwrap();
        assert_eq!(paged.messages.len(), 2);
    }

    #[test]
    fn statistics_aggregate_per_state() {
        let mut store = Store::default();
        store.create(settings("inventory")).unwrap();

        let statistics = store.statistics("inventory").unwrap();
        assert_eq!(statistics.total_message_count, 5);

        let processed = &statistics.statistics[&MessageState::Processed];
        assert_eq!(processed.message_count, 2);
        assert_eq!(processed.min_exec_time, Some(12));
        assert_eq!(processed.max_exec_time, Some(18));
        assert_eq!(processed.avg_exec_time, Some(15.0));

        let ready = &statistics.statistics[&MessageState::Ready];
        assert_eq!(ready.message_count, 1);
        assert_eq!(ready.avg_exec_time, None);
    }
}
