//! Request path templating.
//!
//! REST paths are written as templates with `{{name}}` tokens and resolved
//! against an ordered list of parameter sources. Later sources override
//! earlier ones for the same key. `{{name}}` substitutes the value
//! percent-encoded for use as a path or query segment; `{{&name}}`
//! substitutes the raw value. An unresolved token collapses to the empty
//! string.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde_json::Value;
use std::collections::BTreeMap;

/// Characters escaped when a value is used as a path/query segment.
/// Matches the unreserved set of `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a value for use as a path or query segment.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

// ── Parameter sources ──

/// A named set of template parameters.
///
/// Route parameters, wrapper configuration, and request payloads all act as
/// parameter sources; `resolve` merges them in the order given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge the scalar fields of a JSON object into this source.
    ///
    /// Lets a request payload double as a parameter source, so a template
    /// can address the entity by fields of the body being sent. Nested
    /// objects, arrays, and nulls are skipped.
    pub fn merge_json(&mut self, value: &Value) {
        let Some(object) = value.as_object() else {
            return;
        };
        for (key, field) in object {
            match field {
                Value::String(s) => self.set(key.clone(), s.clone()),
                Value::Number(n) => self.set(key.clone(), n.to_string()),
                Value::Bool(b) => self.set(key.clone(), b.to_string()),
                _ => {}
            }
        }
    }

    /// Parse a `key=value&key=value` query string. Keys and values are
    /// percent-decoded; empty values are kept.
    pub fn parse_query(query: &str) -> Self {
        let mut params = Params::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.set(decode(key), decode(value));
        }
        params
    }

    /// Serialize as a query string with percent-encoded keys and values.
    pub fn to_query(&self) -> String {
        self.values
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

// ── Template resolution ──

/// Resolve a path template against an ordered list of parameter sources.
///
/// The last source listing a key wins. Text outside tokens is copied
/// verbatim, including a dangling `{{` without a closing brace.
pub fn resolve(template: &str, sources: &[&Params]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let token = &after[..end];
        let (name, raw) = match token.strip_prefix('&') {
            Some(name) => (name, true),
            None => (token, false),
        };
        if let Some(value) = lookup(sources, name) {
            if raw {
                out.push_str(value);
            } else {
                out.push_str(&encode_component(value));
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn lookup<'a>(sources: &[&'a Params], name: &str) -> Option<&'a str> {
    sources.iter().rev().find_map(|source| source.get(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn substitutes_from_a_single_source() {
        let params = Params::new().with("hook", "4f6e").with("scope", "settings");
        assert_eq!(
            resolve("/api/v1/webhooks/{{hook}}/{{scope}}", &[&params]),
            "/api/v1/webhooks/4f6e/settings"
        );
    }

    #[test]
    fn last_listed_source_wins_on_collision() {
        let defaults = Params::new().with("offset", "0").with("limit", "100");
        let route = Params::new().with("offset", "200");
        assert_eq!(
            resolve("?offset={{&offset}}&limit={{limit}}", &[&defaults, &route]),
            "?offset=200&limit=100"
        );
    }

    #[test]
    fn unresolved_token_collapses_to_empty() {
        assert_eq!(
            resolve("/api/v1/webhooks?filter={{filter}}", &[&Params::new()]),
            "/api/v1/webhooks?filter="
        );
    }

    #[test]
    fn plain_token_is_percent_encoded() {
        let params = Params::new().with("filter", "a b/c&d");
        assert_eq!(
            resolve("?filter={{filter}}", &[&params]),
            "?filter=a%20b%2Fc%26d"
        );
    }

    #[test]
    fn ampersand_token_substitutes_raw() {
        let params = Params::new().with("offset", "a b");
        assert_eq!(resolve("?offset={{&offset}}", &[&params]), "?offset=a b");
    }

    #[test]
    fn dangling_token_is_copied_verbatim() {
        let params = Params::new().with("hook", "x");
        assert_eq!(resolve("/hooks/{{hook", &[&params]), "/hooks/{{hook");
    }

    #[test]
    fn merge_json_takes_scalar_fields_only() {
        let mut params = Params::new();
        params.merge_json(&json!({
            "hook_name": "inventory",
            "batch_size": 5,
            "enabled": true,
            "selector": null,
            "nested": {"ignored": 1},
            "list": [1, 2],
        }));
        assert_eq!(params.get("hook_name"), Some("inventory"));
        assert_eq!(params.get("batch_size"), Some("5"));
        assert_eq!(params.get("enabled"), Some("true"));
        assert_eq!(params.get("selector"), None);
        assert_eq!(params.get("nested"), None);
        assert_eq!(params.get("list"), None);
    }

    #[test]
    fn query_string_round_trips() {
        let params = Params::new()
            .with("hook", "order hooks")
            .with("event", "42");
        let query = params.to_query();
        assert_eq!(query, "event=42&hook=order%20hooks");
        assert_eq!(Params::parse_query(&query), params);
    }

    #[test]
    fn parse_query_keeps_empty_values() {
        let params = Params::parse_query("filter=&hook=a");
        assert_eq!(params.get("filter"), Some(""));
        assert_eq!(params.get("hook"), Some("a"));
    }
}
