// ABOUTME: Post record model for the JSON post store.
// ABOUTME: A record is kept as its raw JSON object so a load/save round trip preserves every key, value and position.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Post identifier. The CMS writes a millisecond timestamp; older entries use strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PostId {
    Number(serde_json::Number),
    Text(String),
}

impl PostId {
    /// Read an identifier from a JSON value. Other value types are not identifiers.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(PostId::Number(n.clone())),
            Value::String(s) => Some(PostId::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Number(n) => write!(f, "{}", n),
            PostId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One entry of the post store.
///
/// Only `content` is ever rewritten. Metadata is read through accessors and
/// never validated, so an unusual value in one record cannot fail a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Post {
    fields: Map<String, Value>,
}

impl Post {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. An existing key keeps its position; a new one is appended.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// All keys in stored order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<PostId> {
        self.fields.get("id").and_then(PostId::from_value)
    }

    pub fn slug(&self) -> Option<&str> {
        self.str_field("slug")
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    /// Post body as an HTML fragment. A missing, `null` or non-string body is no body.
    pub fn content(&self) -> Option<&str> {
        self.str_field("content")
    }

    /// Mutable access to the body, in place, without moving the key.
    pub fn content_mut(&mut self) -> Option<&mut String> {
        match self.fields.get_mut("content") {
            Some(Value::String(content)) => Some(content),
            _ => None,
        }
    }

    /// Short human label for logs and reports: slug, then title, then id.
    pub fn label(&self) -> String {
        if let Some(slug) = self.slug().filter(|s| !s.is_empty()) {
            return slug.to_string();
        }
        if let Some(title) = self.title().filter(|s| !s.is_empty()) {
            return title.to_string();
        }
        match self.id() {
            Some(id) => format!("#{}", id),
            None => "<untitled>".to_string(),
        }
    }
}

impl From<Map<String, Value>> for Post {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
