//! Postman Collection v2.0 / v2.1 Type Definitions
//!
//! Real-world exports mix the two schema versions freely, so every field
//! that has more than one historical shape is an untagged enum, and almost
//! everything is optional. The same types are used for export, where the
//! v2.1 shape is always written.

#![allow(missing_docs)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root structure for a Postman Collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanCollection {
    pub info: PostmanInfo,
    #[serde(default)]
    pub item: Vec<PostmanItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variable: Vec<PostmanVariable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<PostmanAuth>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event: Vec<PostmanEvent>,
}

/// Collection metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanInfo {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "_postman_id", default, skip_serializing_if = "Option::is_none")]
    pub postman_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<PostmanDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

/// Plain text, or a v2.1 `{content, type}` object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostmanDescription {
    Text(String),
    Rich {
        #[serde(default)]
        content: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
    },
}

impl PostmanDescription {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Rich { content: text, .. } => text,
        }
    }
}

/// An item can be either a folder (containing more items) or a request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanItem {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<PostmanDescription>,
    /// If present, this item is a folder containing sub-items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Vec<Self>>,
    /// If present, this item is a request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<PostmanRequestDef>,
    /// Events (scripts) attached to this item
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event: Vec<PostmanEvent>,
    /// Folder-level auth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<PostmanAuth>,
    /// Folder-level variables
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variable: Vec<PostmanVariable>,
}

impl PostmanItem {
    /// Returns true if this item is a folder (has sub-items)
    #[must_use]
    pub const fn is_folder(&self) -> bool {
        self.item.is_some()
    }

    /// Returns true if this item is a request
    #[must_use]
    pub const fn is_request(&self) -> bool {
        self.request.is_some()
    }

    /// Returns true if any attached event carries script lines
    #[must_use]
    pub fn has_scripts(&self) -> bool {
        has_scripts(&self.event)
    }
}

/// Returns true if any event carries script lines
#[must_use]
pub fn has_scripts(events: &[PostmanEvent]) -> bool {
    events
        .iter()
        .any(|e| e.script.as_ref().is_some_and(|s| !s.exec.lines().is_empty()))
}

/// `request` is either a full object or, in v2.0, a bare URL string
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostmanRequestDef {
    Url(String),
    Full(Box<PostmanRequest>),
}

/// Postman Request definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanRequest {
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub url: PostmanUrl,
    #[serde(default, skip_serializing_if = "PostmanHeaders::is_empty")]
    pub header: PostmanHeaders,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<PostmanBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<PostmanAuth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<PostmanDescription>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// URL can be either a simple string or a structured object
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum PostmanUrl {
    #[default]
    Empty,
    Simple(String),
    Structured(PostmanUrlStructured),
}

impl PostmanUrl {
    /// Get the raw URL string, rebuilding it from parts when `raw` is absent
    #[must_use]
    pub fn raw(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Simple(s) => s.clone(),
            Self::Structured(s) => s
                .raw
                .clone()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| s.rebuild()),
        }
    }

    /// Get query parameters if available
    #[must_use]
    pub fn query_params(&self) -> &[PostmanQueryParam] {
        match self {
            Self::Structured(s) => &s.query,
            _ => &[],
        }
    }
}

/// Structured URL object
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PostmanUrlStructured {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<StringOrList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<StringOrList>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<PostmanQueryParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl PostmanUrlStructured {
    /// Builds `protocol://host:port/path?query#hash` from the parts.
    #[must_use]
    pub fn rebuild(&self) -> String {
        let mut url = String::new();
        if let Some(protocol) = self.protocol.as_deref().filter(|p| !p.is_empty()) {
            url.push_str(protocol);
            url.push_str("://");
        }
        if let Some(host) = &self.host {
            url.push_str(&host.join("."));
        }
        if let Some(port) = self.port.as_deref().filter(|p| !p.is_empty()) {
            url.push(':');
            url.push_str(port);
        }
        if let Some(path) = &self.path {
            let path = path.join("/");
            if !path.is_empty() {
                if !path.starts_with('/') {
                    url.push('/');
                }
                url.push_str(&path);
            }
        }
        let query: Vec<String> = self
            .query
            .iter()
            .filter(|q| !q.disabled)
            .filter_map(|q| {
                let key = q.key.as_deref()?;
                Some(match q.value.as_deref() {
                    Some(value) => format!("{key}={value}"),
                    None => key.to_string(),
                })
            })
            .collect();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        if let Some(hash) = self.hash.as_deref().filter(|h| !h.is_empty()) {
            url.push('#');
            url.push_str(hash);
        }
        url
    }
}

/// `host` and `path` are a dotted/slashed string in v2.0 and an array in v2.1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    #[must_use]
    pub fn join(&self, separator: &str) -> String {
        match self {
            Self::One(s) => s.clone(),
            Self::Many(parts) => parts.join(separator),
        }
    }
}

/// Query parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanQueryParam {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<PostmanDescription>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
}

/// Headers are a list in v2.1 and sometimes a raw `Key: Value` block in v2.0
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostmanHeaders {
    List(Vec<PostmanHeader>),
    Raw(String),
}

impl Default for PostmanHeaders {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl PostmanHeaders {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(list) => list.is_empty(),
            Self::Raw(raw) => raw.trim().is_empty(),
        }
    }
}

/// Request header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanHeader {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<PostmanDescription>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
}

/// Request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostmanBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urlencoded: Vec<PostmanFormParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub formdata: Vec<PostmanFormParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PostmanBodyFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<PostmanBodyOptions>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
}

impl PostmanBody {
    /// `options.raw.language`, if present
    #[must_use]
    pub fn raw_language(&self) -> Option<&str> {
        self.options
            .as_ref()
            .and_then(|o| o.raw.as_ref())
            .and_then(|r| r.language.as_deref())
            .filter(|l| !l.trim().is_empty())
    }
}

/// Form parameter, url-encoded or multipart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanFormParam {
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// File path(s) for `type: file`; a string or an array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
}

impl PostmanFormParam {
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.param_type.as_deref() == Some("file")
    }

    /// First file path in `src`
    #[must_use]
    pub fn first_src(&self) -> Option<String> {
        match self.src.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => items.iter().find_map(|v| v.as_str().map(str::to_string)),
            _ => None,
        }
    }
}

/// Binary file body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanBodyFile {
    #[serde(default)]
    pub src: Option<String>,
}

/// Body options (e.g., raw language)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanBodyOptions {
    #[serde(default)]
    pub raw: Option<PostmanRawOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanRawOptions {
    #[serde(default)]
    pub language: Option<String>,
}

/// Authentication configuration
///
/// Parameters live under a key named after the type. v2.1 stores them as a
/// `[{key, value}]` array, v2.0 as a plain object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanAuth {
    #[serde(rename = "type", default)]
    pub auth_type: String,
    #[serde(flatten)]
    pub params: BTreeMap<String, Value>,
}

impl PostmanAuth {
    /// Builds a v2.1 auth block.
    #[must_use]
    pub fn new(auth_type: &str, params: &[(&str, &str)]) -> Self {
        let mut map = BTreeMap::new();
        if !params.is_empty() {
            let list = params
                .iter()
                .map(|(k, v)| serde_json::json!({"key": k, "value": v, "type": "string"}))
                .collect();
            map.insert(auth_type.to_string(), Value::Array(list));
        }
        Self {
            auth_type: auth_type.to_string(),
            params: map,
        }
    }

    /// Get a parameter value by key, stringified
    #[must_use]
    pub fn get_param(&self, key: &str) -> Option<String> {
        match self.params.get(&self.auth_type)? {
            Value::Array(items) => items
                .iter()
                .find(|p| p.get("key").and_then(Value::as_str) == Some(key))
                .and_then(|p| p.get("value"))
                .and_then(value_to_string),
            Value::Object(map) => map.get(key).and_then(value_to_string),
            _ => None,
        }
    }
}

/// Variable definition; v2.0 sometimes uses `id` instead of `key`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanVariable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub var_type: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
}

impl PostmanVariable {
    /// `key`, falling back to `id`
    #[must_use]
    pub fn name(&self) -> &str {
        self.key
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or_default()
    }

    /// The value as text; numbers and booleans are rendered, null is empty
    #[must_use]
    pub fn value_text(&self) -> String {
        self.value
            .as_ref()
            .and_then(value_to_string)
            .unwrap_or_default()
    }
}

/// Event (pre-request or test script)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanEvent {
    #[serde(default)]
    pub listen: String,
    #[serde(default)]
    pub script: Option<PostmanScript>,
}

/// Script definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanScript {
    #[serde(rename = "type", default)]
    pub script_type: Option<String>,
    #[serde(default)]
    pub exec: ScriptLines,
}

/// `exec` is an array of lines, or a single string in some exports
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptLines {
    Lines(Vec<String>),
    Single(String),
}

impl Default for ScriptLines {
    fn default() -> Self {
        Self::Lines(Vec::new())
    }
}

impl ScriptLines {
    /// Non-blank lines
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Lines(lines) => lines
                .iter()
                .map(String::as_str)
                .filter(|l| !l.trim().is_empty())
                .collect(),
            Self::Single(text) => text.lines().filter(|l| !l.trim().is_empty()).collect(),
        }
    }
}

/// Renders scalars as text. Arrays and objects are kept as JSON.
#[must_use]
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}
