//! Postman Environment Type Definitions

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::value_to_string;

/// Root structure for a Postman Environment export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanEnvironment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub values: Vec<PostmanEnvVariable>,
    #[serde(
        rename = "_postman_variable_scope",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub postman_variable_scope: Option<String>,
}

/// Postman environment variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostmanEnvVariable {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// `default`, `secret` or `any`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub var_type: Option<String>,
}

const fn default_true() -> bool {
    true
}

impl PostmanEnvVariable {
    #[must_use]
    pub fn is_secret(&self) -> bool {
        self.var_type.as_deref() == Some("secret")
    }

    #[must_use]
    pub fn value_text(&self) -> String {
        self.value
            .as_ref()
            .and_then(value_to_string)
            .unwrap_or_default()
    }
}
