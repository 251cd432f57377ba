//! JSON wire form of a flow descriptor.
//!
//! These structs mirror the input format loosely: every enum-like field is a
//! plain string and every field may be absent, so that missing values are
//! reported together by the conversion instead of failing the parse. They are only meant to be turned
//! into a [`LoadTestFlow`](super::LoadTestFlow) through [`IntoFlow`](super::IntoFlow),
//! which is where the strict checks happen.

use super::definition::ExecutionOptions;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawFlow {
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub options: ExecutionOptions,
    #[serde(default)]
    pub precondition: Vec<RawStep>,
    #[serde(default)]
    pub postcondition: Vec<RawStep>,
    #[serde(default)]
    pub items: Vec<RawGroup>,
}

impl RawFlow {
    /// Parse a descriptor from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawGroup {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub steps: Vec<RawStep>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawStep {
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(default, alias = "sleepSeconds", alias = "sleep")]
    pub sleep_seconds: Option<f64>,
    #[serde(default, alias = "setVariable")]
    pub set_variable: Vec<RawVariableBinding>,
    #[serde(default)]
    pub request: Option<RawRequest>,
    #[serde(default)]
    pub response: Option<RawResponse>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawRequest {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub auth: Option<RawAuth>,
    #[serde(default)]
    pub headers: Vec<RawKeyValue>,
    #[serde(default)]
    pub cookies: Vec<RawKeyValue>,
    #[serde(default)]
    pub params: Vec<RawKeyValue>,
    #[serde(default)]
    pub query: Vec<RawKeyValue>,
    #[serde(default)]
    pub body: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
    #[serde(default, alias = "timeoutSeconds")]
    pub timeout: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawAuth {
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Vec<RawAuthField>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawAuthField {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default, rename = "type")]
    pub value_type: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawKeyValue {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawTag {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stage: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawResponse {
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub validate: Vec<RawValidation>,
    #[serde(default)]
    pub check: Vec<RawCheck>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawValidation {
    #[serde(default, rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub rule: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawCheck {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawVariableBinding {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_binding_source")]
    pub from: String,
    #[serde(default, alias = "ref")]
    pub path: String,
}

fn default_binding_source() -> String {
    "response".to_string()
}
