use serde::{Deserialize, Serialize};
use std::fmt;

/// The complete, canonical definition of a load-test flow, ready for compilation.
/// Built once per compilation and never mutated by the compiler.
#[derive(Debug, Clone)]
pub struct LoadTestFlow {
    pub kind: FlowKind,
    pub options: ExecutionOptions,
    pub precondition: Vec<Step>,
    pub postcondition: Vec<Step>,
    pub items: Vec<Group>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    LoadTesting,
}

impl FlowKind {
    pub const LOAD_TESTING: &'static str = "load_testing";
}

/// Runtime execution options, serialized verbatim into the script.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExecutionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vus: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<LoadStage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<serde_json::Map<String, serde_json::Value>>,
    /// Any other runtime option, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One ramp stage: reach `target` virtual users over `duration`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoadStage {
    pub duration: String,
    pub target: u64,
}

/// A named, ordered sequence of steps.
#[derive(Debug, Clone)]
pub struct Group {
    pub name: Option<String>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone)]
pub struct Step {
    pub kind: StepKind,
    pub sleep_seconds: Option<f64>,
    pub set_variable: Vec<VariableBinding>,
    pub request: RequestSpec,
    pub response: Option<ResponseSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Api,
}

#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub endpoint: String,
    pub method: Method,
    pub auth: Option<Auth>,
    pub headers: Vec<KeyValue>,
    pub cookies: Vec<KeyValue>,
    pub params: Vec<KeyValue>,
    pub query: Vec<KeyValue>,
    pub body: Option<serde_json::Map<String, serde_json::Value>>,
    pub tags: Vec<Tag>,
    pub timeout_seconds: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Get,
        Method::Post,
        Method::Patch,
        Method::Put,
        Method::Delete,
    ];

    /// Case-insensitive lookup of one of the supported verbs.
    pub fn parse(verb: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_upper().eq_ignore_ascii_case(verb.trim()))
    }

    pub fn as_upper(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// The call token used by the runtime's http module.
    ///
    /// This is always the lowercased verb. k6 itself exports DELETE as
    /// `http.del`, so `http.delete` needs an alias on the runtime side.
    pub fn as_lower(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Patch => "patch",
            Method::Put => "put",
            Method::Delete => "delete",
        }
    }

    /// Whether the runtime call takes a positional body argument.
    pub fn has_body_argument(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upper())
    }
}

#[derive(Debug, Clone)]
pub struct Auth {
    pub kind: AuthKind,
    pub data: Vec<AuthField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    Bearer,
    Basic,
    Digest,
    Ntlm,
}

impl AuthKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "bearer" => Some(AuthKind::Bearer),
            "basic" => Some(AuthKind::Basic),
            "digest" => Some(AuthKind::Digest),
            "ntlm" => Some(AuthKind::Ntlm),
            _ => None,
        }
    }

    /// The literal auth-mode token the runtime understands. Bearer has none;
    /// it is expressed as an `Authorization` header instead.
    pub fn mode_token(&self) -> Option<&'static str> {
        match self {
            AuthKind::Bearer => None,
            AuthKind::Basic => Some("basic"),
            AuthKind::Digest => Some("digest"),
            AuthKind::Ntlm => Some("ntlm"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthField {
    pub key: String,
    pub value: serde_json::Value,
    pub value_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: serde_json::Value,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    pub stage: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResponseSpec {
    pub kind: ResponseKind,
    pub validate: Vec<ValidationRule>,
    pub check: Vec<ResponseCheck>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Text,
    Json,
}

impl ResponseKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "text" => Some(ResponseKind::Text),
            "json" => Some(ResponseKind::Json),
            _ => None,
        }
    }
}

/// Declared on the descriptor but not used when generating the script.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRule {
    pub reference: String,
    pub rule: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseCheck {
    pub name: Option<String>,
    pub path: Option<String>,
    pub value: serde_json::Value,
}

impl ResponseCheck {
    /// The label shown by the runtime: the check name, else its path.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.path.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableBinding {
    pub name: String,
    pub from: VariableSource,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableSource {
    Response,
}

/// Location of a step inside a flow, used for error reporting and result names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepRef {
    Precondition(usize),
    Postcondition(usize),
    Item { group: usize, step: usize },
}

impl StepRef {
    /// Name of the runtime local holding this step's result.
    pub fn result_var(&self) -> String {
        match self {
            StepRef::Precondition(i) => format!("req_{}", i),
            StepRef::Postcondition(i) => format!("post_req_{}", i),
            StepRef::Item { group, step } => format!("req_{}_{}", group, step),
        }
    }
}

impl fmt::Display for StepRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepRef::Precondition(i) => write!(f, "precondition[{}]", i),
            StepRef::Postcondition(i) => write!(f, "postcondition[{}]", i),
            StepRef::Item { group, step } => write!(f, "items[{}].steps[{}]", group, step),
        }
    }
}
