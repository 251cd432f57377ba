//! Common test utilities for building flow descriptors.
use loadsmith::prelude::*;
use serde_json::{Value, json};

/// Parses and validates a JSON descriptor, panicking on any violation.
#[allow(dead_code)]
pub fn flow_from(descriptor: Value) -> LoadTestFlow {
    let raw: RawFlow = serde_json::from_value(descriptor).expect("descriptor should deserialize");
    raw.into_flow().expect("descriptor should be valid")
}

/// Compiles a descriptor with default settings.
#[allow(dead_code)]
pub fn compile(descriptor: Value) -> String {
    Compiler::builder(flow_from(descriptor))
        .build()
        .compile()
        .expect("compilation should succeed")
}

/// A flow with a single group named `main` holding `steps`.
#[allow(dead_code)]
pub fn single_group_flow(steps: Vec<Value>) -> Value {
    json!({
        "kind": "load_testing",
        "options": { "vus": 1, "duration": "1s" },
        "items": [{ "name": "main", "steps": steps }]
    })
}

/// A bare step: only a method and endpoint, nothing optional.
#[allow(dead_code)]
pub fn bare_step(method: &str, endpoint: &str) -> Value {
    json!({
        "kind": "api",
        "request": { "method": method, "endpoint": endpoint }
    })
}

/// The login scenario: a form-encoded token request in setup, one GET with
/// two checks in group `login_page`, and no postconditions.
///
/// Logic: POST /token -> `token`, GET /home with `Bearer $token`
#[allow(dead_code)]
pub fn login_flow() -> Value {
    json!({
        "kind": "load_testing",
        "options": {
            "stages": [{ "duration": "1m", "target": 10 }]
        },
        "precondition": [{
            "kind": "api",
            "request": {
                "method": "POST",
                "endpoint": "https://auth.example.test/token",
                "headers": [{ "key": "Content-Type", "value": "application/x-www-form-urlencoded" }],
                "body": { "username": "tester", "password": "secret" }
            },
            "response": { "kind": "json" },
            "setVariable": [{ "name": "token", "from": "response", "path": ".access_token" }]
        }],
        "postcondition": [],
        "items": [{
            "name": "login_page",
            "steps": [{
                "kind": "api",
                "request": {
                    "method": "GET",
                    "endpoint": "https://app.example.test/home",
                    "auth": { "kind": "bearer", "data": [{ "key": "", "value": "$token", "type": "string" }] }
                },
                "response": {
                    "kind": "json",
                    "check": [
                        { "name": "status is 200", "path": "$.status === $value", "value": 200 },
                        { "name": "fast", "path": "$.timings.duration < $value", "value": 500 }
                    ]
                }
            }]
        }]
    })
}

/// The text of the top-level function starting with `header`, up to its closing brace.
#[allow(dead_code)]
pub fn function_block<'a>(script: &'a str, header: &str) -> &'a str {
    let start = script
        .find(header)
        .unwrap_or_else(|| panic!("missing '{}' in script:\n{}", header, script));
    let len = script[start..]
        .find("\n}\n")
        .expect("top-level function should be closed");
    &script[start..start + len + 2]
}
