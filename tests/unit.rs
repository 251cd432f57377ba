mod common;
use common::*;
use loadsmith::descriptor::{AuthKind, ResponseKind, VariableSource};
use loadsmith::prelude::*;
use serde_json::json;

#[test]
fn test_descriptor_aliases() {
    let flow = flow_from(json!({
        "type": "load_testing",
        "items": [{
            "name": "aliases",
            "steps": [{
                "type": "API",
                "sleep": 0.5,
                "set_variable": [{ "name": "id", "ref": "$.json().id" }],
                "request": {
                    "method": "post",
                    "endpoint": "https://x.test/items",
                    "timeout": 10,
                    "auth": { "type": "Basic" }
                },
                "response": { "type": "text" }
            }]
        }]
    }));

    let step = &flow.items[0].steps[0];
    assert_eq!(step.sleep_seconds, Some(0.5));
    assert_eq!(step.request.method, Method::Post);
    assert_eq!(step.request.timeout_seconds, Some(10.0));
    assert_eq!(step.request.auth.as_ref().map(|a| a.kind), Some(AuthKind::Basic));
    assert_eq!(step.response.as_ref().map(|r| r.kind), Some(ResponseKind::Text));

    let binding = &step.set_variable[0];
    assert_eq!(binding.name, "id");
    assert_eq!(binding.from, VariableSource::Response);
    assert_eq!(binding.path, "$.json().id");
}

#[test]
fn test_empty_group_name_gets_a_positional_name() {
    let flow = flow_from(json!({
        "kind": "load_testing",
        "items": [{ "name": "  ", "steps": [] }]
    }));
    assert_eq!(flow.items[0].name, None);

    let script = Compiler::builder(flow).build().compile().unwrap();
    assert!(script.contains("k6.group('group-0', function () {"));
}

#[test]
fn test_every_violation_is_reported() {
    let raw: RawFlow = serde_json::from_value(json!({
        "kind": "load_testing",
        "precondition": [{
            "kind": "api",
            "request": { "method": "GET", "endpoint": "" }
        }],
        "items": [{
            "name": "broken",
            "steps": [
                {
                    "kind": "grpc",
                    "request": { "method": "TRACE", "endpoint": "https://x.test/a" }
                },
                {
                    "kind": "api",
                    "request": {
                        "method": "GET",
                        "endpoint": "https://x.test/b",
                        "auth": { "kind": "oauth2" }
                    },
                    "response": { "kind": "xml" },
                    "setVariable": [{ "name": "id", "from": "header", "path": "x-id" }]
                }
            ]
        }]
    }))
    .unwrap();

    let error = raw.into_flow().unwrap_err();
    let violations = error.violations();
    assert_eq!(violations.len(), 6, "{:#?}", violations);

    assert!(matches!(
        &violations[0],
        CompileError::MissingField { step: StepRef::Precondition(0), field } if field == "request.endpoint"
    ));
    assert!(matches!(
        &violations[1],
        CompileError::UnsupportedStepKind { kind, .. } if kind == "grpc"
    ));
    assert!(matches!(
        &violations[2],
        CompileError::UnsupportedMethod { method, .. } if method == "TRACE"
    ));
    assert!(matches!(&violations[3], CompileError::UnsupportedAuthKind { .. }));
    assert!(matches!(&violations[4], CompileError::UnsupportedResponseKind { .. }));
    assert!(matches!(
        &violations[5],
        CompileError::UnsupportedVariableSource { name, source_kind, .. }
            if name == "id" && source_kind == "header"
    ));

    let message = error.to_string();
    assert!(message.contains("items[0].steps[0]"), "{}", message);
    assert!(message.contains("items[0].steps[1]"), "{}", message);
}

#[test]
fn test_missing_fields_are_reported_together() {
    let json = r#"{
        "kind": "load_testing",
        "items": [{
            "name": "broken",
            "steps": [
                { "request": { "method": "GET", "endpoint": "https://x.test/a" } },
                { "kind": "api" }
            ]
        }]
    }"#;
    let error = Compiler::from_json(json).err().expect("descriptor should be rejected");

    match &error {
        CompileError::InvalidDescriptor(violations) => assert_eq!(violations.len(), 2),
        other => panic!("Expected InvalidDescriptor, got {:?}", other),
    }
    assert_eq!(
        error.violations(),
        vec![
            &CompileError::MissingField {
                step: StepRef::Item { group: 0, step: 0 },
                field: "kind".to_string(),
            },
            &CompileError::MissingField {
                step: StepRef::Item { group: 0, step: 1 },
                field: "request".to_string(),
            },
        ]
    );
}

#[test]
fn test_empty_keys_and_names_are_reported() {
    let raw: RawFlow = serde_json::from_value(single_group_flow(vec![json!({
        "kind": "api",
        "request": {
            "method": "GET",
            "endpoint": "https://x.test/a",
            "headers": [{ "value": "no key" }],
            "tags": [{ "stage": "warmup" }]
        },
        "setVariable": [{ "name": "2fa", "path": "" }]
    })]))
    .unwrap();

    let error = raw.into_flow().unwrap_err();
    let violations = error.violations();
    assert_eq!(violations.len(), 4, "{:#?}", violations);
    assert!(matches!(
        violations[0],
        CompileError::MissingField { field, .. } if field == "request.headers[0].key"
    ));
    assert!(matches!(
        violations[1],
        CompileError::MissingField { field, .. } if field == "request.tags[0].name"
    ));
    assert!(matches!(
        violations[2],
        CompileError::InvalidVariableName { name, .. } if name == "2fa"
    ));
    assert!(matches!(
        violations[3],
        CompileError::MissingField { field, .. } if field == "set_variable[0].path"
    ));
}

#[test]
fn test_single_violation_is_not_wrapped() {
    let raw: RawFlow =
        serde_json::from_value(single_group_flow(vec![bare_step("CONNECT", "https://x.test")]))
            .unwrap();
    let error = raw.into_flow().unwrap_err();
    assert!(matches!(error, CompileError::UnsupportedMethod { .. }));
    assert_eq!(error.violations().len(), 1);
}

#[test]
fn test_bearer_auth_without_token_is_rejected() {
    let raw: RawFlow = serde_json::from_value(single_group_flow(vec![json!({
        "kind": "api",
        "request": {
            "method": "GET",
            "endpoint": "https://x.test/a",
            "auth": { "kind": "bearer", "data": [] }
        }
    })]))
    .unwrap();
    assert!(matches!(
        raw.into_flow().unwrap_err(),
        CompileError::MissingField { field, .. } if field == "request.auth.data[0]"
    ));
}

#[test]
fn test_result_variable_names() {
    assert_eq!(StepRef::Precondition(2).result_var(), "req_2");
    assert_eq!(StepRef::Postcondition(0).result_var(), "post_req_0");
    assert_eq!(StepRef::Item { group: 1, step: 3 }.result_var(), "req_1_3");
}

#[test]
fn test_template_variables() {
    let template = Template::parse("Bearer $token for ${user}, costs $$1");
    assert_eq!(template.variables().collect::<Vec<_>>(), vec!["token", "user"]);
}
