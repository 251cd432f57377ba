use super::definition::*;
use super::raw::*;
use crate::error::CompileError;

/// A trait for input models that can be converted into a canonical [`LoadTestFlow`].
///
/// The conversion is the single validation boundary of the crate: once a
/// `LoadTestFlow` exists, every enum-like field has been checked and the
/// compiler never has to second-guess the descriptor again.
///
/// # Example
///
/// ```rust,no_run
/// use loadsmith::descriptor::{IntoFlow, RawFlow};
///
/// let json = std::fs::read_to_string("flow.json").unwrap();
/// let flow = RawFlow::from_json(&json).unwrap().into_flow();
/// match flow {
///     Ok(flow) => println!("{} groups", flow.items.len()),
///     Err(e) => {
///         for violation in e.violations() {
///             eprintln!("{}", violation);
///         }
///     }
/// }
/// ```
pub trait IntoFlow {
    /// Consumes the object and converts it into a compilable flow.
    fn into_flow(self) -> Result<LoadTestFlow, CompileError>;
}

impl IntoFlow for LoadTestFlow {
    fn into_flow(self) -> Result<LoadTestFlow, CompileError> {
        Ok(self)
    }
}

impl IntoFlow for RawFlow {
    fn into_flow(self) -> Result<LoadTestFlow, CompileError> {
        // The flow kind gates everything else and is reported on its own.
        if self.kind.trim() != FlowKind::LOAD_TESTING {
            return Err(CompileError::UnsupportedFlowKind(self.kind));
        }

        let mut violations = Vec::new();

        let precondition = convert_steps(self.precondition, StepRef::Precondition, &mut violations);
        let postcondition =
            convert_steps(self.postcondition, StepRef::Postcondition, &mut violations);
        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(group, raw_group)| Group {
                name: raw_group.name.filter(|n| !n.trim().is_empty()),
                steps: convert_steps(
                    raw_group.steps,
                    |step| StepRef::Item { group, step },
                    &mut violations,
                ),
            })
            .collect();

        if let Some(error) = CompileError::from_violations(violations) {
            return Err(error);
        }

        Ok(LoadTestFlow {
            kind: FlowKind::LoadTesting,
            options: self.options,
            precondition,
            postcondition,
            items,
        })
    }
}

fn convert_steps(
    raw_steps: Vec<RawStep>,
    locate: impl Fn(usize) -> StepRef,
    violations: &mut Vec<CompileError>,
) -> Vec<Step> {
    raw_steps
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| convert_step(raw, locate(index), violations))
        .collect()
}

/// Converts one step, appending every problem found to `violations`.
/// Returns `None` when the step had at least one violation.
fn convert_step(raw: RawStep, at: StepRef, violations: &mut Vec<CompileError>) -> Option<Step> {
    let before = violations.len();
    let RawStep {
        kind: raw_kind,
        sleep_seconds,
        set_variable,
        request,
        response,
    } = raw;

    let kind = match raw_kind.trim().to_ascii_lowercase().as_str() {
        "" => {
            violations.push(missing(at, "kind"));
            None
        }
        "api" => Some(StepKind::Api),
        _ => {
            violations.push(CompileError::UnsupportedStepKind {
                step: at,
                kind: raw_kind.clone(),
            });
            None
        }
    };

    let request = match request {
        Some(raw_request) => convert_request(raw_request, at, violations),
        None => {
            violations.push(missing(at, "request"));
            None
        }
    };
    let response =
        response.and_then(|raw_response| convert_response(raw_response, at, violations));
    let set_variable: Vec<VariableBinding> = set_variable
        .into_iter()
        .enumerate()
        .filter_map(|(index, binding)| convert_binding(binding, index, at, violations))
        .collect();

    if violations.len() > before {
        return None;
    }

    Some(Step {
        kind: kind?,
        sleep_seconds,
        set_variable,
        request: request?,
        response,
    })
}

fn convert_request(
    raw: RawRequest,
    at: StepRef,
    violations: &mut Vec<CompileError>,
) -> Option<RequestSpec> {
    let RawRequest {
        endpoint,
        method: raw_method,
        auth,
        headers,
        cookies,
        params,
        query,
        body,
        tags,
        timeout,
    } = raw;

    let method = if raw_method.trim().is_empty() {
        violations.push(missing(at, "request.method"));
        None
    } else {
        let method = Method::parse(&raw_method);
        if method.is_none() {
            violations.push(CompileError::UnsupportedMethod {
                step: at,
                method: raw_method,
            });
        }
        method
    };

    if endpoint.trim().is_empty() {
        violations.push(missing(at, "request.endpoint"));
    }

    let auth = auth.and_then(|raw_auth| convert_auth(raw_auth, at, violations));
    let headers = convert_pairs(headers, "request.headers", at, violations);
    let cookies = convert_pairs(cookies, "request.cookies", at, violations);
    let params = convert_pairs(params, "request.params", at, violations);
    let query = convert_pairs(query, "request.query", at, violations);

    let mut converted_tags = Vec::with_capacity(tags.len());
    for (index, tag) in tags.into_iter().enumerate() {
        if tag.name.trim().is_empty() {
            violations.push(missing(at, format!("request.tags[{}].name", index)));
            continue;
        }
        converted_tags.push(Tag {
            name: tag.name,
            stage: tag.stage,
        });
    }

    Some(RequestSpec {
        endpoint,
        method: method?,
        auth,
        headers,
        cookies,
        params,
        query,
        body,
        tags: converted_tags,
        timeout_seconds: timeout,
    })
}

fn convert_auth(raw: RawAuth, at: StepRef, violations: &mut Vec<CompileError>) -> Option<Auth> {
    if raw.kind.trim().is_empty() {
        violations.push(missing(at, "request.auth.kind"));
        return None;
    }
    let Some(kind) = AuthKind::parse(&raw.kind) else {
        violations.push(CompileError::UnsupportedAuthKind {
            step: at,
            kind: raw.kind,
        });
        return None;
    };

    if kind == AuthKind::Bearer && raw.data.is_empty() {
        violations.push(missing(at, "request.auth.data[0]"));
        return None;
    }

    Some(Auth {
        kind,
        data: raw
            .data
            .into_iter()
            .map(|d| AuthField {
                key: d.key,
                value: d.value,
                value_type: d.value_type,
            })
            .collect(),
    })
}

fn convert_response(
    raw: RawResponse,
    at: StepRef,
    violations: &mut Vec<CompileError>,
) -> Option<ResponseSpec> {
    let kind = if raw.kind.trim().is_empty() {
        violations.push(missing(at, "response.kind"));
        None
    } else {
        let kind = ResponseKind::parse(&raw.kind);
        if kind.is_none() {
            violations.push(CompileError::UnsupportedResponseKind {
                step: at,
                kind: raw.kind.clone(),
            });
        }
        kind
    };

    let mut validate = Vec::with_capacity(raw.validate.len());
    for (index, v) in raw.validate.into_iter().enumerate() {
        if v.reference.trim().is_empty() {
            violations.push(missing(at, format!("response.validate[{}].ref", index)));
            continue;
        }
        if v.rule.trim().is_empty() {
            violations.push(missing(at, format!("response.validate[{}].rule", index)));
            continue;
        }
        validate.push(ValidationRule {
            reference: v.reference,
            rule: v.rule,
        });
    }

    let mut check = Vec::with_capacity(raw.check.len());
    for (index, c) in raw.check.into_iter().enumerate() {
        if c.path.as_deref().is_none_or(|p| p.trim().is_empty()) {
            violations.push(missing(at, format!("response.check[{}].path", index)));
            continue;
        }
        check.push(ResponseCheck {
            name: c.name.filter(|n| !n.is_empty()),
            path: c.path,
            value: c.value,
        });
    }

    Some(ResponseSpec {
        kind: kind?,
        validate,
        check,
    })
}

fn convert_binding(
    raw: RawVariableBinding,
    index: usize,
    at: StepRef,
    violations: &mut Vec<CompileError>,
) -> Option<VariableBinding> {
    let before = violations.len();
    if raw.name.trim().is_empty() {
        violations.push(missing(at, format!("set_variable[{}].name", index)));
    } else if !is_identifier(&raw.name) {
        violations.push(CompileError::InvalidVariableName {
            step: at,
            name: raw.name.clone(),
        });
    }
    if raw.path.trim().is_empty() {
        violations.push(missing(at, format!("set_variable[{}].path", index)));
    }
    if !raw.from.trim().eq_ignore_ascii_case("response") {
        violations.push(CompileError::UnsupportedVariableSource {
            step: at,
            name: raw.name,
            source_kind: raw.from,
        });
        return None;
    }
    if violations.len() > before {
        return None;
    }
    Some(VariableBinding {
        name: raw.name,
        from: VariableSource::Response,
        path: raw.path,
    })
}

/// Converts key/value pairs, reporting each entry with an empty key under `field`.
fn convert_pairs(
    raw: Vec<RawKeyValue>,
    field: &str,
    at: StepRef,
    violations: &mut Vec<CompileError>,
) -> Vec<KeyValue> {
    let mut pairs = Vec::with_capacity(raw.len());
    for (index, kv) in raw.into_iter().enumerate() {
        if kv.key.trim().is_empty() {
            violations.push(missing(at, format!("{}[{}].key", field, index)));
            continue;
        }
        pairs.push(KeyValue {
            key: kv.key,
            value: kv.value,
        });
    }
    pairs
}

fn missing(at: StepRef, field: impl Into<String>) -> CompileError {
    CompileError::MissingField {
        step: at,
        field: field.into(),
    }
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
