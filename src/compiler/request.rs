use super::context::CompilationContext;
use crate::config::Strictness;
use crate::descriptor::{AuthKind, KeyValue, RequestSpec, Step, StepRef};
use crate::error::CompileError;
use crate::script::{Expr, Stmt, Template};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Compiles a step's request into `const <result> = http.<method>(...)`.
///
/// Call shape: `http.<method>(url[, body][, params])`. A form-encoded body
/// takes the positional body slot; any other body travels in `params.body`.
pub fn compile_request(
    step: &Step,
    at: StepRef,
    ctx: &CompilationContext,
) -> Result<Stmt, CompileError> {
    let request = &step.request;
    let url = endpoint_url(request, at, ctx.settings.strictness)?;

    let form_encoded = is_form_encoded(request);
    let body = request.body.as_ref().filter(|b| !b.is_empty()).map(|map| {
        Expr::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), Expr::Str(Template::parse(&value_text(v)))))
                .collect(),
        )
    });
    let (form_body, params_body) = match body {
        Some(b) if form_encoded && request.method.has_body_argument() => (Some(b), None),
        other => (None, other),
    };

    let params = params_object(request, params_body);

    let mut args = vec![Expr::Str(url)];
    if request.method.has_body_argument() {
        match (form_body, &params) {
            (Some(body), _) => args.push(body),
            (None, Some(_)) => args.push(Expr::ident("null")),
            (None, None) => {}
        }
    }
    if let Some(params) = params {
        args.push(params);
    }

    Ok(Stmt::Const {
        name: at.result_var(),
        value: Expr::call(format!("http.{}", request.method.as_lower()), args),
    })
}

/// Fills `:name` path tokens from `params`, trims a trailing `/` and appends the query string.
fn endpoint_url(
    request: &RequestSpec,
    at: StepRef,
    strictness: Strictness,
) -> Result<Template, CompileError> {
    let filled = fill_path_tokens(&request.endpoint, &request.params, |token| {
        match strictness {
            Strictness::Strict => Err(CompileError::UnresolvedPathToken {
                step: at,
                token: token.to_string(),
            }),
            Strictness::Permissive => {
                tracing::warn!(step = %at, token, "endpoint token has no params entry, left as-is");
                Ok(())
            }
        }
    })?;

    let mut url = Template::parse(filled.trim_end_matches('/'));
    for (i, q) in request.query.iter().enumerate() {
        url.push_text(if i == 0 { "?" } else { "&" });
        url.push_text(format!("{}=", q.key));
        url.append(Template::parse(&value_text(&q.value)));
    }
    Ok(url)
}

/// Replaces every `:identifier` in `endpoint` with the value of the matching
/// param. `on_missing` decides whether an unmatched token is fatal; if it
/// returns `Ok`, the token is kept literally.
pub fn fill_path_tokens(
    endpoint: &str,
    params: &[KeyValue],
    mut on_missing: impl FnMut(&str) -> Result<(), CompileError>,
) -> Result<String, CompileError> {
    let mut out = String::with_capacity(endpoint.len());
    let mut rest = endpoint;

    while let Some(pos) = rest.find(':') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let len = after
            .char_indices()
            .take_while(|(i, c)| {
                if *i == 0 {
                    c.is_ascii_alphabetic() || *c == '_'
                } else {
                    c.is_ascii_alphanumeric() || *c == '_'
                }
            })
            .count();

        if len == 0 {
            out.push(':');
            rest = after;
            continue;
        }

        let token = &after[..len];
        match params.iter().find(|p| p.key == token) {
            Some(param) => out.push_str(&value_text(&param.value)),
            None => {
                on_missing(token)?;
                out.push(':');
                out.push_str(token);
            }
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    Ok(out)
}

fn is_form_encoded(request: &RequestSpec) -> bool {
    request.headers.iter().any(|h| {
        h.key.eq_ignore_ascii_case("content-type")
            && value_text(&h.value)
                .to_ascii_lowercase()
                .contains(FORM_URLENCODED)
    })
}

/// The request parameters object, or `None` when it would be empty.
fn params_object(request: &RequestSpec, body: Option<Expr>) -> Option<Expr> {
    let mut entries: Vec<(String, Expr)> = Vec::new();

    if let Some(mode) = request.auth.as_ref().and_then(|a| a.kind.mode_token()) {
        entries.push(("auth".to_string(), Expr::str(mode)));
    }

    let bearer = request
        .auth
        .as_ref()
        .filter(|a| a.kind == AuthKind::Bearer)
        .and_then(|a| a.data.first());
    if bearer.is_some() || !request.headers.is_empty() {
        let mut headers = Vec::with_capacity(request.headers.len() + 1);
        if let Some(field) = bearer {
            let mut value = Template::literal("Bearer ");
            value.append(Template::parse(&value_text(&field.value)));
            headers.push(("Authorization".to_string(), Expr::Str(value)));
        }
        headers.extend(pairs(&request.headers));
        entries.push(("headers".to_string(), Expr::Object(headers)));
    }

    if !request.cookies.is_empty() {
        entries.push(("cookies".to_string(), Expr::Object(pairs(&request.cookies))));
    }

    if let Some(body) = body {
        entries.push(("body".to_string(), body));
    }

    if !request.tags.is_empty() {
        let mut tags = Vec::new();
        for tag in &request.tags {
            tags.push(("name".to_string(), Expr::str(&tag.name)));
            if let Some(stage) = &tag.stage {
                tags.push(("stage".to_string(), Expr::str(stage)));
            }
        }
        entries.push(("tags".to_string(), Expr::Object(tags)));
    }

    if let Some(seconds) = request.timeout_seconds {
        entries.push((
            "timeout".to_string(),
            Expr::str(format!("{}s", format_seconds(seconds))),
        ));
    }

    (!entries.is_empty()).then_some(Expr::Object(entries))
}

fn pairs(items: &[KeyValue]) -> Vec<(String, Expr)> {
    items
        .iter()
        .map(|kv| (kv.key.clone(), Expr::Str(Template::parse(&value_text(&kv.value)))))
        .collect()
}

/// A descriptor value as plain text: strings unquoted, everything else as JSON.
pub(crate) fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Seconds without a trailing `.0` for whole numbers.
pub(crate) fn format_seconds(seconds: f64) -> String {
    if seconds.fract() == 0.0 {
        format!("{}", seconds as i64)
    } else {
        format!("{}", seconds)
    }
}
