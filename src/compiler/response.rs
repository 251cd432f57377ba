use crate::descriptor::{ResponseCheck, Step};
use crate::script::{Expr, Stmt, Template, Token, scan};

/// Parameter name of the arrow function each check is evaluated with.
const CHECK_PARAM: &str = "r";
/// Placeholder standing for the check's expected value.
const EXPECTED_VALUE: &str = "value";

/// Compiles the step's response checks into one `k6.check(<result>, {...})`
/// statement, or `None` if the step declares no checks.
pub fn compile_checks(step: &Step, result_var: &str) -> Option<Stmt> {
    let checks = step.response.as_ref().map(|r| r.check.as_slice())?;
    if checks.is_empty() {
        return None;
    }

    let assertions = checks
        .iter()
        .map(|check| {
            (
                check.label().to_string(),
                Expr::Arrow {
                    params: vec![CHECK_PARAM.to_string()],
                    body: Box::new(Expr::Code(check_expression(check))),
                },
            )
        })
        .collect();

    Some(Stmt::Expr(Expr::call(
        "k6.check",
        vec![Expr::ident(result_var), Expr::Object(assertions)],
    )))
}

/// Expands a check path such as `$.status === $value`: a bare `$` becomes the
/// result parameter, `$value` becomes the expected value as a literal and any
/// other placeholder stays a variable reference.
fn check_expression(check: &ResponseCheck) -> Template {
    let path = check.path.as_deref().unwrap_or_default();
    let mut expr = Template::default();
    for token in scan(path) {
        match token {
            Token::Text(s) => expr.push_text(s),
            Token::Bare => expr.push_text(CHECK_PARAM),
            Token::Var(EXPECTED_VALUE) => expr.push_text(check.value.to_string()),
            Token::Var(name) => expr.push_var(name),
        }
    }
    expr
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(name: Option<&str>, path: &str, value: serde_json::Value) -> ResponseCheck {
        ResponseCheck {
            name: name.map(str::to_string),
            path: Some(path.to_string()),
            value,
        }
    }

    #[test]
    fn substitutes_result_and_expected_value() {
        let c = check(Some("status is 200"), "$.status === $value", json!(200));
        assert_eq!(check_expression(&c).to_string(), "r.status === 200");
    }

    #[test]
    fn string_values_are_quoted_and_variables_kept() {
        let c = check(None, "$.json().id === $value && $.json().owner === $user", json!("abc"));
        let expr = check_expression(&c);
        assert_eq!(expr.to_string(), "r.json().id === \"abc\" && r.json().owner === ${user}");
        assert_eq!(expr.variables().collect::<Vec<_>>(), vec!["user"]);
        assert_eq!(c.label(), "$.json().id === $value && $.json().owner === $user");
    }
}
