use super::context::CompilationContext;
use crate::descriptor::{Step, StepRef, VariableSource};
use crate::script::{Expr, Stmt, Template, Token, scan};

/// Emits one bag assignment per binding of `step` and records each binding in
/// the context's registry, in declaration order.
pub fn register_bindings(step: &Step, at: StepRef, ctx: &mut CompilationContext) -> Vec<Stmt> {
    let result_var = at.result_var();
    let mut stmts = Vec::with_capacity(step.set_variable.len());

    for binding in &step.set_variable {
        match binding.from {
            VariableSource::Response => {
                stmts.push(Stmt::Assign {
                    slot: binding.name.clone(),
                    value: Expr::Code(extraction(&result_var, &binding.path)),
                });
                ctx.registry.register(&binding.name, at, &binding.path);
                tracing::debug!(step = %at, name = %binding.name, path = %binding.path, "registered variable");
            }
        }
    }
    stmts
}

/// Builds `<result><path>`. A leading `$` in the path stands for the result;
/// otherwise the path is appended to it.
fn extraction(result_var: &str, path: &str) -> Template {
    let path = path.trim();
    let tokens = scan(path);
    let mut expr = Template::default();

    if tokens.first() != Some(&Token::Bare) {
        expr.push_text(result_var);
        if !path.starts_with(['.', '[']) && !path.is_empty() {
            expr.push_text(".");
        }
    }
    for token in tokens {
        match token {
            Token::Text(s) => expr.push_text(s),
            Token::Bare => expr.push_text(result_var),
            Token::Var(name) => expr.push_var(name),
        }
    }
    expr
}
