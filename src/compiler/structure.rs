//! The six fixed-order emitters that make up a script.
//!
//! Each emitter is a pure function of the flow (plus the compilation context
//! for the ones that compile steps) and returns one [`Section`].

use super::context::CompilationContext;
use super::request::{compile_request, format_seconds};
use super::response::compile_checks;
use super::variable::register_bindings;
use crate::config::TEXT_SUMMARY_MODULE;
use crate::descriptor::{LoadTestFlow, Step, StepRef};
use crate::error::CompileError;
use crate::script::{Export, Expr, Section, SectionKind, Stmt, Template};

/// Compiles one step: request, then checks, then variable bindings, then sleep.
pub fn compile_step(
    step: &Step,
    at: StepRef,
    ctx: &mut CompilationContext,
) -> Result<Vec<Stmt>, CompileError> {
    let result_var = at.result_var();
    let mut stmts = vec![compile_request(step, at, ctx)?];
    stmts.extend(compile_checks(step, &result_var));
    stmts.extend(register_bindings(step, at, ctx));
    if let Some(seconds) = step.sleep_seconds {
        stmts.push(Stmt::Expr(Expr::call(
            "k6.sleep",
            vec![Expr::ident(format_seconds(seconds))],
        )));
    }

    tracing::debug!(step = %at, method = %step.request.method, statements = stmts.len(), "compiled step");
    Ok(stmts)
}

pub fn imports() -> Section {
    Section::new(
        SectionKind::Imports,
        vec![
            Stmt::Raw("import k6 from 'k6'".to_string()),
            Stmt::Raw("import http from 'k6/http'".to_string()),
            Stmt::Raw(format!(
                "import {{ textSummary }} from '{}'",
                TEXT_SUMMARY_MODULE
            )),
        ],
    )
}

/// `export const options = {...}`, serialized straight from the descriptor.
pub fn options(flow: &LoadTestFlow) -> Result<Section, CompileError> {
    let value = serde_json::to_value(&flow.options)?;
    Ok(Section::new(
        SectionKind::Options,
        vec![Stmt::ExportConst {
            name: "options".to_string(),
            value: Expr::Json(value),
        }],
    ))
}

/// `handleSummary`: a JSON artifact at the configured path plus a console summary.
pub fn summary(ctx: &CompilationContext) -> Section {
    let data = || Expr::ident("data");
    let report = Expr::Object(vec![
        (
            ctx.settings.summary_path(),
            Expr::call("JSON.stringify", vec![data()]),
        ),
        (
            "stdout".to_string(),
            Expr::call(
                "textSummary",
                vec![
                    data(),
                    Expr::Object(vec![
                        ("indent".to_string(), Expr::str(" ")),
                        ("enableColors".to_string(), Expr::ident("true")),
                    ]),
                ],
            ),
        ),
    ]);

    Section::new(
        SectionKind::Summary,
        vec![Stmt::Function {
            export: Export::Named("handleSummary".to_string()),
            params: vec!["data".to_string()],
            body: vec![Stmt::Return(report)],
        }],
    )
}

/// `setup()`: runs the preconditions, fills the variable bag and returns it.
pub fn setup(flow: &LoadTestFlow, ctx: &mut CompilationContext) -> Result<Section, CompileError> {
    let bag = ctx.settings.variable_bag.clone();
    let mut body = vec![
        log_line("[Setup]: Starting test execution"),
        Stmt::Const {
            name: bag.clone(),
            value: Expr::Object(Vec::new()),
        },
    ];
    for (index, step) in flow.precondition.iter().enumerate() {
        body.extend(compile_step(step, StepRef::Precondition(index), ctx)?);
    }
    body.push(Stmt::Return(Expr::Ident(bag)));

    Ok(Section::new(
        SectionKind::Setup,
        vec![Stmt::Function {
            export: Export::Named("setup".to_string()),
            params: Vec::new(),
            body,
        }],
    ))
}

/// `teardown(bag)`: runs the postconditions against the bag returned by setup.
pub fn teardown(
    flow: &LoadTestFlow,
    ctx: &mut CompilationContext,
) -> Result<Section, CompileError> {
    let mut body = Vec::new();
    for (index, step) in flow.postcondition.iter().enumerate() {
        body.extend(compile_step(step, StepRef::Postcondition(index), ctx)?);
    }
    body.push(log_line("[Teardown]: Test execution completed"));

    Ok(Section::new(
        SectionKind::Teardown,
        vec![Stmt::Function {
            export: Export::Named("teardown".to_string()),
            params: vec![ctx.settings.variable_bag.clone()],
            body,
        }],
    ))
}

/// The default function: one `k6.group` per item group, steps inside in order.
///
/// Group names are not checked for duplicates; a missing name becomes `group-<index>`.
pub fn main_body(
    flow: &LoadTestFlow,
    ctx: &mut CompilationContext,
) -> Result<Section, CompileError> {
    let mut body = Vec::with_capacity(flow.items.len());
    for (group_index, group) in flow.items.iter().enumerate() {
        let name = group
            .name
            .clone()
            .unwrap_or_else(|| format!("group-{}", group_index));

        let mut group_body = Vec::new();
        for (step_index, step) in group.steps.iter().enumerate() {
            let at = StepRef::Item {
                group: group_index,
                step: step_index,
            };
            group_body.extend(compile_step(step, at, ctx)?);
        }

        tracing::debug!(group = %name, steps = group.steps.len(), "compiled group");
        body.push(Stmt::Expr(Expr::call(
            "k6.group",
            vec![
                Expr::Str(Template::literal(name)),
                Expr::Function {
                    params: Vec::new(),
                    body: group_body,
                },
            ],
        )));
    }

    Ok(Section::new(
        SectionKind::Main,
        vec![Stmt::Function {
            export: Export::Default,
            params: vec![ctx.settings.variable_bag.clone()],
            body,
        }],
    ))
}

fn log_line(message: &str) -> Stmt {
    Stmt::Expr(Expr::call("console.info", vec![Expr::str(message)]))
}
