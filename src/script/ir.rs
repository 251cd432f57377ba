use super::template::Template;

/// An expression of the generated script.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A string literal; variables are interpolated.
    Str(Template),
    /// A code fragment; variables become plain bag lookups.
    Code(Template),
    Ident(String),
    /// Structured data rendered as JSON, which the runtime reads as an object literal.
    Json(serde_json::Value),
    Object(Vec<(String, Expr)>),
    Call {
        callee: String,
        args: Vec<Expr>,
    },
    Arrow {
        params: Vec<String>,
        body: Box<Expr>,
    },
    /// An anonymous `function (...) { ... }` expression.
    Function {
        params: Vec<String>,
        body: Vec<Stmt>,
    },
}

impl Expr {
    pub fn str(text: impl Into<String>) -> Self {
        Expr::Str(Template::literal(text))
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn call(callee: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: callee.into(),
            args,
        }
    }
}

/// How a top-level function is exposed to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Export {
    Named(String),
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Fixed boilerplate emitted as-is.
    Raw(String),
    Const {
        name: String,
        value: Expr,
    },
    ExportConst {
        name: String,
        value: Expr,
    },
    /// `<bag>.<slot> = value`
    Assign {
        slot: String,
        value: Expr,
    },
    Expr(Expr),
    Return(Expr),
    Function {
        export: Export,
        params: Vec<String>,
        body: Vec<Stmt>,
    },
}

/// The six top-level sections, declared in the order they appear in the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKind {
    Imports,
    Options,
    Summary,
    Setup,
    Teardown,
    Main,
}

impl SectionKind {
    /// The order in which the runtime executes the sections' code.
    pub const RUNTIME_ORDER: [SectionKind; 6] = [
        SectionKind::Imports,
        SectionKind::Options,
        SectionKind::Summary,
        SectionKind::Setup,
        SectionKind::Main,
        SectionKind::Teardown,
    ];

    /// Sections whose bag assignments are visible to code running in this one.
    ///
    /// Only the bag returned by `setup` is handed on; assignments made in the
    /// default function stay with each virtual user.
    pub fn inherits_from(self) -> &'static [SectionKind] {
        match self {
            SectionKind::Main | SectionKind::Teardown => &[SectionKind::Setup],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub body: Vec<Stmt>,
}

impl Section {
    pub fn new(kind: SectionKind, body: Vec<Stmt>) -> Self {
        Self { kind, body }
    }
}

/// A variable-related event met while walking the script in runtime order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarEvent<'a> {
    Used(&'a str),
    Assigned(&'a str),
}

/// A whole script as a list of sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub sections: Vec<Section>,
}

impl Script {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Sections sorted into their textual order.
    pub fn in_text_order(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.kind);
        sections
    }

    /// Visits every variable use and bag assignment in the order the runtime
    /// would execute them, tagged with the section they occur in.
    pub fn walk_vars<'a>(&'a self, visit: &mut impl FnMut(SectionKind, VarEvent<'a>)) {
        for kind in SectionKind::RUNTIME_ORDER {
            if let Some(section) = self.section(kind) {
                walk_stmts(&section.body, &mut |event| visit(kind, event));
            }
        }
    }
}

fn walk_stmts<'a>(stmts: &'a [Stmt], visit: &mut impl FnMut(VarEvent<'a>)) {
    for stmt in stmts {
        match stmt {
            Stmt::Raw(_) => {}
            Stmt::Const { value, .. }
            | Stmt::ExportConst { value, .. }
            | Stmt::Expr(value)
            | Stmt::Return(value) => walk_expr(value, visit),
            Stmt::Assign { slot, value } => {
                walk_expr(value, visit);
                visit(VarEvent::Assigned(slot));
            }
            Stmt::Function { body, .. } => walk_stmts(body, visit),
        }
    }
}

fn walk_expr<'a>(expr: &'a Expr, visit: &mut impl FnMut(VarEvent<'a>)) {
    match expr {
        Expr::Str(t) | Expr::Code(t) => {
            for name in t.variables() {
                visit(VarEvent::Used(name));
            }
        }
        Expr::Ident(_) | Expr::Json(_) => {}
        Expr::Object(entries) => {
            for (_, value) in entries {
                walk_expr(value, visit);
            }
        }
        Expr::Call { args, .. } => {
            for arg in args {
                walk_expr(arg, visit);
            }
        }
        Expr::Arrow { body, .. } => walk_expr(body, visit),
        Expr::Function { body, .. } => walk_stmts(body, visit),
    }
}
