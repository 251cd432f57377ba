use super::ir::{Export, Expr, Script, Section, Stmt};
use super::template::{Segment, Template};
use itertools::Itertools;
use std::fmt::{self, Write};

/// Renders IR nodes as loosely formatted script text.
///
/// Every statement and object entry goes on its own line, but nothing is
/// indented: layout is left to [`normalize`](super::normalize).
pub struct Renderer<'a> {
    /// Name of the runtime variable bag that `Var` segments resolve into.
    pub bag: &'a str,
}

impl<'a> Renderer<'a> {
    pub fn new(bag: &'a str) -> Self {
        Self { bag }
    }

    pub fn section(&self, out: &mut String, section: &Section) -> fmt::Result {
        self.stmts(out, &section.body)
    }

    pub fn stmts(&self, out: &mut String, stmts: &[Stmt]) -> fmt::Result {
        for stmt in stmts {
            self.stmt(out, stmt)?;
        }
        Ok(())
    }

    pub fn stmt(&self, out: &mut String, stmt: &Stmt) -> fmt::Result {
        match stmt {
            Stmt::Raw(line) => out.push_str(line),
            Stmt::Const { name, value } => {
                write!(out, "const {} = ", name)?;
                self.expr(out, value)?;
            }
            Stmt::ExportConst { name, value } => {
                write!(out, "export const {} = ", name)?;
                self.expr(out, value)?;
            }
            Stmt::Assign { slot, value } => {
                write!(out, "{}.{} = ", self.bag, slot)?;
                self.expr(out, value)?;
            }
            Stmt::Expr(value) => self.expr(out, value)?,
            Stmt::Return(value) => {
                out.push_str("return ");
                self.expr(out, value)?;
            }
            Stmt::Function {
                export,
                params,
                body,
            } => {
                match export {
                    Export::Named(name) => write!(out, "export function {}", name)?,
                    Export::Default => out.push_str("export default function "),
                }
                writeln!(out, "({}) {{", params.iter().join(", "))?;
                self.stmts(out, body)?;
                out.push('}');
            }
        }
        out.push('\n');
        Ok(())
    }

    pub fn expr(&self, out: &mut String, expr: &Expr) -> fmt::Result {
        match expr {
            Expr::Str(t) => self.string_literal(out, t),
            Expr::Code(t) => {
                for segment in t.segments() {
                    match segment {
                        Segment::Text(s) => out.push_str(s),
                        Segment::Var(v) => write!(out, "{}.{}", self.bag, v)?,
                    }
                }
                Ok(())
            }
            Expr::Ident(name) => {
                out.push_str(name);
                Ok(())
            }
            Expr::Json(value) => {
                let text = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                out.push_str(&text);
                Ok(())
            }
            Expr::Object(entries) => {
                if entries.is_empty() {
                    out.push_str("{}");
                    return Ok(());
                }
                out.push_str("{\n");
                for (key, value) in entries {
                    self.key(out, key);
                    out.push_str(": ");
                    self.expr(out, value)?;
                    out.push_str(",\n");
                }
                out.push('}');
                Ok(())
            }
            Expr::Call { callee, args } => {
                write!(out, "{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.expr(out, arg)?;
                }
                out.push(')');
                Ok(())
            }
            Expr::Arrow { params, body } => {
                write!(out, "({}) => ", params.iter().join(", "))?;
                self.expr(out, body)
            }
            Expr::Function { params, body } => {
                writeln!(out, "function ({}) {{", params.iter().join(", "))?;
                self.stmts(out, body)?;
                out.push('}');
                Ok(())
            }
        }
    }

    fn key(&self, out: &mut String, key: &str) {
        if is_plain_key(key) {
            out.push_str(key);
        } else {
            quote_single(out, key);
        }
    }

    /// Plain text becomes a single-quoted literal; anything with variables
    /// becomes a template literal with `${bag.name}` interpolations.
    fn string_literal(&self, out: &mut String, t: &Template) -> fmt::Result {
        if !t.has_variables() {
            let text: String = t
                .segments()
                .iter()
                .filter_map(|s| match s {
                    Segment::Text(s) => Some(s.as_str()),
                    Segment::Var(_) => None,
                })
                .collect();
            quote_single(out, &text);
            return Ok(());
        }

        out.push('`');
        for segment in t.segments() {
            match segment {
                Segment::Text(s) => escape_into(out, s, '`'),
                Segment::Var(v) => write!(out, "${{{}.{}}}", self.bag, v)?,
            }
        }
        out.push('`');
        Ok(())
    }
}

/// Renders a whole script in text order, sections separated by a blank line.
pub struct DisplayScript<'a> {
    pub script: &'a Script,
    pub bag: &'a str,
}

impl fmt::Display for DisplayScript<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let renderer = Renderer::new(self.bag);
        let mut out = String::new();
        for section in self.script.in_text_order() {
            renderer.section(&mut out, section)?;
            out.push('\n');
        }
        f.write_str(&out)
    }
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn quote_single(out: &mut String, text: &str) {
    out.push('\'');
    escape_into(out, text, '\'');
    out.push('\'');
}

fn escape_into(out: &mut String, text: &str, quote: char) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' if quote == '`' => out.push_str("\\$"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
}
