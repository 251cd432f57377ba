//! Typed intermediate representation of a generated test script.
//!
//! Compilers build [`Script`]s out of [`Stmt`]s and [`Expr`]s. User text that
//! may carry variable placeholders is parsed into a [`Template`] once, at the
//! point where it enters the IR, so later stages resolve variables by lookup
//! instead of pattern-matching rendered text.

pub mod format;
pub mod ir;
pub mod render;
pub mod template;

pub use format::normalize;
pub use ir::*;
pub use render::{DisplayScript, Renderer};
pub use template::{Segment, Template, Token, scan};
