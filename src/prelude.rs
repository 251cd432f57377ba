//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the loadsmith crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use loadsmith::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/flow.json")?;
//! let script = Compiler::from_json(&json)?.build().compile()?;
//! println!("{}", script);
//! # Ok(())
//! # }
//! ```

// Compilation
pub use crate::compiler::{CompilationArtifacts, Compiler, CompilerBuilder};
pub use crate::config::{CompilerSettings, Strictness};

// Descriptor model
pub use crate::descriptor::{
    Group, IntoFlow, LoadTestFlow, Method, RawFlow, RequestSpec, ResponseSpec, Step, StepRef,
    VariableBinding,
};

// Script IR
pub use crate::script::{Script, SectionKind, Template};

// Errors
pub use crate::error::{CompileError, GenerateError, OutputError};

// Output
pub use crate::{GenerateOptions, generate};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
