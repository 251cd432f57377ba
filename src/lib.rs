//! # Loadsmith - Load-Test Flow Compiler
//!
//! **Loadsmith** compiles declarative load-test flow descriptors into test
//! scripts for the k6 runtime. A descriptor lists request groups, steps,
//! pre/postconditions and execution options; the compiler turns it into one
//! coherent script with setup, teardown, a grouped main body and a summary
//! handler.
//!
//! ## Core Workflow
//!
//! 1.  **Load a Descriptor**: Parse JSON into a [`RawFlow`](descriptor::RawFlow).
//! 2.  **Validate**: Convert it with [`IntoFlow`](descriptor::IntoFlow). Every
//!     violation in the descriptor is reported at once, before any output exists.
//! 3.  **Compile**: Use `Compiler::builder` to configure and build a compiler,
//!     then call `compile` to get the script text.
//! 4.  **Write**: Hand the text to [`output::write_script`] or use [`generate`]
//!     to compile, copy companion assets and write in one go.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use loadsmith::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let json = std::fs::read_to_string("flow.json")?;
//!     let flow = RawFlow::from_json(&json)?.into_flow()?;
//!
//!     let compiler = Compiler::builder(flow)
//!         .with_summary_dir(Some("/k6-script"))
//!         .with_strictness(Strictness::Strict)
//!         .build();
//!
//!     let script = compiler.compile()?;
//!     std::fs::write("index.js", script)?;
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod output;
pub mod prelude;
pub mod script;

use crate::compiler::Compiler;
use crate::config::{CompilerSettings, DEFAULT_OUTPUT_DIR, SCRIPT_FILE};
use crate::descriptor::IntoFlow;
use crate::error::GenerateError;
use std::path::PathBuf;

/// Where [`generate`] puts its results.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub out_dir: PathBuf,
    pub script_file: String,
    /// Directory copied verbatim into `out_dir`, if any.
    pub assets: Option<PathBuf>,
    pub settings: CompilerSettings,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            script_file: SCRIPT_FILE.to_string(),
            assets: None,
            settings: CompilerSettings::default(),
        }
    }
}

/// Compiles `flow`, copies the asset directory and writes the script.
///
/// Compilation errors abort before anything touches the filesystem. A failed
/// asset copy is logged and skipped; a failed script write is returned.
pub fn generate(flow: impl IntoFlow, options: &GenerateOptions) -> Result<PathBuf, GenerateError> {
    let flow = flow.into_flow()?;
    let script = Compiler::builder(flow)
        .with_settings(options.settings.clone())
        .build()
        .compile()?;

    if let Some(assets) = &options.assets {
        let target = match assets.file_name() {
            Some(name) => options.out_dir.join(name),
            None => options.out_dir.join("assets"),
        };
        if let Err(e) = output::copy_assets(assets, &target) {
            tracing::warn!(error = %e, "asset copy failed, continuing without assets");
        }
    }

    let path = output::write_script(&options.out_dir, &options.script_file, &script)?;
    tracing::info!(path = %path.display(), bytes = script.len(), "script generated");
    Ok(path)
}
