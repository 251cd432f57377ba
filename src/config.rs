//! Default settings shared by the compiler, the output writer and the CLI.

/// Name of the runtime object that carries values between steps.
pub const DEFAULT_VARIABLE_BAG: &str = "variables";

/// Directory the runtime writes its machine-readable summary into.
pub const DEFAULT_SUMMARY_DIR: &str = "/k6-script";

pub const SUMMARY_FILE: &str = "summary.json";

/// Where generated scripts land, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "script";

pub const SCRIPT_FILE: &str = "index.js";

pub const DEFAULT_INDENT: usize = 2;

/// Remote module providing the console summary renderer.
pub const TEXT_SUMMARY_MODULE: &str = "https://jslib.k6.io/k6-summary/0.0.1/index.js";

/// How unresolved references are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Unmatched path tokens stay literal and unknown variables still become
    /// bag lookups; both are logged as warnings.
    #[default]
    Permissive,
    /// Unmatched path tokens and unknown variables fail the compilation.
    Strict,
}

/// Settings for one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerSettings {
    pub variable_bag: String,
    /// `None` writes the summary next to wherever the runtime is started.
    pub summary_dir: Option<String>,
    pub strictness: Strictness,
    pub indent: usize,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            variable_bag: DEFAULT_VARIABLE_BAG.to_string(),
            summary_dir: Some(DEFAULT_SUMMARY_DIR.to_string()),
            strictness: Strictness::default(),
            indent: DEFAULT_INDENT,
        }
    }
}

impl CompilerSettings {
    /// Path of the summary artifact as seen by the runtime.
    pub fn summary_path(&self) -> String {
        match self.summary_dir.as_deref().map(|d| d.trim_end_matches('/')) {
            Some(dir) if !dir.is_empty() => format!("{}/{}", dir, SUMMARY_FILE),
            _ => SUMMARY_FILE.to_string(),
        }
    }
}
