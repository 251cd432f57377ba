use crate::descriptor::StepRef;
use itertools::Itertools;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while validating a descriptor or compiling it into a script.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Failed to parse flow descriptor JSON: {0}")]
    JsonParseError(String),

    #[error("Unsupported flow kind '{0}', only 'load_testing' can be compiled")]
    UnsupportedFlowKind(String),

    #[error("Step {step} uses unsupported method '{method}'")]
    UnsupportedMethod { step: StepRef, method: String },

    #[error("Step {step} has unsupported kind '{kind}', only 'api' steps can be compiled")]
    UnsupportedStepKind { step: StepRef, kind: String },

    #[error("Step {step} has unsupported auth kind '{kind}'")]
    UnsupportedAuthKind { step: StepRef, kind: String },

    #[error("Step {step} has unsupported response kind '{kind}'")]
    UnsupportedResponseKind { step: StepRef, kind: String },

    #[error("Step {step} binds variable '{name}' from unsupported source '{source_kind}'")]
    UnsupportedVariableSource {
        step: StepRef,
        name: String,
        source_kind: String,
    },

    #[error("Step {step} binds variable '{name}', which is not a valid identifier")]
    InvalidVariableName { step: StepRef, name: String },

    #[error("Step {step} is missing required field '{field}'")]
    MissingField { step: StepRef, field: String },

    #[error("Step {step} endpoint token ':{token}' has no matching params entry")]
    UnresolvedPathToken { step: StepRef, token: String },

    #[error("Variable '{name}' is used where no earlier step has made it available")]
    UnresolvedVariable { name: String },

    #[error("Descriptor has {} violations: {}", .0.len(), .0.iter().join("; "))]
    InvalidDescriptor(Vec<CompileError>),
}

impl CompileError {
    /// Flattens an aggregated error into its individual violations.
    pub fn violations(&self) -> Vec<&CompileError> {
        match self {
            CompileError::InvalidDescriptor(all) => all.iter().collect(),
            other => vec![other],
        }
    }

    /// Collapses a list of violations: one becomes itself, several are aggregated.
    pub(crate) fn from_violations(mut violations: Vec<CompileError>) -> Option<CompileError> {
        match violations.len() {
            0 => None,
            1 => violations.pop(),
            _ => Some(CompileError::InvalidDescriptor(violations)),
        }
    }
}

impl From<serde_json::Error> for CompileError {
    fn from(e: serde_json::Error) -> Self {
        CompileError::JsonParseError(e.to_string())
    }
}

/// Errors raised while persisting a generated script or its companion assets.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Could not create directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not write script '{}': {source}", .path.display())]
    WriteScript {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not copy assets from '{}' to '{}': {source}", .from.display(), .to.display())]
    CopyAssets {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level error of [`generate`](crate::generate).
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("Output failed: {0}")]
    Output(#[from] OutputError),
}
