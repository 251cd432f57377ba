use crate::config::{CompilerSettings, Strictness};
use crate::descriptor::{IntoFlow, LoadTestFlow, RawFlow};
use crate::error::CompileError;
use crate::script::Script;

pub mod assembler;
mod context;
pub mod request;
mod response;
pub mod structure;
mod variable;

pub use context::{CompilationContext, RegisteredVariable, VariableRegistry};

/// Everything a compilation produced before rendering: the script IR and the
/// variables registered while building it.
#[derive(Debug)]
pub struct CompilationArtifacts {
    pub script: Script,
    pub variables: VariableRegistry,
}

/// Compiles a [`LoadTestFlow`] into script text.
///
/// A compiler can be run any number of times; every run gets a fresh
/// [`CompilationContext`], so runs never see each other's variables.
pub struct Compiler {
    flow: LoadTestFlow,
    settings: CompilerSettings,
}

pub struct CompilerBuilder {
    flow: LoadTestFlow,
    settings: CompilerSettings,
}

impl CompilerBuilder {
    pub fn new(flow: LoadTestFlow) -> Self {
        Self {
            flow,
            settings: CompilerSettings::default(),
        }
    }
    pub fn with_settings(mut self, settings: CompilerSettings) -> Self {
        self.settings = settings;
        self
    }
    pub fn with_variable_bag(mut self, name: &str) -> Self {
        self.settings.variable_bag = name.to_string();
        self
    }
    pub fn with_summary_dir(mut self, dir: Option<&str>) -> Self {
        self.settings.summary_dir = dir.map(str::to_string);
        self
    }
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.settings.strictness = strictness;
        self
    }
    pub fn with_indent(mut self, width: usize) -> Self {
        self.settings.indent = width;
        self
    }
    pub fn build(self) -> Compiler {
        Compiler {
            flow: self.flow,
            settings: self.settings,
        }
    }
}

impl Compiler {
    pub fn builder(flow: LoadTestFlow) -> CompilerBuilder {
        CompilerBuilder::new(flow)
    }

    /// Parses and validates a JSON descriptor, returning a builder for it.
    pub fn from_json(json: &str) -> Result<CompilerBuilder, CompileError> {
        let raw = RawFlow::from_json(json)?;
        Ok(CompilerBuilder::new(raw.into_flow()?))
    }

    pub fn flow(&self) -> &LoadTestFlow {
        &self.flow
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    /// Builds the script IR without rendering it.
    ///
    /// Steps are compiled in runtime order (preconditions, item groups,
    /// postconditions) so the registry reflects the order values become available.
    pub fn compile_ir(&self) -> Result<CompilationArtifacts, CompileError> {
        let mut ctx = CompilationContext::new(&self.settings);

        let setup = structure::setup(&self.flow, &mut ctx)?;
        let main = structure::main_body(&self.flow, &mut ctx)?;
        let teardown = structure::teardown(&self.flow, &mut ctx)?;

        let script = Script {
            sections: vec![
                structure::imports(),
                structure::options(&self.flow)?,
                structure::summary(&ctx),
                setup,
                teardown,
                main,
            ],
        };

        tracing::debug!(
            sections = script.sections.len(),
            variables = ctx.registry.len(),
            "built script"
        );

        Ok(CompilationArtifacts {
            script,
            variables: ctx.registry,
        })
    }

    /// Compiles the flow into the final, normalized script text.
    pub fn compile(&self) -> Result<String, CompileError> {
        let artifacts = self.compile_ir()?;
        assembler::assemble(&artifacts.script, &artifacts.variables, &self.settings)
    }
}
