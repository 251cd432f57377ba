use super::context::VariableRegistry;
use crate::config::{CompilerSettings, Strictness};
use crate::error::CompileError;
use crate::script::{DisplayScript, Script, SectionKind, VarEvent, normalize};
use ahash::{AHashMap, AHashSet};

/// Resolves every variable reference in `script`, renders the sections in
/// their fixed order and normalizes the layout.
pub fn assemble(
    script: &Script,
    registry: &VariableRegistry,
    settings: &CompilerSettings,
) -> Result<String, CompileError> {
    resolve_variables(script, registry, settings.strictness)?;

    let text = DisplayScript {
        script,
        bag: &settings.variable_bag,
    }
    .to_string();

    Ok(normalize(&text, settings.indent))
}

/// Walks the script in runtime order and checks that each variable is
/// assigned before it is read, in a section whose bag reaches the read.
///
/// Permissive mode only warns, since the reference still renders as a bag
/// lookup that is undefined at runtime. Strict mode fails on the first one.
pub fn resolve_variables(
    script: &Script,
    registry: &VariableRegistry,
    strictness: Strictness,
) -> Result<(), CompileError> {
    let mut assigned: AHashMap<SectionKind, AHashSet<&str>> = AHashMap::new();
    let mut unresolved: Vec<(SectionKind, &str)> = Vec::new();

    script.walk_vars(&mut |section, event| match event {
        VarEvent::Assigned(name) => {
            assigned.entry(section).or_default().insert(name);
        }
        VarEvent::Used(name) => {
            let visible = std::iter::once(section)
                .chain(section.inherits_from().iter().copied())
                .any(|scope| assigned.get(&scope).is_some_and(|names| names.contains(name)));
            if !visible {
                unresolved.push((section, name));
            }
        }
    });

    for (section, name) in unresolved {
        if strictness == Strictness::Strict {
            return Err(CompileError::UnresolvedVariable {
                name: name.to_string(),
            });
        }
        match registry.get(name) {
            Some(entry) => tracing::warn!(
                variable = name,
                section = ?section,
                producer = %entry.producer,
                "variable is read where its registering step's value is not available"
            ),
            None => tracing::warn!(variable = name, "variable is never registered by any step"),
        }
    }
    Ok(())
}
