use crate::config::CompilerSettings;
use crate::descriptor::StepRef;
use ahash::AHashMap;

/// A named value extracted from a step's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredVariable {
    pub name: String,
    pub producer: StepRef,
    pub path: String,
}

/// Bindings in the order their producing steps were compiled.
#[derive(Debug, Default)]
pub struct VariableRegistry {
    entries: Vec<RegisteredVariable>,
    by_name: AHashMap<String, usize>,
}

impl VariableRegistry {
    pub fn register(&mut self, name: &str, producer: StepRef, path: &str) {
        self.by_name
            .entry(name.to_string())
            .or_insert(self.entries.len());
        self.entries.push(RegisteredVariable {
            name: name.to_string(),
            producer,
            path: path.to_string(),
        });
    }

    /// The first registration of `name`.
    pub fn get(&self, name: &str) -> Option<&RegisteredVariable> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn entries(&self) -> &[RegisteredVariable] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// State owned by a single compilation and dropped when it finishes.
#[derive(Debug)]
pub struct CompilationContext<'s> {
    pub settings: &'s CompilerSettings,
    pub registry: VariableRegistry,
}

impl<'s> CompilationContext<'s> {
    pub fn new(settings: &'s CompilerSettings) -> Self {
        Self {
            settings,
            registry: VariableRegistry::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_registration_order_and_first_producer() {
        let mut registry = VariableRegistry::default();
        registry.register("token", StepRef::Precondition(0), ".json().access_token");
        registry.register("user", StepRef::Item { group: 0, step: 1 }, ".json().id");
        registry.register("token", StepRef::Item { group: 1, step: 0 }, ".json().refresh");

        let names: Vec<_> = registry.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["token", "user", "token"]);
        assert_eq!(registry.get("token").unwrap().producer, StepRef::Precondition(0));
        assert!(!registry.contains("missing"));
        assert_eq!(registry.len(), 3);
    }
}
