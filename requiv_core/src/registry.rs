use crate::steps::{
    EquivalencyStep, ReferenceEqualityStep, SequenceEquivalencyStep, SimpleEqualityStep,
    StringEqualityStep, StructuralEqualityStep,
};
use tracing::debug;

/// Ordered list of steps; the first step that handles a node wins
pub struct StepRegistry {
    steps: Vec<Box<dyn EquivalencyStep>>,
}

impl StepRegistry {
    /// A registry without any steps
    pub fn empty() -> Self {
        Self { steps: Vec::new() }
    }

    /// The built-in steps, most specific first and the shallow-equality
    /// fallback last
    pub fn with_defaults() -> Self {
        Self {
            steps: vec![
                Box::new(ReferenceEqualityStep),
                Box::new(StringEqualityStep),
                Box::new(SequenceEquivalencyStep),
                Box::new(StructuralEqualityStep),
                Box::new(SimpleEqualityStep),
            ],
        }
    }

    /// Run `step` before every registered step
    pub fn prepend(&mut self, step: impl EquivalencyStep + 'static) -> &mut Self {
        debug!("Prepending step {}", step.name());
        self.steps.insert(0, Box::new(step));
        self
    }

    pub fn append(&mut self, step: impl EquivalencyStep + 'static) -> &mut Self {
        debug!("Appending step {}", step.name());
        self.steps.push(Box::new(step));
        self
    }

    /// Insert `step` right before the step called `anchor`.
    /// Returns false, leaving the registry untouched, if no step has that name.
    pub fn insert_before(&mut self, anchor: &str, step: impl EquivalencyStep + 'static) -> bool {
        match self.position(anchor) {
            Some(index) => {
                debug!("Inserting step {} before {}", step.name(), anchor);
                self.steps.insert(index, Box::new(step));
                true
            }
            None => false,
        }
    }

    /// Remove the step called `name`; returns whether one was removed
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.steps.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn EquivalencyStep> {
        self.steps.iter().map(|step| step.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.steps.iter().position(|step| step.name() == name)
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
