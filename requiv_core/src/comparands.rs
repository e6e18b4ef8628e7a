use crate::options::EquivalencyOptions;
use requiv_common::{Value, ValueType};

/// The (subject, expectation) pair at one node of the graph
#[derive(Debug, Clone)]
pub struct Comparands {
    pub subject: Value,
    pub expectation: Value,
    /// Type the expectation was declared as by its parent (or the caller)
    pub compile_time_type: ValueType,
}

impl Comparands {
    pub fn new(subject: impl Into<Value>, expectation: impl Into<Value>, compile_time_type: ValueType) -> Self {
        Self {
            subject: subject.into(),
            expectation: expectation.into(),
            compile_time_type,
        }
    }

    /// Declares the expectation with its own runtime type, the way a
    /// caller passing a concretely typed value would.
    pub fn inferred(subject: impl Into<Value>, expectation: impl Into<Value>) -> Self {
        let expectation = expectation.into();
        let compile_time_type = ValueType::of(&expectation).unwrap_or(ValueType::Any);
        Self::new(subject, expectation, compile_time_type)
    }

    /// Runtime type of the expectation, falling back to the subject's and
    /// finally to `Any` when both sides are null.
    pub fn runtime_type(&self) -> ValueType {
        ValueType::of(&self.expectation)
            .or_else(|| ValueType::of(&self.subject))
            .unwrap_or(ValueType::Any)
    }

    pub fn subject_runtime_type(&self) -> Option<ValueType> {
        ValueType::of(&self.subject)
    }

    /// The type steps dispatch on under the active options
    pub fn expected_type(&self, options: &EquivalencyOptions) -> ValueType {
        if options.use_runtime_types() {
            self.runtime_type()
        } else {
            self.compile_time_type.clone()
        }
    }
}
