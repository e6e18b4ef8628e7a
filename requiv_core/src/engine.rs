use crate::chain::AssertionChain;
use crate::comparands::Comparands;
use crate::members::{DeclaredMembers, MemberEnumerator};
use crate::node::{Node, DEFAULT_ROOT_IDENTIFIER};
use crate::options::EquivalencyOptions;
use crate::registry::StepRegistry;
use crate::validator::{ChildValidator, EquivalencyValidator};
use requiv_common::{EquivalencyError, Value};
use serde::Serialize;
use std::fmt::Display;
use tracing::{debug, info};

/// Outcome of one equivalency check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquivalencyReport {
    pub succeeded: bool,
    /// Every failure, with fully qualified paths, in traversal order
    pub failures: Vec<String>,
}

impl EquivalencyReport {
    pub fn from_chain(chain: &AssertionChain) -> Self {
        Self {
            succeeded: chain.succeeded(),
            failures: chain.failures(),
        }
    }

    /// All failures joined by newlines
    pub fn message(&self) -> String {
        self.failures.join("\n")
    }
}

/// Structural equivalency engine
pub struct Equivalency {
    registry: StepRegistry,
    members: Box<dyn MemberEnumerator>,
    identifier: String,
}

impl Equivalency {
    pub fn new() -> Self {
        Self {
            registry: StepRegistry::with_defaults(),
            members: Box::new(DeclaredMembers),
            identifier: DEFAULT_ROOT_IDENTIFIER.to_string(),
        }
    }

    pub fn with_registry(mut self, registry: StepRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_member_enumerator(mut self, members: impl MemberEnumerator + 'static) -> Self {
        self.members = Box::new(members);
        self
    }

    /// Name used for the root in failure messages (default "subject")
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StepRegistry {
        &mut self.registry
    }

    /// Check that `subject` is equivalent to `expectation`, declaring the
    /// expectation with its own runtime type.
    pub fn check(
        &self,
        subject: &Value,
        expectation: &Value,
        options: &EquivalencyOptions,
    ) -> Result<EquivalencyReport, EquivalencyError> {
        self.check_because(subject, expectation, options, "", &[])
    }

    /// Like [`check`](Self::check), with a reason substituted into every failure
    pub fn check_because(
        &self,
        subject: &Value,
        expectation: &Value,
        options: &EquivalencyOptions,
        because: &str,
        because_args: &[&dyn Display],
    ) -> Result<EquivalencyReport, EquivalencyError> {
        let comparands = Comparands::inferred(subject.clone(), expectation.clone());
        let mut chain = AssertionChain::new();
        chain.because_of(because, because_args);

        self.evaluate(&comparands, options, &mut chain)?;
        Ok(EquivalencyReport::from_chain(&chain))
    }

    /// Like [`check`](Self::check), but a failed check becomes
    /// [`EquivalencyError::NotEquivalent`] carrying every failure message.
    pub fn assert(
        &self,
        subject: &Value,
        expectation: &Value,
        options: &EquivalencyOptions,
    ) -> Result<(), EquivalencyError> {
        let report = self.check(subject, expectation, options)?;
        if report.succeeded {
            Ok(())
        } else {
            Err(EquivalencyError::NotEquivalent(report.message()))
        }
    }

    /// Run the pipeline for `comparands` as one logical assertion on `chain`
    pub fn evaluate(
        &self,
        comparands: &Comparands,
        options: &EquivalencyOptions,
        chain: &mut AssertionChain,
    ) -> Result<(), EquivalencyError> {
        info!(
            "Checking equivalency of {} against {}",
            self.identifier,
            comparands.compile_time_type
        );

        chain.begin_assertion();
        let failures_before = chain.failure_count();
        let root = Node::root(self.identifier.clone(), comparands.compile_time_type.clone());
        let mut validator = EquivalencyValidator::new(&self.registry, self.members.as_ref());
        validator.validate(comparands, root, options, chain)?;

        debug!(
            "Equivalency check of {} recorded {} failure(s)",
            self.identifier,
            chain.failure_count() - failures_before
        );
        Ok(())
    }
}

impl Default for Equivalency {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EquivalencyContext;
    use crate::steps::{EquivalencyResult, EquivalencyStep};
    use requiv_common::{RecordRef, ValueType};

    fn address(city: &str) -> RecordRef {
        RecordRef::new("Address")
            .with_member("Street", ValueType::String, "Main St")
            .with_member("City", ValueType::String, city)
    }

    fn customer(name: &str, city: &str) -> Value {
        Value::from(
            RecordRef::new("Customer")
                .with_member("Name", ValueType::String, name)
                .with_member("Address", ValueType::record("Address"), address(city)),
        )
    }

    #[test]
    fn test_equivalent_graphs() {
        let report = Equivalency::new()
            .check(&customer("Ann", "Paris"), &customer("Ann", "Paris"), &EquivalencyOptions::default())
            .unwrap();
        assert!(report.succeeded);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_failure_has_qualified_path() {
        let report = Equivalency::new()
            .check(&customer("Ann", "Lyon"), &customer("Ann", "Paris"), &EquivalencyOptions::default())
            .unwrap();
        assert!(!report.succeeded);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].starts_with("Expected subject.Address.City to be \"Paris\""));
    }

    #[test]
    fn test_failures_aggregate_across_branches() {
        let report = Equivalency::new()
            .check(&customer("Bob", "Lyon"), &customer("Ann", "Paris"), &EquivalencyOptions::default())
            .unwrap();
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures[0].contains("subject.Name"));
        assert!(report.failures[1].contains("subject.Address.City"));
    }

    #[test]
    fn test_one_logical_assertion_per_check() {
        let engine = Equivalency::new();
        let comparands = Comparands::inferred(customer("Bob", "Lyon"), customer("Ann", "Paris"));
        let mut chain = AssertionChain::new();
        engine
            .evaluate(&comparands, &EquivalencyOptions::default(), &mut chain)
            .unwrap();
        assert_eq!(chain.assertion_count(), 1);
        assert_eq!(chain.failure_count(), 2);
    }

    #[test]
    fn test_reason_and_identifier() {
        let report = Equivalency::new()
            .with_identifier("order")
            .check_because(
                &Value::from("a"),
                &Value::from("b"),
                &EquivalencyOptions::default(),
                "{0} must match",
                &[&"codes"],
            )
            .unwrap();
        assert_eq!(
            report.failures,
            vec!["Expected order to be \"b\" because codes must match, but \"a\" differs near \"a\" (index 0).".to_string()]
        );
    }

    #[test]
    fn test_assert_returns_not_equivalent() {
        let err = Equivalency::new()
            .assert(&Value::from(1), &Value::from(2), &EquivalencyOptions::default())
            .unwrap_err();
        match err {
            EquivalencyError::NotEquivalent(message) => {
                assert_eq!(message, "Expected subject to be 2, but found 1.")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_registry_is_a_configuration_error() {
        let engine = Equivalency::new().with_registry(StepRegistry::empty());
        let err = engine
            .check(&Value::from(1), &Value::from(1), &EquivalencyOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            EquivalencyError::NoApplicableStep { ref path, ref expected_type }
                if path == "subject" && expected_type == "integer"
        ));
    }

    struct AlwaysEquivalent;

    impl EquivalencyStep for AlwaysEquivalent {
        fn name(&self) -> &str {
            "AlwaysEquivalent"
        }

        fn handle(
            &self,
            comparands: &Comparands,
            _context: &mut EquivalencyContext<'_>,
            _nested: &mut dyn ChildValidator,
        ) -> Result<EquivalencyResult, EquivalencyError> {
            Ok(match comparands.compile_time_type {
                ValueType::Integer => EquivalencyResult::EquivalencyProven,
                _ => EquivalencyResult::ContinueWithNext,
            })
        }
    }

    #[test]
    fn test_prepended_step_overrides_builtins() {
        let mut engine = Equivalency::new();
        engine.registry_mut().prepend(AlwaysEquivalent);

        let options = EquivalencyOptions::default();
        assert!(engine.check(&Value::from(1), &Value::from(2), &options).unwrap().succeeded);
        assert!(!engine.check(&Value::from("x"), &Value::from("y"), &options).unwrap().succeeded);
    }
}
