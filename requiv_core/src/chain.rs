use crate::message::{format_message, format_reason};
use serde::Serialize;
use std::fmt::Display;
use tracing::trace;

/// One logical assertion and the failures recorded against it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assertion {
    pub failures: Vec<String>,
}

/// Failure sink shared by every step of one equivalency check.
///
/// The chain is created by the top-level check and passed explicitly through
/// the traversal; it is never shared between checks.
#[derive(Debug, Default)]
pub struct AssertionChain {
    reason: String,
    condition: Option<bool>,
    reuse_next: bool,
    assertions: Vec<Assertion>,
}

impl AssertionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a logical assertion. If [`reuse_once`](Self::reuse_once) was
    /// called, the flag is consumed and the current assertion continues.
    pub fn begin_assertion(&mut self) -> &mut Self {
        if self.consume_reuse() && !self.assertions.is_empty() {
            trace!("Continuing logical assertion {}", self.assertions.len());
        } else {
            self.assertions.push(Assertion::default());
        }
        self
    }

    /// Fold the next assertion that begins into the current one
    pub fn reuse_once(&mut self) {
        self.reuse_next = true;
    }

    /// Read and clear the reuse flag
    pub fn consume_reuse(&mut self) -> bool {
        std::mem::take(&mut self.reuse_next)
    }

    pub fn is_reuse_pending(&self) -> bool {
        self.reuse_next
    }

    /// Set the reason substituted for `{reason}` in later failures
    pub fn because_of(&mut self, reason: &str, args: &[&dyn Display]) -> &mut Self {
        self.reason = format_reason(&format_message(reason, "", args));
        self
    }

    /// Gate the next [`fail_with`](Self::fail_with): a true condition suppresses it
    pub fn for_condition(&mut self, condition: bool) -> &mut Self {
        self.condition = Some(condition);
        self
    }

    pub fn fail_with(&mut self, template: &str, args: &[&dyn Display]) -> &mut Self {
        if self.condition.take() == Some(true) {
            return self;
        }

        let message = format_message(template, &self.reason, args);
        trace!("Recorded failure: {}", message);

        if self.assertions.is_empty() {
            self.assertions.push(Assertion::default());
        }
        if let Some(current) = self.assertions.last_mut() {
            current.failures.push(message);
        }
        self
    }

    /// True while no failure has been recorded
    pub fn succeeded(&self) -> bool {
        self.assertions.iter().all(|a| a.failures.is_empty())
    }

    pub fn failure_count(&self) -> usize {
        self.assertions.iter().map(|a| a.failures.len()).sum()
    }

    /// All failures in the order they were recorded
    pub fn failures(&self) -> Vec<String> {
        self.assertions
            .iter()
            .flat_map(|a| a.failures.iter().cloned())
            .collect()
    }

    pub fn assertions(&self) -> &[Assertion] {
        &self.assertions
    }

    pub fn assertion_count(&self) -> usize {
        self.assertions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_gates_failure() {
        let mut chain = AssertionChain::new();
        chain.for_condition(true).fail_with("never", &[]);
        assert!(chain.succeeded());

        chain.for_condition(false).fail_with("Expected {0}", &[&1]);
        assert!(!chain.succeeded());
        assert_eq!(chain.failures(), vec!["Expected 1".to_string()]);
    }

    #[test]
    fn test_condition_applies_once() {
        let mut chain = AssertionChain::new();
        chain.for_condition(true);
        chain.fail_with("first", &[]);
        chain.fail_with("second", &[]);
        assert_eq!(chain.failures(), vec!["second".to_string()]);
    }

    #[test]
    fn test_reuse_is_one_shot() {
        let mut chain = AssertionChain::new();
        chain.begin_assertion();
        chain.reuse_once();
        assert!(chain.is_reuse_pending());

        chain.begin_assertion();
        assert_eq!(chain.assertion_count(), 1);
        assert!(!chain.is_reuse_pending());

        chain.begin_assertion();
        assert_eq!(chain.assertion_count(), 2);
    }

    #[test]
    fn test_reason_is_substituted() {
        let mut chain = AssertionChain::new();
        chain
            .because_of("{0} is required", &[&"Name"])
            .fail_with("Expected value{reason}.", &[]);
        assert_eq!(chain.failures(), vec!["Expected value because Name is required.".to_string()]);
    }

    #[test]
    fn test_failures_aggregate_across_assertions() {
        let mut chain = AssertionChain::new();
        chain.begin_assertion().fail_with("a", &[]);
        chain.begin_assertion().fail_with("b", &[]);
        assert_eq!(chain.failure_count(), 2);
        assert_eq!(chain.assertions()[1].failures, vec!["b".to_string()]);
    }
}
