use crate::chain::AssertionChain;
use crate::comparands::Comparands;
use crate::context::EquivalencyContext;
use crate::members::MemberEnumerator;
use crate::message::escape_placeholders;
use crate::node::Node;
use crate::options::{CyclicReferenceHandling, EquivalencyOptions};
use crate::registry::StepRegistry;
use requiv_common::{EquivalencyError, Value};
use std::sync::Arc;
use tracing::{debug, trace};

/// Recursion entry point handed to steps that compare composite values
pub trait ChildValidator {
    fn validate(
        &mut self,
        comparands: &Comparands,
        node: Arc<Node>,
        options: &EquivalencyOptions,
        chain: &mut AssertionChain,
    ) -> Result<(), EquivalencyError>;
}

/// Identity pair of an (expectation, subject) record couple
type VisitedPair = (usize, usize);

/// Depth-first traversal state for one check.
///
/// `visited` only holds the record pairs on the current path: a pair is
/// pushed when its node is entered and popped when the node returns.
pub struct EquivalencyValidator<'a> {
    steps: &'a StepRegistry,
    members: &'a dyn MemberEnumerator,
    visited: Vec<VisitedPair>,
}

impl<'a> EquivalencyValidator<'a> {
    pub fn new(steps: &'a StepRegistry, members: &'a dyn MemberEnumerator) -> Self {
        Self {
            steps,
            members,
            visited: Vec::new(),
        }
    }

    /// Offer the node to each step in order until one of them handles it
    fn run_steps(
        &mut self,
        comparands: &Comparands,
        node: Arc<Node>,
        options: &EquivalencyOptions,
        chain: &mut AssertionChain,
    ) -> Result<(), EquivalencyError> {
        let steps = self.steps;
        let members = self.members;
        let mut context = EquivalencyContext::new(node, options, chain, members);

        for step in steps.iter() {
            let result = step.handle(comparands, &mut context, self)?;
            if result.is_terminal() {
                trace!("{} resolved {} as {:?}", step.name(), context.node.description(), result);
                return Ok(());
            }
        }

        Err(EquivalencyError::NoApplicableStep {
            path: context.node.description(),
            expected_type: comparands.expected_type(options).to_string(),
        })
    }
}

impl ChildValidator for EquivalencyValidator<'_> {
    fn validate(
        &mut self,
        comparands: &Comparands,
        node: Arc<Node>,
        options: &EquivalencyOptions,
        chain: &mut AssertionChain,
    ) -> Result<(), EquivalencyError> {
        if options.is_excluded(&node.path()) {
            trace!("Skipping excluded member {}", node.description());
            return Ok(());
        }

        if let Some(max_depth) = options.max_recursion_depth() {
            if node.depth() > max_depth {
                debug!("Recursion depth {} exceeded at {}", max_depth, node.description());
                chain.fail_with(
                    "The maximum recursion depth of {0} was reached at {1}{reason}.",
                    &[&max_depth, &node.description()],
                );
                return Ok(());
            }
        }

        let expected_type = comparands.expected_type(options);
        let resolved = options.resolve_for(&expected_type);
        let options = &*resolved;

        let pair = match (&comparands.expectation, &comparands.subject) {
            (Value::Record(expectation), Value::Record(subject)) => {
                Some((expectation.identity(), subject.identity()))
            }
            _ => None,
        };

        if let Some(pair) = pair {
            if self.visited.contains(&pair) {
                match options.cyclic_reference_handling() {
                    CyclicReferenceHandling::Ignore => {
                        debug!("Cyclic reference at {} assumed equivalent", node.description());
                    }
                    CyclicReferenceHandling::Fail => {
                        let template = format!(
                            "Expected {} to be {{0}}{{reason}}, but it contains a cyclic reference.",
                            escape_placeholders(&node.description())
                        );
                        chain.fail_with(&template, &[&comparands.expectation]);
                    }
                }
                return Ok(());
            }
            self.visited.push(pair);
        }

        let result = self.run_steps(comparands, node, options, chain);

        if pair.is_some() {
            self.visited.pop();
        }
        result
    }
}
