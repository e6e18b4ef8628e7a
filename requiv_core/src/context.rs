use crate::chain::AssertionChain;
use crate::members::MemberEnumerator;
use crate::message::escape_placeholders;
use crate::node::Node;
use crate::options::EquivalencyOptions;
use crate::steps::EquivalencyResult;
use std::fmt::Display;
use std::sync::Arc;

/// Per-node state handed to every step
pub struct EquivalencyContext<'a> {
    pub node: Arc<Node>,
    pub options: &'a EquivalencyOptions,
    pub chain: &'a mut AssertionChain,
    pub members: &'a dyn MemberEnumerator,
}

impl<'a> EquivalencyContext<'a> {
    pub fn new(
        node: Arc<Node>,
        options: &'a EquivalencyOptions,
        chain: &'a mut AssertionChain,
        members: &'a dyn MemberEnumerator,
    ) -> Self {
        Self {
            node,
            options,
            chain,
            members,
        }
    }

    /// Record "Expected <node> to be <expected>, but found <found>."
    pub fn report_mismatch(&mut self, expected: &dyn Display, found: &dyn Display) {
        let template = format!(
            "Expected {} to be {{0}}{{reason}}, but found {{1}}.",
            escape_placeholders(&self.node.description())
        );
        self.chain.fail_with(&template, &[expected, found]);
    }

    /// Terminal outcome given the failure count observed before the step ran
    pub fn outcome_since(&self, failures_before: usize) -> EquivalencyResult {
        if self.chain.failure_count() > failures_before {
            EquivalencyResult::AssertionFailed
        } else {
            EquivalencyResult::EquivalencyProven
        }
    }
}
