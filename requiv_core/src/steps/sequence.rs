use super::{EquivalencyResult, EquivalencyStep};
use crate::comparands::Comparands;
use crate::context::EquivalencyContext;
use crate::message::escape_placeholders;
use crate::node::Node;
use crate::validator::ChildValidator;
use requiv_common::{EquivalencyError, Value, ValueType};
use tracing::trace;

/// Compares sequences element by element, in order.
///
/// Applies whenever the expectation holds a sequence, whatever its declared type.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceEquivalencyStep;

impl EquivalencyStep for SequenceEquivalencyStep {
    fn name(&self) -> &str {
        "SequenceEquivalencyStep"
    }

    fn handle(
        &self,
        comparands: &Comparands,
        context: &mut EquivalencyContext<'_>,
        nested: &mut dyn ChildValidator,
    ) -> Result<EquivalencyResult, EquivalencyError> {
        let Value::Sequence(expected_items) = &comparands.expectation else {
            return Ok(EquivalencyResult::ContinueWithNext);
        };

        let Value::Sequence(subject_items) = &comparands.subject else {
            context.report_mismatch(&comparands.expectation, &comparands.subject);
            return Ok(EquivalencyResult::AssertionFailed);
        };

        if expected_items.len() != subject_items.len() {
            let template = format!(
                "Expected {} to be a collection with {{0}} item(s){{reason}}, but {{1}} contains {{2}} item(s).",
                escape_placeholders(&context.node.description())
            );
            context.chain.fail_with(
                &template,
                &[&expected_items.len(), &comparands.subject, &subject_items.len()],
            );
            return Ok(EquivalencyResult::AssertionFailed);
        }

        trace!("Comparing {} elements at {}", expected_items.len(), context.node.description());

        let failures_before = context.chain.failure_count();
        for (index, (subject, expectation)) in subject_items.iter().zip(expected_items).enumerate() {
            let declared = ValueType::of(expectation).unwrap_or(ValueType::Any);
            let child = Node::element(&context.node, index, declared.clone());
            let child_comparands = Comparands::new(subject.clone(), expectation.clone(), declared);
            nested.validate(&child_comparands, child, context.options, context.chain)?;
        }

        Ok(context.outcome_since(failures_before))
    }
}
