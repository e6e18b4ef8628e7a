use super::{EquivalencyResult, EquivalencyStep};
use crate::comparands::Comparands;
use crate::context::EquivalencyContext;
use crate::node::Node;
use crate::validator::ChildValidator;
use requiv_common::{EquivalencyError, Value};
use tracing::trace;

/// Member-by-member comparison of records.
///
/// The expectation decides which members take part; extra members on the
/// subject are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralEqualityStep;

impl EquivalencyStep for StructuralEqualityStep {
    fn name(&self) -> &str {
        "StructuralEqualityStep"
    }

    fn handle(
        &self,
        comparands: &Comparands,
        context: &mut EquivalencyContext<'_>,
        nested: &mut dyn ChildValidator,
    ) -> Result<EquivalencyResult, EquivalencyError> {
        let Value::Record(expected_record) = &comparands.expectation else {
            return Ok(EquivalencyResult::ContinueWithNext);
        };

        let Value::Record(subject_record) = &comparands.subject else {
            context.report_mismatch(&comparands.expectation, &comparands.subject);
            return Ok(EquivalencyResult::AssertionFailed);
        };

        let members = context
            .members
            .members(expected_record, &context.node, context.options);
        trace!("Comparing {} members at {}", members.len(), context.node.description());

        let failures_before = context.chain.failure_count();
        for member in members {
            let child = Node::member(&context.node, member.name.clone(), member.declared_type.clone());
            if context.options.is_excluded(&child.path()) {
                continue;
            }

            match subject_record.member(&member.name) {
                Some(subject_member) => {
                    let child_comparands =
                        Comparands::new(subject_member.value, member.value, member.declared_type);
                    nested.validate(&child_comparands, child, context.options, context.chain)?;
                }
                None => {
                    context.chain.fail_with(
                        "Expectation has member {0} that the other object does not have{reason}.",
                        &[&child.description()],
                    );
                }
            }
        }

        Ok(context.outcome_since(failures_before))
    }
}
