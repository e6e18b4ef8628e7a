use super::{EquivalencyResult, EquivalencyStep};
use crate::comparands::Comparands;
use crate::context::EquivalencyContext;
use crate::string_assertions::StringAssertions;
use crate::validator::ChildValidator;
use requiv_common::{EquivalencyError, Value, ValueType};
use tracing::trace;

/// Compares nodes whose expected type is exactly `string`.
///
/// Dispatches on the declared type so values declared as `object` that
/// happen to hold strings are left to other steps.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringEqualityStep;

impl EquivalencyStep for StringEqualityStep {
    fn name(&self) -> &str {
        "StringEqualityStep"
    }

    fn handle(
        &self,
        comparands: &Comparands,
        context: &mut EquivalencyContext<'_>,
        _nested: &mut dyn ChildValidator,
    ) -> Result<EquivalencyResult, EquivalencyError> {
        if comparands.expected_type(context.options) != ValueType::String {
            return Ok(EquivalencyResult::ContinueWithNext);
        }

        match (&comparands.expectation, &comparands.subject) {
            (Value::Null, Value::Null) => return Ok(EquivalencyResult::EquivalencyProven),
            (Value::Null, _) | (_, Value::Null) => {
                context.report_mismatch(&comparands.expectation, &comparands.subject);
                return Ok(EquivalencyResult::AssertionFailed);
            }
            _ => {}
        }

        // Either side declared as a string but holding something else
        let (Some(expected), Some(subject)) = (comparands.expectation.as_str(), comparands.subject.as_str()) else {
            let found = if comparands.subject.as_str().is_none() {
                comparands.subject_runtime_type()
            } else {
                ValueType::of(&comparands.expectation)
            };
            let found = found.map_or_else(|| Value::Null.to_string(), |t| t.to_string());
            context.report_mismatch(&ValueType::String, &found);
            return Ok(EquivalencyResult::AssertionFailed);
        };

        let options = context.options.string_options();
        let description = context.node.description();
        trace!("Comparing strings at {} with {:?}", description, options);

        let failures_before = context.chain.failure_count();
        context.chain.reuse_once();
        StringAssertions::new(&mut *context.chain, subject, description).be_equivalent_to(expected, &options);

        Ok(context.outcome_since(failures_before))
    }
}
