use super::{EquivalencyResult, EquivalencyStep};
use crate::comparands::Comparands;
use crate::context::EquivalencyContext;
use crate::validator::ChildValidator;
use requiv_common::{EquivalencyError, Value};

/// Short-circuits when both sides are the same record, or both are null
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceEqualityStep;

impl EquivalencyStep for ReferenceEqualityStep {
    fn name(&self) -> &str {
        "ReferenceEqualityStep"
    }

    fn handle(
        &self,
        comparands: &Comparands,
        _context: &mut EquivalencyContext<'_>,
        _nested: &mut dyn ChildValidator,
    ) -> Result<EquivalencyResult, EquivalencyError> {
        let same = match (&comparands.subject, &comparands.expectation) {
            (Value::Record(subject), Value::Record(expectation)) => subject.ptr_eq(expectation),
            (Value::Null, Value::Null) => true,
            _ => false,
        };

        Ok(if same {
            EquivalencyResult::EquivalencyProven
        } else {
            EquivalencyResult::ContinueWithNext
        })
    }
}
