use super::{EquivalencyResult, EquivalencyStep};
use crate::comparands::Comparands;
use crate::context::EquivalencyContext;
use crate::validator::ChildValidator;
use requiv_common::EquivalencyError;

/// Fallback: shallow value equality for anything earlier steps declined
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleEqualityStep;

impl EquivalencyStep for SimpleEqualityStep {
    fn name(&self) -> &str {
        "SimpleEqualityStep"
    }

    fn handle(
        &self,
        comparands: &Comparands,
        context: &mut EquivalencyContext<'_>,
        _nested: &mut dyn ChildValidator,
    ) -> Result<EquivalencyResult, EquivalencyError> {
        if comparands.subject == comparands.expectation {
            return Ok(EquivalencyResult::EquivalencyProven);
        }

        context.report_mismatch(&comparands.expectation, &comparands.subject);
        Ok(EquivalencyResult::AssertionFailed)
    }
}
