//! Equivalency steps: the pluggable comparison strategies the pipeline
//! tries, in order, for every node of the graph.

mod reference;
mod sequence;
mod simple;
mod string;
mod structural;

pub use reference::ReferenceEqualityStep;
pub use sequence::SequenceEquivalencyStep;
pub use simple::SimpleEqualityStep;
pub use string::StringEqualityStep;
pub use structural::StructuralEqualityStep;

use crate::comparands::Comparands;
use crate::context::EquivalencyContext;
use crate::validator::ChildValidator;
use requiv_common::EquivalencyError;

/// Outcome of offering a node to a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquivalencyResult {
    /// The step does not apply; try the next one
    ContinueWithNext,
    /// The step handled the node and found it equivalent
    EquivalencyProven,
    /// The step handled the node and recorded at least one failure
    AssertionFailed,
}

impl EquivalencyResult {
    /// Whether evaluation of the node stops here
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EquivalencyResult::ContinueWithNext)
    }
}

pub trait EquivalencyStep: Send + Sync {
    /// Stable name used to position steps in a registry
    fn name(&self) -> &str;

    /// Handle the node or decline with [`EquivalencyResult::ContinueWithNext`].
    /// Declining must leave the chain untouched.
    fn handle(
        &self,
        comparands: &Comparands,
        context: &mut EquivalencyContext<'_>,
        nested: &mut dyn ChildValidator,
    ) -> Result<EquivalencyResult, EquivalencyError>;
}
