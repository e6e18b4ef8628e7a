pub mod chain;
pub mod comparands;
pub mod context;
pub mod engine;
pub mod members;
pub mod message;
pub mod node;
pub mod options;
pub mod registry;
pub mod steps;
pub mod string_assertions;
pub mod validator;

pub use chain::{Assertion, AssertionChain};
pub use comparands::Comparands;
pub use context::EquivalencyContext;
pub use engine::{Equivalency, EquivalencyReport};
pub use members::{DeclaredMembers, MemberEnumerator};
pub use node::{Node, PathSegment, DEFAULT_ROOT_IDENTIFIER};
pub use options::{CyclicReferenceHandling, EquivalencyOptions, StringEqualityOptions, TypeOverride};
pub use registry::StepRegistry;
pub use steps::{EquivalencyResult, EquivalencyStep};
pub use string_assertions::StringAssertions;
pub use validator::{ChildValidator, EquivalencyValidator};
