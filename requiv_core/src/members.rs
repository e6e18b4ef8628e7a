use crate::node::Node;
use crate::options::EquivalencyOptions;
use requiv_common::{Member, RecordRef};

/// Supplies the comparable children of a record.
///
/// Structural steps only depend on this shape; how members are discovered
/// is up to the implementation.
pub trait MemberEnumerator: Send + Sync {
    fn members(&self, record: &RecordRef, node: &Node, options: &EquivalencyOptions) -> Vec<Member>;
}

/// Every member the record declares, in declaration order
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredMembers;

impl MemberEnumerator for DeclaredMembers {
    fn members(&self, record: &RecordRef, _node: &Node, _options: &EquivalencyOptions) -> Vec<Member> {
        record.members()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use requiv_common::ValueType;

    #[test]
    fn test_declared_members_keep_order() {
        let record = RecordRef::new("Person")
            .with_member("Name", ValueType::String, "Ann")
            .with_member("Age", ValueType::Integer, 30);
        let root = Node::root("subject", ValueType::record("Person"));

        let names: Vec<String> = DeclaredMembers
            .members(&record, &root, &EquivalencyOptions::default())
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Name".to_string(), "Age".to_string()]);
    }
}
