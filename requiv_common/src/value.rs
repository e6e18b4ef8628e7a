use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

/// Static (declared) or runtime type of a value in an object graph
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    /// The universal supertype. Type-specific steps never claim values declared this way.
    Any,
    Bool,
    Integer,
    Float,
    String,
    Sequence,
    /// A named record type (e.g. "Address")
    Record(String),
}

impl ValueType {
    pub fn record(name: impl Into<String>) -> Self {
        ValueType::Record(name.into())
    }

    /// Runtime type of a value; `None` for null.
    pub fn of(value: &Value) -> Option<ValueType> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(ValueType::Bool),
            Value::Integer(_) => Some(ValueType::Integer),
            Value::Float(_) => Some(ValueType::Float),
            Value::Str(_) => Some(ValueType::String),
            Value::Sequence(_) => Some(ValueType::Sequence),
            Value::Record(record) => Some(ValueType::Record(record.type_name().to_string())),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Any => f.write_str("object"),
            ValueType::Bool => f.write_str("bool"),
            ValueType::Integer => f.write_str("integer"),
            ValueType::Float => f.write_str("float"),
            ValueType::String => f.write_str("string"),
            ValueType::Sequence => f.write_str("sequence"),
            ValueType::Record(name) => f.write_str(name),
        }
    }
}

/// A node value in a user-supplied object graph
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Str(String),
    Sequence(Vec<Value>),
    Record(RecordRef),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordRef> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn runtime_type(&self) -> Option<ValueType> {
        ValueType::of(self)
    }
}

/// Shallow equality: records compare by identity and are never traversed,
/// so comparing values can not loop on cyclic graphs.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("<null>"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Sequence(items) => {
                f.write_str("{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("}")
            }
            // Members are not followed; the graph may be cyclic
            Value::Record(record) => write!(f, "{} {{ .. }}", record.type_name()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<RecordRef> for Value {
    fn from(record: RecordRef) -> Self {
        Value::Record(record)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// A named member of a record, with the type it was declared as
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub declared_type: ValueType,
    pub value: Value,
}

impl Member {
    pub fn new(name: impl Into<String>, declared_type: ValueType, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            declared_type,
            value: value.into(),
        }
    }
}

pub struct Record {
    type_name: String,
    members: RwLock<Vec<Member>>,
}

/// Shared handle to a record.
///
/// Members sit behind a lock so a graph can be closed into a cycle after
/// its records have been created.
#[derive(Clone)]
pub struct RecordRef(Arc<Record>);

impl RecordRef {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self(Arc::new(Record {
            type_name: type_name.into(),
            members: RwLock::new(Vec::new()),
        }))
    }

    /// Builder-style member declaration
    pub fn with_member(
        self,
        name: impl Into<String>,
        declared_type: ValueType,
        value: impl Into<Value>,
    ) -> Self {
        self.set_member(name, declared_type, value);
        self
    }

    /// Replace the member with the same name, or append it.
    pub fn set_member(&self, name: impl Into<String>, declared_type: ValueType, value: impl Into<Value>) {
        let member = Member::new(name, declared_type, value);
        let mut members = self.0.members.write().unwrap_or_else(PoisonError::into_inner);
        match members.iter_mut().find(|m| m.name == member.name) {
            Some(existing) => *existing = member,
            None => members.push(member),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.0.type_name
    }

    /// Snapshot of the members in declaration order
    pub fn members(&self) -> Vec<Member> {
        self.read_members().clone()
    }

    pub fn member(&self, name: &str) -> Option<Member> {
        self.read_members()
            .iter()
            .find(|m| m.name == name)
            .cloned()
    }

    // Members stay readable after a writer panicked
    fn read_members(&self) -> RwLockReadGuard<'_, Vec<Member>> {
        self.0.members.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Address of the shared allocation, used as the record's identity
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub fn ptr_eq(&self, other: &RecordRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordRef({}@{:#x})", self.type_name(), self.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_types() {
        assert_eq!(ValueType::of(&Value::Null), None);
        assert_eq!(ValueType::of(&Value::from("x")), Some(ValueType::String));
        assert_eq!(ValueType::of(&Value::from(3)), Some(ValueType::Integer));
        let record = RecordRef::new("Address");
        assert_eq!(
            ValueType::of(&Value::from(record)),
            Some(ValueType::record("Address"))
        );
    }

    #[test]
    fn test_set_member_replaces_existing() {
        let record = RecordRef::new("Person").with_member("Name", ValueType::String, "Ann");
        record.set_member("Name", ValueType::String, "Bob");
        record.set_member("Age", ValueType::Integer, 40);

        let members = record.members();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].value, Value::from("Bob"));
        assert_eq!(record.member("Age").map(|m| m.value), Some(Value::Integer(40)));
    }

    #[test]
    fn test_records_compare_by_identity() {
        let a = RecordRef::new("Node");
        let b = RecordRef::new("Node");
        assert_eq!(Value::from(a.clone()), Value::from(a.clone()));
        assert_ne!(Value::from(a), Value::from(b));
    }

    #[test]
    fn test_members_survive_poisoned_lock() {
        let record = RecordRef::new("Person").with_member("Name", ValueType::String, "Ann");
        let writer = record.clone();
        let _ = std::thread::spawn(move || {
            let _guard = writer.0.members.write().unwrap();
            panic!("writer failed while holding the lock");
        })
        .join();
        assert!(record.0.members.is_poisoned());

        record.set_member("Age", ValueType::Integer, 40);
        assert_eq!(record.members().len(), 2);
        assert_eq!(record.member("Name").map(|m| m.value), Some(Value::from("Ann")));
    }

    #[test]
    fn test_display_does_not_follow_cycles() {
        let node = RecordRef::new("Node");
        node.set_member("Next", ValueType::record("Node"), node.clone());
        assert_eq!(Value::from(node).to_string(), "Node { .. }");
        assert_eq!(
            Value::from(vec![Value::from(1), Value::from("a"), Value::Null]).to_string(),
            "{1, \"a\", <null>}"
        );
    }
}
