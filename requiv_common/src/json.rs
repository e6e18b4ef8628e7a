use crate::{RecordRef, Value, ValueType};
use serde_json::Value as JsonValue;

/// Type name given to records built from JSON objects
pub const JSON_OBJECT_TYPE: &str = "Object";

/// JSON documents are self-describing, so every member is declared with the
/// runtime type of its value (`Any` for null).
impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            JsonValue::String(s) => Value::Str(s),
            JsonValue::Array(items) => Value::Sequence(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => {
                let record = RecordRef::new(JSON_OBJECT_TYPE);
                for (key, val) in map {
                    let value = Value::from(val);
                    let declared = ValueType::of(&value).unwrap_or(ValueType::Any);
                    record.set_member(key, declared, value);
                }
                Value::Record(record)
            }
        }
    }
}
