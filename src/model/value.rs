use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::guid::CompressedGuid;

/// One attribute value of an entity, before STEP encoding.
///
/// Every supported kind has its own variant, so the encoder's `match` is
/// exhaustive and an unsupported kind is a compile error, not empty output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Unset attribute of any kind, written as `$`.
    Null,
    /// Attribute re-declared as derived in a subtype, written as `*`.
    Derived,
    String(String),
    Boolean(bool),
    /// INTEGER and long integers alike.
    Integer(i64),
    Real(f64),
    /// Enumeration member name; upper-cased on output.
    Enum(String),
    Bytes(Vec<u8>),
    Reference(EntityId),
    List(Vec<Value>),
    /// A defined type wrapping another value, e.g. `IfcLabel` around a string.
    Typed {
        type_name: String,
        value: Box<Value>,
    },
    /// A value filling a SELECT attribute. Its contents encode in select
    /// context, where defined types carry their type name.
    Select(Box<Value>),
}

impl Value {
    /// Reference to `entity`, or `$` when there is none.
    #[must_use]
    pub fn reference(entity: Option<EntityId>) -> Self {
        entity.map_or(Self::Null, Self::Reference)
    }

    #[must_use]
    pub fn enumeration(member: impl Into<String>) -> Self {
        Self::Enum(member.into())
    }

    #[must_use]
    pub fn typed(type_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Typed {
            type_name: type_name.into(),
            value: Box::new(value.into()),
        }
    }

    #[must_use]
    pub fn select(value: impl Into<Value>) -> Self {
        Self::Select(Box::new(value.into()))
    }

    #[must_use]
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Real(x)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<EntityId> for Value {
    fn from(id: EntityId) -> Self {
        Self::Reference(id)
    }
}

impl From<CompressedGuid> for Value {
    fn from(guid: CompressedGuid) -> Self {
        Self::String(guid.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_none_is_null() {
        assert_eq!(Value::from(None::<bool>), Value::Null);
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::reference(None), Value::Null);
        assert_eq!(Value::from(Some(true)), Value::Boolean(true));
    }

    #[test]
    fn test_list_builder() {
        assert_eq!(
            Value::list([1, 2]),
            Value::List(vec![Value::Integer(1), Value::Integer(2)])
        );
    }

    #[test]
    fn test_json_shape() {
        let value = Value::list(vec![
            Value::from("a"),
            Value::Null,
            Value::typed("IfcLabel", "b"),
        ]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "list",
                "value": [
                    {"kind": "string", "value": "a"},
                    {"kind": "null"},
                    {"kind": "typed", "value": {
                        "type_name": "IfcLabel",
                        "value": {"kind": "string", "value": "b"}
                    }}
                ]
            })
        );
        let back: Value = serde_json::from_value(json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = serde_json::from_str::<Value>(r#"{"kind": "complex", "value": 1}"#);
        assert!(err.is_err());
    }
}
