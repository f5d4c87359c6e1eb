//! Conversions between Rust types and dynamic [`Value`]s.
//!
//! [`FromValue`] goes through the same coercion policy as the adapter boundary, so a typed call site never sees a
//! value the policy would have rejected. [`IntoValue`] is infallible.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use crate::coerce::coerce;
use crate::errors::{CoercionError, PathSegment};
use crate::types::SemanticType;
use crate::value::{Value, ValueKind};

/// Extract a Rust value from a dynamic [`Value`].
pub trait FromValue: Sized {
    /// The declared type this Rust type corresponds to.
    fn semantic_type() -> SemanticType;

    /// Convert, applying the coercion policy for [`FromValue::semantic_type`].
    fn from_value(value: Value) -> Result<Self, CoercionError>;
}

/// Turn a Rust value into a dynamic [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl FromValue for Value {
    fn semantic_type() -> SemanticType {
        SemanticType::Any
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        Ok(value)
    }
}

impl FromValue for () {
    fn semantic_type() -> SemanticType {
        SemanticType::Void
    }

    fn from_value(_value: Value) -> Result<Self, CoercionError> {
        Ok(())
    }
}

impl FromValue for bool {
    fn semantic_type() -> SemanticType {
        SemanticType::Bool
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(CoercionError::mismatch(SemanticType::Bool, &other)),
        }
    }
}

macro_rules! integral_from_value {
    ($($rust:ty => $sem:expr),* $(,)?) => {
        $(
            impl FromValue for $rust {
                fn semantic_type() -> SemanticType {
                    $sem
                }

                fn from_value(value: Value) -> Result<Self, CoercionError> {
                    match coerce(value, &$sem)? {
                        Value::Int(i) => <$rust>::try_from(i)
                            .map_err(|_| CoercionError::out_of_range($sem, ValueKind::Int, i)),
                        other => Err(CoercionError::mismatch($sem, &other)),
                    }
                }
            }
        )*
    };
}

integral_from_value! {
    i8 => SemanticType::Byte,
    i16 => SemanticType::Short,
    i32 => SemanticType::Int,
    i64 => SemanticType::Long,
}

impl FromValue for f32 {
    fn semantic_type() -> SemanticType {
        SemanticType::Float
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match coerce(value, &SemanticType::Float)? {
            Value::Float(x) => Ok(x as f32),
            other => Err(CoercionError::mismatch(SemanticType::Float, &other)),
        }
    }
}

impl FromValue for f64 {
    fn semantic_type() -> SemanticType {
        SemanticType::Double
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match coerce(value, &SemanticType::Double)? {
            Value::Float(x) => Ok(x),
            other => Err(CoercionError::mismatch(SemanticType::Double, &other)),
        }
    }
}

impl FromValue for char {
    fn semantic_type() -> SemanticType {
        SemanticType::Char
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match coerce(value, &SemanticType::Char)? {
            Value::Str(s) => s
                .chars()
                .next()
                .ok_or_else(|| CoercionError::mismatch(SemanticType::Char, &Value::Str(String::new()))),
            other => Err(CoercionError::mismatch(SemanticType::Char, &other)),
        }
    }
}

impl FromValue for String {
    fn semantic_type() -> SemanticType {
        SemanticType::Str
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(CoercionError::mismatch(SemanticType::Str, &other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn semantic_type() -> SemanticType {
        SemanticType::optional(T::semantic_type())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn semantic_type() -> SemanticType {
        SemanticType::list(T::semantic_type())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| T::from_value(item).map_err(|e| e.within(PathSegment::Index(i))))
                .collect(),
            other => Err(CoercionError::mismatch(Self::semantic_type(), &other)),
        }
    }
}

fn entries_from_value<T, C>(value: Value) -> Result<C, CoercionError>
where
    T: FromValue,
    C: FromIterator<(String, T)>,
{
    match value {
        Value::Map(entries) => entries
            .into_iter()
            .map(|(key, item)| match T::from_value(item) {
                Ok(item) => Ok((key, item)),
                Err(e) => Err(e.within(PathSegment::Key(key))),
            })
            .collect(),
        other => Err(CoercionError::mismatch(SemanticType::map(T::semantic_type()), &other)),
    }
}

impl<T: FromValue> FromValue for HashMap<String, T> {
    fn semantic_type() -> SemanticType {
        SemanticType::map(T::semantic_type())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        entries_from_value(value)
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn semantic_type() -> SemanticType {
        SemanticType::map(T::semantic_type())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        entries_from_value(value)
    }
}

impl<T: FromValue> FromValue for IndexMap<String, T> {
    fn semantic_type() -> SemanticType {
        SemanticType::map(T::semantic_type())
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        entries_from_value(value)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Null
    }
}

macro_rules! into_value_via {
    ($($rust:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl IntoValue for $rust {
                fn into_value(self) -> Value {
                    let $v = self;
                    $body
                }
            }
        )*
    };
}

into_value_via! {
    bool => |b| Value::Bool(b),
    i8 => |i| Value::Int(i64::from(i)),
    i16 => |i| Value::Int(i64::from(i)),
    i32 => |i| Value::Int(i64::from(i)),
    i64 => |i| Value::Int(i),
    f32 => |x| Value::Float(f64::from(x)),
    f64 => |x| Value::Float(x),
    char => |c| Value::Str(c.to_string()),
    String => |s| Value::Str(s),
    &str => |s| Value::Str(s.to_string()),
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue> IntoValue for HashMap<String, T> {
    fn into_value(self) -> Value {
        Value::Map(self.into_iter().map(|(k, v)| (k, v.into_value())).collect())
    }
}

impl<T: IntoValue> IntoValue for BTreeMap<String, T> {
    fn into_value(self) -> Value {
        Value::Map(self.into_iter().map(|(k, v)| (k, v.into_value())).collect())
    }
}

impl<T: IntoValue> IntoValue for IndexMap<String, T> {
    fn into_value(self) -> Value {
        Value::Map(self.into_iter().map(|(k, v)| (k, v.into_value())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_types_follow_rust_types() {
        assert_eq!(<Vec<String>>::semantic_type().to_string(), "List<String>");
        assert_eq!(<HashMap<String, i32>>::semantic_type().to_string(), "Map<String, int>");
        assert_eq!(<Option<i64>>::semantic_type().to_string(), "long?");
    }

    #[test]
    fn integers_narrow_through_policy() {
        assert_eq!(i32::from_value(Value::Float(42.0)), Ok(42));
        assert!(i8::from_value(Value::Int(300)).is_err());
        assert!(i64::from_value(Value::Float(0.5)).is_err());
    }

    #[test]
    fn nested_errors_keep_paths() {
        let v = Value::List(vec![Value::map([("x", Value::Int(1))]), Value::map([("y", Value::from("no"))])]);
        let err = <Vec<HashMap<String, i32>>>::from_value(v).unwrap_err();
        assert_eq!(err.path.to_string(), "$[1].y");
    }

    #[test]
    fn into_value_round_trips_collections() {
        let mut m = BTreeMap::new();
        m.insert("v1".to_string(), vec![1i32, 2]);
        let v = m.clone().into_value();
        assert_eq!(<BTreeMap<String, Vec<i32>>>::from_value(v), Ok(m));
    }

    #[test]
    fn index_maps_keep_entry_order() {
        let v = Value::map([("zeta", Value::Int(1)), ("alpha", Value::Float(2.0))]);
        let m = <IndexMap<String, i32>>::from_value(v).unwrap();
        assert_eq!(m.keys().collect::<Vec<_>>(), ["zeta", "alpha"]);
        assert_eq!(m["alpha"], 2);
    }

    #[test]
    fn chars_convert_both_ways() {
        assert_eq!('É'.into_value(), Value::from("É"));
        assert_eq!(char::from_value(Value::Int(97)), Ok('a'));
    }
}
