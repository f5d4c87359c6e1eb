//! Coercion policy: move a dynamic [`Value`] into a declared [`SemanticType`].
//!
//! ## Notes
//! - **Numbers**: integer targets accept integers in range and floats that are finite, integral and in range.
//!   Float targets accept any number; `float` rejects finite magnitudes beyond `f32::MAX`.
//! - **Text**: strings are never parsed into numbers and numbers are never rendered into strings.
//! - **`char`**: a one-character string, or an integer Unicode scalar value. Normalized to a one-character string.
//! - **Containers**: lists are checked element by element, maps value by value; map keys pass through unchanged.
//! - **`null`**: only accepted by `void`, `any` and optional types.
//! - **`void`**: anything is accepted and discarded (`Null`).
//!
//! A successful coercion always yields a value whose shape matches the declared type; failures carry the path to
//! the first offending element.

use crate::errors::{CoercionError, PathSegment};
use crate::types::SemanticType;
use crate::value::{Value, ValueKind};

/// Coerce `value` to `ty`, converting numbers where that is lossless.
///
/// ## Errors
/// Returns a [`CoercionError`] locating the first element that does not conform.
pub fn coerce(value: Value, ty: &SemanticType) -> Result<Value, CoercionError> {
    match ty {
        SemanticType::Void => Ok(Value::Null),
        SemanticType::Any => Ok(value),
        SemanticType::Optional(inner) => match value {
            Value::Null => Ok(Value::Null),
            other => coerce(other, inner),
        },
        SemanticType::Bool => match value {
            Value::Bool(_) => Ok(value),
            other => Err(CoercionError::mismatch(ty.clone(), &other)),
        },
        SemanticType::Byte | SemanticType::Short | SemanticType::Int | SemanticType::Long => {
            coerce_integral(value, ty)
        }
        SemanticType::Float | SemanticType::Double => coerce_float(value, ty),
        SemanticType::Char => coerce_char(value, ty),
        SemanticType::Str => match value {
            Value::Str(_) => Ok(value),
            other => Err(CoercionError::mismatch(ty.clone(), &other)),
        },
        SemanticType::List(elem) => match value {
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| coerce(item, elem).map_err(|e| e.within(PathSegment::Index(i))))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            other => Err(CoercionError::mismatch(ty.clone(), &other)),
        },
        SemanticType::Map(val) => match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(key, item)| match coerce(item, val) {
                    Ok(item) => Ok((key, item)),
                    Err(e) => Err(e.within(PathSegment::Key(key))),
                })
                .collect::<Result<_, _>>()
                .map(Value::Map),
            other => Err(CoercionError::mismatch(ty.clone(), &other)),
        },
    }
}

/// Check a value against `ty` without keeping the converted result.
pub fn conforms(value: &Value, ty: &SemanticType) -> Result<(), CoercionError> {
    coerce(value.clone(), ty).map(|_| ())
}

fn coerce_integral(value: Value, ty: &SemanticType) -> Result<Value, CoercionError> {
    let Some((min, max)) = ty.integral_range() else {
        return Err(CoercionError::mismatch(ty.clone(), &value));
    };
    match value {
        Value::Int(i) if (min..=max).contains(&i) => Ok(Value::Int(i)),
        Value::Int(i) => Err(CoercionError::out_of_range(ty.clone(), ValueKind::Int, i)),
        Value::Float(x) => {
            if !x.is_finite() || x.fract() != 0.0 {
                return Err(CoercionError::not_integral(ty.clone(), x));
            }
            // `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
            if x < min as f64 || x >= (max as f64) + 1.0 || x >= i64::MAX as f64 {
                return Err(CoercionError::out_of_range(ty.clone(), ValueKind::Float, x));
            }
            Ok(Value::Int(x as i64))
        }
        other => Err(CoercionError::mismatch(ty.clone(), &other)),
    }
}

fn coerce_float(value: Value, ty: &SemanticType) -> Result<Value, CoercionError> {
    let x = match value {
        Value::Int(i) => i as f64,
        Value::Float(x) => x,
        other => return Err(CoercionError::mismatch(ty.clone(), &other)),
    };
    if matches!(ty, SemanticType::Float) && x.is_finite() && x.abs() > f64::from(f32::MAX) {
        return Err(CoercionError::out_of_range(ty.clone(), ValueKind::Float, x));
    }
    Ok(Value::Float(x))
}

fn coerce_char(value: Value, ty: &SemanticType) -> Result<Value, CoercionError> {
    match value {
        Value::Str(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(_), None) => Ok(Value::Str(s)),
                _ => Err(CoercionError::mismatch(ty.clone(), &Value::Str(String::new()))
                    .with_detail(format!("{s:?} is not a single character"))),
            }
        }
        Value::Int(i) => u32::try_from(i)
            .ok()
            .and_then(char::from_u32)
            .map(|c| Value::Str(c.to_string()))
            .ok_or_else(|| CoercionError::out_of_range(ty.clone(), ValueKind::Int, i)),
        other => Err(CoercionError::mismatch(ty.clone(), &other)),
    }
}
