//! Provide the shared, pure semantic core of dynbind: dynamic values, declared semantic types, and the coercion
//! policy that moves values from the loosely-typed side of a binding into a statically-typed contract.
//!
//! This crate is intentionally small and dependency-light. It contains deterministic helpers that both:
//! - the adapter uses at the proxy boundary (argument and return value coercion), and
//! - the contract frontend uses when it checks declared default values.
//!
//! ## Notes
//!
//! - This is a “semantic core” crate: **no IO**, no global state, no adapter-specific types.
//! - Numeric policy is lossless: integers narrow only when in range, floats become integers only when integral.
//!   Nothing is truncated silently.
//!
//! ## Examples
//! ```rust
//! use dynbind_core::{coerce, SemanticType, Value};
//!
//! let ty = SemanticType::list(SemanticType::Int);
//! let raw = Value::List(vec![Value::Float(1.0), Value::Int(2)]);
//! assert_eq!(coerce(raw, &ty).unwrap(), Value::List(vec![Value::Int(1), Value::Int(2)]));
//! ```

#![deny(clippy::unwrap_used)]

pub mod coerce;
pub mod convert;
pub mod errors;
pub mod lang;
pub mod types;
pub mod value;

#[cfg(feature = "json")]
pub mod json;

pub use coerce::coerce;
pub use convert::{FromValue, IntoValue};
pub use errors::{CoercionError, PathSegment, ValuePath};
pub use types::SemanticType;
pub use value::{Value, ValueKind};
