//! Coercion errors and value paths shared by the adapter and the contract frontend.
//!
//! Errors here describe *where* inside a value a mismatch happened (`$[1].v1`) so that diagnostics for nested
//! list/map results point at the offending element rather than the whole result.

use std::fmt;

use crate::types::SemanticType;
use crate::value::{Value, ValueKind};

/// One step into a nested value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

/// Location of a nested value, rendered as `$`, `$[2]`, `$.v1`, `$["odd key"][0]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValuePath(Vec<PathSegment>);

impl ValuePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    fn prepend(&mut self, segment: PathSegment) {
        self.0.insert(0, segment);
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Index(i) => write!(f, "[{i}]")?,
                PathSegment::Key(k) if is_plain_key(k) => write!(f, ".{k}")?,
                PathSegment::Key(k) => write!(f, "[{k:?}]")?,
            }
        }
        Ok(())
    }
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A value that does not conform to its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionError {
    /// Where the mismatch is, relative to the value being coerced.
    pub path: ValuePath,
    pub expected: SemanticType,
    pub found: ValueKind,
    /// Extra explanation for values of the right kind but the wrong magnitude/shape.
    pub detail: Option<String>,
}

impl CoercionError {
    /// The value has the wrong kind altogether.
    pub fn mismatch(expected: SemanticType, found: &Value) -> Self {
        Self {
            path: ValuePath::root(),
            expected,
            found: found.kind(),
            detail: None,
        }
    }

    /// A float was offered where an integer type is declared, but it has a fractional part (or is not finite).
    pub fn not_integral(expected: SemanticType, value: f64) -> Self {
        Self {
            path: ValuePath::root(),
            expected,
            found: ValueKind::Float,
            detail: Some(format!("{value} is not an integral value")),
        }
    }

    /// A numeric value does not fit the declared width.
    pub fn out_of_range(expected: SemanticType, found: ValueKind, value: impl fmt::Display) -> Self {
        let detail = format!("{value} is out of range for {expected}");
        Self {
            path: ValuePath::root(),
            expected,
            found,
            detail: Some(detail),
        }
    }

    /// Attach a free-form explanation.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Re-root this error one level down: the failing value was at `segment` inside its parent.
    pub fn within(mut self, segment: PathSegment) -> Self {
        self.path.prepend(segment);
        self
    }
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, found {}", self.expected, self.found)?;
        if !self.path.is_root() {
            write!(f, " at {}", self.path)?;
        }
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

impl std::error::Error for CoercionError {}
