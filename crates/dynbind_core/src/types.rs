//! Declared (semantic) types of contract parameters and return values.

use std::fmt;

use crate::lang::types::BuiltinTypeId;

/// A type as declared by an interface contract.
///
/// ## Notes
/// - Map keys are always strings; only the value type is declared.
/// - `Optional` is the only way a contract admits `null` (besides `void` and `any`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Void,
    Any,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    Str,
    List(Box<SemanticType>),
    Map(Box<SemanticType>),
    Optional(Box<SemanticType>),
}

impl SemanticType {
    pub fn list(element: SemanticType) -> Self {
        SemanticType::List(Box::new(element))
    }

    /// `Map<String, value>`.
    pub fn map(value: SemanticType) -> Self {
        SemanticType::Map(Box::new(value))
    }

    /// Wrap in `Optional`, collapsing `T??` to `T?`.
    pub fn optional(inner: SemanticType) -> Self {
        match inner {
            SemanticType::Optional(_) => inner,
            other => SemanticType::Optional(Box::new(other)),
        }
    }

    /// Return the type for a non-generic builtin id.
    ///
    /// ## Returns
    /// - `None` for `List`/`Map`, which need type arguments.
    pub fn from_builtin(id: BuiltinTypeId) -> Option<Self> {
        let ty = match id {
            BuiltinTypeId::Void => SemanticType::Void,
            BuiltinTypeId::Any => SemanticType::Any,
            BuiltinTypeId::Bool => SemanticType::Bool,
            BuiltinTypeId::Byte => SemanticType::Byte,
            BuiltinTypeId::Short => SemanticType::Short,
            BuiltinTypeId::Int => SemanticType::Int,
            BuiltinTypeId::Long => SemanticType::Long,
            BuiltinTypeId::Float => SemanticType::Float,
            BuiltinTypeId::Double => SemanticType::Double,
            BuiltinTypeId::Char => SemanticType::Char,
            BuiltinTypeId::Str => SemanticType::Str,
            BuiltinTypeId::List | BuiltinTypeId::Map => return None,
        };
        Some(ty)
    }

    /// Return `true` for integer and floating-point types.
    pub fn is_numeric(&self) -> bool {
        self.is_integral() || matches!(self, SemanticType::Float | SemanticType::Double)
    }

    pub fn is_integral(&self) -> bool {
        self.integral_range().is_some()
    }

    /// Return the inclusive value range of an integer type.
    pub fn integral_range(&self) -> Option<(i64, i64)> {
        match self {
            SemanticType::Byte => Some((i64::from(i8::MIN), i64::from(i8::MAX))),
            SemanticType::Short => Some((i64::from(i16::MIN), i64::from(i16::MAX))),
            SemanticType::Int => Some((i64::from(i32::MIN), i64::from(i32::MAX))),
            SemanticType::Long => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, SemanticType::Void)
    }

    /// Return `true` if `null` is an acceptable value of this type.
    pub fn accepts_null(&self) -> bool {
        matches!(self, SemanticType::Void | SemanticType::Any | SemanticType::Optional(_))
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Void => f.write_str("void"),
            SemanticType::Any => f.write_str("any"),
            SemanticType::Bool => f.write_str("boolean"),
            SemanticType::Byte => f.write_str("byte"),
            SemanticType::Short => f.write_str("short"),
            SemanticType::Int => f.write_str("int"),
            SemanticType::Long => f.write_str("long"),
            SemanticType::Float => f.write_str("float"),
            SemanticType::Double => f.write_str("double"),
            SemanticType::Char => f.write_str("char"),
            SemanticType::Str => f.write_str("String"),
            SemanticType::List(elem) => write!(f, "List<{elem}>"),
            SemanticType::Map(value) => write!(f, "Map<String, {value}>"),
            SemanticType::Optional(inner) => write!(f, "{inner}?"),
        }
    }
}

#[cfg(feature = "json")]
impl serde::Serialize for SemanticType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
