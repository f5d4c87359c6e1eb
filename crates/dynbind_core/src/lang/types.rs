//! Builtin type-name vocabulary for contract declarations.
//!
//! This registry covers every type name a contract declaration may spell, with the aliases hosts commonly use
//! (boxed names such as `Integer`, concrete collection names, Rust primitive names).
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-insensitive ASCII**.
//! - This module is vocabulary only (spellings + metadata); [`crate::SemanticType`] carries the semantics.
//!
//! ## Examples
//! ```rust
//! use dynbind_core::lang::types::{self, BuiltinTypeId};
//!
//! assert_eq!(types::from_str("long"), Some(BuiltinTypeId::Long));
//! assert_eq!(types::from_str("HashMap"), Some(BuiltinTypeId::Map));
//! assert_eq!(types::generic_arity(BuiltinTypeId::List), 1);
//! ```

/// Stable identifier for builtin contract types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTypeId {
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
    List,
    Map,
}

/// Metadata for a builtin contract type.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinTypeInfo {
    pub id: BuiltinTypeId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    /// Number of type arguments the name takes (`List<T>` takes one, `Map<K, V>` two).
    pub generic_arity: usize,
    pub description: &'static str,
}

/// Registry of builtin contract types.
pub const BUILTIN_TYPES: &[BuiltinTypeInfo] = &[
    info(BuiltinTypeId::Void, "void", &["unit"], 0, "No value; the raw result is discarded."),
    info(BuiltinTypeId::Any, "any", &["object", "Value"], 0, "Any dynamic value, passed through unchecked."),
    info(BuiltinTypeId::Bool, "boolean", &["bool"], 0, "Boolean."),
    info(BuiltinTypeId::Byte, "byte", &["i8"], 0, "Signed 8-bit integer."),
    info(BuiltinTypeId::Short, "short", &["i16"], 0, "Signed 16-bit integer."),
    info(BuiltinTypeId::Int, "int", &["integer", "i32"], 0, "Signed 32-bit integer."),
    info(BuiltinTypeId::Long, "long", &["i64"], 0, "Signed 64-bit integer."),
    info(BuiltinTypeId::Float, "float", &["f32"], 0, "Single-precision floating point."),
    info(BuiltinTypeId::Double, "double", &["f64", "number"], 0, "Double-precision floating point."),
    info(BuiltinTypeId::Char, "char", &["character"], 0, "A single Unicode scalar value."),
    info(BuiltinTypeId::Str, "String", &["str", "CharSequence"], 0, "Text."),
    info(
        BuiltinTypeId::List,
        "List",
        &["ArrayList", "LinkedList", "Collection", "Iterable", "Vec"],
        1,
        "Ordered sequence; every element is checked against the element type.",
    ),
    info(
        BuiltinTypeId::Map,
        "Map",
        &["HashMap", "LinkedHashMap", "TreeMap", "Dict"],
        2,
        "String-keyed mapping; every value is checked against the value type.",
    ),
];

/// Resolve a type name to a [`BuiltinTypeId`].
///
/// ## Returns
/// - `Some(BuiltinTypeId)` if the spelling matches this registry (canonical or alias).
/// - `None` otherwise.
///
/// ## Notes
/// - Matching is **case-insensitive ASCII**, so `Integer` and `int` resolve alike.
pub fn from_str(name: &str) -> Option<BuiltinTypeId> {
    if let Some(t) = BUILTIN_TYPES.iter().find(|t| t.canonical.eq_ignore_ascii_case(name)) {
        return Some(t.id);
    }
    BUILTIN_TYPES
        .iter()
        .find(|t| t.aliases.iter().any(|a| a.eq_ignore_ascii_case(name)))
        .map(|t| t.id)
}

/// Return the canonical spelling for a builtin type.
pub fn as_str(id: BuiltinTypeId) -> &'static str {
    match id {
        BuiltinTypeId::Void => "void",
        BuiltinTypeId::Any => "any",
        BuiltinTypeId::Bool => "boolean",
        BuiltinTypeId::Byte => "byte",
        BuiltinTypeId::Short => "short",
        BuiltinTypeId::Int => "int",
        BuiltinTypeId::Long => "long",
        BuiltinTypeId::Float => "float",
        BuiltinTypeId::Double => "double",
        BuiltinTypeId::Char => "char",
        BuiltinTypeId::Str => "String",
        BuiltinTypeId::List => "List",
        BuiltinTypeId::Map => "Map",
    }
}

/// Return the number of type arguments a builtin type takes.
pub fn generic_arity(id: BuiltinTypeId) -> usize {
    match id {
        BuiltinTypeId::List => 1,
        BuiltinTypeId::Map => 2,
        _ => 0,
    }
}

/// Return the full metadata entry for a builtin type, if registered.
pub fn info_for(id: BuiltinTypeId) -> Option<&'static BuiltinTypeInfo> {
    BUILTIN_TYPES.iter().find(|t| t.id == id)
}

const fn info(
    id: BuiltinTypeId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    generic_arity: usize,
    description: &'static str,
) -> BuiltinTypeInfo {
    BuiltinTypeInfo {
        id,
        canonical,
        aliases,
        generic_arity,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_and_match_tables_agree() {
        for t in BUILTIN_TYPES {
            assert_eq!(as_str(t.id), t.canonical);
            assert_eq!(generic_arity(t.id), t.generic_arity);
            assert_eq!(from_str(t.canonical), Some(t.id));
            for alias in t.aliases {
                assert_eq!(from_str(alias), Some(t.id), "alias {alias}");
            }
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(from_str("STRING"), Some(BuiltinTypeId::Str));
        assert_eq!(from_str("Boolean"), Some(BuiltinTypeId::Bool));
        assert_eq!(from_str("Widget"), None);
    }
}
