//! Contract language vocabulary registries.
//!
//! Callers work with **stable IDs** (e.g. [`types::BuiltinTypeId`]) and look up spellings/metadata via registry
//! tables instead of matching type names as strings across the frontend and tooling.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//!
//! ## Examples
//! ```rust
//! use dynbind_core::lang::types::{self, BuiltinTypeId};
//!
//! assert_eq!(types::from_str("Integer"), Some(BuiltinTypeId::Int));
//! assert_eq!(types::as_str(BuiltinTypeId::Str), "String");
//! ```

pub mod types;
