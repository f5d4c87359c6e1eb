//! Error types for contract building, binding sources and the adapter boundary.
//!
//! ## Notes
//! - Construction errors ([`AdapterError::BindingIncomplete`], [`AdapterError::ArityMismatch`]) are reported once,
//!   eagerly, by [`crate::Adapter::construct`]; every other [`AdapterError`] comes from a call through a proxy.
//! - Failures raised by a bound callable are never flattened to text: [`AdapterError::Invocation`] keeps the original
//!   error as its `source()`.

use std::fmt;

use dynbind_core::{CoercionError, ValueKind};
use miette::Diagnostic;
use thiserror::Error;

/// Error returned by a bound callable or catch-all handler.
pub type CallError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a single dynamic call, before return-type coercion.
pub type CallResult = Result<dynbind_core::Value, CallError>;

// ============================================================================
// Adapter errors
// ============================================================================

/// Where in a call a value failed to coerce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Zero-based position in the caller's argument list.
    Argument(usize),
    Return,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Argument(i) => write!(f, "argument {i}"),
            Position::Return => f.write_str("return value"),
        }
    }
}

/// How many arguments a method accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedArgs {
    Exactly(usize),
    AtLeast(usize),
}

impl ExpectedArgs {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            ExpectedArgs::Exactly(n) => count == n,
            ExpectedArgs::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for ExpectedArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedArgs::Exactly(n) => write!(f, "{n}"),
            ExpectedArgs::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Failure to construct a proxy, or to complete a call through one.
#[derive(Debug, Error, Diagnostic)]
pub enum AdapterError {
    #[error("binding for '{interface}' is incomplete; missing: {}", .missing.join(", "))]
    #[diagnostic(
        code(dynbind::binding_incomplete),
        help("bind every non-default method, or construct with lenient provisioning")
    )]
    BindingIncomplete { interface: String, missing: Vec<String> },

    #[error("'{method}' is bound to a callable taking {found} argument(s), but the contract declares {expected}")]
    #[diagnostic(code(dynbind::arity_mismatch))]
    ArityMismatch { method: String, expected: usize, found: usize },

    #[error("'{interface}' has no method '{method}'")]
    #[diagnostic(code(dynbind::unknown_method))]
    UnknownMethod { interface: String, method: String },

    #[error("'{method}' takes {expected} argument(s) but {found} were supplied")]
    #[diagnostic(code(dynbind::argument_count))]
    ArgumentCount {
        method: String,
        expected: ExpectedArgs,
        found: usize,
    },

    #[error("'{method}' has no binding and no default")]
    #[diagnostic(code(dynbind::unbound_method))]
    UnboundMethod { method: String },

    #[error("'{method}' failed: {source}")]
    #[diagnostic(code(dynbind::invocation))]
    Invocation {
        method: String,
        #[source]
        source: CallError,
    },

    #[error("{position} of '{method}': {source}")]
    #[diagnostic(code(dynbind::type_coercion))]
    TypeCoercion {
        method: String,
        position: Position,
        #[source]
        source: CoercionError,
    },
}

impl AdapterError {
    /// Name of the method the error concerns, if it concerns exactly one.
    pub fn method(&self) -> Option<&str> {
        match self {
            AdapterError::BindingIncomplete { .. } => None,
            AdapterError::ArityMismatch { method, .. }
            | AdapterError::UnknownMethod { method, .. }
            | AdapterError::ArgumentCount { method, .. }
            | AdapterError::UnboundMethod { method }
            | AdapterError::Invocation { method, .. }
            | AdapterError::TypeCoercion { method, .. } => Some(method),
        }
    }
}

// ============================================================================
// Contract and binding-source errors
// ============================================================================

/// A programmatically built contract is not well formed.
///
/// Parsed declarations report the same problems as span-carrying [`dynbind_syntax::DeclError`]s instead.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ContractError {
    #[error("interface name must not be empty")]
    #[diagnostic(code(dynbind::contract))]
    EmptyName,

    #[error("method '{method}' is declared more than once")]
    #[diagnostic(code(dynbind::contract))]
    DuplicateMethod { method: String },

    #[error("parameter '{param}' of '{method}' is declared more than once")]
    #[diagnostic(code(dynbind::contract))]
    DuplicateParameter { method: String, param: String },

    #[error("variadic parameter '{param}' of '{method}' must be the last parameter")]
    #[diagnostic(code(dynbind::contract))]
    VariadicNotLast { method: String, param: String },

    #[error("parameter '{param}' of '{method}' cannot be void")]
    #[diagnostic(code(dynbind::contract))]
    VoidParameter { method: String, param: String },

    #[error("doc comment of '{owner}' contains '*/'")]
    #[diagnostic(code(dynbind::contract), help("a doc comment cannot contain its own terminator"))]
    DocTerminator { owner: String },

    #[error("default value of '{method}' does not match its return type: {source}")]
    #[diagnostic(code(dynbind::contract), help("a default without a value is only allowed for void, any and optional returns"))]
    DefaultMismatch {
        method: String,
        #[source]
        source: CoercionError,
    },
}

/// A binding document could not be turned into a [`crate::DynamicBinding`].
#[derive(Debug, Error, Diagnostic)]
pub enum BindingSourceError {
    #[error("binding document must be a JSON object, found {found}")]
    #[diagnostic(code(dynbind::binding_source), help("write one key per method, mapped to the value that method returns"))]
    NotAnObject { found: ValueKind },

    #[error("invalid binding JSON: {0}")]
    #[diagnostic(code(dynbind::binding_source))]
    Json(#[from] serde_json::Error),
}
