//! Dynamic bindings: the loosely-typed side of a binding.
//!
//! A [`DynamicBinding`] maps method names to [`BindingEntry`]s. An entry is either a callable ([`Invocable`], with an
//! optional declared [`Arity`]) or a constant value returned by every call, the way a non-function attribute of a
//! scripted object behaves. A binding may also carry one catch-all [`DynamicHandler`] that answers every method the
//! named entries do not cover.
//!
//! Bindings are immutable once built and `Send + Sync`; one binding may back any number of proxies.
//!
//! ## Examples
//! ```rust
//! use dynbind::binding::DynamicBinding;
//! use dynbind_core::Value;
//!
//! let binding = DynamicBinding::builder()
//!     .function("hello", |args: Vec<Value>| Ok(Value::from(format!("Hello {}", args[0].as_str().unwrap_or("?")))))
//!     .constant("aConstant", "fixed")
//!     .build();
//! assert_eq!(binding.len(), 2);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use dynbind_core::Value;

use crate::config::NameMatching;
use crate::contract::MethodSignature;
use crate::error::{BindingSourceError, CallResult};

// ============================================================================
// Callables
// ============================================================================

/// How many arguments a callable declares it takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arity {
    Exact(usize),
    /// Undeclared; accepted for any contract method.
    #[default]
    Any,
}

/// Something a contract method can be bound to.
///
/// Arguments arrive already coerced to the declared parameter types, in contract order, with a variadic tail packed
/// into one list.
pub trait Invocable: Send + Sync {
    fn invoke(&self, args: Vec<Value>) -> CallResult;

    fn arity(&self) -> Arity {
        Arity::Any
    }
}

impl<F> Invocable for F
where
    F: Fn(Vec<Value>) -> CallResult + Send + Sync,
{
    fn invoke(&self, args: Vec<Value>) -> CallResult {
        self(args)
    }
}

/// A callable with a declared arity, checked against the contract at construction.
struct WithArity<F> {
    arity: usize,
    f: F,
}

impl<F> Invocable for WithArity<F>
where
    F: Fn(Vec<Value>) -> CallResult + Send + Sync,
{
    fn invoke(&self, args: Vec<Value>) -> CallResult {
        (self.f)(args)
    }

    fn arity(&self) -> Arity {
        Arity::Exact(self.arity)
    }
}

/// Catch-all target that receives every call the named entries do not cover.
pub trait DynamicHandler: Send + Sync {
    fn handle(&self, method: &MethodSignature, args: Vec<Value>) -> CallResult;
}

impl<F> DynamicHandler for F
where
    F: Fn(&MethodSignature, Vec<Value>) -> CallResult + Send + Sync,
{
    fn handle(&self, method: &MethodSignature, args: Vec<Value>) -> CallResult {
        self(method, args)
    }
}

// ============================================================================
// Binding
// ============================================================================

/// What a method name is bound to.
#[derive(Clone)]
pub enum BindingEntry {
    Callable(Arc<dyn Invocable>),
    Constant(Value),
}

impl BindingEntry {
    pub fn is_callable(&self) -> bool {
        matches!(self, BindingEntry::Callable(_))
    }
}

impl fmt::Debug for BindingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingEntry::Callable(c) => f.debug_tuple("Callable").field(&c.arity()).finish(),
            BindingEntry::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
        }
    }
}

/// Mapping from method name to binding entry, plus an optional catch-all handler.
#[derive(Clone, Default)]
pub struct DynamicBinding {
    entries: BTreeMap<String, BindingEntry>,
    handler: Option<Arc<dyn DynamicHandler>>,
}

impl DynamicBinding {
    pub fn builder() -> BindingBuilder {
        BindingBuilder::default()
    }

    /// A binding with no named entries that routes every method to `handler`.
    pub fn from_handler(handler: impl DynamicHandler + 'static) -> Self {
        Self {
            entries: BTreeMap::new(),
            handler: Some(Arc::new(handler)),
        }
    }

    /// Build a binding of constant entries from a JSON object: each key binds a method to the value it returns.
    ///
    /// ## Errors
    /// Returns [`BindingSourceError::NotAnObject`] if `json` is not an object.
    pub fn from_json(json: serde_json::Value) -> Result<Self, BindingSourceError> {
        match Value::from(json) {
            Value::Map(map) => Ok(Self {
                entries: map.into_iter().map(|(k, v)| (k, BindingEntry::Constant(v))).collect(),
                handler: None,
            }),
            other => Err(BindingSourceError::NotAnObject { found: other.kind() }),
        }
    }

    /// Parse `source` as JSON and call [`DynamicBinding::from_json`].
    pub fn from_json_str(source: &str) -> Result<Self, BindingSourceError> {
        let json: serde_json::Value = serde_json::from_str(source)?;
        Self::from_json(json)
    }

    /// Find the entry for a contract method, preferring an exact key over a case-insensitive one.
    ///
    /// ## Returns
    /// The matched key and its entry.
    pub fn lookup(&self, name: &str, matching: NameMatching) -> Option<(&str, &BindingEntry)> {
        if let Some((key, entry)) = self.entries.get_key_value(name) {
            return Some((key.as_str(), entry));
        }
        match matching {
            NameMatching::Exact => None,
            NameMatching::IgnoreCase => self
                .entries
                .iter()
                .find(|(key, _)| matching.matches(key, name))
                .map(|(key, entry)| (key.as_str(), entry)),
        }
    }

    pub fn handler(&self) -> Option<&Arc<dyn DynamicHandler>> {
        self.handler.as_ref()
    }

    /// Bound names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.handler.is_none()
    }
}

impl fmt::Debug for DynamicBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicBinding")
            .field("entries", &self.entries)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Builder for [`DynamicBinding`]. Later entries replace earlier ones with the same name.
#[derive(Default)]
pub struct BindingBuilder {
    binding: DynamicBinding,
}

impl BindingBuilder {
    /// Bind `name` to a closure of undeclared arity.
    pub fn function<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> CallResult + Send + Sync + 'static,
    {
        self.callable(name, f)
    }

    /// Bind `name` to a closure that declares it takes exactly `arity` arguments.
    pub fn function_with_arity<F>(self, name: impl Into<String>, arity: usize, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> CallResult + Send + Sync + 'static,
    {
        self.callable(name, WithArity { arity, f })
    }

    /// Bind `name` to any [`Invocable`].
    pub fn callable(mut self, name: impl Into<String>, invocable: impl Invocable + 'static) -> Self {
        self.binding
            .entries
            .insert(name.into(), BindingEntry::Callable(Arc::new(invocable)));
        self
    }

    /// Bind `name` to a constant returned by every call.
    pub fn constant(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.binding
            .entries
            .insert(name.into(), BindingEntry::Constant(value.into()));
        self
    }

    /// Route every method without a named entry to `handler`.
    pub fn fallback(mut self, handler: impl DynamicHandler + 'static) -> Self {
        self.binding.handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> DynamicBinding {
        self.binding
    }
}
