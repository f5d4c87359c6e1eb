//! The interface adapter: binds a contract to a dynamic binding and produces a [`Proxy`].
//!
//! Construction resolves every contract method against the binding once, eagerly. A proxy call then only:
//! 1. resolves the method name in the contract,
//! 2. checks the argument count and coerces each argument to its declared type,
//! 3. dispatches to the resolved target (callable, constant, catch-all handler, or contract default),
//! 4. coerces the raw result to the declared return type.
//!
//! ## Notes
//! - Proxies are stateless beyond shared, immutable data: `Clone` is cheap and calls may run concurrently.
//! - A variadic tail is always collected: `varArgs(1, 2, 3)` reaches the binding as the single argument `[1, 2, 3]`.

use std::sync::Arc;

use dynbind_core::{FromValue, Value, coerce};

use crate::binding::{Arity, BindingEntry, DynamicBinding};
use crate::config::{AdapterConfig, Provisioning};
use crate::contract::{InterfaceContract, MethodSignature};
use crate::error::{AdapterError, Position};

/// Binds contracts to dynamic bindings under one [`AdapterConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Adapter {
    config: AdapterConfig,
}

/// Construct a proxy with the default configuration.
///
/// ## Errors
/// See [`Adapter::construct`].
pub fn construct(
    contract: impl Into<Arc<InterfaceContract>>,
    binding: impl Into<Arc<DynamicBinding>>,
) -> Result<Proxy, AdapterError> {
    Adapter::default().construct(contract, binding)
}

impl Adapter {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Validate `binding` against `contract` and produce a proxy.
    ///
    /// ## Notes
    /// Each method resolves, in order, to:
    /// 1. the binding's named entry for it (exact key first, then a case-insensitive match when configured),
    /// 2. otherwise the binding's catch-all handler, even when the method declares a default,
    /// 3. otherwise the method's declared default value.
    ///
    /// A binding with a handler therefore shadows every default; bind a method by name to override the handler.
    /// [`Proxy::resolution`] reports the outcome per method.
    ///
    /// ## Errors
    /// - [`AdapterError::ArityMismatch`] if a callable declares an arity different from its method's parameter
    ///   count (the first such method, in contract order).
    /// - [`AdapterError::BindingIncomplete`] naming every required method without an entry, unless provisioning is
    ///   lenient or the binding has a catch-all handler.
    ///
    /// Binding entries that match no contract method are logged and otherwise ignored.
    #[tracing::instrument(skip_all, fields(interface = tracing::field::Empty))]
    pub fn construct(
        &self,
        contract: impl Into<Arc<InterfaceContract>>,
        binding: impl Into<Arc<DynamicBinding>>,
    ) -> Result<Proxy, AdapterError> {
        let contract = contract.into();
        let binding = binding.into();
        let matching = self.config.name_matching;
        tracing::Span::current().record("interface", contract.name());

        let mut targets = Vec::with_capacity(contract.methods().len());
        let mut used = Vec::new();
        let mut missing = Vec::new();

        for method in contract.methods() {
            let target = match binding.lookup(method.name(), matching) {
                Some((key, entry)) => {
                    check_arity(method, entry)?;
                    used.push(key);
                    Target::Entry(entry.clone())
                }
                None if binding.handler().is_some() => Target::Handler,
                None if method.has_default() => Target::Default,
                None => {
                    missing.push(method.name().to_string());
                    Target::Unbound
                }
            };
            targets.push(target);
        }

        if !missing.is_empty() {
            match self.config.provisioning {
                Provisioning::Strict => {
                    return Err(AdapterError::BindingIncomplete {
                        interface: contract.name().to_string(),
                        missing,
                    });
                }
                Provisioning::Lenient => {
                    tracing::warn!(missing = ?missing, "binding is incomplete; calls to these methods will fail");
                }
            }
        }

        for name in binding.names().filter(|name| !used.contains(name)) {
            tracing::warn!(entry = name, "binding entry matches no contract method");
        }

        tracing::debug!(
            methods = targets.len(),
            bound = used.len(),
            handler = binding.handler().is_some(),
            "constructed proxy"
        );

        Ok(Proxy {
            inner: Arc::new(ProxyInner {
                contract,
                binding,
                config: self.config,
                targets,
            }),
        })
    }
}

fn check_arity(method: &MethodSignature, entry: &BindingEntry) -> Result<(), AdapterError> {
    let BindingEntry::Callable(callable) = entry else {
        return Ok(());
    };
    match callable.arity() {
        Arity::Exact(found) if found != method.binding_arity() => Err(AdapterError::ArityMismatch {
            method: method.name().to_string(),
            expected: method.binding_arity(),
            found,
        }),
        _ => Ok(()),
    }
}

// ============================================================================
// Proxy
// ============================================================================

/// Where a contract method's calls go, resolved at construction.
#[derive(Debug, Clone)]
enum Target {
    Entry(BindingEntry),
    Handler,
    Default,
    Unbound,
}

/// Public view of a resolved [`Target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Callable,
    Constant,
    Handler,
    Default,
    Unbound,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Callable => "callable",
            Resolution::Constant => "constant",
            Resolution::Handler => "handler",
            Resolution::Default => "default",
            Resolution::Unbound => "unbound",
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
struct ProxyInner {
    contract: Arc<InterfaceContract>,
    binding: Arc<DynamicBinding>,
    config: AdapterConfig,
    targets: Vec<Target>,
}

/// A contract-conforming view of a dynamic binding.
#[derive(Debug, Clone)]
pub struct Proxy {
    inner: Arc<ProxyInner>,
}

impl Proxy {
    pub fn contract(&self) -> &InterfaceContract {
        &self.inner.contract
    }

    pub fn binding(&self) -> &DynamicBinding {
        &self.inner.binding
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.inner.config
    }

    /// Return `true` if calling `method` would reach the binding or a contract default.
    pub fn is_bound(&self, method: &str) -> bool {
        self.resolve(method)
            .is_ok_and(|(_, target)| !matches!(target, Target::Unbound))
    }

    /// How calls to `method` are served, or `None` if the contract has no such method.
    pub fn resolution(&self, method: &str) -> Option<Resolution> {
        let (_, target) = self.resolve(method).ok()?;
        Some(match target {
            Target::Entry(BindingEntry::Callable(_)) => Resolution::Callable,
            Target::Entry(BindingEntry::Constant(_)) => Resolution::Constant,
            Target::Handler => Resolution::Handler,
            Target::Default => Resolution::Default,
            Target::Unbound => Resolution::Unbound,
        })
    }

    /// Call `method` with dynamic arguments.
    ///
    /// ## Errors
    /// - [`AdapterError::UnknownMethod`] if the contract has no such method.
    /// - [`AdapterError::ArgumentCount`] if the number of arguments does not fit the signature.
    /// - [`AdapterError::TypeCoercion`] if an argument or the result does not conform to its declared type.
    /// - [`AdapterError::UnboundMethod`] if the method has neither a binding nor a default.
    /// - [`AdapterError::Invocation`] wrapping any failure raised by the binding.
    pub fn invoke(&self, method: &str, args: Vec<Value>) -> Result<Value, AdapterError> {
        let (sig, target) = self.resolve(method)?;
        let name = sig.name();

        let expected = sig.expected_args();
        if !expected.accepts(args.len()) {
            return Err(AdapterError::ArgumentCount {
                method: name.to_string(),
                expected,
                found: args.len(),
            });
        }
        let args = pack_arguments(sig, args)?;

        let raw = match target {
            Target::Default => {
                tracing::trace!(method = name, "returning contract default");
                // Defaults were coerced to the return type when the contract was built.
                return Ok(sig.default_value().cloned().unwrap_or_default());
            }
            Target::Unbound => {
                return Err(AdapterError::UnboundMethod {
                    method: name.to_string(),
                });
            }
            Target::Entry(BindingEntry::Constant(value)) => {
                tracing::trace!(method = name, "returning bound constant");
                value.clone()
            }
            Target::Entry(BindingEntry::Callable(callable)) => {
                tracing::trace!(method = name, args = args.len(), "invoking bound callable");
                callable.invoke(args).map_err(|source| AdapterError::Invocation {
                    method: name.to_string(),
                    source,
                })?
            }
            Target::Handler => {
                let Some(handler) = self.inner.binding.handler() else {
                    return Err(AdapterError::UnboundMethod {
                        method: name.to_string(),
                    });
                };
                tracing::trace!(method = name, args = args.len(), "invoking catch-all handler");
                handler.handle(sig, args).map_err(|source| AdapterError::Invocation {
                    method: name.to_string(),
                    source,
                })?
            }
        };

        coerce(raw, sig.return_type()).map_err(|source| AdapterError::TypeCoercion {
            method: name.to_string(),
            position: Position::Return,
            source,
        })
    }

    /// Call `method` and convert the result to a Rust type.
    ///
    /// ## Errors
    /// As [`Proxy::invoke`]; a result that does not convert to `R` is reported as a return-value
    /// [`AdapterError::TypeCoercion`].
    pub fn call<R: FromValue>(&self, method: &str, args: Vec<Value>) -> Result<R, AdapterError> {
        let value = self.invoke(method, args)?;
        R::from_value(value).map_err(|source| AdapterError::TypeCoercion {
            method: method.to_string(),
            position: Position::Return,
            source,
        })
    }

    fn resolve(&self, method: &str) -> Result<(&MethodSignature, &Target), AdapterError> {
        let contract = &self.inner.contract;
        let index = contract
            .position(method, self.inner.config.name_matching)
            .ok_or_else(|| AdapterError::UnknownMethod {
                interface: contract.name().to_string(),
                method: method.to_string(),
            })?;
        match (contract.methods().get(index), self.inner.targets.get(index)) {
            (Some(sig), Some(target)) => Ok((sig, target)),
            _ => Err(AdapterError::UnknownMethod {
                interface: contract.name().to_string(),
                method: method.to_string(),
            }),
        }
    }
}

/// Coerce each argument to its declared type and collect a variadic tail into one list.
fn pack_arguments(sig: &MethodSignature, args: Vec<Value>) -> Result<Vec<Value>, AdapterError> {
    let params = sig.params();
    let fixed = if sig.is_variadic() { params.len() - 1 } else { params.len() };

    let mut packed = Vec::with_capacity(params.len());
    let mut tail = Vec::new();
    for (i, arg) in args.into_iter().enumerate() {
        // Past the fixed prefix every argument belongs to the variadic parameter.
        let param = &params[i.min(params.len().saturating_sub(1))];
        let value = coerce(arg, &param.ty).map_err(|source| AdapterError::TypeCoercion {
            method: sig.name().to_string(),
            position: Position::Argument(i),
            source,
        })?;
        if i < fixed {
            packed.push(value);
        } else {
            tail.push(value);
        }
    }
    if sig.is_variadic() {
        packed.push(Value::List(tail));
    }
    Ok(packed)
}
