#![forbid(unsafe_code)]
//! dynbind: bind statically declared interface contracts to dynamic implementations.
//!
//! A host declares an [`InterfaceContract`] (in code, or in a small interface declaration language).
//! An implementation arrives at runtime as a [`DynamicBinding`]: closures, constants, JSON, or a catch-all handler.
//! The [`Adapter`] checks the binding against the contract once, up front, and produces a [`Proxy`] whose calls are
//! translated and type-checked at the boundary.
//!
//! ## Panic Policy
//!
//! - **Production code**: `Result`/`Option` with `?`; `#![deny(clippy::unwrap_used)]` below.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! ## Examples
//! ```rust
//! use dynbind::{DynamicBinding, construct, parse_contracts};
//! use dynbind_core::Value;
//!
//! let contract = parse_contracts("interface Summer { int varArgs(int... values); }")
//!     .unwrap()
//!     .remove(0);
//! let binding = DynamicBinding::builder()
//!     .function("varArgs", |args: Vec<Value>| {
//!         let values = args[0].as_list().unwrap_or_default();
//!         Ok(Value::Int(values.iter().filter_map(Value::as_i64).sum()))
//!     })
//!     .build();
//!
//! let proxy = construct(contract, binding).unwrap();
//! let total: i32 = proxy.call("varArgs", vec![1.into(), 3.into(), 5.into(), 7.into(), 9.into()]).unwrap();
//! assert_eq!(total, 25);
//! ```

#![deny(clippy::unwrap_used)]

pub mod adapter;
pub mod backend;
pub mod binding;
pub mod cli;
pub mod config;
pub mod contract;
pub mod error;

pub use adapter::{Adapter, Proxy, Resolution, construct};
pub use binding::{Arity, BindingBuilder, BindingEntry, DynamicBinding, DynamicHandler, Invocable};
pub use config::{AdapterConfig, DynbindConfig, NameMatching, Provisioning};
pub use contract::{ContractBuilder, InterfaceContract, MethodSignature, Parameter, parse_contracts};
pub use error::{AdapterError, BindingSourceError, CallError, CallResult, ContractError};

pub use dynbind_core::{FromValue, IntoValue, SemanticType, Value};
