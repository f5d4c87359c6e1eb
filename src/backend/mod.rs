//! dynbind backend: Rust source generation from interface contracts.
//!
//! The pipeline is:
//! 1. [`InterfaceContract`](crate::contract::InterfaceContract) → tokens (`quote!`)
//! 2. tokens → `syn::File` (validates the output is well-formed Rust)
//! 3. `syn::File` → source text (`prettyplease`)
//!
//! ## Module Organization
//!
//! - `facade.rs` - Typed trait + `impl Trait for Proxy` emission

pub mod facade;

pub use facade::{FacadeError, emit_facade, emit_facades};
