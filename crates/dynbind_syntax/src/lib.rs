//! Contract declaration frontend for dynbind: lexer, parser, AST, diagnostics.
//!
//! Hosts describe the interfaces they expect a dynamic binding to satisfy in a small C-family
//! language:
//!
//! ```text
//! /** Called once per tick. */
//! interface Plugin {
//!     void tick(long now);
//!     int score(String... tags);
//!     default boolean enabled() = true;
//! }
//! ```
//!
//! ## Notes
//! - This crate is intentionally “syntax-only”: it does not resolve type names or check defaults. Lowering to a
//!   checked contract happens in the `dynbind` crate.
//! - Errors are collected (not fail-fast) and carry byte spans; they implement [`miette::Diagnostic`].
//!
//! ## Examples
//! ```rust
//! use dynbind_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("interface Empty {}").unwrap();
//! let file = parser::parse(&tokens).unwrap();
//! assert_eq!(file.interfaces.len(), 1);
//! ```

#![deny(clippy::unwrap_used)]

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;

pub use diagnostics::{DeclError, ErrorKind};

/// Lex and parse a contract declaration source in one step.
///
/// ## Errors
/// Returns every lexing error, or (if lexing succeeded) every parse error.
pub fn parse_source(source: &str) -> Result<ast::ContractFile, Vec<DeclError>> {
    let tokens = lexer::lex(source)?;
    parser::parse(&tokens)
}
