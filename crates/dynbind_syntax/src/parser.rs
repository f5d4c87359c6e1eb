//! Parser for contract declarations
//!
//! Converts a token stream into a [`ContractFile`] AST.
//!
//! ## Grammar
//!
//! ```text
//! file      := interface* EOF
//! interface := DOC? 'interface' IDENT '{' method* '}'
//! method    := DOC? 'default'? type IDENT '(' (param (',' param)*)? ')' ('=' literal)? ';'
//! param     := type '...'? IDENT
//! type      := IDENT ('<' type (',' type)* '>')? ('[' ']')* '?'?
//! literal   := 'null' | 'true' | 'false' | '-'? INT | '-'? FLOAT | STRING
//!            | '[' (literal (',' literal)* ','?)? ']'
//!            | '{' ((IDENT | STRING) ':' literal (',' ...)* ','?)? '}'
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use dynbind_syntax::{lexer, parser};
//!
//! let source = "interface Counter { long next(); default int step() = 1; }";
//! let tokens = lexer::lex(source).unwrap();
//! let file = parser::parse(&tokens).unwrap();
//! assert_eq!(file.interfaces[0].node.methods.len(), 2);
//! ```

use crate::ast::*;
use crate::diagnostics::DeclError;
use crate::lexer::{KeywordId, PunctuationId, Token, TokenKind};

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while keeping each
// file focused on one part of the grammar.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/literals.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
