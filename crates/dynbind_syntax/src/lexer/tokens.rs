//! Token types for the contract declaration lexer.

use crate::ast::Span;

/// Reserved words of the declaration language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    Interface,
    Default,
    True,
    False,
    Null,
}

impl KeywordId {
    pub fn as_str(self) -> &'static str {
        match self {
            KeywordId::Interface => "interface",
            KeywordId::Default => "default",
            KeywordId::True => "true",
            KeywordId::False => "false",
            KeywordId::Null => "null",
        }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
///
/// ## Notes
/// - Keywords are case-sensitive (unlike type names, which resolve case-insensitively during lowering).
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    match name {
        "interface" => Some(KeywordId::Interface),
        "default" => Some(KeywordId::Default),
        "true" => Some(KeywordId::True),
        "false" => Some(KeywordId::False),
        "null" => Some(KeywordId::Null),
        _ => None,
    }
}

/// Punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Lt,
    Gt,
    Comma,
    Semicolon,
    Colon,
    Eq,
    Question,
    Minus,
    Ellipsis,
}

impl PunctuationId {
    pub fn as_str(self) -> &'static str {
        match self {
            PunctuationId::LBrace => "{",
            PunctuationId::RBrace => "}",
            PunctuationId::LParen => "(",
            PunctuationId::RParen => ")",
            PunctuationId::LBracket => "[",
            PunctuationId::RBracket => "]",
            PunctuationId::Lt => "<",
            PunctuationId::Gt => ">",
            PunctuationId::Comma => ",",
            PunctuationId::Semicolon => ";",
            PunctuationId::Colon => ":",
            PunctuationId::Eq => "=",
            PunctuationId::Question => "?",
            PunctuationId::Minus => "-",
            PunctuationId::Ellipsis => "...",
        }
    }
}

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(KeywordId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Int(i64),
    Float(f64),
    String(String),

    /// Body of a `/** ... */` comment, leading `*` gutters stripped.
    DocComment(String),

    Eof,
}

impl TokenKind {
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Short description used in "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Keyword(k) => format!("keyword '{}'", k.as_str()),
            TokenKind::Punctuation(p) => format!("'{}'", p.as_str()),
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::Int(i) => format!("integer {i}"),
            TokenKind::Float(x) => format!("float {x}"),
            TokenKind::String(s) => format!("string {s:?}"),
            TokenKind::DocComment(_) => "doc comment".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

/// A token with its kind and source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}
