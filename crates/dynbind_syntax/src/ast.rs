//! Abstract Syntax Tree definitions for contract declarations.

use std::fmt;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

pub type Ident = String;

/// A declaration file is a sequence of interfaces
#[derive(Debug, Clone, PartialEq)]
pub struct ContractFile {
    pub interfaces: Vec<Spanned<InterfaceDecl>>,
}

/// `interface Name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: Spanned<Ident>,
    /// Text of a preceding `/** ... */` comment, trimmed.
    pub doc: Option<String>,
    pub methods: Vec<Spanned<MethodDecl>>,
}

/// `[default] ReturnType name(params) [= literal];`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub doc: Option<String>,
    pub is_default: bool,
    pub return_type: Spanned<TypeExpr>,
    pub name: Spanned<Ident>,
    pub params: Vec<Spanned<Param>>,
    pub default_value: Option<Spanned<Literal>>,
}

/// `Type [...] name`
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: Spanned<TypeExpr>,
    pub name: Spanned<Ident>,
    pub variadic: bool,
}

/// A type as spelled in source; names are resolved during lowering.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `String`, `List<T>`, `Map<K, V>`
    Named(Ident, Vec<Spanned<TypeExpr>>),
    /// `T[]`
    Array(Box<Spanned<TypeExpr>>),
    /// `T?`
    Optional(Box<Spanned<TypeExpr>>),
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Named(name, args) if args.is_empty() => write!(f, "{name}"),
            TypeExpr::Named(name, args) => {
                write!(f, "{name}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg.node)?;
                }
                f.write_str(">")
            }
            TypeExpr::Array(elem) => write!(f, "{}[]", elem.node),
            TypeExpr::Optional(inner) => write!(f, "{}?", inner.node),
        }
    }
}

/// A default-value literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Spanned<Literal>>),
    Map(Vec<(Spanned<String>, Spanned<Literal>)>),
}
