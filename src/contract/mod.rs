//! Interface contracts: the statically declared side of a binding.
//!
//! A contract is an ordered set of [`MethodSignature`]s under an interface name. It is built either in code through
//! [`ContractBuilder`] or from declaration source through [`parse_contracts`], and is immutable once built.
//!
//! ## Examples
//! ```rust
//! use dynbind::contract::{InterfaceContract, MethodSignature};
//! use dynbind_core::SemanticType;
//!
//! let contract = InterfaceContract::builder("Greeter")
//!     .method(MethodSignature::new("hello", SemanticType::Str).param("name", SemanticType::Str))
//!     .method(MethodSignature::new("polite", SemanticType::Bool).with_default(true))
//!     .build()
//!     .unwrap();
//! assert_eq!(contract.methods().len(), 2);
//! assert!(contract.method("polite").unwrap().has_default());
//! ```

mod lower;

pub use lower::{lower_file, parse_contracts};

use std::collections::HashSet;
use std::fmt;

use dynbind_core::{SemanticType, Value, coerce};
use serde::Serialize;

use crate::config::NameMatching;
use crate::error::{ContractError, ExpectedArgs};

// ============================================================================
// Signatures
// ============================================================================

/// A declared method parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    /// Declared type; for a variadic parameter this is the element type.
    #[serde(rename = "type")]
    pub ty: SemanticType,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub variadic: bool,
}

impl Parameter {
    /// The type the binding sees for this parameter: variadics arrive as one list.
    pub fn binding_type(&self) -> SemanticType {
        if self.variadic {
            SemanticType::list(self.ty.clone())
        } else {
            self.ty.clone()
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variadic {
            write!(f, "{}... {}", self.ty, self.name)
        } else {
            write!(f, "{} {}", self.ty, self.name)
        }
    }
}

/// One method of an interface contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSignature {
    name: String,
    params: Vec<Parameter>,
    return_type: SemanticType,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc: Option<String>,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, return_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type,
            default: None,
            doc: None,
        }
    }

    /// Append a fixed parameter.
    pub fn param(mut self, name: impl Into<String>, ty: SemanticType) -> Self {
        self.params.push(Parameter {
            name: name.into(),
            ty,
            variadic: false,
        });
        self
    }

    /// Append a variadic parameter of element type `element`. It must be the last one.
    pub fn variadic(mut self, name: impl Into<String>, element: SemanticType) -> Self {
        self.params.push(Parameter {
            name: name.into(),
            ty: element,
            variadic: true,
        });
        self
    }

    /// Mark the method as default, returning `value` when the binding does not provide it.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Attach a doc comment. Trailing whitespace and surrounding blank lines are dropped; an empty doc is none.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = normalize_doc(doc.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn return_type(&self) -> &SemanticType {
        &self.return_type
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Value returned when the binding has no entry for this method.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(|p| p.variadic)
    }

    /// Number of arguments a bound callable receives (a variadic tail counts as one).
    pub fn binding_arity(&self) -> usize {
        self.params.len()
    }

    /// Number of arguments a caller must supply.
    pub fn expected_args(&self) -> ExpectedArgs {
        if self.is_variadic() {
            ExpectedArgs::AtLeast(self.params.len() - 1)
        } else {
            ExpectedArgs::Exactly(self.params.len())
        }
    }

    fn validate(&mut self) -> Result<(), ContractError> {
        check_doc(&self.name, self.doc.as_deref())?;
        let mut seen = HashSet::new();
        for (i, param) in self.params.iter().enumerate() {
            if !seen.insert(param.name.as_str()) {
                return Err(ContractError::DuplicateParameter {
                    method: self.name.clone(),
                    param: param.name.clone(),
                });
            }
            if param.variadic && i + 1 != self.params.len() {
                return Err(ContractError::VariadicNotLast {
                    method: self.name.clone(),
                    param: param.name.clone(),
                });
            }
            if param.ty.is_void() {
                return Err(ContractError::VoidParameter {
                    method: self.name.clone(),
                    param: param.name.clone(),
                });
            }
        }
        // Store defaults in their coerced form so `1` declared for a double is returned as `1.0`.
        if let Some(default) = self.default.take() {
            let coerced = coerce(default, &self.return_type).map_err(|source| ContractError::DefaultMismatch {
                method: self.name.clone(),
                source,
            })?;
            self.default = Some(coerced);
        }
        Ok(())
    }
}

impl fmt::Display for MethodSignature {
    /// Render in declaration syntax, e.g. `default boolean aDefault() = true;`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_default() {
            f.write_str("default ")?;
        }
        write!(f, "{} {}(", self.return_type, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")?;
        match &self.default {
            // `void` defaults carry no value worth printing.
            Some(value) if !self.return_type.is_void() => write!(f, " = {value};"),
            _ => f.write_str(";"),
        }
    }
}

// ============================================================================
// Contracts
// ============================================================================

/// A named, ordered set of method signatures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceContract {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc: Option<String>,
    methods: Vec<MethodSignature>,
}

impl InterfaceContract {
    pub fn builder(name: impl Into<String>) -> ContractBuilder {
        ContractBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Methods in declaration order.
    pub fn methods(&self) -> &[MethodSignature] {
        &self.methods
    }

    /// Look up a method by its exact name.
    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Look up a method's position, preferring an exact match over a case-insensitive one.
    pub fn position(&self, name: &str, matching: NameMatching) -> Option<usize> {
        self.methods
            .iter()
            .position(|m| m.name == name)
            .or_else(|| self.methods.iter().position(|m| matching.matches(&m.name, name)))
    }

    /// Methods the binding must provide (those without a default).
    pub fn required_methods(&self) -> impl Iterator<Item = &MethodSignature> {
        self.methods.iter().filter(|m| !m.has_default())
    }
}

impl fmt::Display for InterfaceContract {
    /// Render as declaration source that parses back to the same contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(doc) = &self.doc {
            write_doc(f, "", doc)?;
        }
        writeln!(f, "interface {} {{", self.name)?;
        for method in &self.methods {
            if let Some(doc) = &method.doc {
                write_doc(f, "    ", doc)?;
            }
            writeln!(f, "    {method}")?;
        }
        f.write_str("}")
    }
}

// ============================================================================
// Doc comments
// ============================================================================

/// Trim trailing whitespace from every line and drop surrounding blank lines.
///
/// This is the form the declaration lexer hands back for a `/** ... */` body, so a normalized doc renders and
/// re-lexes to itself.
fn normalize_doc(doc: String) -> Option<String> {
    let text = doc.lines().map(str::trim_end).collect::<Vec<_>>().join("\n");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// `*/` would close the comment early and there is no escape for it inside a comment.
fn check_doc(owner: &str, doc: Option<&str>) -> Result<(), ContractError> {
    match doc {
        Some(doc) if doc.contains("*/") => Err(ContractError::DocTerminator {
            owner: owner.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Write a doc comment on its own line(s).
///
/// Single-line docs use `/** text */`. Multi-line docs, and docs starting with `*` (which the lexer would read as a
/// gutter), put every line behind a ` * ` gutter.
fn write_doc(f: &mut fmt::Formatter<'_>, indent: &str, doc: &str) -> fmt::Result {
    if !doc.contains('\n') && !doc.starts_with('*') {
        return writeln!(f, "{indent}/** {doc} */");
    }
    writeln!(f, "{indent}/**")?;
    for line in doc.lines() {
        if line.is_empty() {
            writeln!(f, "{indent} *")?;
        } else {
            writeln!(f, "{indent} * {line}")?;
        }
    }
    writeln!(f, "{indent} */")
}

/// Builder for [`InterfaceContract`].
#[derive(Debug, Clone)]
pub struct ContractBuilder {
    name: String,
    doc: Option<String>,
    methods: Vec<MethodSignature>,
}

impl ContractBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            methods: Vec::new(),
        }
    }

    /// Attach a doc comment, normalized like [`MethodSignature::with_doc`].
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = normalize_doc(doc.into());
        self
    }

    pub fn method(mut self, method: MethodSignature) -> Self {
        self.methods.push(method);
        self
    }

    /// Validate and freeze the contract.
    ///
    /// ## Errors
    /// - [`ContractError::DuplicateMethod`] / [`ContractError::DuplicateParameter`] for repeated names.
    /// - [`ContractError::VariadicNotLast`] if a variadic parameter is followed by another parameter.
    /// - [`ContractError::DefaultMismatch`] if a default value does not conform to its return type.
    /// - [`ContractError::DocTerminator`] if a doc comment contains `*/`.
    pub fn build(mut self) -> Result<InterfaceContract, ContractError> {
        if self.name.trim().is_empty() {
            return Err(ContractError::EmptyName);
        }
        check_doc(&self.name, self.doc.as_deref())?;
        let mut seen = HashSet::new();
        for method in &mut self.methods {
            if !seen.insert(method.name.clone()) {
                return Err(ContractError::DuplicateMethod {
                    method: method.name.clone(),
                });
            }
            method.validate()?;
        }
        Ok(InterfaceContract {
            name: self.name,
            doc: self.doc,
            methods: self.methods,
        })
    }
}
