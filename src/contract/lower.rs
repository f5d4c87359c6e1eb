//! Lowering from the declaration AST to checked [`InterfaceContract`]s.
//!
//! Parsing only checks shape; this pass resolves type names through the builtin registry and reports, with spans:
//! unknown types, wrong generic arity, non-`String` map keys, duplicate names, misplaced variadics and defaults that
//! do not conform to their return type. Errors are collected across the whole file.

use std::collections::HashSet;

use indexmap::IndexMap;

use dynbind_core::lang::types::{self as builtin, BuiltinTypeId};
use dynbind_core::{SemanticType, Value, coerce};
use dynbind_syntax::DeclError;
use dynbind_syntax::ast::{ContractFile, InterfaceDecl, Literal, MethodDecl, Span, Spanned, TypeExpr};

use super::{InterfaceContract, MethodSignature};

/// Parse declaration source and lower every interface in it.
///
/// ## Errors
/// Returns every syntax error, or (if the source parses) every contract error.
pub fn parse_contracts(source: &str) -> Result<Vec<InterfaceContract>, Vec<DeclError>> {
    let file = dynbind_syntax::parse_source(source)?;
    lower_file(&file)
}

/// Lower a parsed file.
#[tracing::instrument(skip_all, fields(interfaces = file.interfaces.len()))]
pub fn lower_file(file: &ContractFile) -> Result<Vec<InterfaceContract>, Vec<DeclError>> {
    let mut errors = Vec::new();
    let mut contracts = Vec::new();
    let mut seen = HashSet::new();

    for iface in &file.interfaces {
        if !seen.insert(iface.node.name.node.as_str()) {
            errors.push(DeclError::contract(
                format!("Interface '{}' is declared more than once", iface.node.name.node),
                iface.node.name.span,
            ));
            continue;
        }
        match lower_interface(&iface.node, iface.span) {
            Ok(contract) => contracts.push(contract),
            Err(mut errs) => errors.append(&mut errs),
        }
    }

    if errors.is_empty() {
        tracing::debug!(count = contracts.len(), "lowered contracts");
        Ok(contracts)
    } else {
        Err(errors)
    }
}

fn lower_interface(decl: &InterfaceDecl, span: Span) -> Result<InterfaceContract, Vec<DeclError>> {
    let mut errors = Vec::new();
    let mut builder = InterfaceContract::builder(decl.name.node.clone());
    if let Some(doc) = &decl.doc {
        builder = builder.doc(doc.clone());
    }

    let mut seen = HashSet::new();
    for method in &decl.methods {
        let name = &method.node.name;
        if !seen.insert(name.node.as_str()) {
            errors.push(
                DeclError::contract(
                    format!("Method '{}' is declared more than once in '{}'", name.node, decl.name.node),
                    name.span,
                )
                .with_note("Overloading is not supported; every method name must be unique"),
            );
            continue;
        }
        match lower_method(&method.node) {
            Ok(sig) => builder = builder.method(sig),
            Err(mut errs) => errors.append(&mut errs),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    // Everything build() checks has been reported with a better span above.
    builder
        .build()
        .map_err(|e| vec![DeclError::contract(e.to_string(), span)])
}

fn lower_method(decl: &MethodDecl) -> Result<MethodSignature, Vec<DeclError>> {
    let mut errors = Vec::new();
    let return_type = resolve_type(&decl.return_type, TypePosition::Return);
    let mut sig = MethodSignature::new(decl.name.node.clone(), SemanticType::Void);
    if let Some(doc) = &decl.doc {
        sig = sig.with_doc(doc.clone());
    }

    let mut param_names = HashSet::new();
    for (i, param) in decl.params.iter().enumerate() {
        let p = &param.node;
        if !param_names.insert(p.name.node.as_str()) {
            errors.push(DeclError::contract(
                format!("Parameter '{}' of '{}' is declared more than once", p.name.node, decl.name.node),
                p.name.span,
            ));
        }
        if p.variadic && i + 1 != decl.params.len() {
            errors.push(
                DeclError::contract(
                    format!("Variadic parameter '{}' must be the last parameter", p.name.node),
                    param.span,
                )
                .with_hint("Move it to the end of the parameter list, or declare it as a List"),
            );
        }
        match resolve_type(&p.ty, TypePosition::Parameter) {
            Ok(ty) if p.variadic => sig = sig.variadic(p.name.node.clone(), ty),
            Ok(ty) => sig = sig.param(p.name.node.clone(), ty),
            Err(e) => errors.push(e),
        }
    }

    let return_type = match return_type {
        Ok(ty) => ty,
        Err(e) => {
            errors.push(e);
            return Err(errors);
        }
    };

    if decl.is_default {
        match default_value(decl, &return_type) {
            Ok(value) => sig = sig.with_default(value),
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(MethodSignature { return_type, ..sig })
}

/// The declared default of a `default` method, checked against its return type.
fn default_value(decl: &MethodDecl, return_type: &SemanticType) -> Result<Value, DeclError> {
    let Some(literal) = &decl.default_value else {
        if return_type.accepts_null() {
            return Ok(Value::Null);
        }
        return Err(DeclError::contract(
            format!("Default method '{}' needs a value", decl.name.node),
            decl.name.span,
        )
        .with_hint(format!("Write 'default {} {}(...) = <value>;'", return_type, decl.name.node))
        .with_note("Only void, any and optional return types may omit the value"));
    };

    let value = literal_value(literal)?;
    coerce(value, return_type).map_err(|e| {
        DeclError::contract(
            format!("Default value of '{}' does not match its return type: {e}", decl.name.node),
            literal.span,
        )
    })
}

fn literal_value(literal: &Spanned<Literal>) -> Result<Value, DeclError> {
    Ok(match &literal.node {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(x) => Value::Float(*x),
        Literal::Str(s) => Value::Str(s.clone()),
        Literal::List(items) => Value::List(items.iter().map(literal_value).collect::<Result<_, _>>()?),
        Literal::Map(entries) => {
            let mut map = IndexMap::new();
            for (key, value) in entries {
                if map.insert(key.node.clone(), literal_value(value)?).is_some() {
                    return Err(DeclError::contract(format!("Duplicate map key '{}'", key.node), key.span));
                }
            }
            Value::Map(map)
        }
    })
}

// ============================================================================
// Type resolution
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypePosition {
    Return,
    Parameter,
    Argument,
}

fn resolve_type(ty: &Spanned<TypeExpr>, position: TypePosition) -> Result<SemanticType, DeclError> {
    match &ty.node {
        TypeExpr::Array(elem) => Ok(SemanticType::list(resolve_type(elem, TypePosition::Argument)?)),
        TypeExpr::Optional(inner) => {
            let inner_ty = resolve_type(inner, TypePosition::Argument)?;
            Ok(SemanticType::optional(inner_ty))
        }
        TypeExpr::Named(name, args) => {
            let Some(id) = builtin::from_str(name) else {
                return Err(DeclError::contract(format!("Unknown type '{name}'"), ty.span).with_hint(format!(
                    "Known types: {}",
                    builtin::BUILTIN_TYPES
                        .iter()
                        .map(|t| t.canonical)
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            };
            let arity = builtin::generic_arity(id);
            if args.len() != arity {
                return Err(DeclError::contract(
                    format!(
                        "'{name}' takes {arity} type argument(s), found {}",
                        args.len()
                    ),
                    ty.span,
                )
                .with_hint(match id {
                    BuiltinTypeId::List => "Write List<T>".to_string(),
                    BuiltinTypeId::Map => "Write Map<String, T>".to_string(),
                    _ => format!("Write '{name}' without type arguments"),
                }));
            }
            match id {
                BuiltinTypeId::List => Ok(SemanticType::list(resolve_type(&args[0], TypePosition::Argument)?)),
                BuiltinTypeId::Map => {
                    let key = resolve_type(&args[0], TypePosition::Argument)?;
                    if key != SemanticType::Str {
                        return Err(DeclError::contract(
                            format!("Map keys must be String, found '{}'", args[0].node),
                            args[0].span,
                        ));
                    }
                    Ok(SemanticType::map(resolve_type(&args[1], TypePosition::Argument)?))
                }
                BuiltinTypeId::Void if position != TypePosition::Return => Err(DeclError::contract(
                    "'void' is only allowed as a return type",
                    ty.span,
                )),
                other => SemanticType::from_builtin(other)
                    .ok_or_else(|| DeclError::contract(format!("'{name}' needs type arguments"), ty.span)),
            }
        }
    }
}
