//! Typed facade generation.
//!
//! For each contract this emits a Rust trait with one method per contract method, plus an implementation of that
//! trait for [`crate::Proxy`] that converts arguments with `IntoValue` and results with `Proxy::call`. Host call
//! sites then use ordinary typed Rust:
//!
//! ```rust,ignore
//! let proxy = dynbind::construct(contract, binding)?;
//! let total: i32 = proxy.var_args(vec![1, 2, 3])?;
//! ```
//!
//! ## Notes
//! - Method and parameter names are converted to snake_case; Rust keywords are escaped as raw identifiers.
//! - Variadic parameters become `Vec<T>` and are spread back into individual arguments at the call.
//! - `Map<String, T>` becomes `BTreeMap<String, T>`, `T?` becomes `Option<T>`, `any` becomes `dynbind::Value`.

use std::collections::HashMap;

use dynbind_core::SemanticType;
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};

use crate::contract::{InterfaceContract, MethodSignature};

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
    "trait", "true", "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "abstract", "become", "box",
    "do", "final", "gen", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
];

/// Errors from facade generation.
#[derive(Debug, thiserror::Error)]
pub enum FacadeError {
    #[error("syn parse error: {0}")]
    SynParse(String),

    #[error("methods '{first}' and '{second}' of '{interface}' both map to Rust name '{rust_name}'")]
    NameCollision {
        interface: String,
        first: String,
        second: String,
        rust_name: String,
    },
}

/// Emit the facade for one contract.
///
/// ## Errors
/// Returns [`FacadeError::NameCollision`] if two methods convert to the same Rust name.
pub fn emit_facade(contract: &InterfaceContract) -> Result<String, FacadeError> {
    emit_facades(std::slice::from_ref(contract))
}

/// Emit one source file holding the facades of several contracts.
#[tracing::instrument(skip_all, fields(contracts = contracts.len()))]
pub fn emit_facades(contracts: &[InterfaceContract]) -> Result<String, FacadeError> {
    let items = contracts.iter().map(contract_tokens).collect::<Result<Vec<_>, _>>()?;
    let tokens = quote! { #(#items)* };
    let syntax_tree: syn::File = syn::parse2(tokens).map_err(|e| FacadeError::SynParse(e.to_string()))?;
    let formatted = prettyplease::unparse(&syntax_tree);

    let names: Vec<&str> = contracts.iter().map(|c| c.name()).collect();
    let header = format!(
        "// Generated by dynbind v{} from {}. Do not edit.\n\n",
        env!("CARGO_PKG_VERSION"),
        names.join(", ")
    );
    Ok(header + &formatted)
}

fn contract_tokens(contract: &InterfaceContract) -> Result<TokenStream, FacadeError> {
    let trait_ident = ident(&sanitize(contract.name()));
    let trait_doc = contract
        .doc()
        .map(|d| format!(" {d}"))
        .unwrap_or_else(|| format!(" Typed view of the `{}` contract.", contract.name()));

    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut decls = Vec::new();
    let mut impls = Vec::new();
    for method in contract.methods() {
        let rust_name = to_snake_case(method.name());
        if let Some(first) = seen.insert(rust_name.clone(), method.name()) {
            return Err(FacadeError::NameCollision {
                interface: contract.name().to_string(),
                first: first.to_string(),
                second: method.name().to_string(),
                rust_name,
            });
        }
        let signature = method_signature(method, &rust_name);
        let doc = method.doc().map(|d| {
            let d = format!(" {d}");
            quote! { #[doc = #d] }
        });
        decls.push(quote! {
            #doc
            #signature;
        });
        let body = method_body(method);
        impls.push(quote! {
            #signature {
                #body
            }
        });
    }

    Ok(quote! {
        #[doc = #trait_doc]
        pub trait #trait_ident {
            #(#decls)*
        }

        impl #trait_ident for ::dynbind::Proxy {
            #(#impls)*
        }
    })
}

fn method_signature(method: &MethodSignature, rust_name: &str) -> TokenStream {
    let fn_ident = ident(rust_name);
    let params = method.params().iter().map(|p| {
        let name = ident(&to_snake_case(&p.name));
        let ty = rust_type(&p.binding_type());
        quote! { #name: #ty }
    });
    let ret = rust_type(method.return_type());
    quote! {
        fn #fn_ident(&self, #(#params),*) -> ::std::result::Result<#ret, ::dynbind::AdapterError>
    }
}

fn method_body(method: &MethodSignature) -> TokenStream {
    let name = method.name();
    let mut fixed = Vec::new();
    let mut variadic = None;
    for p in method.params() {
        let arg = ident(&to_snake_case(&p.name));
        if p.variadic {
            variadic = Some(arg);
        } else {
            fixed.push(arg);
        }
    }

    match variadic {
        None => quote! {
            self.call(#name, ::std::vec![#(::dynbind::IntoValue::into_value(#fixed)),*])
        },
        Some(rest) => quote! {
            let mut args = ::std::vec![#(::dynbind::IntoValue::into_value(#fixed)),*];
            args.extend(#rest.into_iter().map(::dynbind::IntoValue::into_value));
            self.call(#name, args)
        },
    }
}

/// Rust type for a declared semantic type.
fn rust_type(ty: &SemanticType) -> TokenStream {
    match ty {
        SemanticType::Void => quote! { () },
        SemanticType::Any => quote! { ::dynbind::Value },
        SemanticType::Bool => quote! { bool },
        SemanticType::Byte => quote! { i8 },
        SemanticType::Short => quote! { i16 },
        SemanticType::Int => quote! { i32 },
        SemanticType::Long => quote! { i64 },
        SemanticType::Float => quote! { f32 },
        SemanticType::Double => quote! { f64 },
        SemanticType::Char => quote! { char },
        SemanticType::Str => quote! { ::std::string::String },
        SemanticType::List(elem) => {
            let elem = rust_type(elem);
            quote! { ::std::vec::Vec<#elem> }
        }
        SemanticType::Map(value) => {
            let value = rust_type(value);
            quote! { ::std::collections::BTreeMap<::std::string::String, #value> }
        }
        SemanticType::Optional(inner) => {
            let inner = rust_type(inner);
            quote! { ::std::option::Option<#inner> }
        }
    }
}

// ============================================================================
// Identifiers
// ============================================================================

fn ident(name: &str) -> syn::Ident {
    if matches!(name, "self" | "Self" | "super" | "crate") {
        // Not allowed as raw identifiers.
        return format_ident!("{}_", name);
    }
    if RUST_KEYWORDS.contains(&name) {
        return syn::Ident::new_raw(name, Span::call_site());
    }
    format_ident!("{}", name)
}

/// Replace characters Rust identifiers cannot hold (declaration names may contain `$`).
fn sanitize(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) || out.is_empty() {
        out.insert(0, '_');
    }
    out
}

/// `varArgs` → `var_args`, `HTTPServer` → `http_server`, `toJSON2` → `to_json2`.
fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = sanitize(name).chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::parse_contracts;

    const FIXTURE: &str = r#"
        /** The host-side fixture. */
        interface DynamicInterface {
            /** Greets someone. */
            String hello(String name);
            int varArgs(int... values);
            List<String> stringList(List<String> values);
            Map<String, Integer> intMap(Map<String, Integer> values);
            void biConsumer(String key, int value);
            Object aConstant();
            default boolean aDefault() = true;
            String? maybe(char initial, double weight);
            long type(long fn);
        }
    "#;

    fn generate() -> String {
        let contracts = parse_contracts(FIXTURE).unwrap();
        emit_facade(&contracts[0]).unwrap()
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("varArgs"), "var_args");
        assert_eq!(to_snake_case("aDefault"), "a_default");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("toJSON2"), "to_json2");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("$ref"), "_ref");
    }

    #[test]
    fn test_output_parses_as_rust() {
        let source = generate();
        assert!(source.starts_with("// Generated by dynbind v"));
        let file = syn::parse_file(&source).unwrap();
        // trait + impl
        assert_eq!(file.items.len(), 2);
    }

    /// Whitespace-insensitive view of generated source, so assertions do not depend on line wrapping.
    fn squash(source: &str) -> String {
        let squashed: String = source.chars().filter(|c| !c.is_whitespace()).collect();
        squashed.replace(",)", ")")
    }

    #[test]
    fn test_signatures() {
        let source = generate();
        let flat = squash(&source);
        assert!(source.contains("pub trait DynamicInterface"), "{source}");
        assert!(source.contains("impl DynamicInterface for ::dynbind::Proxy"), "{source}");
        assert!(source.contains("/// Greets someone."), "{source}");
        assert!(source.contains("/// The host-side fixture."), "{source}");
        for expected in [
            "fnhello(&self,name:::std::string::String)->::std::result::Result<::std::string::String,::dynbind::AdapterError>",
            "fnvar_args(&self,values:::std::vec::Vec<i32>)->::std::result::Result<i32,::dynbind::AdapterError>",
            "fnint_map(&self,values:::std::collections::BTreeMap<::std::string::String,i32>)",
            "fnbi_consumer(&self,key:::std::string::String,value:i32)->::std::result::Result<(),::dynbind::AdapterError>",
            "fna_constant(&self)->::std::result::Result<::dynbind::Value,::dynbind::AdapterError>",
            "fna_default(&self)->::std::result::Result<bool,::dynbind::AdapterError>",
            "fnmaybe(&self,initial:char,weight:f64)->::std::result::Result<::std::option::Option<::std::string::String>",
            "fnr#type(&self,r#fn:i64)",
        ] {
            assert!(flat.contains(expected), "missing {expected} in:\n{source}");
        }
    }

    #[test]
    fn test_bodies_use_contract_names() {
        let flat = squash(&generate());
        assert!(flat.contains("self.call(\"varArgs\",args)"), "{flat}");
        assert!(flat.contains("args.extend(values.into_iter().map(::dynbind::IntoValue::into_value));"));
        assert!(flat.contains("self.call(\"aDefault\",::std::vec![])"), "{flat}");
        assert!(flat.contains("self.call(\"hello\",::std::vec![::dynbind::IntoValue::into_value(name)])"), "{flat}");
    }

    #[test]
    fn test_name_collision() {
        let contracts = parse_contracts("interface X { void fooBar(); void foo_bar(); }").unwrap();
        let err = emit_facade(&contracts[0]).unwrap_err();
        assert!(matches!(err, FacadeError::NameCollision { ref rust_name, .. } if rust_name == "foo_bar"));
    }

    #[test]
    fn test_multiple_contracts_in_one_file() {
        let contracts = parse_contracts("interface A { void a(); } interface B { int b(); }").unwrap();
        let source = emit_facades(&contracts).unwrap();
        assert!(source.starts_with("// Generated by dynbind v"));
        assert!(source.contains(" from A, B. Do not edit."));
        assert_eq!(syn::parse_file(&source).unwrap().items.len(), 4);
    }
}
