//! Integration tests for contract declarations
//!
//! Declaration source → lowered contract → rendered description / JSON / Rust facade.

use dynbind::backend::emit_facade;
use dynbind::cli::commands::describe_source;
use dynbind::error::ContractError;
use dynbind::{InterfaceContract, MethodSignature, SemanticType, Value, parse_contracts};
use dynbind_syntax::diagnostics;

const DYNAMIC_INTERFACE: &str = r#"
    /** Exercised by a scripted implementation. */
    interface DynamicInterface {
        String hello(String name);
        int varArgs(int... values);
        List<String> stringList(List<String> values);
        Map<String, Integer> intMap(Map<String, Integer> values);
        void biConsumer(String key, int value);
        String aConstant();
        default boolean aDefault() = true;
    }
"#;

#[test]
fn test_fixture_lowers_to_signatures() {
    let contracts = parse_contracts(DYNAMIC_INTERFACE).unwrap();
    assert_eq!(contracts.len(), 1);
    let contract = &contracts[0];

    assert_eq!(contract.doc(), Some("Exercised by a scripted implementation."));
    assert_eq!(contract.required_methods().count(), 6);

    let var_args = contract.method("varArgs").unwrap();
    assert!(var_args.is_variadic());
    assert_eq!(var_args.binding_arity(), 1);
    assert_eq!(var_args.params()[0].binding_type(), SemanticType::list(SemanticType::Int));

    let int_map = contract.method("intMap").unwrap();
    assert_eq!(int_map.return_type(), &SemanticType::map(SemanticType::Int));

    let a_default = contract.method("aDefault").unwrap();
    assert_eq!(a_default.default_value(), Some(&Value::Bool(true)));
}

#[test]
fn test_describe_renders_fixture() {
    let mut out = Vec::new();
    describe_source(&mut out, "fixture.idl", DYNAMIC_INTERFACE, false).unwrap();
    let text = String::from_utf8(out).unwrap();
    insta::assert_snapshot!(text, @r#"
    /** Exercised by a scripted implementation. */
    interface DynamicInterface {
        String hello(String name);
        int varArgs(int... values);
        List<String> stringList(List<String> values);
        Map<String, int> intMap(Map<String, int> values);
        void biConsumer(String key, int value);
        String aConstant();
        default boolean aDefault() = true;
    }
    "#);

    // The description is itself a declaration of the same contract.
    assert_eq!(parse_contracts(&text).unwrap(), parse_contracts(DYNAMIC_INTERFACE).unwrap());
}

#[test]
fn test_describe_json_shape() {
    let mut out = Vec::new();
    describe_source(&mut out, "fixture.idl", DYNAMIC_INTERFACE, true).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

    let methods = json[0]["methods"].as_array().unwrap();
    assert_eq!(methods.len(), 7);
    assert_eq!(methods[3]["return_type"], "Map<String, int>");
    assert_eq!(methods[6]["default"], true);
    assert!(methods[0].get("default").is_none());
}

#[test]
fn test_errors_render_against_the_file() {
    let source = "interface Broken {\n    Strng hello(String name);\n    int x(int... a, int b);\n}\n";
    let errors = parse_contracts(source).unwrap_err();
    assert_eq!(errors.len(), 2);

    let rendered = diagnostics::render("broken.idl", source, &errors);
    assert!(rendered.contains("broken.idl"), "{rendered}");
    assert!(rendered.contains("Unknown type 'Strng'"), "{rendered}");
    assert!(rendered.contains("must be the last parameter"), "{rendered}");
}

#[test]
fn test_array_syntax_is_a_list() {
    let contracts = parse_contracts("interface A { String[] names(int[][] grid); }").unwrap();
    let names = contracts[0].method("names").unwrap();
    assert_eq!(names.return_type(), &SemanticType::list(SemanticType::Str));
    assert_eq!(
        names.params()[0].ty,
        SemanticType::list(SemanticType::list(SemanticType::Int))
    );
}

#[test]
fn test_facade_for_fixture_is_valid_rust() {
    let contract = parse_contracts(DYNAMIC_INTERFACE).unwrap().remove(0);
    let source = emit_facade(&contract).unwrap();
    let file = syn::parse_file(&source).expect("facade should parse as a Rust file");

    // One trait and one impl.
    assert_eq!(file.items.len(), 2);
    let flat: String = source.chars().filter(|c| !c.is_whitespace()).collect();
    assert!(flat.contains("fnvar_args(&self,values:::std::vec::Vec<i32>"), "{source}");
    assert!(flat.contains("fna_default(&self)"), "{source}");
}

#[test]
fn test_rendered_literals_reparse_exactly() {
    let contract = InterfaceContract::builder("Escapes")
        .method(MethodSignature::new("color", SemanticType::Str).with_default("\u{1b}[31m\tred\u{7f} \"q\" \\ \r\n\0"))
        .method(MethodSignature::new("min", SemanticType::Long).with_default(i64::MIN))
        .method(MethodSignature::new("tiny", SemanticType::Double).with_default(-1e-300))
        .method(
            MethodSignature::new("keys", SemanticType::map(SemanticType::Int))
                .with_default(Value::map([("line\nbreak", Value::Int(1)), ("a\u{1}", Value::Int(-2))])),
        )
        .build()
        .unwrap();

    let source = contract.to_string();
    assert!(source.contains(r#"= "\u001b[31m\tred\u007f \"q\" \\ \r\n\0";"#), "{source}");
    assert!(source.contains("= -9223372036854775808;"), "{source}");
    assert_eq!(parse_contracts(&source).unwrap(), vec![contract]);
}

#[test]
fn test_rendered_docs_reparse_exactly() {
    let contract = InterfaceContract::builder("Documented")
        .doc("First line.\n\n  * not a gutter\n/* nested opener")
        .method(MethodSignature::new("starred", SemanticType::Void).with_doc("*emphasis* first"))
        .method(MethodSignature::new("plain", SemanticType::Void).with_doc("  Padded.   \n"))
        .build()
        .unwrap();
    assert_eq!(contract.method("plain").unwrap().doc(), Some("Padded."));

    let source = contract.to_string();
    insta::assert_snapshot!(source, @r"
    /**
     * First line.
     *
     *   * not a gutter
     * /* nested opener
     */
    interface Documented {
        /**
         * *emphasis* first
         */
        void starred();
        /** Padded. */
        void plain();
    }
    ");
    assert_eq!(parse_contracts(&source).unwrap(), vec![contract]);
}

#[test]
fn test_doc_terminator_is_rejected() {
    let err = InterfaceContract::builder("Closing")
        .method(MethodSignature::new("m", SemanticType::Void).with_doc("ends */ early"))
        .build()
        .unwrap_err();
    assert_eq!(err, ContractError::DocTerminator { owner: "m".into() });

    let err = InterfaceContract::builder("Closing").doc("*/").build().unwrap_err();
    assert_eq!(err, ContractError::DocTerminator { owner: "Closing".into() });
}
