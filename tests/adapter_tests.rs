//! End-to-end tests for the interface adapter
//!
//! These tests declare the `DynamicInterface` contract in source form, bind it to
//! closures and constants, and drive every call through a constructed proxy.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dynbind::error::Position;
use dynbind::{
    Adapter, AdapterConfig, AdapterError, CallResult, DynamicBinding, InterfaceContract, MethodSignature, Proxy,
    Resolution, SemanticType, Value, construct, parse_contracts,
};

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

fn contract() -> InterfaceContract {
    parse_contracts(DYNAMIC_INTERFACE)
        .expect("fixture contract should lower")
        .remove(0)
}

fn hello(args: Vec<Value>) -> CallResult {
    let name = args[0].as_str().unwrap_or_default();
    Ok(format!("Hello {name}").into())
}

fn var_args(args: Vec<Value>) -> CallResult {
    let values = args[0].as_list().unwrap_or_default();
    Ok(Value::Int(values.iter().filter_map(Value::as_i64).sum()))
}

fn string_list(args: Vec<Value>) -> CallResult {
    let values = args[0].as_list().unwrap_or_default();
    Ok(Value::List(
        values
            .iter()
            .filter_map(Value::as_str)
            .map(|s| Value::from(s.to_uppercase()))
            .collect(),
    ))
}

fn int_map(args: Vec<Value>) -> CallResult {
    let v1 = args[0]
        .as_map()
        .and_then(|m| m.get("v1"))
        .and_then(Value::as_i64)
        .unwrap_or_default();
    Ok(Value::map([("v1", Value::Int(v1 * 2))]))
}

/// A complete binding for the fixture, without `aDefault`.
fn fixture_binding() -> dynbind::BindingBuilder {
    DynamicBinding::builder()
        .function("hello", hello)
        .function("varArgs", var_args)
        .function("stringList", string_list)
        .function("intMap", int_map)
        .function("biConsumer", |_args: Vec<Value>| -> CallResult { Ok(Value::Null) })
        .constant("aConstant", "a constant")
}

fn fixture_proxy() -> Proxy {
    construct(contract(), fixture_binding().build()).expect("complete binding should construct")
}

// ============================================================================
// The fixture's calls
// ============================================================================

#[test]
fn test_hello() {
    let proxy = fixture_proxy();
    let greeting: String = proxy.call("hello", vec!["World".into()]).unwrap();
    assert_eq!(greeting, "Hello World");
}

#[test]
fn test_var_args_are_collected_into_one_list() {
    let proxy = fixture_proxy();
    let total: i32 = proxy
        .call("varArgs", vec![1.into(), 3.into(), 5.into(), 7.into(), 9.into()])
        .unwrap();
    assert_eq!(total, 25);

    let total: i32 = proxy.call("varArgs", vec![1.into(), 2.into(), 3.into()]).unwrap();
    assert_eq!(total, 6);

    let total: i32 = proxy.call("varArgs", vec![]).unwrap();
    assert_eq!(total, 0);
}

#[test]
fn test_var_args_callable_sees_a_single_argument() {
    let seen = Arc::new(AtomicUsize::new(usize::MAX));
    let observed = Arc::clone(&seen);
    let binding = fixture_binding()
        .function("varArgs", move |args: Vec<Value>| -> CallResult {
            observed.store(args.len(), Ordering::SeqCst);
            assert_eq!(args[0], Value::List(vec![1.into(), 2.into(), 3.into()]));
            Ok(Value::Int(6))
        })
        .build();
    let proxy = construct(contract(), binding).unwrap();

    proxy.invoke("varArgs", vec![1.into(), 2.into(), 3.into()]).unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_string_list() {
    let proxy = fixture_proxy();
    let result: Vec<String> = proxy
        .call("stringList", vec![Value::List(vec!["a".into(), "b".into()])])
        .unwrap();
    assert_eq!(result, ["A", "B"]);
}

#[test]
fn test_string_list_unchanged() {
    let binding = fixture_binding()
        .function("stringList", |_args: Vec<Value>| -> CallResult {
            Ok(Value::List(vec!["a".into(), "b".into()]))
        })
        .build();
    let proxy = construct(contract(), binding).unwrap();
    let result = proxy.invoke("stringList", vec![Value::List(vec![])]).unwrap();
    assert_eq!(result, Value::List(vec!["a".into(), "b".into()]));
}

#[test]
fn test_int_map() {
    let proxy = fixture_proxy();
    let result: HashMap<String, i32> = proxy
        .call("intMap", vec![Value::map([("v1", Value::Int(2))])])
        .unwrap();
    assert_eq!(result, HashMap::from([("v1".to_string(), 4)]));
}

#[test]
fn test_map_result_passes_through() {
    let binding = fixture_binding()
        .function("intMap", |_args: Vec<Value>| -> CallResult { Ok(Value::map([("v1", Value::Int(4))])) })
        .build();
    let proxy = construct(contract(), binding).unwrap();
    let result = proxy.invoke("intMap", vec![Value::map([("x", Value::Int(0))])]).unwrap();
    assert_eq!(result, Value::map([("v1", Value::Int(4))]));
}

#[test]
fn test_void_method_returns_null() {
    let proxy = fixture_proxy();
    let result = proxy.invoke("biConsumer", vec!["key".into(), 1.into()]).unwrap();
    assert_eq!(result, Value::Null);
}

#[test]
fn test_constant() {
    let proxy = fixture_proxy();
    let value: String = proxy.call("aConstant", vec![]).unwrap();
    assert_eq!(value, "a constant");
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_default_used_when_unbound() {
    let proxy = fixture_proxy();
    assert!(proxy.call::<bool>("aDefault", vec![]).unwrap());
}

#[test]
fn test_binding_overrides_default() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let binding = fixture_binding()
        .function("aDefault", move |_args: Vec<Value>| -> CallResult {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Bool(false))
        })
        .build();
    let proxy = construct(contract(), binding).unwrap();

    assert!(!proxy.call::<bool>("aDefault", vec![]).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Construction failures
// ============================================================================

#[test]
fn test_missing_method_is_named() {
    let binding = DynamicBinding::builder()
        .function("hello", hello)
        .constant("aConstant", "a constant")
        .build();
    let err = construct(contract(), binding).unwrap_err();

    let AdapterError::BindingIncomplete { interface, missing } = &err else {
        panic!("expected BindingIncomplete, got {err:?}");
    };
    assert_eq!(interface, "DynamicInterface");
    // Contract order; defaults are never required.
    assert_eq!(missing, &["varArgs", "stringList", "intMap", "biConsumer"]);
    assert_eq!(
        err.to_string(),
        "binding for 'DynamicInterface' is incomplete; missing: varArgs, stringList, intMap, biConsumer"
    );
}

#[test]
fn test_arity_mismatch() {
    let binding = fixture_binding()
        .function_with_arity("hello", 2, |_args: Vec<Value>| -> CallResult { Ok("hi".into()) })
        .build();
    let err = construct(contract(), binding).unwrap_err();
    assert!(
        matches!(err, AdapterError::ArityMismatch { ref method, expected: 1, found: 2 } if method == "hello"),
        "{err:?}"
    );
}

#[test]
fn test_variadic_binding_arity_is_one() {
    let binding = fixture_binding().function_with_arity("varArgs", 1, var_args).build();
    assert!(construct(contract(), binding).is_ok());
}

#[test]
fn test_lenient_construction_defers_to_call() {
    let binding = DynamicBinding::builder().function("hello", hello).build();
    let proxy = Adapter::new(AdapterConfig::new().lenient())
        .construct(contract(), binding)
        .unwrap();

    assert_eq!(proxy.call::<String>("hello", vec!["x".into()]).unwrap(), "Hello x");
    let err = proxy.invoke("stringList", vec![Value::List(vec![])]).unwrap_err();
    assert!(matches!(err, AdapterError::UnboundMethod { ref method } if method == "stringList"));
    assert!(proxy.call::<bool>("aDefault", vec![]).unwrap());
}

// ============================================================================
// Invocation failures
// ============================================================================

#[derive(Debug)]
struct Boom(&'static str);

impl fmt::Display for Boom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boom: {}", self.0)
    }
}

impl Error for Boom {}

#[test]
fn test_invocation_error_preserves_cause() {
    let binding = fixture_binding()
        .function("hello", |_args: Vec<Value>| -> CallResult { Err(Box::new(Boom("no greeting"))) })
        .build();
    let proxy = construct(contract(), binding).unwrap();

    let err = proxy.invoke("hello", vec!["x".into()]).unwrap_err();
    assert!(matches!(err, AdapterError::Invocation { .. }));
    assert_eq!(err.method(), Some("hello"));
    let cause = err.source().and_then(|e| e.downcast_ref::<Boom>()).expect("cause should be Boom");
    assert_eq!(cause.0, "no greeting");
}

#[test]
fn test_unknown_method() {
    let err = fixture_proxy().invoke("goodbye", vec![]).unwrap_err();
    assert!(matches!(err, AdapterError::UnknownMethod { ref method, .. } if method == "goodbye"));
    assert_eq!(err.to_string(), "'DynamicInterface' has no method 'goodbye'");
}

#[test]
fn test_argument_count() {
    let proxy = fixture_proxy();
    let err = proxy.invoke("hello", vec![]).unwrap_err();
    assert_eq!(err.to_string(), "'hello' takes 1 argument(s) but 0 were supplied");

    let err = proxy.invoke("biConsumer", vec!["k".into()]).unwrap_err();
    assert!(matches!(err, AdapterError::ArgumentCount { found: 1, .. }));
}

#[test]
fn test_argument_type_is_checked_before_dispatch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let binding = fixture_binding()
        .function("hello", move |_args: Vec<Value>| -> CallResult {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("hi".into())
        })
        .build();
    let proxy = construct(contract(), binding).unwrap();

    let err = proxy.invoke("hello", vec![42.into()]).unwrap_err();
    assert!(matches!(
        err,
        AdapterError::TypeCoercion {
            position: Position::Argument(0),
            ..
        }
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_return_coercion_rejects_fraction_and_overflow() {
    let binding = fixture_binding()
        .function("varArgs", |args: Vec<Value>| -> CallResult {
            match args[0].as_list().unwrap_or_default().len() {
                0 => Ok(Value::Float(2.5)),
                1 => Ok(Value::Int(i64::from(i32::MAX) + 1)),
                _ => Ok(Value::Float(7.0)),
            }
        })
        .build();
    let proxy = construct(contract(), binding).unwrap();

    let err = proxy.invoke("varArgs", vec![]).unwrap_err();
    assert!(matches!(err, AdapterError::TypeCoercion { position: Position::Return, .. }));
    assert!(err.to_string().contains("2.5 is not an integral value"), "{err}");

    let err = proxy.invoke("varArgs", vec![1.into()]).unwrap_err();
    assert!(err.to_string().contains("out of range for int"), "{err}");

    assert_eq!(proxy.invoke("varArgs", vec![1.into(), 2.into()]).unwrap(), Value::Int(7));
}

#[test]
fn test_nested_return_error_has_path() {
    let binding = fixture_binding()
        .function("stringList", |_args: Vec<Value>| -> CallResult {
            Ok(Value::List(vec!["a".into(), 2.into()]))
        })
        .build();
    let proxy = construct(contract(), binding).unwrap();
    let err = proxy.invoke("stringList", vec![Value::List(vec![])]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "return value of 'stringList': expected String, found integer at $[1]"
    );
}

// ============================================================================
// Binding styles
// ============================================================================

#[test]
fn test_catch_all_handler() {
    let binding = DynamicBinding::from_handler(|sig: &MethodSignature, args: Vec<Value>| -> CallResult {
        Ok(match sig.name() {
            "hello" => format!("handled {}", args[0]).into(),
            "varArgs" => Value::Int(args[0].as_list().map_or(0, |l| l.len() as i64)),
            _ => Value::Null,
        })
    });
    let proxy = construct(contract(), binding).unwrap();

    assert_eq!(proxy.call::<String>("hello", vec!["x".into()]).unwrap(), "handled \"x\"");
    assert_eq!(proxy.call::<i32>("varArgs", vec![1.into(), 1.into()]).unwrap(), 2);
    // The handler takes precedence over the declared default; `null` is not a boolean.
    assert!(proxy.invoke("aDefault", vec![]).is_err());
}

#[test]
fn test_handler_takes_precedence_over_default() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let binding = DynamicBinding::from_handler(move |sig: &MethodSignature, _args: Vec<Value>| -> CallResult {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(match sig.name() {
            "aDefault" => Value::Bool(false),
            _ => Value::Null,
        })
    });
    let proxy = construct(contract(), binding).unwrap();

    assert_eq!(proxy.resolution("aDefault"), Some(Resolution::Handler));
    assert_eq!(proxy.invoke("aDefault", vec![]).unwrap(), Value::Bool(false));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // A named entry still beats the handler.
    let binding = DynamicBinding::builder()
        .constant("aDefault", true)
        .fallback(|_sig: &MethodSignature, _args: Vec<Value>| -> CallResult { Ok(Value::Bool(false)) })
        .build();
    let proxy = construct(contract(), binding).unwrap();
    assert_eq!(proxy.resolution("aDefault"), Some(Resolution::Constant));
    assert_eq!(proxy.invoke("aDefault", vec![]).unwrap(), Value::Bool(true));
}

#[test]
fn test_json_binding_keeps_map_key_order() {
    let contract = InterfaceContract::builder("Ordered")
        .method(MethodSignature::new("m", SemanticType::map(SemanticType::Int)))
        .build()
        .unwrap();
    let binding = DynamicBinding::from_json_str(r#"{"m": {"zeta": 1, "alpha": 2, "mid": 3}}"#).unwrap();
    let proxy = construct(contract, binding).unwrap();

    let result = proxy.invoke("m", vec![]).unwrap();
    let keys: Vec<&str> = result.as_map().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
    assert_eq!(result.to_string(), r#"{"zeta": 1, "alpha": 2, "mid": 3}"#);
}

#[test]
fn test_json_binding() {
    let binding = DynamicBinding::from_json_str(
        r#"{
            "hello": "Hello World",
            "varArgs": 25,
            "stringList": ["A", "B"],
            "intMap": {"v1": 4},
            "biConsumer": null,
            "aConstant": "a constant"
        }"#,
    )
    .unwrap();
    let proxy = construct(contract(), binding).unwrap();
    assert_eq!(proxy.call::<i32>("varArgs", vec![]).unwrap(), 25);
    assert_eq!(
        proxy.invoke("intMap", vec![Value::map([("v1", Value::Int(2))])]).unwrap(),
        Value::map([("v1", Value::Int(4))])
    );
}

#[test]
fn test_ignore_case_matching() {
    let binding = DynamicBinding::builder()
        .function("HELLO", hello)
        .function("varargs", var_args)
        .function("StringList", string_list)
        .function("intmap", int_map)
        .constant("biconsumer", Value::Null)
        .constant("aconstant", "c")
        .build();
    assert!(construct(contract(), binding.clone()).is_err());

    let proxy = Adapter::new(AdapterConfig::new().ignore_case())
        .construct(contract(), binding)
        .unwrap();
    assert_eq!(proxy.call::<String>("Hello", vec!["x".into()]).unwrap(), "Hello x");
    assert_eq!(proxy.call::<String>("aConstant", vec![]).unwrap(), "c");
}

#[test]
fn test_builder_contract() {
    let contract = InterfaceContract::builder("Counter")
        .method(MethodSignature::new("next", SemanticType::Long))
        .method(MethodSignature::new("reset", SemanticType::Void).with_default(Value::Null))
        .build()
        .unwrap();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let binding = DynamicBinding::builder()
        .function("next", move |_args: Vec<Value>| -> CallResult {
            Ok(Value::Int(counter.fetch_add(1, Ordering::SeqCst) as i64))
        })
        .build();
    let proxy = construct(contract, binding).unwrap();

    assert_eq!(proxy.call::<i64>("next", vec![]).unwrap(), 0);
    assert_eq!(proxy.call::<i64>("next", vec![]).unwrap(), 1);
    assert_eq!(proxy.invoke("reset", vec![]).unwrap(), Value::Null);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_proxy_shared_across_threads() {
    let proxy = fixture_proxy();
    std::thread::scope(|scope| {
        for t in 0..4i64 {
            let proxy = proxy.clone();
            scope.spawn(move || {
                for i in 0..50i64 {
                    let total: i64 = proxy.call("varArgs", vec![t.into(), i.into()]).unwrap();
                    assert_eq!(total, t + i);
                }
            });
        }
    });
}
