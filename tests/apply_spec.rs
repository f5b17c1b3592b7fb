//! End-to-end checks of the applier through the public API.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use spec_apply::{
    Applied, ApplyError, KeyPath, LeafError, Registry, Spec, SpecDocument, apply, apply_document,
    try_apply,
};

fn wiring() -> Value {
    serde_json::from_str(include_str!("../demos/wiring.json")).unwrap()
}

fn config() -> Vec<Value> {
    serde_json::from_str(include_str!("../demos/config.json")).unwrap()
}

#[test]
fn wires_services_from_shared_config() {
    let out = apply_document(&wiring(), &Registry::with_builtins(), &config()).unwrap();
    let json = out.to_json().unwrap();

    assert_eq!(json["database"]["url"], json!("postgres://localhost/orders"));
    assert_eq!(json["database"]["pool_size"], json!(8));
    assert_eq!(json["http"]["port"], json!(8080));
    assert_eq!(json["service_name"], json!("orders"));
    assert_eq!(json["replicas"], json!(2));
    assert!(json["http"]["banner"].as_str().unwrap().ends_with("eu-west-1"));
}

#[test]
fn result_shape_matches_document_for_any_arguments() {
    let validated = SpecDocument(json!({
        "a": "count",
        "b": { "c": "args", "d": { "e": "concat" } }
    }))
    .validate_and_build(&Registry::with_builtins())
    .unwrap();

    for args in [vec![], vec![json!(1)], vec![json!("x"), json!(null), json!([1, 2])]] {
        let out = validated.apply(&args).unwrap();
        assert_eq!(out.shape(), validated.shape);
        assert_eq!(out.depth(), 3);
    }
}

#[test]
fn typed_spec_with_tuple_arguments() {
    struct Config {
        host: &'static str,
        port: u16,
    }

    let spec: Spec<(Config, bool), String> = Spec::node()
        .with(
            "addr",
            Spec::leaf(|(c, _): &(Config, bool)| format!("{}:{}", c.host, c.port)),
        )
        .with(
            "mode",
            Spec::node().with(
                "tls",
                Spec::leaf(|(_, tls): &(Config, bool)| tls.to_string()),
            ),
        );

    let out = apply(
        &spec,
        &(
            Config {
                host: "localhost",
                port: 443,
            },
            true,
        ),
    );
    assert_eq!(
        out.value_at(&KeyPath::parse("addr")).map(String::as_str),
        Some("localhost:443")
    );
    assert_eq!(
        out.value_at(&KeyPath::parse("mode.tls")).map(String::as_str),
        Some("true")
    );
}

#[test]
fn failing_leaf_fails_the_whole_call() {
    let spec: Spec<i32, Result<i32, String>> = Spec::node()
        .with("ok", Spec::leaf(|x: &i32| Ok(x + 1)))
        .with(
            "nested",
            Spec::node().with("bad", Spec::leaf(|_: &i32| Err("no connection".to_string()))),
        );
    assert_eq!(try_apply(&spec, &1), Err("no connection".to_string()));
}

#[test]
fn custom_registry_functions() {
    let mut registry = Registry::new();
    registry.register("shout", "uppercase + bang", spec_apply::Param::None, |args, _| {
        let s = args
            .first()
            .and_then(Value::as_str)
            .ok_or(LeafError::MissingArgument { index: 0, got: args.len() })?;
        Ok(Value::String(format!("{}!", s.to_uppercase())))
    });

    let out = apply_document(&json!({"greeting": "shout"}), &registry, &[json!("hi")]).unwrap();
    assert_eq!(
        out,
        Applied::Node(
            [("greeting".to_string(), Applied::Value(json!("HI!")))]
                .into_iter()
                .collect()
        )
    );

    let err = apply_document(&json!({"greeting": "shout"}), &registry, &[]).unwrap_err();
    assert!(matches!(
        err,
        ApplyError::Leaf { source: LeafError::MissingArgument { index: 0, got: 0 }, .. }
    ));

    // Builtins are not implicitly available in a fresh registry.
    let err = apply_document(&json!({"n": "count"}), &registry, &[]).unwrap_err();
    assert!(matches!(err, ApplyError::UnknownFunction { .. }));
}

#[test]
fn invalid_nodes_are_rejected_before_any_leaf_runs() {
    for (doc, found) in [
        (json!({"a": 5}), "number"),
        (json!({"a": true}), "bool"),
        (json!({"a": {"b": null}}), "null"),
        (json!({"a": ["identity"]}), "array"),
    ] {
        match apply_document(&doc, &Registry::with_builtins(), &[json!(5)]) {
            Err(ApplyError::InvalidSpec(e)) => assert_eq!(e.found, found),
            other => panic!("expected InvalidSpecError for {doc}, got {other:?}"),
        }
    }
}
