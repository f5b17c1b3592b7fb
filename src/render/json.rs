use crate::spec::{Applied, Shape};
use serde_json::{Map, Value};

/// Serialize an applied tree. Nodes become JSON objects in key order.
pub fn render_json(result: &Applied<Value>, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(result)
    } else {
        serde_json::to_string(result)
    }
}

/// Shape as JSON with every leaf rendered as `null`.
pub fn shape_to_json(shape: &Shape) -> Value {
    match shape {
        Shape::Leaf => Value::Null,
        Shape::Node(children) => {
            let mut map = Map::new();
            for (k, child) in children {
                map.insert(k.clone(), shape_to_json(child));
            }
            Value::Object(map)
        }
    }
}

pub fn render_shape(shape: &Shape) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&shape_to_json(shape))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::spec::SpecDocument;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn result_keeps_key_order() {
        let v = SpecDocument(json!({"z": "count", "a": {"y": "args"}}))
            .validate_and_build(&Registry::with_builtins())
            .unwrap();
        let out = v.apply(&[json!(1)]).unwrap();
        assert_eq!(render_json(&out, false).unwrap(), r#"{"z":1,"a":{"y":[1]}}"#);
    }

    #[test]
    fn shape_leaves_are_null() {
        let v = SpecDocument(json!({"a": "identity", "b": {"c": "identity"}}))
            .validate_and_build(&Registry::with_builtins())
            .unwrap();
        assert_eq!(shape_to_json(&v.shape), json!({"a": null, "b": {"c": null}}));
        assert_eq!(
            render_shape(&v.shape).unwrap(),
            "{\n  \"a\": null,\n  \"b\": {\n    \"c\": null\n  }\n}"
        );
    }
}
