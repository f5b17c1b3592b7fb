//! Spec documents: JSON trees whose leaves name registry functions.
//!
//! JSON shape:
//! {
//!   "a": "add(1)",              // leaf: builtin name, optional JSON parameter
//!   "b": {                      // nested mapping
//!     "c": "mul(2)"
//!   }
//! }
//!
//! Objects become nodes (key order preserved), strings are resolved against a
//! [`Registry`], and any other JSON value is rejected with `InvalidSpecError`.

use crate::error::{ApplyError, InvalidSpecError, kind_of};
use crate::registry::{Param, Registry, parse_leaf_expr};
use crate::spec::{Applied, KeyPath, Shape, Spec};
use serde::Deserialize;
use serde_json::Value;

/// Spec built from a document: leaves take the shared JSON argument list and
/// report failures with their key path attached.
pub type DynSpec = Spec<[Value], Result<Value, ApplyError>>;

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SpecDocument(pub Value);

#[derive(Debug)]
pub struct ValidatedSpec {
    pub spec: DynSpec,
    pub shape: Shape,
}

impl SpecDocument {
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Resolve every leaf against `registry` and build the callable tree.
    /// Stops at the first problem in depth-first key order.
    pub fn validate_and_build(&self, registry: &Registry) -> Result<ValidatedSpec, ApplyError> {
        if !self.0.is_object() {
            return Err(InvalidSpecError {
                path: KeyPath::root(),
                found: kind_of(&self.0),
            }
            .into());
        }

        let spec = build_node(&self.0, &KeyPath::root(), registry)?;
        let shape = spec.shape();
        Ok(ValidatedSpec { spec, shape })
    }
}

impl ValidatedSpec {
    pub fn apply(&self, args: &[Value]) -> Result<Applied<Value>, ApplyError> {
        self.spec.try_apply(args)
    }
}

fn build_node(value: &Value, path: &KeyPath, registry: &Registry) -> Result<DynSpec, ApplyError> {
    match value {
        Value::Object(map) => {
            let mut node = Spec::node();
            for (key, child) in map {
                let child_path = path.child(key);
                node = node.with(key.clone(), build_node(child, &child_path, registry)?);
            }
            Ok(node)
        }
        Value::String(expr) => build_leaf(expr, path, registry),
        other => Err(InvalidSpecError {
            path: path.clone(),
            found: kind_of(other),
        }
        .into()),
    }
}

fn build_leaf(expr: &str, path: &KeyPath, registry: &Registry) -> Result<DynSpec, ApplyError> {
    let parsed = parse_leaf_expr(path, expr)?;

    let builtin = registry
        .get(&parsed.name)
        .ok_or_else(|| ApplyError::UnknownFunction {
            path: path.clone(),
            name: parsed.name.clone(),
        })?;

    match (builtin.param, &parsed.param) {
        (Param::Required, None) => {
            return Err(ApplyError::BadExpression {
                path: path.clone(),
                expr: expr.to_string(),
                reason: format!("{} requires a parameter", parsed.name),
            });
        }
        (Param::None, Some(_)) => {
            return Err(ApplyError::BadExpression {
                path: path.clone(),
                expr: expr.to_string(),
                reason: format!("{} takes no parameter", parsed.name),
            });
        }
        _ => {}
    }

    let func = builtin.func.clone();
    let param = parsed.param;
    let leaf_path = path.clone();
    Ok(Spec::leaf(move |args: &[Value]| {
        let out = func(args, param.as_ref()).map_err(|source| ApplyError::Leaf {
            path: leaf_path.clone(),
            source,
        })?;
        tracing::debug!(path = %leaf_path, result = %out, "applied leaf");
        Ok(out)
    }))
}
