//! The applier: call every leaf of a spec with one shared set of arguments.
//!
//! Traversal is depth-first in key order. Leaves are independent, so the order
//! is only observable through side effects the leaves themselves perform.
//! Leaves that return futures are treated like any other value; nothing here
//! awaits, retries or catches.

use crate::error::ApplyError;
use crate::registry::Registry;
use crate::spec::{Applied, Spec, SpecDocument};
use serde_json::Value;

pub fn apply<A: ?Sized, R>(spec: &Spec<A, R>, args: &A) -> Applied<R> {
    spec.apply(args)
}

/// Apply a spec of fallible leaves. The first leaf error is returned unmodified.
pub fn try_apply<A: ?Sized, T, E>(
    spec: &Spec<A, Result<T, E>>,
    args: &A,
) -> Result<Applied<T>, E> {
    spec.try_apply(args)
}

/// Validate a JSON spec document against `registry` and apply it to `args`.
pub fn apply_document(
    doc: &Value,
    registry: &Registry,
    args: &[Value],
) -> Result<Applied<Value>, ApplyError> {
    let validated = SpecDocument(doc.clone()).validate_and_build(registry)?;
    tracing::debug!(
        leaves = validated.shape.leaf_count(),
        depth = validated.shape.depth(),
        args = args.len(),
        "applying spec document"
    );
    validated.apply(args)
}
