//! Named functions that spec documents can reference as leaves.

pub mod builtins;
pub mod expr;

pub use expr::{LeafExpr, parse_leaf_expr};

use crate::error::LeafError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Leaf function over the shared argument list plus an optional bound parameter.
pub type BuiltinFn =
    Arc<dyn Fn(&[Value], Option<&Value>) -> Result<Value, LeafError> + Send + Sync>;

/// Whether a builtin takes a bound parameter in its leaf expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    None,
    Required,
}

#[derive(Clone)]
pub struct Builtin {
    pub name: String,
    pub summary: String,
    pub param: Param,
    pub func: BuiltinFn,
}

#[derive(Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, Builtin>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the standard builtins.
    pub fn with_builtins() -> Self {
        let mut r = Self::new();
        builtins::install(&mut r);
        r
    }

    /// Register `func` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: &str, summary: &str, param: Param, func: F) -> &mut Self
    where
        F: Fn(&[Value], Option<&Value>) -> Result<Value, LeafError> + Send + Sync + 'static,
    {
        self.entries.insert(
            name.to_string(),
            Builtin {
                name: name.to_string(),
                summary: summary.to_string(),
                param,
                func: Arc::new(func),
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Builtins sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Builtin> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
