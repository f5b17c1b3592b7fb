//! Typed spec trees and their applied mirrors.
//!
//! A `Spec<A, R>` is a tagged union of leaves (functions `&A -> R`) and nodes
//! (ordered string-keyed maps of child specs). Applying it to one argument
//! value yields an `Applied<R>` with exactly the same key structure.

use crate::spec::KeyPath;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// Boxed leaf function. `A` may be unsized so `[Value]` argument lists work.
pub type LeafFn<A, R> = Box<dyn Fn(&A) -> R>;

pub enum Spec<A: ?Sized, R> {
    Leaf(LeafFn<A, R>),
    Node(IndexMap<String, Spec<A, R>>),
}

/// Result tree. Leaves hold whatever the corresponding spec leaf returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Applied<R> {
    Value(R),
    Node(IndexMap<String, Applied<R>>),
}

/// Key structure of a tree with the leaves erased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Leaf,
    Node(IndexMap<String, Shape>),
}

impl Shape {
    pub fn depth(&self) -> usize {
        match self {
            Shape::Leaf => 0,
            Shape::Node(children) => 1 + children.values().map(Shape::depth).max().unwrap_or(0),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Shape::Leaf => 1,
            Shape::Node(children) => children.values().map(Shape::leaf_count).sum(),
        }
    }
}

impl<A: ?Sized + 'static, R: 'static> Spec<A, R> {
    pub fn leaf<F>(f: F) -> Self
    where
        F: Fn(&A) -> R + 'static,
    {
        Spec::Leaf(Box::new(f))
    }

    /// An empty node; populate it with [`Spec::with`].
    pub fn node() -> Self {
        Spec::Node(IndexMap::new())
    }

    /// Add (or replace) a child under `key`.
    ///
    /// Called on a leaf, the leaf function is dropped and replaced by a node
    /// holding only the new child.
    pub fn with(self, key: impl Into<String>, child: Spec<A, R>) -> Self {
        let mut children = match self {
            Spec::Node(children) => children,
            Spec::Leaf(_) => IndexMap::new(),
        };
        children.insert(key.into(), child);
        Spec::Node(children)
    }

    /// Reuse a spec written for a narrower argument type by projecting the
    /// full arguments down to what its leaves accept.
    pub fn project_args<B, P>(self, project: P) -> Spec<B, R>
    where
        A: Sized,
        B: ?Sized + 'static,
        P: Fn(&B) -> A + 'static,
    {
        let project: Rc<dyn Fn(&B) -> A> = Rc::new(project);
        self.map_leaves(|leaf| {
            let project = Rc::clone(&project);
            let adapted: LeafFn<B, R> = Box::new(move |args: &B| leaf(&project(args)));
            adapted
        })
    }
}

impl<A: ?Sized, R> Spec<A, R> {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Spec::Leaf(_))
    }

    /// Keys of a node in insertion order; empty for a leaf.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Spec::Leaf(_) => Vec::new(),
            Spec::Node(children) => children.keys().map(String::as_str).collect(),
        }
    }

    pub fn get(&self, path: &KeyPath) -> Option<&Spec<A, R>> {
        let mut cur = self;
        for key in path.segments() {
            match cur {
                Spec::Node(children) => cur = children.get(key)?,
                Spec::Leaf(_) => return None,
            }
        }
        Some(cur)
    }

    pub fn shape(&self) -> Shape {
        match self {
            Spec::Leaf(_) => Shape::Leaf,
            Spec::Node(children) => Shape::Node(
                children
                    .iter()
                    .map(|(k, child)| (k.clone(), child.shape()))
                    .collect(),
            ),
        }
    }

    pub fn depth(&self) -> usize {
        self.shape().depth()
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Spec::Leaf(_) => 1,
            Spec::Node(children) => children.values().map(Spec::leaf_count).sum(),
        }
    }

    /// Call every leaf with `args`, depth-first in key order, and collect the
    /// results into a tree of the same shape.
    pub fn apply(&self, args: &A) -> Applied<R> {
        match self {
            Spec::Leaf(f) => Applied::Value(f(args)),
            Spec::Node(children) => Applied::Node(
                children
                    .iter()
                    .map(|(k, child)| (k.clone(), child.apply(args)))
                    .collect(),
            ),
        }
    }

    /// Rebuild the tree with every leaf function transformed by `g`.
    pub fn map_leaves<B: ?Sized, S, G>(self, g: G) -> Spec<B, S>
    where
        G: Fn(LeafFn<A, R>) -> LeafFn<B, S>,
    {
        self.map_leaves_with(&g)
    }

    fn map_leaves_with<B: ?Sized, S, G>(self, g: &G) -> Spec<B, S>
    where
        G: Fn(LeafFn<A, R>) -> LeafFn<B, S>,
    {
        match self {
            Spec::Leaf(f) => Spec::Leaf(g(f)),
            Spec::Node(children) => Spec::Node(
                children
                    .into_iter()
                    .map(|(k, child)| (k, child.map_leaves_with(g)))
                    .collect(),
            ),
        }
    }
}

impl<A: ?Sized, T, E> Spec<A, Result<T, E>> {
    /// Like [`Spec::apply`] for fallible leaves. The first leaf error in
    /// traversal order is returned as-is and no partial tree is produced.
    pub fn try_apply(&self, args: &A) -> Result<Applied<T>, E> {
        match self {
            Spec::Leaf(f) => f(args).map(Applied::Value),
            Spec::Node(children) => {
                let mut out = IndexMap::with_capacity(children.len());
                for (k, child) in children {
                    out.insert(k.clone(), child.try_apply(args)?);
                }
                Ok(Applied::Node(out))
            }
        }
    }
}

impl<A: ?Sized, R, K: Into<String>> FromIterator<(K, Spec<A, R>)> for Spec<A, R> {
    fn from_iter<I: IntoIterator<Item = (K, Spec<A, R>)>>(iter: I) -> Self {
        Spec::Node(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<A: ?Sized, R> fmt::Debug for Spec<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spec::Leaf(_) => f.write_str("<fn>"),
            Spec::Node(children) => f.debug_map().entries(children.iter()).finish(),
        }
    }
}

impl<R> Applied<R> {
    pub fn shape(&self) -> Shape {
        match self {
            Applied::Value(_) => Shape::Leaf,
            Applied::Node(children) => Shape::Node(
                children
                    .iter()
                    .map(|(k, child)| (k.clone(), child.shape()))
                    .collect(),
            ),
        }
    }

    pub fn depth(&self) -> usize {
        self.shape().depth()
    }

    pub fn get(&self, path: &KeyPath) -> Option<&Applied<R>> {
        let mut cur = self;
        for key in path.segments() {
            match cur {
                Applied::Node(children) => cur = children.get(key)?,
                Applied::Value(_) => return None,
            }
        }
        Some(cur)
    }

    /// Leaf value at `path`, if the path ends on a leaf.
    pub fn value_at(&self, path: &KeyPath) -> Option<&R> {
        match self.get(path)? {
            Applied::Value(v) => Some(v),
            Applied::Node(_) => None,
        }
    }

    pub fn into_value(self) -> Option<R> {
        match self {
            Applied::Value(v) => Some(v),
            Applied::Node(_) => None,
        }
    }

    /// Every leaf with its path, depth-first in key order.
    pub fn leaves(&self) -> Vec<(KeyPath, &R)> {
        let mut out = Vec::new();
        self.collect_leaves(KeyPath::root(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, at: KeyPath, out: &mut Vec<(KeyPath, &'a R)>) {
        match self {
            Applied::Value(v) => out.push((at, v)),
            Applied::Node(children) => {
                for (k, child) in children {
                    child.collect_leaves(at.child(k), out);
                }
            }
        }
    }

    pub fn map<S, F>(self, mut f: F) -> Applied<S>
    where
        F: FnMut(R) -> S,
    {
        self.map_with(&mut f)
    }

    fn map_with<S, F>(self, f: &mut F) -> Applied<S>
    where
        F: FnMut(R) -> S,
    {
        match self {
            Applied::Value(v) => Applied::Value(f(v)),
            Applied::Node(children) => Applied::Node(
                children
                    .into_iter()
                    .map(|(k, child)| (k, child.map_with(f)))
                    .collect(),
            ),
        }
    }
}

impl<R: Serialize> Applied<R> {
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
