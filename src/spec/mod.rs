//! Spec layer: typed trees, key paths and JSON spec documents.
//!
//! This module is separate from the builtin registry and rendering.
//! It owns:
//! - KeyPath (location of a node inside a tree)
//! - Spec / Applied / Shape (the tagged-union trees)
//! - SpecDocument (JSON form validated into a callable Spec)

pub mod document;
pub mod path;
pub mod tree;

pub use document::{DynSpec, SpecDocument, ValidatedSpec};
pub use path::KeyPath;
pub use tree::{Applied, LeafFn, Shape, Spec};
