//! Apply a nested mapping of functions to one shared set of arguments.
//!
//! ```
//! use spec_apply::{Spec, KeyPath};
//!
//! let spec: Spec<i64, i64> = Spec::node()
//!     .with("a", Spec::leaf(|x: &i64| x + 1))
//!     .with("b", Spec::node().with("c", Spec::leaf(|x: &i64| x * 2)));
//!
//! let out = spec.apply(&5);
//! assert_eq!(out.value_at(&KeyPath::parse("a")), Some(&6));
//! assert_eq!(out.value_at(&KeyPath::parse("b.c")), Some(&10));
//! ```

pub mod apply;
pub mod diagnostics;
pub mod error;
pub mod registry;
pub mod render;
pub mod spec;

pub use apply::{apply, apply_document, try_apply};
pub use error::{ApplyError, InvalidSpecError, LeafError};
pub use registry::{Param, Registry};
pub use spec::{Applied, KeyPath, Shape, Spec, SpecDocument, ValidatedSpec};
