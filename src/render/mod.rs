//! Output rendering for applied results and shapes.

pub mod json;

pub use json::{render_json, render_shape, shape_to_json};
