//! Foundation primitives shared by every layer.

mod position;

pub use position::{SourcePosition, Span};
