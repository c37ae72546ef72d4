//! # Qualitative Spatial Algebras
//!
//! The interval algebra engine and its three-axis composition into a
//! block algebra over axis-aligned boxes. Both are pure classifiers:
//! intervals in, one label out, no state.

pub mod allen;
pub mod block;

pub use allen::{classify, classify_frames};
pub use block::{compose, compose_boxes, BoundingBox3d};
