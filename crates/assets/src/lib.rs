//! Model assets: immutable geometry loaded once and read by the renderer.
//!
//! # Layout
//! A model is a flat run of 16-bit words:
//! ```text
//! vertex_numbers faces indices_per_face cx cy cz radius label
//! indices[faces * indices_per_face]      (coordinate offsets, multiples of 3)
//! coords[vertex_numbers]                 (x y z per vertex, signed)
//! ```
//! An environment blob is two header words, a model count, then the models
//! back to back.
//!
//! # Invariants
//! - Every face index is a valid vertex number once a [`Model`] exists.
//! - Models are never mutated after load.

mod model;
mod table;

pub use model::{MAX_VERTICES, Model, Topology};
pub use table::ModelTable;

/// Errors from parsing or loading model data.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("buffer truncated: needed {needed} words, {available} available")]
    Truncated { needed: usize, available: usize },
    #[error("byte length {0} is not a whole number of 16-bit words")]
    OddLength(usize),
    #[error("unsupported indices per face: {0}")]
    IndicesPerFace(u16),
    #[error("vertex-number count {0} is not a multiple of 3")]
    VertexNumbers(u16),
    #[error("index slot {0} is not a coordinate offset")]
    MisalignedIndex(u16),
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: usize, vertex_count: usize },
    #[error("index count {count} is not a multiple of {per_face}")]
    PartialFace { count: usize, per_face: usize },
    #[error("negative bounding radius {0}")]
    NegativeRadius(i32),
    #[error("model too large for the word layout: {vertices} vertices, {faces} faces")]
    TooLarge { vertices: usize, faces: usize },
}

pub fn crate_info() -> &'static str {
    "flightscene-assets v0.1.0"
}
