//! Fixed-point transform engine.
//!
//! # Invariants
//! - No floating point anywhere: matrix cells are [`Fixed`] values with a
//!   scale of 256, products accumulate in `i64` and descale with saturation.
//! - Angles index a 360-entry integer sine table; the table is bit-exact with
//!   the renderer's historical output.

mod fixed;
mod matrix;
mod trig;

pub use fixed::Fixed;
pub use matrix::Mat4;
pub use trig::{SIN1024, cos1024, sin1024};

/// Errors raised while building projection matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("near plane {near} must be closer than far plane {far}")]
    NearNotBeforeFar { near: i32, far: i32 },
    #[error("aspect scale must be non-zero")]
    ZeroAspect,
}

pub fn crate_info() -> &'static str {
    "flightscene-math v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("math"));
    }
}
