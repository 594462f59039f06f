//! Shared types for the flightscene renderer.
//!
//! Everything here is plain data: palette colors, the viewport rectangle,
//! Euler angles and the unit conversions shared by the frame builder and the
//! entity kinds.

mod types;

pub use types::{
    Color, Euler, HPR_UNITS_PER_DEGREE, Micros, Viewport, byte_to_degrees, elapsed_micros,
    hpr_to_degrees,
};

pub fn crate_info() -> &'static str {
    "flightscene-common v0.1.0"
}
