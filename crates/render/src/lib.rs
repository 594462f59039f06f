//! Scene renderer: turns fixed-point geometry and entity snapshots into
//! palette pixels on a [`Canvas`].
//!
//! Per frame: build the two transform matrices, probe every candidate
//! entity for a depth key, sort far to near, then draw in that order.
//! Triangles go through the scanline rasterizer, edges and tracers through
//! the line renderer.
//!
//! # Invariants
//! - Painter's algorithm only. There is no depth buffer.
//! - Modelview and projection are written once per frame, before any probe.
//! - Nothing outside the viewport is ever written.
//! - Rejections are values, never panics.
//! - Scratch buffers are reused across frames.

mod canvas;
mod compositor;
mod config;
mod cull;
mod dispatch;
mod frame;
mod hud;
mod raster;
mod renderer;
mod wire;

pub use canvas::{Canvas, Framebuffer};
pub use compositor::{DrawItem, DrawList, EntityRef};
pub use config::{ConfigError, RenderConfig};
pub use cull::{DepthKey, PointReject, VolumeReject, probe_point, probe_volume};
pub use dispatch::{
    Bounds, DebrisRng, DrawContext, Drawable, Scratch, StaticModel, dead_reckon,
    projectile_center, projectile_direction,
};
pub use frame::{Camera, Frame, FrameMatrices};
pub use hud::{draw_crosshair, draw_status};
pub use raster::fill_triangle;
pub use renderer::{FrameStats, Renderer, Scene, SceneRenderer};
pub use wire::{draw_edge, draw_model};

pub fn crate_info() -> &'static str {
    "flightscene-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
