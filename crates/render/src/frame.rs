use flightscene_common::{Euler, Viewport, hpr_to_degrees};
use flightscene_math::Mat4;
use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::RenderConfig;

/// Viewer pose. Heading and pitch are in HPR units (1/11 degree).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    pub position: IVec3,
    pub heading: i32,
    pub pitch: i32,
}

impl Camera {
    pub fn new(position: IVec3, heading: i32, pitch: i32) -> Self {
        Self {
            position,
            heading,
            pitch,
        }
    }
}

/// The two transforms shared by every entity in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMatrices {
    pub modelview: Mat4,
    pub projection: Mat4,
}

impl FrameMatrices {
    /// Projection = perspective x camera rotation; modelview moves the world
    /// so the camera sits at the origin.
    pub fn build(camera: &Camera, perspective: &Mat4) -> Self {
        let mut projection = *perspective;
        projection.rotate(Euler::new(
            hpr_to_degrees(camera.heading),
            hpr_to_degrees(camera.pitch),
            0,
        ));
        let mut modelview = Mat4::IDENTITY;
        modelview.translate(-camera.position);
        Self {
            modelview,
            projection,
        }
    }
}

/// Everything the culler needs for one frame. Read-only once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub matrices: FrameMatrices,
    pub viewport: Viewport,
    pub divisor: i32,
}

impl Frame {
    pub fn new(camera: &Camera, config: &RenderConfig, perspective: &Mat4) -> Self {
        Self {
            matrices: FrameMatrices::build(camera, perspective),
            viewport: config.viewport,
            divisor: config.viewport_divisor,
        }
    }

    /// Frame for the default configuration. Falls back to identity
    /// transforms only if the defaults were ever made invalid.
    pub fn with_defaults(camera: &Camera) -> Self {
        let config = RenderConfig::default();
        let perspective = config.projection().unwrap_or_default();
        Self::new(camera, &config, &perspective)
    }
}
