use flightscene_common::{Color, Viewport};
use flightscene_math::{Mat4, MathError};
use serde::{Deserialize, Serialize};

/// Largest viewport edge the point probe's range limit can address.
const MAX_VIEWPORT_EDGE: i32 = 16_000;

/// Errors from validating a [`RenderConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("viewport {width}x{height} must be positive and at most 16000 per edge")]
    Viewport { width: i32, height: i32 },
    #[error("viewport divisor must be positive, got {0}")]
    Divisor(i32),
    #[error("invalid projection: {0}")]
    Projection(#[from] MathError),
}

/// Renderer settings. Defaults reproduce the stock 640x480 flight view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub viewport: Viewport,
    /// Projection field-of-view scale.
    pub fov_scale: i32,
    /// Aspect ratio, 256 == 1.0.
    pub aspect_scale: i32,
    pub near: i32,
    pub far: i32,
    /// Extra divisor applied after the perspective divide.
    pub viewport_divisor: i32,
    /// Fill color for solid triangles.
    pub background: Color,
    /// Outline and wireframe color for environment models.
    pub line_color: Color,
    pub projectile_color: Color,
    pub explosion_color: Color,
    /// Draw the crosshair and status line after the scene.
    pub hud: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            fov_scale: 600,
            aspect_scale: 256,
            near: 50,
            far: 8192,
            viewport_divisor: 4,
            background: Color::BLACK,
            line_color: Color::WHITE,
            projectile_color: Color(198),
            explosion_color: Color::RED,
            hud: true,
        }
    }
}

impl RenderConfig {
    /// Check the settings and return the base projection they describe.
    pub fn validate(&self) -> Result<Mat4, ConfigError> {
        let Viewport { width, height } = self.viewport;
        if !(1..=MAX_VIEWPORT_EDGE).contains(&width) || !(1..=MAX_VIEWPORT_EDGE).contains(&height)
        {
            return Err(ConfigError::Viewport { width, height });
        }
        if self.viewport_divisor <= 0 {
            return Err(ConfigError::Divisor(self.viewport_divisor));
        }
        Ok(self.projection()?)
    }

    /// Perspective matrix before the camera's rotation is composed in.
    pub fn projection(&self) -> Result<Mat4, MathError> {
        Mat4::perspective(self.fov_scale, self.aspect_scale, self.near, self.far)
    }
}
