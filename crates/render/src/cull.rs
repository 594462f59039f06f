//! Visibility probes. Two call shapes, each with its own tuned thresholds.

use glam::{IVec2, IVec3, IVec4};

use crate::Frame;

/// Volume probe: homogeneous `w` at or above this is behind or too close.
pub const VOLUME_NEAR_LIMIT: i32 = -2;
/// Pixels of slack added to a projected bounding radius.
pub const VOLUME_SLACK: i64 = 3;
/// Point probe: homogeneous `w` at or above this is behind or too close.
pub const POINT_NEAR_LIMIT: i32 = -4;
/// Point probe: screen coordinates beyond this magnitude are unusable.
pub const POINT_RANGE: i64 = 16_000;

/// Sort key for painter's ordering. Larger is farther.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DepthKey(pub i32);

/// Why a bounding volume was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeReject {
    BehindCamera,
    OffScreen,
}

impl VolumeReject {
    pub fn sentinel(self) -> i32 {
        match self {
            VolumeReject::BehindCamera => -2,
            VolumeReject::OffScreen => -1,
        }
    }
}

/// Why a single point could not be placed on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointReject {
    BehindCamera,
    OutOfRange,
}

impl PointReject {
    pub fn sentinel(self) -> i32 {
        match self {
            PointReject::BehindCamera => -1,
            PointReject::OutOfRange => -2,
        }
    }
}

fn clip_space(frame: &Frame, p: IVec3) -> IVec4 {
    let eye = frame.matrices.modelview.transform_point3(p);
    frame.matrices.projection.transform_point4(eye)
}

/// Perspective divide followed by the viewport divisor. Both divisions
/// truncate toward zero. `w` must be negative.
fn to_screen(frame: &Frame, t: IVec4) -> (i64, i64) {
    let w = t.w as i64;
    let div = frame.divisor as i64;
    let center = frame.viewport.center();
    (
        (256 * t.x as i64 / w) / div + center.x as i64,
        (256 * t.y as i64 / w) / div + center.y as i64,
    )
}

/// Probe a bounding sphere. Accepts with a depth key if any part of its
/// screen-space box can touch the viewport.
pub fn probe_volume(frame: &Frame, center: IVec3, radius: i32) -> Result<DepthKey, VolumeReject> {
    let t = clip_space(frame, center);
    if t.w >= VOLUME_NEAR_LIMIT {
        return Err(VolumeReject::BehindCamera);
    }
    let (scx, scy) = to_screen(frame, t);
    let scd = (-256 * 2 * radius as i64 / t.w as i64) / frame.divisor as i64 + VOLUME_SLACK;
    let (w, h) = (frame.viewport.width as i64, frame.viewport.height as i64);
    if scx < -scd || scy < -scd || scx >= w + scd || scy >= h + scd {
        return Err(VolumeReject::OffScreen);
    }
    Ok(DepthKey(t.w.saturating_neg()))
}

/// Project a single point to a raw screen position, usable as a line
/// endpoint. Callers skip whatever the point belongs to on failure.
pub fn probe_point(frame: &Frame, p: IVec3) -> Result<IVec2, PointReject> {
    let t = clip_space(frame, p);
    if t.w >= POINT_NEAR_LIMIT {
        return Err(PointReject::BehindCamera);
    }
    let (x, y) = to_screen(frame, t);
    if !(-POINT_RANGE..=POINT_RANGE).contains(&x) || !(-POINT_RANGE..=POINT_RANGE).contains(&y) {
        return Err(PointReject::OutOfRange);
    }
    Ok(IVec2::new(x as i32, y as i32))
}
