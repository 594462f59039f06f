use flightscene_common::Euler;
use glam::{IVec3, IVec4};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

use crate::MathError;
use crate::fixed::Fixed;
use crate::trig::{cos1024, sin1024};

/// Row-major 4x4 transform of [`Fixed`] cells.
///
/// Points are integer world units. The translation column holds whole units:
/// a 3-vector is transformed with an implicit `w` of 256, which cancels the
/// cell scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mat4 {
    cells: [Fixed; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

const fn idx(row: usize, col: usize) -> usize {
    row * 4 + col
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4::from_raw([
        256, 0, 0, 0, //
        0, 256, 0, 0, //
        0, 0, 256, 0, //
        0, 0, 0, 256,
    ]);

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub const fn from_raw(raw: [i32; 16]) -> Self {
        let mut cells = [Fixed::ZERO; 16];
        let mut i = 0;
        while i < 16 {
            cells[i] = Fixed::from_raw(raw[i]);
            i += 1;
        }
        Self { cells }
    }

    pub fn to_raw(&self) -> [i32; 16] {
        self.cells.map(Fixed::raw)
    }

    pub fn get(&self, row: usize, col: usize) -> Fixed {
        self.cells[idx(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: Fixed) {
        self.cells[idx(row, col)] = value;
    }

    /// Projection from a field-of-view scale, an aspect scale (256 == 1.0) and
    /// near/far clip distances. The bottom row maps camera-space `z` to
    /// `w = -z`, so visible points end up with negative `w`.
    pub fn perspective(
        fov_scale: i32,
        aspect_scale: i32,
        near: i32,
        far: i32,
    ) -> Result<Self, MathError> {
        if aspect_scale == 0 {
            return Err(MathError::ZeroAspect);
        }
        if near >= far {
            return Err(MathError::NearNotBeforeFar { near, far });
        }
        let (fov, aspect, near, far) = (
            fov_scale as i64,
            aspect_scale as i64,
            near as i64,
            far as i64,
        );
        let clamp = |v: i64| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32;

        let mut out = [0i32; 16];
        out[idx(0, 0)] = clamp(fov * 256 / aspect);
        out[idx(1, 1)] = clamp(fov);
        out[idx(2, 2)] = clamp(256 * (far + near) / (near - far));
        out[idx(2, 3)] = clamp(2 * far * near / (near - far));
        out[idx(3, 2)] = -256;
        Ok(Self::from_raw(out))
    }

    /// Pure rotation built from the sine table. Pitch turns about X, heading
    /// about Y, roll about Z; angles are normalised into `0..360` first.
    pub fn rotation(angles: Euler) -> Self {
        // table values are scaled by 1024, cells by 256
        let trig = |deg: i32| (cos1024(deg) >> 2, sin1024(deg) >> 2);
        let (cx, sx) = trig(angles.pitch);
        let (cy, sy) = trig(angles.heading);
        let (cz, sz) = trig(angles.roll);

        let mut m = Self::IDENTITY;
        let mut put = |row: usize, col: usize, v: i32| m.cells[idx(row, col)] = Fixed::from_raw(v);

        put(0, 0, (cy * cz) >> 8);
        put(1, 0, ((((sx * sy) >> 8) * cz) - (cx * sz)) >> 8);
        put(2, 0, ((((cx * sy) >> 8) * cz) + (sx * sz)) >> 8);
        put(3, 0, 0);

        put(0, 1, (cy * sz) >> 8);
        put(1, 1, ((((sx * sy) >> 8) * sz) + (cx * cz)) >> 8);
        put(2, 1, ((((cx * sy) >> 8) * sz) - (sx * cz)) >> 8);
        put(3, 1, 0);

        put(0, 2, -sy);
        put(1, 2, (sx * cy) >> 8);
        put(2, 2, (cx * cy) >> 8);
        put(3, 2, 0);

        put(0, 3, 0);
        put(1, 3, 0);
        put(2, 3, 0);
        put(3, 3, Fixed::SCALE);
        m
    }

    /// Compose a rotation into this matrix: `self = self * R`, so the rotation
    /// is applied to points before anything already in `self`.
    pub fn rotate(&mut self, angles: Euler) {
        *self = *self * Self::rotation(angles);
    }

    /// Add an offset to the translation column. Only valid as the last
    /// composition step before transforming points.
    pub fn translate(&mut self, offset: IVec3) {
        for (row, d) in offset.to_array().into_iter().enumerate() {
            let cell = &mut self.cells[idx(row, 3)];
            *cell = *cell + Fixed::from_raw(d);
        }
    }

    /// Overwrite the translation column.
    pub fn set_translation(&mut self, t: IVec3) {
        for (row, d) in t.to_array().into_iter().enumerate() {
            self.cells[idx(row, 3)] = Fixed::from_raw(d);
        }
    }

    fn row_dot(&self, row: usize, p: [i64; 4]) -> i32 {
        let acc = (0..4)
            .map(|col| p[col] * self.cells[idx(row, col)].raw() as i64)
            .fold(0i64, i64::saturating_add);
        Fixed::descale(acc)
    }

    /// Transform a 3-vector with an implicit `w` of 256.
    pub fn transform_point3(&self, p: IVec3) -> IVec4 {
        self.transform_point4(p.extend(Fixed::SCALE))
    }

    /// Transform an explicit homogeneous 4-vector.
    pub fn transform_point4(&self, p: IVec4) -> IVec4 {
        let p = [p.x as i64, p.y as i64, p.z as i64, p.w as i64];
        IVec4::new(
            self.row_dot(0, p),
            self.row_dot(1, p),
            self.row_dot(2, p),
            self.row_dot(3, p),
        )
    }

    /// Affine part only: rows 0..3 of [`Mat4::transform_point3`].
    pub fn transform_affine(&self, p: IVec3) -> IVec3 {
        self.transform_point3(p).truncate()
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = [Fixed::ZERO; 16];
        for row in 0..4 {
            for col in 0..4 {
                let acc = (0..4)
                    .map(|k| {
                        self.cells[idx(row, k)].raw() as i64 * rhs.cells[idx(k, col)].raw() as i64
                    })
                    .fold(0i64, i64::saturating_add);
                out[idx(row, col)] = Fixed::from_raw(Fixed::descale(acc));
            }
        }
        Mat4 { cells: out }
    }
}
