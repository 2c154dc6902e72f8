// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides the column-major 4x4 matrix used for transforms, camera and shadow
//! projections, and the world-to-atlas shadow transforms.

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

use super::{Vec3, Vec4, EPSILON};
use std::ops::{Index, IndexMut, Mul};

/// A 4x4 column-major matrix.
///
/// The memory layout is column-major, which is what shader uniform blocks
/// expect, so a `[Mat4; N]` can be uploaded with [`bytemuck::cast_slice`].
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        ],
    };

    /// A 4x4 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO; 4],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Returns a row of the matrix as a `Vec4`.
    #[inline]
    pub fn get_row(&self, index: usize) -> Vec4 {
        Vec4::new(
            self.cols[0][index],
            self.cols[1][index],
            self.cols[2][index],
            self.cols[3][index],
        )
    }

    /// Overwrites a row of the matrix.
    #[inline]
    pub fn set_row(&mut self, index: usize, row: Vec4) {
        self.cols[0][index] = row.x;
        self.cols[1][index] = row.y;
        self.cols[2][index] = row.z;
        self.cols[3][index] = row.w;
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn from_translation(v: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = Vec4::from_vec3(v, 1.0);
        m
    }

    /// Builds a rigid transform whose third column (local forward) points along
    /// `forward` and whose origin is `position`.
    ///
    /// Returns `None` if `forward` is degenerate or parallel to `up`.
    pub fn from_position_forward(position: Vec3, forward: Vec3, up: Vec3) -> Option<Self> {
        let z = forward.normalize();
        if z == Vec3::ZERO {
            return None;
        }
        let x = up.cross(z);
        if x.length_squared() < EPSILON * EPSILON {
            return None;
        }
        let x = x.normalize();
        let y = z.cross(x);
        Some(Self::from_cols(
            Vec4::from_vec3(x, 0.0),
            Vec4::from_vec3(y, 0.0),
            Vec4::from_vec3(z, 0.0),
            Vec4::from_vec3(position, 1.0),
        ))
    }

    /// Creates a right-handed perspective projection matrix with a [0, 1] depth range (ZO).
    ///
    /// # Arguments
    ///
    /// * `fov_y_radians`: Vertical field of view in radians.
    /// * `aspect_ratio`: Width divided by height of the viewport.
    /// * `z_near`: Distance to the near clipping plane (must be positive).
    /// * `z_far`: Distance to the far clipping plane (must be > `z_near`).
    #[inline]
    pub fn perspective_rh_zo(
        fov_y_radians: f32,
        aspect_ratio: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        let f = 1.0 / (fov_y_radians * 0.5).tan();
        let range = z_near - z_far;
        Self::from_cols(
            Vec4::new(f / aspect_ratio, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, z_far / range, -1.0),
            Vec4::new(0.0, 0.0, (z_near * z_far) / range, 0.0),
        )
    }

    /// Creates a right-handed orthographic projection matrix with a [-1, 1]
    /// depth range (GL convention).
    ///
    /// Shadow fits use this form so that every clip-space axis spans `[-1, 1]`.
    #[inline]
    pub fn orthographic_rh_gl(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        let rml = right - left;
        let tmb = top - bottom;
        let fmn = z_far - z_near;
        Self::from_cols(
            Vec4::new(2.0 / rml, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / tmb, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -2.0 / fmn, 0.0),
            Vec4::new(
                -(right + left) / rml,
                -(top + bottom) / tmb,
                -(z_far + z_near) / fmn,
                1.0,
            ),
        )
    }

    /// Creates a right-handed view matrix looking from `eye` towards `target`.
    ///
    /// Returns `None` if `eye` and `target` coincide or if `up` is parallel to
    /// the viewing direction.
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Option<Self> {
        let forward = target - eye;
        if forward.length_squared() < EPSILON * EPSILON {
            return None;
        }
        let f = forward.normalize();
        let s = f.cross(up);
        if s.length_squared() < EPSILON * EPSILON {
            return None;
        }
        let s = s.normalize();
        let u = s.cross(f);

        Some(Self::from_cols(
            Vec4::new(s.x, u.x, -f.x, 0.0),
            Vec4::new(s.y, u.y, -f.y, 0.0),
            Vec4::new(s.z, u.z, -f.z, 0.0),
            Vec4::new(-eye.dot(s), -eye.dot(u), eye.dot(f), 1.0),
        ))
    }

    /// Returns the transpose of the matrix.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.get_row(0), self.get_row(1), self.get_row(2), self.get_row(3))
    }

    /// Computes the inverse of the matrix.
    /// Returns `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let a = |r: usize, c: usize| self.cols[c][r];

        let s0 = a(0, 0) * a(1, 1) - a(1, 0) * a(0, 1);
        let s1 = a(0, 0) * a(1, 2) - a(1, 0) * a(0, 2);
        let s2 = a(0, 0) * a(1, 3) - a(1, 0) * a(0, 3);
        let s3 = a(0, 1) * a(1, 2) - a(1, 1) * a(0, 2);
        let s4 = a(0, 1) * a(1, 3) - a(1, 1) * a(0, 3);
        let s5 = a(0, 2) * a(1, 3) - a(1, 2) * a(0, 3);

        let c5 = a(2, 2) * a(3, 3) - a(3, 2) * a(2, 3);
        let c4 = a(2, 1) * a(3, 3) - a(3, 1) * a(2, 3);
        let c3 = a(2, 1) * a(3, 2) - a(3, 1) * a(2, 2);
        let c2 = a(2, 0) * a(3, 3) - a(3, 0) * a(2, 3);
        let c1 = a(2, 0) * a(3, 2) - a(3, 0) * a(2, 2);
        let c0 = a(2, 0) * a(3, 1) - a(3, 0) * a(2, 1);

        let det = s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0;
        if !det.is_finite() || det.abs() < f32::MIN_POSITIVE {
            return None;
        }
        let inv = 1.0 / det;

        let mut out = Self::ZERO;
        out.set_row(
            0,
            Vec4::new(
                a(1, 1) * c5 - a(1, 2) * c4 + a(1, 3) * c3,
                -a(0, 1) * c5 + a(0, 2) * c4 - a(0, 3) * c3,
                a(3, 1) * s5 - a(3, 2) * s4 + a(3, 3) * s3,
                -a(2, 1) * s5 + a(2, 2) * s4 - a(2, 3) * s3,
            ) * inv,
        );
        out.set_row(
            1,
            Vec4::new(
                -a(1, 0) * c5 + a(1, 2) * c2 - a(1, 3) * c1,
                a(0, 0) * c5 - a(0, 2) * c2 + a(0, 3) * c1,
                -a(3, 0) * s5 + a(3, 2) * s2 - a(3, 3) * s1,
                a(2, 0) * s5 - a(2, 2) * s2 + a(2, 3) * s1,
            ) * inv,
        );
        out.set_row(
            2,
            Vec4::new(
                a(1, 0) * c4 - a(1, 1) * c2 + a(1, 3) * c0,
                -a(0, 0) * c4 + a(0, 1) * c2 - a(0, 3) * c0,
                a(3, 0) * s4 - a(3, 1) * s2 + a(3, 3) * s0,
                -a(2, 0) * s4 + a(2, 1) * s2 - a(2, 3) * s0,
            ) * inv,
        );
        out.set_row(
            3,
            Vec4::new(
                -a(1, 0) * c3 + a(1, 1) * c1 - a(1, 2) * c0,
                a(0, 0) * c3 - a(0, 1) * c1 + a(0, 2) * c0,
                -a(3, 0) * s3 + a(3, 1) * s1 - a(3, 2) * s0,
                a(2, 0) * s3 - a(2, 1) * s1 + a(2, 2) * s0,
            ) * inv,
        );
        Some(out)
    }

    /// Transforms a point, including the perspective divide.
    #[inline]
    pub fn transform_point3(&self, p: Vec3) -> Vec3 {
        let v = *self * Vec4::from_vec3(p, 1.0);
        if v.w.abs() > EPSILON {
            v.truncate() / v.w
        } else {
            v.truncate()
        }
    }

    /// Returns the matrix as nested column arrays, the layout uniform blocks use.
    #[inline]
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.cols.map(|c| [c.x, c.y, c.z, c.w])
    }
}

impl Default for Mat4 {
    /// Returns the 4x4 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Mat4> for Mat4 {
    type Output = Self;
    /// Composes two transforms; `a * b` applies `b` first.
    #[inline]
    fn mul(self, rhs: Mat4) -> Self::Output {
        Self {
            cols: rhs.cols.map(|c| self * c),
        }
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn mul(self, rhs: Vec4) -> Self::Output {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

impl Index<usize> for Mat4 {
    type Output = Vec4;
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.cols[index]
    }
}

impl IndexMut<usize> for Mat4 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.cols[index]
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

// --- Tests ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::FRAC_PI_2;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_get_and_set_row() {
        let mut m = Mat4::IDENTITY;
        m.set_row(2, Vec4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(m.get_row(2), Vec4::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(m.cols[3].z, 4.0);
        assert_eq!(m.get_row(0), Vec4::new(1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_multiplication_applies_right_first() {
        let t = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let s = Mat4::from_cols(
            Vec4::new(2.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 2.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        );
        let p = (t * s).transform_point3(Vec3::new(1.0, 1.0, 1.0));
        assert_abs_diff_eq!(p, Vec3::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = Mat4::look_at_rh(Vec3::new(3.0, 4.0, 5.0), Vec3::ZERO, Vec3::Y)
            .expect("valid look-at");
        let inv = m.inverse().expect("rigid transforms are invertible");
        assert_abs_diff_eq!(m * inv, Mat4::IDENTITY, epsilon = 1e-4);
    }

    #[test]
    fn test_inverse_of_singular_is_none() {
        assert!(Mat4::ZERO.inverse().is_none());
    }

    #[test]
    fn test_orthographic_rh_gl_maps_box_to_unit_cube() {
        let proj = Mat4::orthographic_rh_gl(-10.0, 10.0, -5.0, 5.0, 1.0, 21.0);
        // Right-handed view space looks down -Z.
        assert_abs_diff_eq!(
            proj.transform_point3(Vec3::new(-10.0, -5.0, -1.0)),
            Vec3::new(-1.0, -1.0, -1.0)
        );
        assert_abs_diff_eq!(
            proj.transform_point3(Vec3::new(10.0, 5.0, -21.0)),
            Vec3::new(1.0, 1.0, 1.0)
        );
    }

    #[test]
    fn test_perspective_rh_zo_depth_range() {
        let proj = Mat4::perspective_rh_zo(FRAC_PI_2, 1.0, 0.1, 100.0);
        let near = proj.transform_point3(Vec3::new(0.0, 0.0, -0.1));
        let far = proj.transform_point3(Vec3::new(0.0, 0.0, -100.0));
        assert_abs_diff_eq!(near.z, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(far.z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_look_at_rh_degenerate_cases() {
        assert!(Mat4::look_at_rh(Vec3::ZERO, Vec3::ZERO, Vec3::Y).is_none());
        assert!(Mat4::look_at_rh(Vec3::ZERO, Vec3::Y, Vec3::Y).is_none());
    }

    #[test]
    fn test_from_position_forward_keeps_forward_in_third_column() {
        let forward = Vec3::new(0.0, -1.0, 1.0).normalize();
        let m = Mat4::from_position_forward(Vec3::new(1.0, 2.0, 3.0), forward, Vec3::Y)
            .expect("forward is not parallel to up");
        assert_abs_diff_eq!(m.cols[2].truncate(), forward);
        assert_eq!(m.cols[3], Vec4::new(1.0, 2.0, 3.0, 1.0));
    }
}
