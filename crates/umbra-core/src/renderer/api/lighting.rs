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

//! GPU-facing layout of the published directional light data.

use crate::math::{Mat4, Vec4};

/// Maximum number of directional lights published per frame.
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// Directional light data packed as a single uniform block.
///
/// Carries the same values the lighting lane publishes as individual shader
/// globals, for backends that upload one buffer per frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightUniforms {
    /// Light colors, already multiplied by intensity.
    pub colors: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    /// Directions towards each light, `w = 0`.
    pub directions: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    /// Per light: x = shadow strength, y = atlas tile index.
    pub shadow_data: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    /// World-to-atlas-tile shadow transforms.
    pub shadow_matrices: [[[f32; 4]; 4]; MAX_DIRECTIONAL_LIGHTS],
    /// Number of valid entries in the light arrays.
    pub count: u32,
    /// Padding for 16-byte alignment.
    pub _padding: [u32; 3],
}

impl DirectionalLightUniforms {
    /// Packs the light arrays into the uniform layout.
    pub fn new(
        count: usize,
        colors: &[Vec4; MAX_DIRECTIONAL_LIGHTS],
        directions: &[Vec4; MAX_DIRECTIONAL_LIGHTS],
        shadow_data: &[Vec4; MAX_DIRECTIONAL_LIGHTS],
        shadow_matrices: &[Mat4; MAX_DIRECTIONAL_LIGHTS],
    ) -> Self {
        let pack = |v: &Vec4| [v.x, v.y, v.z, v.w];
        Self {
            colors: colors.each_ref().map(pack),
            directions: directions.each_ref().map(pack),
            shadow_data: shadow_data.each_ref().map(pack),
            shadow_matrices: shadow_matrices.each_ref().map(Mat4::to_cols_array_2d),
            count: count.min(MAX_DIRECTIONAL_LIGHTS) as u32,
            _padding: [0; 3],
        }
    }

    /// The raw bytes to upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
