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

//! The culling query surface the pipeline reads from.
//!
//! Culling itself belongs to the host engine. After [`RenderContext::cull`]
//! runs, the pipeline only asks three things: which lights are visible, whether
//! a light has any shadow casters in range, and what view/projection a
//! directional light needs to cover them.
//!
//! [`RenderContext::cull`]: crate::renderer::traits::RenderContext::cull

use crate::math::{Aabb, Mat4, Vec3, Vec4};
use crate::renderer::light::VisibleLight;

/// Per-split culling data returned by a directional shadow fit and passed
/// back when drawing that split's casters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShadowSplitData {
    /// Bounding sphere of the split, `xyz` = center and `w` = radius.
    pub culling_sphere: Vec4,
    /// How much of the previous cascade's casters to cull, in `[0, 1]`.
    pub shadow_cascade_blend_culling_factor: f32,
}

/// The result of fitting a directional light's shadow frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalShadowFit {
    /// World-to-light view matrix.
    pub view: Mat4,
    /// Orthographic projection with a `[-1, 1]` clip range on every axis.
    pub projection: Mat4,
    /// Culling data for the caster draw.
    pub split_data: ShadowSplitData,
}

/// Read access to the result of culling one camera.
pub trait CullingResults {
    /// Visible lights in scan order.
    fn visible_lights(&self) -> &[VisibleLight];

    /// Merged bounds of the shadow casters affected by the visible light at
    /// `visible_light_index`, or `None` if nothing in range casts a shadow for it.
    fn shadow_caster_bounds(&self, visible_light_index: usize) -> Option<Aabb>;

    /// Fits an orthographic shadow frustum for one split of a directional light.
    ///
    /// * `split_index` / `split_count`: cascade index and count.
    /// * `split_ratio`: cascade split distances as fractions of the shadow distance.
    /// * `tile_size`: resolution in pixels of the atlas tile the split renders to.
    /// * `near_plane_offset`: how far to pull the near plane towards the light.
    ///
    /// Returns `None` when no fit can be computed.
    fn compute_directional_shadow_matrices(
        &self,
        visible_light_index: usize,
        split_index: usize,
        split_count: usize,
        split_ratio: Vec3,
        tile_size: u32,
        near_plane_offset: f32,
    ) -> Option<DirectionalShadowFit>;
}
