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

//! Directional shadow rendering into a shared, tiled atlas.
//!
//! Each frame runs the same sequence:
//!
//! 1. [`ShadowRenderer::setup`] forgets last frame's reservations.
//! 2. The lighting lane calls [`ShadowRenderer::reserve_directional_shadows`]
//!    for every directional light it keeps, in scan order. Eligible lights get
//!    the next atlas tile until the capacity is reached.
//! 3. [`ShadowRenderer::render`] allocates the atlas (only when something was
//!    reserved), renders every tile, and publishes the world-to-tile matrices.
//! 4. [`ShadowRenderer::cleanup`] releases the atlas.

mod atlas;
mod matrix;

pub use atlas::AtlasLayout;
pub use matrix::to_atlas_matrix;

use umbra_core::math::{LinearRgba, Mat4, Vec3};
use umbra_core::renderer::api::{
    CommandList, RenderBufferLoadAction, RenderBufferStoreAction, RenderTextureDescriptor,
    ShaderPropertyId, ShadowDrawingSettings,
};
use umbra_core::renderer::{CullingResults, RenderContext, VisibleLight};
use umbra_core::telemetry::MetricsResult;
use umbra_core::ShadowSettings;
use umbra_telemetry::{CounterHandle, GaugeHandle, MetricsRegistry};

/// Upper bound on directional lights sharing the atlas in one frame.
pub const MAX_SHADOWED_DIRECTIONAL_LIGHTS: usize = 4;

/// Global id of the atlas texture.
pub const DIRECTIONAL_SHADOW_ATLAS: ShaderPropertyId =
    ShaderPropertyId::new("_DirectionalShadowAtlas");
/// Global id of the world-to-tile matrix array.
pub const DIRECTIONAL_SHADOW_MATRICES: ShaderPropertyId =
    ShaderPropertyId::new("_DirectionalShadowMatrices");

const BUFFER_NAME: &str = "Shadows";

/// A reserved atlas tile: the tile index is the slot position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShadowedDirectionalLight {
    /// Index of the light in the culling results' visible lights.
    pub visible_light_index: usize,
}

/// Where the renderer is in its per-frame sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowPassState {
    /// Never set up.
    Idle,
    /// Set up; accepting reservations.
    Reserving,
    /// Tiles rendered and matrices published.
    Published,
    /// Atlas released; waiting for the next setup.
    CleanedUp,
}

/// Metric handles updated by the shadow renderer.
#[derive(Debug, Clone)]
pub struct ShadowMetrics {
    atlas_allocations: CounterHandle,
    lights_truncated: CounterHandle,
    shadowed_lights: GaugeHandle,
}

impl ShadowMetrics {
    /// Registers the shadow metrics in the `shadows` namespace.
    pub fn register(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            atlas_allocations: registry.register_counter(
                "shadows",
                "atlas_allocations",
                "Frames that allocated a directional shadow atlas",
            )?,
            lights_truncated: registry.register_counter(
                "shadows",
                "lights_truncated",
                "Shadow-eligible lights refused because the atlas was full",
            )?,
            shadowed_lights: registry.register_gauge(
                "shadows",
                "shadowed_lights",
                "Directional lights holding an atlas tile this frame",
                "lights",
            )?,
        })
    }
}

/// Reserves, renders, and releases the directional shadow atlas.
#[derive(Debug)]
pub struct ShadowRenderer {
    list: CommandList,
    settings: ShadowSettings,
    capacity: usize,
    slots: [ShadowedDirectionalLight; MAX_SHADOWED_DIRECTIONAL_LIGHTS],
    count: usize,
    matrices: [Mat4; MAX_SHADOWED_DIRECTIONAL_LIGHTS],
    rendered: [bool; MAX_SHADOWED_DIRECTIONAL_LIGHTS],
    atlas: Option<AtlasLayout>,
    state: ShadowPassState,
    metrics: Option<ShadowMetrics>,
}

impl Default for ShadowRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ShadowRenderer {
    /// A renderer sharing the atlas between up to
    /// [`MAX_SHADOWED_DIRECTIONAL_LIGHTS`] lights.
    pub fn new() -> Self {
        Self::with_capacity(MAX_SHADOWED_DIRECTIONAL_LIGHTS)
    }

    /// A renderer sharing the atlas between up to `capacity` lights.
    ///
    /// # Panics
    /// Panics unless `1 <= capacity <= MAX_SHADOWED_DIRECTIONAL_LIGHTS`.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            (1..=MAX_SHADOWED_DIRECTIONAL_LIGHTS).contains(&capacity),
            "shadow capacity must be in 1..={MAX_SHADOWED_DIRECTIONAL_LIGHTS}, got {capacity}"
        );
        Self {
            list: CommandList::new(BUFFER_NAME),
            settings: ShadowSettings::default(),
            capacity,
            slots: [ShadowedDirectionalLight::default(); MAX_SHADOWED_DIRECTIONAL_LIGHTS],
            count: 0,
            matrices: [Mat4::IDENTITY; MAX_SHADOWED_DIRECTIONAL_LIGHTS],
            rendered: [false; MAX_SHADOWED_DIRECTIONAL_LIGHTS],
            atlas: None,
            state: ShadowPassState::Idle,
            metrics: None,
        }
    }

    /// Attaches metric handles.
    pub fn set_metrics(&mut self, metrics: ShadowMetrics) {
        self.metrics = Some(metrics);
    }

    /// Starts a frame: drops every reservation and stores the frame's settings.
    ///
    /// # Panics
    /// Panics if the previous frame's atlas was never released by
    /// [`ShadowRenderer::cleanup`].
    pub fn setup(&mut self, settings: &ShadowSettings) {
        assert!(
            self.atlas.is_none(),
            "ShadowRenderer: setup called before the previous frame's atlas was released"
        );
        self.settings = *settings;
        self.count = 0;
        self.matrices = [Mat4::IDENTITY; MAX_SHADOWED_DIRECTIONAL_LIGHTS];
        self.rendered = [false; MAX_SHADOWED_DIRECTIONAL_LIGHTS];
        self.state = ShadowPassState::Reserving;
    }

    /// Tries to give `light` the next atlas tile.
    ///
    /// The light must want shadows (mode other than none, strength above
    /// zero), the culling results must report caster bounds for it, and a
    /// tile must be free. Returns the tile index, or `None` without changing
    /// any state.
    pub fn reserve_directional_shadows(
        &mut self,
        light: &VisibleLight,
        visible_light_index: usize,
        culling: &dyn CullingResults,
    ) -> Option<usize> {
        if self.state != ShadowPassState::Reserving {
            log::warn!(
                "ShadowRenderer: reservation for light {visible_light_index} outside of setup"
            );
            return None;
        }
        if !light.is_directional() || !light.casts_shadows() {
            return None;
        }
        culling.shadow_caster_bounds(visible_light_index)?;

        if self.count >= self.capacity {
            log::debug!(
                "ShadowRenderer: atlas full ({} tiles), light {visible_light_index} unshadowed",
                self.capacity
            );
            if let Some(metrics) = &self.metrics {
                if let Err(e) = metrics.lights_truncated.increment() {
                    log::warn!("ShadowRenderer: failed to update metrics: {e}");
                }
            }
            return None;
        }

        let tile = self.count;
        self.slots[tile] = ShadowedDirectionalLight {
            visible_light_index,
        };
        self.count += 1;
        Some(tile)
    }

    /// Renders every reserved light into its atlas tile and publishes the
    /// shadow matrices. Does nothing when no light was reserved.
    ///
    /// # Panics
    /// Panics if the atlas is already allocated this frame.
    pub fn render(&mut self, ctx: &mut dyn RenderContext, culling: &dyn CullingResults) {
        self.record_shadowed_lights();
        if self.count == 0 {
            self.state = ShadowPassState::Published;
            return;
        }

        assert!(
            self.atlas.is_none(),
            "ShadowRenderer: shadow atlas allocated twice in one frame"
        );
        let atlas_size = self.settings.directional.atlas_size.pixels();
        let layout = AtlasLayout::new(atlas_size, self.count);
        self.atlas = Some(layout);
        if let Some(metrics) = &self.metrics {
            if let Err(e) = metrics.atlas_allocations.increment() {
                log::warn!("ShadowRenderer: failed to update metrics: {e}");
            }
        }

        self.list.get_temporary_render_texture(
            DIRECTIONAL_SHADOW_ATLAS,
            RenderTextureDescriptor::shadow_map(atlas_size),
        );
        self.list.set_render_target(
            DIRECTIONAL_SHADOW_ATLAS,
            RenderBufferLoadAction::DontCare,
            RenderBufferStoreAction::Store,
        );
        self.list.clear_render_target(true, false, LinearRgba::TRANSPARENT);
        self.list.begin_sample();
        self.execute(ctx);

        let reversed_z = ctx.uses_reversed_z_buffer();
        for index in 0..self.count {
            self.render_directional_shadows(ctx, culling, index, layout, reversed_z);
        }

        self.list
            .set_global_matrix_array(DIRECTIONAL_SHADOW_MATRICES, &self.matrices);
        self.list.end_sample();
        self.execute(ctx);
        self.state = ShadowPassState::Published;
    }

    fn render_directional_shadows(
        &mut self,
        ctx: &mut dyn RenderContext,
        culling: &dyn CullingResults,
        index: usize,
        layout: AtlasLayout,
        reversed_z: bool,
    ) {
        let light = self.slots[index];
        let Some(fit) = culling.compute_directional_shadow_matrices(
            light.visible_light_index,
            0,
            1,
            Vec3::ZERO,
            layout.tile_size(),
            0.0,
        ) else {
            log::warn!(
                "ShadowRenderer: no shadow frustum for light {}, tile {index} left empty",
                light.visible_light_index
            );
            return;
        };

        let offset = layout.tile_offset(index);
        self.matrices[index] =
            to_atlas_matrix(fit.projection * fit.view, offset, layout.split(), reversed_z);
        self.list.set_viewport(layout.tile_viewport(offset));
        self.list.set_view_projection_matrices(fit.view, fit.projection);
        self.execute(ctx);
        ctx.draw_shadows(
            culling,
            &ShadowDrawingSettings::new(light.visible_light_index, fit.split_data),
        );
        self.rendered[index] = true;
    }

    /// Releases the atlas if this frame allocated one.
    pub fn cleanup(&mut self, ctx: &mut dyn RenderContext) {
        if self.atlas.take().is_some() {
            self.list
                .release_temporary_render_texture(DIRECTIONAL_SHADOW_ATLAS);
            self.execute(ctx);
        }
        self.state = ShadowPassState::CleanedUp;
    }

    fn execute(&mut self, ctx: &mut dyn RenderContext) {
        ctx.execute_command_list(&self.list);
        self.list.clear();
    }

    fn record_shadowed_lights(&self) {
        if let Some(metrics) = &self.metrics {
            if let Err(e) = metrics.shadowed_lights.set(self.count as f64) {
                log::warn!("ShadowRenderer: failed to update metrics: {e}");
            }
        }
    }

    /// Number of reserved tiles this frame.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Maximum number of tiles per frame.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Reserved lights, in tile order.
    pub fn reserved(&self) -> &[ShadowedDirectionalLight] {
        &self.slots[..self.count]
    }

    /// World-to-tile matrices, one per tile. Unreserved entries are identity.
    pub fn matrices(&self) -> &[Mat4; MAX_SHADOWED_DIRECTIONAL_LIGHTS] {
        &self.matrices
    }

    /// Returns `true` if `tile` was drawn into the atlas this frame.
    ///
    /// A reserved tile whose shadow frustum could not be fitted stays
    /// unrendered and must be shaded as unshadowed.
    pub fn is_tile_rendered(&self, tile: usize) -> bool {
        tile < self.count && self.rendered[tile]
    }

    /// Layout of the currently allocated atlas, if any.
    pub fn atlas(&self) -> Option<AtlasLayout> {
        self.atlas
    }

    /// Settings of the current frame.
    pub fn settings(&self) -> &ShadowSettings {
        &self.settings
    }

    /// Current position in the frame sequence.
    pub fn state(&self) -> ShadowPassState {
        self.state
    }
}
