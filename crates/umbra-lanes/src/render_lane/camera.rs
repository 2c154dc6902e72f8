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

//! Renders a single camera: cull, light, clear, draw, submit.

use umbra_core::math::LinearRgba;
use umbra_core::renderer::api::{
    CommandList, DrawingSettings, FilteringSettings, RenderQueueRange, ShaderTagId,
    SortingCriteria, SortingSettings,
};
use umbra_core::renderer::{Camera, CameraClearFlags, CullingResults, RenderContext};
use umbra_core::telemetry::MetricsResult;
use umbra_core::PipelineSettings;
use umbra_telemetry::MetricsRegistry;

use super::lighting::LightingLane;

/// Pass drawn for every material without a lit pass.
pub const UNLIT_SHADER_TAG: ShaderTagId = ShaderTagId::new("SRPDefaultUnlit");
/// Pass drawn for lit materials.
pub const LIT_SHADER_TAG: ShaderTagId = ShaderTagId::new("CustomLit");

const BUFFER_NAME: &str = "Render Camera";

/// What happened to a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The camera was drawn and submitted.
    Rendered,
    /// The camera could not be culled; nothing was recorded.
    Culled,
}

/// Renders one camera at a time, reusing its command list and lighting lane.
#[derive(Debug)]
pub struct FrameRenderer {
    list: CommandList,
    lighting: LightingLane,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRenderer {
    /// Creates a frame renderer with full shadow capacity.
    pub fn new() -> Self {
        Self::with_lighting(LightingLane::new())
    }

    /// Creates a frame renderer sharing the shadow atlas between at most
    /// `capacity` lights.
    pub fn with_shadow_capacity(capacity: usize) -> Self {
        Self::with_lighting(LightingLane::with_shadow_capacity(capacity))
    }

    fn with_lighting(lighting: LightingLane) -> Self {
        Self {
            list: CommandList::new(BUFFER_NAME),
            lighting,
        }
    }

    /// Registers and attaches the lighting and shadow metrics.
    pub fn register_metrics(&mut self, registry: &MetricsRegistry) -> MetricsResult<()> {
        self.lighting.register_metrics(registry)
    }

    /// Renders `camera` through `ctx`.
    ///
    /// Returns [`FrameOutcome::Culled`] without touching `ctx` beyond the
    /// cull request when the camera has no usable culling parameters.
    pub fn render(
        &mut self,
        ctx: &mut dyn RenderContext,
        camera: &Camera,
        settings: &PipelineSettings,
    ) -> FrameOutcome {
        self.list.set_name(camera.name.as_str());

        let Some(culling) = self.cull(ctx, camera, settings) else {
            log::debug!("FrameRenderer: camera '{}' skipped, no culling parameters", camera.name);
            return FrameOutcome::Culled;
        };
        let culling = culling.as_ref();

        self.list.begin_sample();
        self.execute(ctx);
        self.lighting.setup(ctx, culling, &settings.shadows);
        self.list.end_sample();

        self.setup(ctx, camera);
        self.draw_visible_geometry(ctx, camera, culling, settings);
        self.lighting.cleanup(ctx);
        self.submit(ctx);
        FrameOutcome::Rendered
    }

    fn cull(
        &self,
        ctx: &mut dyn RenderContext,
        camera: &Camera,
        settings: &PipelineSettings,
    ) -> Option<Box<dyn CullingResults>> {
        let mut parameters = camera.try_get_culling_parameters()?;
        parameters.shadow_distance = settings.shadows.max_distance.min(camera.far_clip_plane);
        Some(ctx.cull(&parameters))
    }

    fn setup(&mut self, ctx: &mut dyn RenderContext, camera: &Camera) {
        ctx.setup_camera_properties(camera);
        let flags = camera.clear_flags;
        let background = if flags == CameraClearFlags::Color {
            camera.background_color
        } else {
            LinearRgba::TRANSPARENT
        };
        self.list
            .clear_render_target(flags.clears_depth(), flags.clears_color(), background);
        self.list.begin_sample();
        self.execute(ctx);
    }

    fn draw_visible_geometry(
        &mut self,
        ctx: &mut dyn RenderContext,
        camera: &Camera,
        culling: &dyn CullingResults,
        settings: &PipelineSettings,
    ) {
        let mut drawing = DrawingSettings::new(
            UNLIT_SHADER_TAG,
            SortingSettings::new(SortingCriteria::CommonOpaque),
        );
        drawing.set_shader_pass_name(1, LIT_SHADER_TAG);
        drawing.enable_dynamic_batching = settings.use_dynamic_batching;
        drawing.enable_instancing = settings.use_gpu_instancing;
        ctx.draw_renderers(culling, &drawing, &FilteringSettings::new(RenderQueueRange::OPAQUE));

        if camera.clear_flags == CameraClearFlags::Skybox {
            ctx.draw_skybox(camera);
        }

        drawing.sorting = SortingSettings::new(SortingCriteria::CommonTransparent);
        ctx.draw_renderers(
            culling,
            &drawing,
            &FilteringSettings::new(RenderQueueRange::TRANSPARENT),
        );
    }

    fn submit(&mut self, ctx: &mut dyn RenderContext) {
        self.list.end_sample();
        self.execute(ctx);
        ctx.submit();
    }

    fn execute(&mut self, ctx: &mut dyn RenderContext) {
        ctx.execute_command_list(&self.list);
        self.list.clear();
    }

    /// The lighting lane, as left by the last rendered camera.
    pub fn lighting(&self) -> &LightingLane {
        &self.lighting
    }
}
