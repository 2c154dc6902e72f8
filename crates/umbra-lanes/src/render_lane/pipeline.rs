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

//! The pipeline entry point: renders every camera of a frame.

use umbra_core::renderer::{Camera, GraphicsSettings, RenderContext};
use umbra_core::PipelineSettings;
use umbra_telemetry::MetricsRegistry;

use super::camera::{FrameOutcome, FrameRenderer};
use crate::error::PipelineError;

/// A configured render pipeline.
///
/// Owns one [`FrameRenderer`] that is reused for every camera, so cameras are
/// rendered strictly one after another.
#[derive(Debug)]
pub struct RenderPipeline {
    settings: PipelineSettings,
    frame_renderer: FrameRenderer,
}

impl RenderPipeline {
    /// Creates a pipeline after validating `settings`.
    pub fn new(settings: PipelineSettings) -> Result<Self, PipelineError> {
        settings.validate()?;
        log::info!(
            "Render pipeline created: atlas {}px, shadow distance {}, srp batcher {}",
            settings.shadows.directional.atlas_size.pixels(),
            settings.shadows.max_distance,
            settings.use_srp_batcher
        );
        Ok(Self {
            settings,
            frame_renderer: FrameRenderer::new(),
        })
    }

    /// Registers the pipeline's metrics in `registry`.
    pub fn with_metrics(mut self, registry: &MetricsRegistry) -> Result<Self, PipelineError> {
        self.frame_renderer.register_metrics(registry)?;
        Ok(self)
    }

    /// Renders `cameras` in order and returns how many were drawn.
    pub fn render(&mut self, ctx: &mut dyn RenderContext, cameras: &[Camera]) -> usize {
        ctx.set_graphics_settings(GraphicsSettings {
            use_srp_batching: self.settings.use_srp_batcher,
            lights_use_linear_intensity: true,
        });
        let mut rendered = 0;
        for camera in cameras {
            if self.frame_renderer.render(ctx, camera, &self.settings) == FrameOutcome::Rendered {
                rendered += 1;
            }
        }
        rendered
    }

    /// The validated settings.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// The renderer shared by all cameras.
    pub fn frame_renderer(&self) -> &FrameRenderer {
        &self.frame_renderer
    }
}
