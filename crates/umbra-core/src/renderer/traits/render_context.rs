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

use crate::renderer::api::{
    CommandList, DrawingSettings, FilteringSettings, ShadowDrawingSettings,
};
use crate::renderer::camera::{Camera, CullingParameters};
use crate::renderer::culling::CullingResults;

/// Global graphics state applied once per frame by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphicsSettings {
    /// Use the host's per-material constant batching.
    pub use_srp_batching: bool,
    /// Light intensities are given in linear space.
    pub lights_use_linear_intensity: bool,
}

/// The host engine's rendering surface, as seen by the pipeline.
///
/// All pipeline work flows through this trait: commands are recorded into
/// [`CommandList`]s and handed over with [`execute_command_list`], while draws
/// are issued directly against culling results. Implementations are expected
/// to process calls strictly in the order they are made.
///
/// [`execute_command_list`]: RenderContext::execute_command_list
pub trait RenderContext {
    /// Applies global graphics settings.
    fn set_graphics_settings(&mut self, settings: GraphicsSettings);

    /// Binds the camera's view/projection and per-camera shader properties.
    fn setup_camera_properties(&mut self, camera: &Camera);

    /// Culls the scene for the given parameters.
    fn cull(&mut self, parameters: &CullingParameters) -> Box<dyn CullingResults>;

    /// Executes the recorded commands. The caller clears the list afterwards.
    fn execute_command_list(&mut self, list: &CommandList);

    /// Draws visible renderers.
    fn draw_renderers(
        &mut self,
        culling: &dyn CullingResults,
        drawing: &DrawingSettings,
        filtering: &FilteringSettings,
    );

    /// Draws the skybox for the camera.
    fn draw_skybox(&mut self, camera: &Camera);

    /// Draws the shadow casters of one light, depth only, into the bound target.
    fn draw_shadows(&mut self, culling: &dyn CullingResults, settings: &ShadowDrawingSettings);

    /// Returns `true` if the depth buffer is reversed (near = 1, far = 0).
    fn uses_reversed_z_buffer(&self) -> bool;

    /// Submits everything scheduled so far.
    fn submit(&mut self);
}
