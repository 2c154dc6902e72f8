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

//! A render context that records instead of rendering.

use std::collections::HashMap;
use umbra_core::math::{Mat4, Vec4};
use umbra_core::renderer::api::{
    Command, CommandList, DrawingSettings, FilteringSettings, RenderTextureDescriptor,
    ShaderPropertyId, ShadowDrawingSettings, Viewport,
};
use umbra_core::renderer::{
    Camera, CullingParameters, CullingResults, GraphicsSettings, RenderContext,
};

use crate::scene::Scene;

/// One call made against a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEvent {
    /// `set_graphics_settings`.
    GraphicsSettings(GraphicsSettings),
    /// `setup_camera_properties`.
    SetupCamera {
        /// Camera name.
        camera: String,
        /// The camera's view-projection.
        view_projection: Mat4,
    },
    /// `cull`.
    Cull(CullingParameters),
    /// `execute_command_list`, with a copy of the executed commands.
    Execute {
        /// Name of the executed list.
        list: String,
        /// The commands it held.
        commands: Vec<Command>,
    },
    /// `draw_renderers`.
    DrawRenderers {
        /// Drawing settings.
        drawing: DrawingSettings,
        /// Filtering settings.
        filtering: FilteringSettings,
    },
    /// `draw_skybox`.
    DrawSkybox {
        /// Camera name.
        camera: String,
    },
    /// `draw_shadows`.
    DrawShadows(ShadowDrawingSettings),
    /// `submit`.
    Submit,
}

/// The last value set for a shader global.
#[derive(Debug, Clone, PartialEq)]
enum GlobalValue {
    Int(i32),
    Vectors(Vec<Vec4>),
    Matrices(Vec<Mat4>),
}

/// A headless [`RenderContext`] over a [`Scene`].
///
/// Executing a command list applies its resource and global-state commands
/// and appends it to the event log. Temporary textures are tracked by id:
/// allocating a live id or releasing an unknown one panics.
#[derive(Debug, Default)]
pub struct RecordingContext {
    scene: Scene,
    reversed_z: bool,
    events: Vec<RecordedEvent>,
    live_textures: HashMap<ShaderPropertyId, RenderTextureDescriptor>,
    globals: HashMap<ShaderPropertyId, GlobalValue>,
    allocations: usize,
    releases: usize,
}

impl RecordingContext {
    /// Creates a context rendering `scene` with a conventional depth buffer.
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            ..Self::default()
        }
    }

    /// Returns the context with a reversed depth buffer.
    pub fn with_reversed_z(mut self, reversed_z: bool) -> Self {
        self.reversed_z = reversed_z;
        self
    }

    /// Every call recorded so far.
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Forgets recorded events. Live textures and globals are kept.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// All executed commands, in execution order.
    pub fn executed_commands(&self) -> impl Iterator<Item = &Command> {
        self.events.iter().flat_map(|event| match event {
            RecordedEvent::Execute { commands, .. } => commands.as_slice(),
            _ => &[][..],
        })
    }

    /// Every viewport set, in order.
    pub fn viewports(&self) -> Vec<Viewport> {
        self.executed_commands()
            .filter_map(|c| match c {
                Command::SetViewport(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    /// Every shadow draw issued, in order.
    pub fn shadow_draws(&self) -> Vec<ShadowDrawingSettings> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::DrawShadows(settings) => Some(*settings),
                _ => None,
            })
            .collect()
    }

    /// Number of temporary textures allocated since creation.
    pub fn allocation_count(&self) -> usize {
        self.allocations
    }

    /// Number of temporary textures released since creation.
    pub fn release_count(&self) -> usize {
        self.releases
    }

    /// Descriptor of a live temporary texture.
    pub fn live_texture(&self, id: ShaderPropertyId) -> Option<&RenderTextureDescriptor> {
        self.live_textures.get(&id)
    }

    /// Number of temporary textures currently allocated.
    pub fn live_texture_count(&self) -> usize {
        self.live_textures.len()
    }

    /// The last integer set for a global.
    pub fn global_int(&self, id: ShaderPropertyId) -> Option<i32> {
        match self.globals.get(&id)? {
            GlobalValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The last vector array set for a global.
    pub fn global_vectors(&self, id: ShaderPropertyId) -> Option<&[Vec4]> {
        match self.globals.get(&id)? {
            GlobalValue::Vectors(v) => Some(v),
            _ => None,
        }
    }

    /// The last matrix array set for a global.
    pub fn global_matrices(&self, id: ShaderPropertyId) -> Option<&[Mat4]> {
        match self.globals.get(&id)? {
            GlobalValue::Matrices(v) => Some(v),
            _ => None,
        }
    }

    fn apply(&mut self, command: &Command) {
        match command {
            Command::GetTemporaryRenderTexture { id, descriptor } => {
                let previous = self.live_textures.insert(*id, *descriptor);
                assert!(
                    previous.is_none(),
                    "temporary render texture '{id}' allocated twice"
                );
                self.allocations += 1;
                log::trace!("Allocated '{id}' ({}x{})", descriptor.width, descriptor.height);
            }
            Command::ReleaseTemporaryRenderTexture { id } => {
                assert!(
                    self.live_textures.remove(id).is_some(),
                    "released temporary render texture '{id}' that was never allocated"
                );
                self.releases += 1;
                log::trace!("Released '{id}'");
            }
            Command::SetGlobalInt { id, value } => {
                self.globals.insert(*id, GlobalValue::Int(*value));
            }
            Command::SetGlobalVectorArray { id, values } => {
                self.globals.insert(*id, GlobalValue::Vectors(values.clone()));
            }
            Command::SetGlobalMatrixArray { id, values } => {
                self.globals.insert(*id, GlobalValue::Matrices(values.clone()));
            }
            _ => {}
        }
    }
}

impl RenderContext for RecordingContext {
    fn set_graphics_settings(&mut self, settings: GraphicsSettings) {
        self.events.push(RecordedEvent::GraphicsSettings(settings));
    }

    fn setup_camera_properties(&mut self, camera: &Camera) {
        self.events.push(RecordedEvent::SetupCamera {
            camera: camera.name.clone(),
            view_projection: camera.view_projection(),
        });
    }

    fn cull(&mut self, parameters: &CullingParameters) -> Box<dyn CullingResults> {
        self.events.push(RecordedEvent::Cull(*parameters));
        Box::new(self.scene.cull(parameters))
    }

    fn execute_command_list(&mut self, list: &CommandList) {
        for command in list.commands() {
            self.apply(command);
        }
        self.events.push(RecordedEvent::Execute {
            list: list.name().to_string(),
            commands: list.commands().to_vec(),
        });
    }

    fn draw_renderers(
        &mut self,
        _culling: &dyn CullingResults,
        drawing: &DrawingSettings,
        filtering: &FilteringSettings,
    ) {
        self.events.push(RecordedEvent::DrawRenderers {
            drawing: drawing.clone(),
            filtering: *filtering,
        });
    }

    fn draw_skybox(&mut self, camera: &Camera) {
        self.events.push(RecordedEvent::DrawSkybox {
            camera: camera.name.clone(),
        });
    }

    fn draw_shadows(&mut self, _culling: &dyn CullingResults, settings: &ShadowDrawingSettings) {
        self.events.push(RecordedEvent::DrawShadows(*settings));
    }

    fn uses_reversed_z_buffer(&self) -> bool {
        self.reversed_z
    }

    fn submit(&mut self) {
        if !self.live_textures.is_empty() {
            log::warn!(
                "RecordingContext: {} temporary texture(s) still allocated at submit",
                self.live_textures.len()
            );
        }
        self.events.push(RecordedEvent::Submit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATLAS: ShaderPropertyId = ShaderPropertyId::new("_TestAtlas");

    fn allocate(ctx: &mut RecordingContext) {
        let mut list = CommandList::new("Test");
        list.get_temporary_render_texture(ATLAS, RenderTextureDescriptor::shadow_map(256));
        ctx.execute_command_list(&list);
    }

    fn release(ctx: &mut RecordingContext) {
        let mut list = CommandList::new("Test");
        list.release_temporary_render_texture(ATLAS);
        ctx.execute_command_list(&list);
    }

    #[test]
    fn test_texture_lifetime_tracking() {
        let mut ctx = RecordingContext::new(Scene::new());
        allocate(&mut ctx);
        assert_eq!(ctx.live_texture(ATLAS).map(|d| d.width), Some(256));
        release(&mut ctx);
        assert_eq!(ctx.live_texture_count(), 0);
        assert_eq!((ctx.allocation_count(), ctx.release_count()), (1, 1));
    }

    #[test]
    #[should_panic(expected = "allocated twice")]
    fn test_double_allocation_panics() {
        let mut ctx = RecordingContext::new(Scene::new());
        allocate(&mut ctx);
        allocate(&mut ctx);
    }

    #[test]
    #[should_panic(expected = "never allocated")]
    fn test_unknown_release_panics() {
        let mut ctx = RecordingContext::new(Scene::new());
        release(&mut ctx);
    }

    #[test]
    fn test_globals_keep_last_value() {
        let mut ctx = RecordingContext::new(Scene::new());
        let count = ShaderPropertyId::new("_Count");
        let mut list = CommandList::new("Globals");
        list.set_global_int(count, 1);
        list.set_global_int(count, 3);
        list.set_global_vector_array(ATLAS, &[Vec4::ONE]);
        ctx.execute_command_list(&list);
        assert_eq!(ctx.global_int(count), Some(3));
        assert_eq!(ctx.global_vectors(ATLAS), Some(&[Vec4::ONE][..]));
        assert_eq!(ctx.global_matrices(ATLAS), None);
        assert_eq!(ctx.executed_commands().count(), 3);
    }
}
