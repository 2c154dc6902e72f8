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

//! Deferred command recording.
//!
//! A [`CommandList`] accumulates [`Command`]s on the CPU. Nothing reaches the
//! host until the list is passed to
//! [`RenderContext::execute_command_list`](crate::renderer::RenderContext::execute_command_list),
//! after which the owner clears it and keeps recording. Every lane owns its
//! own named list and reuses it frame after frame.

use super::shader::ShaderPropertyId;
use super::texture::{RenderBufferLoadAction, RenderBufferStoreAction, RenderTextureDescriptor};
use crate::math::{LinearRgba, Mat4, Vec4};

/// A pixel-space viewport rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport from its position and size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A single recorded command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Opens a named profiling scope.
    BeginSample(String),
    /// Closes a named profiling scope.
    EndSample(String),
    /// Clears the bound render target.
    ClearRenderTarget {
        /// Clear the depth buffer.
        clear_depth: bool,
        /// Clear the color buffer.
        clear_color: bool,
        /// Color to clear to.
        background: LinearRgba,
    },
    /// Allocates a temporary render texture, bound globally under `id`.
    GetTemporaryRenderTexture {
        /// Global id of the texture.
        id: ShaderPropertyId,
        /// Texture description.
        descriptor: RenderTextureDescriptor,
    },
    /// Releases a temporary render texture.
    ReleaseTemporaryRenderTexture {
        /// Global id of the texture.
        id: ShaderPropertyId,
    },
    /// Binds a render target.
    SetRenderTarget {
        /// Global id of the target texture.
        id: ShaderPropertyId,
        /// Load action.
        load: RenderBufferLoadAction,
        /// Store action.
        store: RenderBufferStoreAction,
    },
    /// Restricts rasterization to a pixel rectangle.
    SetViewport(Viewport),
    /// Sets the view and projection matrices for subsequent draws.
    SetViewProjectionMatrices {
        /// World-to-view matrix.
        view: Mat4,
        /// View-to-clip matrix.
        projection: Mat4,
    },
    /// Sets a global integer.
    SetGlobalInt {
        /// Property to set.
        id: ShaderPropertyId,
        /// Value.
        value: i32,
    },
    /// Sets a global vector array.
    SetGlobalVectorArray {
        /// Property to set.
        id: ShaderPropertyId,
        /// Values.
        values: Vec<Vec4>,
    },
    /// Sets a global matrix array.
    SetGlobalMatrixArray {
        /// Property to set.
        id: ShaderPropertyId,
        /// Values.
        values: Vec<Mat4>,
    },
}

/// A named, reusable list of deferred commands.
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    name: String,
    commands: Vec<Command>,
}

impl CommandList {
    /// Creates an empty list.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    /// The list's name, also used as its profiling sample name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the list.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The commands recorded since the last [`clear`](Self::clear).
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drops every recorded command, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Opens a profiling scope named after the list.
    pub fn begin_sample(&mut self) {
        self.commands.push(Command::BeginSample(self.name.clone()));
    }

    /// Closes the profiling scope named after the list.
    pub fn end_sample(&mut self) {
        self.commands.push(Command::EndSample(self.name.clone()));
    }

    /// Records a render-target clear.
    pub fn clear_render_target(
        &mut self,
        clear_depth: bool,
        clear_color: bool,
        background: LinearRgba,
    ) {
        self.commands.push(Command::ClearRenderTarget {
            clear_depth,
            clear_color,
            background,
        });
    }

    /// Records the allocation of a temporary render texture.
    pub fn get_temporary_render_texture(
        &mut self,
        id: ShaderPropertyId,
        descriptor: RenderTextureDescriptor,
    ) {
        self.commands
            .push(Command::GetTemporaryRenderTexture { id, descriptor });
    }

    /// Records the release of a temporary render texture.
    pub fn release_temporary_render_texture(&mut self, id: ShaderPropertyId) {
        self.commands
            .push(Command::ReleaseTemporaryRenderTexture { id });
    }

    /// Records a render-target bind.
    pub fn set_render_target(
        &mut self,
        id: ShaderPropertyId,
        load: RenderBufferLoadAction,
        store: RenderBufferStoreAction,
    ) {
        self.commands
            .push(Command::SetRenderTarget { id, load, store });
    }

    /// Records a viewport change.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.commands.push(Command::SetViewport(viewport));
    }

    /// Records a view/projection change.
    pub fn set_view_projection_matrices(&mut self, view: Mat4, projection: Mat4) {
        self.commands
            .push(Command::SetViewProjectionMatrices { view, projection });
    }

    /// Records a global integer.
    pub fn set_global_int(&mut self, id: ShaderPropertyId, value: i32) {
        self.commands.push(Command::SetGlobalInt { id, value });
    }

    /// Records a global vector array.
    pub fn set_global_vector_array(&mut self, id: ShaderPropertyId, values: &[Vec4]) {
        self.commands.push(Command::SetGlobalVectorArray {
            id,
            values: values.to_vec(),
        });
    }

    /// Records a global matrix array.
    pub fn set_global_matrix_array(&mut self, id: ShaderPropertyId, values: &[Mat4]) {
        self.commands.push(Command::SetGlobalMatrixArray {
            id,
            values: values.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATLAS: ShaderPropertyId = ShaderPropertyId::new("_Atlas");

    #[test]
    fn test_samples_use_list_name() {
        let mut list = CommandList::new("Shadows");
        list.begin_sample();
        list.set_name("Main Camera");
        list.end_sample();
        assert_eq!(
            list.commands(),
            &[
                Command::BeginSample("Shadows".to_string()),
                Command::EndSample("Main Camera".to_string()),
            ]
        );
    }

    #[test]
    fn test_clear_empties_list() {
        let mut list = CommandList::new("Lighting");
        list.set_global_int(ATLAS, 3);
        list.release_temporary_render_texture(ATLAS);
        assert_eq!(list.commands().len(), 2);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.name(), "Lighting");
    }
}
