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

//! Backend-agnostic description of what the pipeline asks the host to do.
//!
//! - **[`command`]**: deferred command lists and the commands they hold.
//! - **[`shader`]**: shader property and pass identifiers.
//! - **[`texture`]**: temporary render-texture descriptors.
//! - **[`drawing`]**: draw, filtering, and shadow-draw settings.
//! - **[`lighting`]**: GPU-facing layout of the published light data.

pub mod command;
pub mod drawing;
pub mod lighting;
pub mod shader;
pub mod texture;

pub use self::command::{Command, CommandList, Viewport};
pub use self::drawing::{
    DrawingSettings, FilteringSettings, RenderQueueRange, ShadowDrawingSettings, SortingCriteria,
    SortingSettings,
};
pub use self::lighting::{DirectionalLightUniforms, MAX_DIRECTIONAL_LIGHTS};
pub use self::shader::{ShaderPropertyId, ShaderTagId};
pub use self::texture::{
    FilterMode, RenderBufferLoadAction, RenderBufferStoreAction, RenderTextureDescriptor,
    RenderTextureFormat,
};
