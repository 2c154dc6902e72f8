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

//! Descriptors for temporary render textures.

/// Pixel format of a render texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTextureFormat {
    /// Default color format of the target.
    Default,
    /// Depth format sampled with comparison.
    Shadowmap,
}

/// Texture sampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Nearest neighbour.
    Point,
    /// Linear filtering.
    Bilinear,
}

/// Describes a temporary render texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTextureDescriptor {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Depth buffer precision in bits (0 for none).
    pub depth_bits: u32,
    /// Pixel format.
    pub format: RenderTextureFormat,
    /// Sampling filter.
    pub filter: FilterMode,
}

impl RenderTextureDescriptor {
    /// A square 32-bit, bilinear-filtered shadow map of `size` pixels.
    pub fn shadow_map(size: u32) -> Self {
        Self {
            width: size,
            height: size,
            depth_bits: 32,
            format: RenderTextureFormat::Shadowmap,
            filter: FilterMode::Bilinear,
        }
    }
}

/// What happens to a render target's contents when it is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderBufferLoadAction {
    /// Keep the existing contents.
    Load,
    /// Contents are undefined.
    DontCare,
}

/// What happens to a render target's contents once rendering into it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderBufferStoreAction {
    /// Keep the rendered contents.
    Store,
    /// Discard the rendered contents.
    DontCare,
}
