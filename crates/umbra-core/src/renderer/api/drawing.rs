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

//! Settings for the host's draw calls.

use super::shader::ShaderTagId;
use crate::renderer::culling::ShadowSplitData;

/// How renderers are ordered within a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortingCriteria {
    /// Front to back, grouped by material. Used for opaque geometry.
    CommonOpaque,
    /// Back to front. Used for transparent geometry.
    CommonTransparent,
}

/// Sorting applied to a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortingSettings {
    /// The ordering rule.
    pub criteria: SortingCriteria,
}

impl SortingSettings {
    /// Creates sorting settings with the given criteria.
    pub const fn new(criteria: SortingCriteria) -> Self {
        Self { criteria }
    }
}

/// An inclusive range of render-queue values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderQueueRange {
    /// Lowest queue value included.
    pub lower_bound: u32,
    /// Highest queue value included.
    pub upper_bound: u32,
}

impl RenderQueueRange {
    /// Opaque and alpha-tested geometry.
    pub const OPAQUE: Self = Self {
        lower_bound: 0,
        upper_bound: 2500,
    };
    /// Transparent geometry.
    pub const TRANSPARENT: Self = Self {
        lower_bound: 2501,
        upper_bound: 5000,
    };
    /// Every queue.
    pub const ALL: Self = Self {
        lower_bound: 0,
        upper_bound: 5000,
    };

    /// Returns `true` if `queue` falls inside the range.
    pub fn contains(&self, queue: u32) -> bool {
        (self.lower_bound..=self.upper_bound).contains(&queue)
    }
}

/// Which renderers a draw includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilteringSettings {
    /// Render-queue range to include.
    pub render_queue_range: RenderQueueRange,
}

impl FilteringSettings {
    /// Creates filtering settings for a queue range.
    pub const fn new(render_queue_range: RenderQueueRange) -> Self {
        Self { render_queue_range }
    }
}

/// Which shader passes to render, in which order, and how to batch them.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSettings {
    /// Shader passes, by pass slot.
    pub shader_passes: Vec<ShaderTagId>,
    /// Sorting rule.
    pub sorting: SortingSettings,
    /// Merge small meshes sharing a material into one draw.
    pub enable_dynamic_batching: bool,
    /// Use GPU instancing where the material supports it.
    pub enable_instancing: bool,
}

impl DrawingSettings {
    /// Creates settings rendering the pass `tag` in slot 0.
    pub fn new(tag: ShaderTagId, sorting: SortingSettings) -> Self {
        Self {
            shader_passes: vec![tag],
            sorting,
            enable_dynamic_batching: false,
            enable_instancing: false,
        }
    }

    /// Sets the pass rendered in slot `index`, growing the slot list if needed.
    pub fn set_shader_pass_name(&mut self, index: usize, tag: ShaderTagId) {
        if index >= self.shader_passes.len() {
            self.shader_passes.resize(index + 1, tag);
        }
        self.shader_passes[index] = tag;
    }
}

/// Describes a depth-only shadow-caster draw for one light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowDrawingSettings {
    /// Index of the light in the visible-light list.
    pub visible_light_index: usize,
    /// Split culling data returned by the frustum fit.
    pub split_data: ShadowSplitData,
}

impl ShadowDrawingSettings {
    /// Creates shadow drawing settings for a visible light.
    pub fn new(visible_light_index: usize, split_data: ShadowSplitData) -> Self {
        Self {
            visible_light_index,
            split_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_ranges_do_not_overlap() {
        assert!(RenderQueueRange::OPAQUE.contains(2000));
        assert!(!RenderQueueRange::OPAQUE.contains(3000));
        assert!(RenderQueueRange::TRANSPARENT.contains(3000));
        assert!(!RenderQueueRange::TRANSPARENT.contains(2500));
    }

    #[test]
    fn test_set_shader_pass_name_grows() {
        let a = ShaderTagId::new("A");
        let b = ShaderTagId::new("B");
        let sorting = SortingSettings::new(SortingCriteria::CommonOpaque);
        let mut settings = DrawingSettings::new(a, sorting);
        settings.set_shader_pass_name(1, b);
        assert_eq!(settings.shader_passes, vec![a, b]);
        settings.set_shader_pass_name(0, b);
        assert_eq!(settings.shader_passes, vec![b, b]);
    }
}
