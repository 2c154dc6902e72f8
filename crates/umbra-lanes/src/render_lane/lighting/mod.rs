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

//! Per-camera lighting: gathers the visible directional lights, publishes
//! them as shader globals, and drives the shadow renderer.

mod collector;

pub use collector::DirectionalLightSet;

use umbra_core::renderer::api::{CommandList, DirectionalLightUniforms, ShaderPropertyId};
use umbra_core::renderer::{CullingResults, RenderContext};
use umbra_core::telemetry::MetricsResult;
use umbra_core::ShadowSettings;
use umbra_telemetry::{CounterHandle, MetricsRegistry};

use super::shadow::{ShadowMetrics, ShadowRenderer};

/// Number of directional lights published this frame.
pub const DIRECTIONAL_LIGHT_COUNT: ShaderPropertyId =
    ShaderPropertyId::new("_DirectionalLightCount");
/// Directional light colors.
pub const DIRECTIONAL_LIGHT_COLORS: ShaderPropertyId =
    ShaderPropertyId::new("_DirectionalLightColors");
/// Directions towards each directional light.
pub const DIRECTIONAL_LIGHT_DIRECTIONS: ShaderPropertyId =
    ShaderPropertyId::new("_DirectionalLightDirections");
/// Per-light shadow strength and atlas tile.
pub const DIRECTIONAL_LIGHT_SHADOW_DATA: ShaderPropertyId =
    ShaderPropertyId::new("_DirectionalLightShadowData");

const BUFFER_NAME: &str = "Lighting";

/// Metric handles updated by the lighting lane.
#[derive(Debug, Clone)]
pub struct LightingMetrics {
    directional_lights_dropped: CounterHandle,
}

impl LightingMetrics {
    /// Registers the lighting metrics in the `lighting` namespace.
    pub fn register(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            directional_lights_dropped: registry.register_counter(
                "lighting",
                "directional_lights_dropped",
                "Visible directional lights beyond the published maximum",
            )?,
        })
    }
}

/// Collects and publishes the lights of one camera.
#[derive(Debug)]
pub struct LightingLane {
    list: CommandList,
    lights: DirectionalLightSet,
    shadows: ShadowRenderer,
    metrics: Option<LightingMetrics>,
}

impl Default for LightingLane {
    fn default() -> Self {
        Self::new()
    }
}

impl LightingLane {
    /// A lane whose shadow renderer uses the full atlas capacity.
    pub fn new() -> Self {
        Self::with_shadow_capacity(super::shadow::MAX_SHADOWED_DIRECTIONAL_LIGHTS)
    }

    /// A lane sharing the shadow atlas between at most `capacity` lights.
    pub fn with_shadow_capacity(capacity: usize) -> Self {
        Self {
            list: CommandList::new(BUFFER_NAME),
            lights: DirectionalLightSet::default(),
            shadows: ShadowRenderer::with_capacity(capacity),
            metrics: None,
        }
    }

    /// Registers and attaches the lighting and shadow metrics.
    pub fn register_metrics(&mut self, registry: &MetricsRegistry) -> MetricsResult<()> {
        self.metrics = Some(LightingMetrics::register(registry)?);
        self.shadows.set_metrics(ShadowMetrics::register(registry)?);
        Ok(())
    }

    /// Gathers the camera's lights, reserves shadow tiles, renders the
    /// shadow atlas, then publishes the light globals.
    ///
    /// Lights whose tile could not be rendered are published unshadowed.
    pub fn setup(
        &mut self,
        ctx: &mut dyn RenderContext,
        culling: &dyn CullingResults,
        shadow_settings: &ShadowSettings,
    ) {
        self.list.begin_sample();
        self.shadows.setup(shadow_settings);

        let shadows = &mut self.shadows;
        let dropped = self.lights.collect(culling.visible_lights(), |light, index| {
            shadows.reserve_directional_shadows(light, index, culling)
        });
        if dropped > 0 {
            log::debug!("LightingLane: {dropped} directional light(s) over the limit were ignored");
            if let Some(metrics) = &self.metrics {
                if let Err(e) = metrics.directional_lights_dropped.increment_by(dropped as u64) {
                    log::warn!("LightingLane: failed to update metrics: {e}");
                }
            }
        }

        self.shadows.render(ctx, culling);
        let shadows = &self.shadows;
        let unrendered = self
            .lights
            .clear_unrendered_shadows(|tile| shadows.is_tile_rendered(tile));
        if unrendered > 0 {
            log::debug!("LightingLane: {unrendered} shadowed light(s) published without shadows");
        }
        self.lights.publish(&mut self.list);

        self.list.end_sample();
        ctx.execute_command_list(&self.list);
        self.list.clear();
    }

    /// Releases the frame's shadow resources.
    pub fn cleanup(&mut self, ctx: &mut dyn RenderContext) {
        self.shadows.cleanup(ctx);
    }

    /// The lights collected by the last setup.
    pub fn lights(&self) -> &DirectionalLightSet {
        &self.lights
    }

    /// The shadow renderer.
    pub fn shadows(&self) -> &ShadowRenderer {
        &self.shadows
    }

    /// The published light data and shadow matrices as one uniform block.
    pub fn uniforms(&self) -> DirectionalLightUniforms {
        self.lights.uniforms(self.shadows.matrices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_core::math::{Aabb, LinearRgba, Mat4, Vec3, Vec4};
    use umbra_core::renderer::{DirectionalShadowFit, LightShadows, VisibleLight};
    use umbra_infra::{RecordingContext, Scene};

    /// Culling stub whose casters are always in range but whose frustum fit
    /// fails for the listed lights.
    struct UnfittableCulling {
        lights: Vec<VisibleLight>,
        unfittable: Vec<usize>,
    }

    impl CullingResults for UnfittableCulling {
        fn visible_lights(&self) -> &[VisibleLight] {
            &self.lights
        }

        fn shadow_caster_bounds(&self, _: usize) -> Option<Aabb> {
            Some(Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE))
        }

        fn compute_directional_shadow_matrices(
            &self,
            index: usize,
            _: usize,
            _: usize,
            _: Vec3,
            _: u32,
            _: f32,
        ) -> Option<DirectionalShadowFit> {
            if self.unfittable.contains(&index) {
                return None;
            }
            Some(DirectionalShadowFit {
                view: Mat4::IDENTITY,
                projection: Mat4::IDENTITY,
                split_data: Default::default(),
            })
        }
    }

    fn sun() -> VisibleLight {
        VisibleLight::directional_towards(Vec3::new(0.0, -1.0, 0.4), LinearRgba::WHITE, 1.0)
            .with_shadows(LightShadows::Soft, 1.0)
    }

    #[test]
    fn test_failed_fit_publishes_unshadowed_light() {
        let culling = UnfittableCulling {
            lights: vec![sun()],
            unfittable: vec![0],
        };
        let mut ctx = RecordingContext::new(Scene::new());
        let mut lane = LightingLane::new();
        lane.setup(&mut ctx, &culling, &ShadowSettings::default());

        assert_eq!(lane.lights().shadow_data(), &[Vec4::ZERO]);
        assert_eq!(
            ctx.global_vectors(DIRECTIONAL_LIGHT_SHADOW_DATA).map(|data| data[0]),
            Some(Vec4::ZERO)
        );
        assert!(ctx.shadow_draws().is_empty());
        assert!(!lane.shadows().is_tile_rendered(0));
        lane.cleanup(&mut ctx);
        assert_eq!(ctx.live_texture_count(), 0);
    }

    #[test]
    fn test_failed_fit_only_affects_its_own_light() {
        let culling = UnfittableCulling {
            lights: vec![sun(), sun(), sun()],
            unfittable: vec![1],
        };
        let mut ctx = RecordingContext::new(Scene::new());
        let mut lane = LightingLane::new();
        lane.setup(&mut ctx, &culling, &ShadowSettings::default());

        let data = ctx.global_vectors(DIRECTIONAL_LIGHT_SHADOW_DATA).unwrap();
        assert_eq!(data[0], Vec4::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(data[1], Vec4::ZERO);
        assert_eq!(data[2], Vec4::new(1.0, 2.0, 0.0, 0.0));
        assert_eq!(ctx.shadow_draws().len(), 2);
        lane.cleanup(&mut ctx);
    }
}
