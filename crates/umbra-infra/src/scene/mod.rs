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

//! In-memory scene and the culling results computed from it.

mod fit;

use umbra_core::math::{Aabb, Vec3};
use umbra_core::renderer::{
    CullingParameters, CullingResults, DirectionalShadowFit, LightShadows, VisibleLight,
};

/// Bounds of one renderer that may cast shadows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCaster {
    /// World-space bounds.
    pub bounds: Aabb,
    /// Whether the renderer casts shadows at all.
    pub casts_shadows: bool,
}

impl ShadowCaster {
    /// A shadow-casting renderer with the given bounds.
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            casts_shadows: true,
        }
    }
}

/// The lights and shadow casters of a scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Lights, in the order culling reports them.
    pub lights: Vec<VisibleLight>,
    /// Shadow-caster renderers.
    pub casters: Vec<ShadowCaster>,
}

impl Scene {
    /// An empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the scene with one more light.
    pub fn with_light(mut self, light: VisibleLight) -> Self {
        self.lights.push(light);
        self
    }

    /// Returns the scene with one more shadow caster.
    pub fn with_caster(mut self, caster: ShadowCaster) -> Self {
        self.casters.push(caster);
        self
    }

    /// Culls the scene for a camera.
    ///
    /// Every light is visible. Shadow casters are kept when they cast shadows
    /// and overlap the sphere of radius `shadow_distance` around the camera.
    pub fn cull(&self, parameters: &CullingParameters) -> SceneCullingResults {
        let shadow_distance = parameters.shadow_distance.max(0.0);
        let caster_bounds = if shadow_distance > 0.0 {
            self.casters
                .iter()
                .filter(|c| c.casts_shadows)
                .filter(|c| c.bounds.intersects_sphere(parameters.camera_position, shadow_distance))
                .fold(None, |acc: Option<Aabb>, c| {
                    Some(acc.map_or(c.bounds, |b| b.merge(&c.bounds)))
                })
        } else {
            None
        };
        log::trace!(
            "Culled scene: {} lights, caster bounds {:?}",
            self.lights.len(),
            caster_bounds
        );
        SceneCullingResults {
            lights: self.lights.clone(),
            caster_bounds,
            camera_position: parameters.camera_position,
            shadow_distance,
        }
    }
}

/// Culling results of a [`Scene`] for one camera.
#[derive(Debug, Clone)]
pub struct SceneCullingResults {
    lights: Vec<VisibleLight>,
    caster_bounds: Option<Aabb>,
    camera_position: Vec3,
    shadow_distance: f32,
}

impl CullingResults for SceneCullingResults {
    fn visible_lights(&self) -> &[VisibleLight] {
        &self.lights
    }

    fn shadow_caster_bounds(&self, visible_light_index: usize) -> Option<Aabb> {
        let light = self.lights.get(visible_light_index)?;
        if !light.is_directional() || light.shadows == LightShadows::None {
            return None;
        }
        self.caster_bounds
    }

    fn compute_directional_shadow_matrices(
        &self,
        visible_light_index: usize,
        split_index: usize,
        split_count: usize,
        split_ratio: Vec3,
        tile_size: u32,
        near_plane_offset: f32,
    ) -> Option<DirectionalShadowFit> {
        let light = self.lights.get(visible_light_index)?;
        if !light.is_directional() {
            return None;
        }
        let request = fit::FitRequest {
            forward: light.forward().truncate(),
            camera_position: self.camera_position,
            shadow_distance: self.shadow_distance,
            split_index,
            split_count,
            split_ratio,
            tile_size,
            near_plane_offset,
        };
        fit::fit_directional(&request, self.caster_bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_core::math::{LinearRgba, Mat4};

    fn params(shadow_distance: f32) -> CullingParameters {
        CullingParameters {
            camera_position: Vec3::ZERO,
            view_projection: Mat4::IDENTITY,
            shadow_distance,
        }
    }

    fn sun() -> VisibleLight {
        VisibleLight::directional_towards(Vec3::new(0.2, -1.0, 0.3), LinearRgba::WHITE, 1.0)
            .with_shadows(LightShadows::Hard, 1.0)
    }

    fn scene() -> Scene {
        Scene::new()
            .with_light(sun())
            .with_caster(ShadowCaster::new(Aabb::from_min_max(Vec3::ZERO, Vec3::ONE)))
            .with_caster(ShadowCaster::new(Aabb::from_min_max(
                Vec3::splat(500.0),
                Vec3::splat(501.0),
            )))
    }

    #[test]
    fn test_caster_bounds_only_cover_casters_in_range() {
        let results = scene().cull(&params(100.0));
        let bounds = results.shadow_caster_bounds(0).expect("caster in range");
        assert_eq!(bounds, Aabb::from_min_max(Vec3::ZERO, Vec3::ONE));
    }

    #[test]
    fn test_no_bounds_without_casters_or_distance() {
        let no_casters = Scene::new().with_light(sun()).cull(&params(100.0));
        assert!(no_casters.shadow_caster_bounds(0).is_none());
        assert!(scene().cull(&params(0.0)).shadow_caster_bounds(0).is_none());
    }

    #[test]
    fn test_no_bounds_for_unshadowed_or_missing_lights() {
        let unshadowed = VisibleLight::directional(LinearRgba::WHITE, 1.0, Mat4::IDENTITY);
        let mut scene = scene();
        scene.lights.push(unshadowed);
        let results = scene.cull(&params(100.0));
        assert!(results.shadow_caster_bounds(1).is_none());
        assert!(results.shadow_caster_bounds(7).is_none());
    }

    #[test]
    fn test_non_casting_renderers_are_ignored() {
        let mut scene = scene();
        for caster in &mut scene.casters {
            caster.casts_shadows = false;
        }
        assert!(scene.cull(&params(100.0)).shadow_caster_bounds(0).is_none());
    }

    #[test]
    fn test_fit_requires_directional_light() {
        let mut scene = scene();
        scene.lights[0].light_type = umbra_core::renderer::LightType::Point;
        let results = scene.cull(&params(100.0));
        assert!(results
            .compute_directional_shadow_matrices(0, 0, 1, Vec3::ZERO, 1024, 0.0)
            .is_none());
    }
}
