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

use umbra_core::math::{Mat4, Vec4};
use umbra_core::renderer::api::{
    CommandList, DirectionalLightUniforms, MAX_DIRECTIONAL_LIGHTS,
};
use umbra_core::renderer::VisibleLight;

use super::{
    DIRECTIONAL_LIGHT_COLORS, DIRECTIONAL_LIGHT_COUNT, DIRECTIONAL_LIGHT_DIRECTIONS,
    DIRECTIONAL_LIGHT_SHADOW_DATA,
};

/// Directional light data gathered for one camera.
///
/// Entries past `count` are always zero so the full arrays can be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLightSet {
    count: usize,
    colors: [Vec4; MAX_DIRECTIONAL_LIGHTS],
    directions: [Vec4; MAX_DIRECTIONAL_LIGHTS],
    shadow_data: [Vec4; MAX_DIRECTIONAL_LIGHTS],
    tiles: [Option<usize>; MAX_DIRECTIONAL_LIGHTS],
}

impl Default for DirectionalLightSet {
    fn default() -> Self {
        Self {
            count: 0,
            colors: [Vec4::ZERO; MAX_DIRECTIONAL_LIGHTS],
            directions: [Vec4::ZERO; MAX_DIRECTIONAL_LIGHTS],
            shadow_data: [Vec4::ZERO; MAX_DIRECTIONAL_LIGHTS],
            tiles: [None; MAX_DIRECTIONAL_LIGHTS],
        }
    }
}

impl DirectionalLightSet {
    /// Rebuilds the set from `lights`, in order.
    ///
    /// Non-directional lights are skipped. `reserve` is asked for a shadow
    /// tile once per kept light, with that light's index in `lights`.
    /// Returns how many directional lights did not fit.
    pub fn collect<F>(&mut self, lights: &[VisibleLight], mut reserve: F) -> usize
    where
        F: FnMut(&VisibleLight, usize) -> Option<usize>,
    {
        *self = Self::default();
        let mut dropped = 0;
        for (index, light) in lights.iter().enumerate() {
            if !light.is_directional() {
                continue;
            }
            if self.count == MAX_DIRECTIONAL_LIGHTS {
                dropped += 1;
                continue;
            }
            let slot = self.count;
            self.colors[slot] = light.final_color.to_vec4();
            self.directions[slot] = light.direction();
            let tile = reserve(light, index);
            self.shadow_data[slot] = match tile {
                Some(tile) => Vec4::new(light.shadow_strength, tile as f32, 0.0, 0.0),
                None => Vec4::ZERO,
            };
            self.tiles[slot] = tile;
            self.count += 1;
        }
        dropped
    }

    /// Clears the shadow data of every light whose tile `is_rendered`
    /// rejects, so it is shaded unshadowed. Returns how many were cleared.
    pub fn clear_unrendered_shadows<F>(&mut self, is_rendered: F) -> usize
    where
        F: Fn(usize) -> bool,
    {
        let mut cleared = 0;
        for slot in 0..self.count {
            if let Some(tile) = self.tiles[slot] {
                if !is_rendered(tile) {
                    self.shadow_data[slot] = Vec4::ZERO;
                    self.tiles[slot] = None;
                    cleared += 1;
                }
            }
        }
        cleared
    }

    /// Atlas tile of each collected light, `None` when unshadowed.
    pub fn tiles(&self) -> &[Option<usize>] {
        &self.tiles[..self.count]
    }

    /// Records the light count and the three light arrays as globals.
    pub fn publish(&self, list: &mut CommandList) {
        list.set_global_int(DIRECTIONAL_LIGHT_COUNT, self.count as i32);
        list.set_global_vector_array(DIRECTIONAL_LIGHT_COLORS, &self.colors);
        list.set_global_vector_array(DIRECTIONAL_LIGHT_DIRECTIONS, &self.directions);
        list.set_global_vector_array(DIRECTIONAL_LIGHT_SHADOW_DATA, &self.shadow_data);
    }

    /// Number of collected lights.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Colors of the collected lights.
    pub fn colors(&self) -> &[Vec4] {
        &self.colors[..self.count]
    }

    /// Directions towards the collected lights.
    pub fn directions(&self) -> &[Vec4] {
        &self.directions[..self.count]
    }

    /// Shadow strength and tile index of the collected lights.
    pub fn shadow_data(&self) -> &[Vec4] {
        &self.shadow_data[..self.count]
    }

    /// Packs the set and `shadow_matrices` into one uniform block.
    pub fn uniforms(
        &self,
        shadow_matrices: &[Mat4; MAX_DIRECTIONAL_LIGHTS],
    ) -> DirectionalLightUniforms {
        DirectionalLightUniforms::new(
            self.count,
            &self.colors,
            &self.directions,
            &self.shadow_data,
            shadow_matrices,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_core::math::{LinearRgba, Vec3};
    use umbra_core::renderer::api::Command;
    use umbra_core::renderer::LightType;

    fn sun(intensity: f32) -> VisibleLight {
        VisibleLight::directional_towards(Vec3::new(0.0, -1.0, 0.0), LinearRgba::WHITE, intensity)
    }

    #[test]
    fn test_collect_skips_local_lights() {
        let lights = [
            VisibleLight::local(LightType::Point, LinearRgba::WHITE, 1.0, Vec3::ZERO),
            sun(2.0),
            VisibleLight::local(LightType::Spot, LinearRgba::WHITE, 1.0, Vec3::ONE),
        ];
        let mut seen = Vec::new();
        let mut set = DirectionalLightSet::default();
        let dropped = set.collect(&lights, |_, index| {
            seen.push(index);
            None
        });

        assert_eq!(dropped, 0);
        assert_eq!(seen, vec![1]);
        assert_eq!(set.count(), 1);
        assert_eq!(set.colors()[0], Vec4::new(2.0, 2.0, 2.0, 1.0));
        assert_eq!(set.directions()[0], Vec4::new(0.0, 1.0, 0.0, 0.0));
        assert_eq!(set.shadow_data()[0], Vec4::ZERO);
    }

    #[test]
    fn test_collect_caps_and_reports_dropped() {
        let lights = [sun(1.0); 6];
        let mut set = DirectionalLightSet::default();
        let dropped = set.collect(&lights, |_, _| None);
        assert_eq!(set.count(), MAX_DIRECTIONAL_LIGHTS);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn test_shadow_data_carries_strength_and_tile() {
        let lights = [sun(1.0).with_shadows(umbra_core::renderer::LightShadows::Hard, 0.75)];
        let mut set = DirectionalLightSet::default();
        set.collect(&lights, |_, _| Some(3));
        assert_eq!(set.shadow_data()[0], Vec4::new(0.75, 3.0, 0.0, 0.0));
    }

    #[test]
    fn test_recollect_zeroes_stale_entries() {
        let mut set = DirectionalLightSet::default();
        set.collect(&[sun(1.0); 3], |_, _| Some(0));
        set.collect(&[sun(1.0)], |_, _| None);
        assert_eq!(set, {
            let mut expected = DirectionalLightSet::default();
            expected.collect(&[sun(1.0)], |_, _| None);
            expected
        });
        assert_eq!(set.colors.len(), MAX_DIRECTIONAL_LIGHTS);
        assert_eq!(set.colors[1], Vec4::ZERO);
    }

    #[test]
    fn test_unrendered_tiles_lose_their_shadows() {
        let lights = [sun(1.0).with_shadows(umbra_core::renderer::LightShadows::Soft, 0.5); 3];
        let mut set = DirectionalLightSet::default();
        let mut next = 0;
        set.collect(&lights, |_, _| {
            next += 1;
            Some(next - 1)
        });

        let cleared = set.clear_unrendered_shadows(|tile| tile != 1);
        assert_eq!(cleared, 1);
        assert_eq!(set.tiles(), &[Some(0), None, Some(2)]);
        assert_eq!(set.shadow_data()[0], Vec4::new(0.5, 0.0, 0.0, 0.0));
        assert_eq!(set.shadow_data()[1], Vec4::ZERO);
        assert_eq!(set.shadow_data()[2], Vec4::new(0.5, 2.0, 0.0, 0.0));
    }

    #[test]
    fn test_publish_uploads_full_arrays() {
        let mut set = DirectionalLightSet::default();
        set.collect(&[sun(1.0)], |_, _| None);
        let mut list = CommandList::new("Lighting");
        set.publish(&mut list);

        assert_eq!(list.commands().len(), 4);
        assert!(matches!(
            list.commands()[0],
            Command::SetGlobalInt { id, value: 1 } if id == DIRECTIONAL_LIGHT_COUNT
        ));
        for command in &list.commands()[1..] {
            match command {
                Command::SetGlobalVectorArray { values, .. } => {
                    assert_eq!(values.len(), MAX_DIRECTIONAL_LIGHTS)
                }
                other => panic!("unexpected command {other:?}"),
            }
        }
    }

    #[test]
    fn test_uniforms_match_published_values() {
        let mut set = DirectionalLightSet::default();
        set.collect(&[sun(3.0)], |_, _| Some(0));
        let uniforms = set.uniforms(&[Mat4::IDENTITY; MAX_DIRECTIONAL_LIGHTS]);
        assert_eq!(uniforms.count, 1);
        assert_eq!(uniforms.colors[0], [3.0, 3.0, 3.0, 1.0]);
        assert_eq!(uniforms.shadow_data[0], [0.0, 0.0, 0.0, 0.0]);
    }
}
