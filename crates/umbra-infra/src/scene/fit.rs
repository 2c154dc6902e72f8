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

//! Directional shadow frustum fitting.

use umbra_core::math::{Aabb, Mat4, Vec3, Vec4};
use umbra_core::renderer::{DirectionalShadowFit, ShadowSplitData};

/// Inputs of one directional fit.
pub(crate) struct FitRequest {
    pub forward: Vec3,
    pub camera_position: Vec3,
    pub shadow_distance: f32,
    pub split_index: usize,
    pub split_count: usize,
    pub split_ratio: Vec3,
    pub tile_size: u32,
    pub near_plane_offset: f32,
}

/// Fraction of the shadow distance covered by `split_index`.
fn split_fraction(split_index: usize, split_count: usize, split_ratio: Vec3) -> f32 {
    if split_index + 1 >= split_count {
        1.0
    } else {
        split_ratio.get(split_index.min(2)).clamp(0.0, 1.0)
    }
}

/// Fits an orthographic frustum around the shadow sphere of one split and the
/// casters inside it.
///
/// The light-space center is snapped to whole texels of the tile so the
/// shadow does not shimmer when the camera moves.
pub(crate) fn fit_directional(
    request: &FitRequest,
    caster_bounds: Option<Aabb>,
) -> Option<DirectionalShadowFit> {
    if request.split_count == 0
        || request.split_index >= request.split_count
        || request.tile_size == 0
        || request.shadow_distance <= 0.0
    {
        return None;
    }

    let f = request.forward.normalize();
    if f == Vec3::ZERO {
        return None;
    }
    let up = if f.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };

    // 1. Culling sphere of the split
    let radius = request.shadow_distance
        * split_fraction(request.split_index, request.split_count, request.split_ratio);
    if radius <= 0.0 {
        return None;
    }
    let center = request.camera_position;

    // 2. Snap the center to the texel grid in light space
    let rotation = Mat4::look_at_rh(Vec3::ZERO, f, up)?;
    let texel = 2.0 * radius / request.tile_size as f32;
    let mut light_center = rotation.transform_point3(center);
    light_center.x = (light_center.x / texel).floor() * texel;
    light_center.y = (light_center.y / texel).floor() * texel;
    let snapped = rotation.inverse()?.transform_point3(light_center);

    let view = Mat4::look_at_rh(snapped, snapped + f, up)?;

    // 3. Depth range covering the sphere and every caster corner
    let (mut near, mut far) = (-radius, radius);
    if let Some(bounds) = caster_bounds {
        for corner in bounds.corners() {
            let depth = (corner - snapped).dot(f);
            near = near.min(depth);
            far = far.max(depth);
        }
    }
    near -= request.near_plane_offset.max(0.0);

    let projection = Mat4::orthographic_rh_gl(-radius, radius, -radius, radius, near, far);

    Some(DirectionalShadowFit {
        view,
        projection,
        split_data: ShadowSplitData {
            culling_sphere: Vec4::from_vec3(center, radius),
            shadow_cascade_blend_culling_factor: 0.0,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn request() -> FitRequest {
        FitRequest {
            forward: Vec3::new(0.3, -1.0, 0.2),
            camera_position: Vec3::new(3.7, 1.2, -8.9),
            shadow_distance: 50.0,
            split_index: 0,
            split_count: 1,
            split_ratio: Vec3::ZERO,
            tile_size: 512,
            near_plane_offset: 0.0,
        }
    }

    fn clip(fit: &DirectionalShadowFit, p: Vec3) -> Vec3 {
        (fit.projection * fit.view).transform_point3(p)
    }

    #[test]
    fn test_single_split_uses_full_distance() {
        let fit = fit_directional(&request(), None).expect("fit");
        assert_eq!(fit.split_data.culling_sphere.w, 50.0);
        assert_eq!(fit.split_data.culling_sphere.truncate(), request().camera_position);
    }

    #[test]
    fn test_sphere_center_lands_inside_clip_volume() {
        let fit = fit_directional(&request(), None).expect("fit");
        let c = clip(&fit, request().camera_position);
        // Snapping moves the center by less than one texel.
        let texel_ndc = 2.0 / 512.0;
        assert!(c.x.abs() <= texel_ndc && c.y.abs() <= texel_ndc, "{c:?}");
        assert!(c.z > -1.0 && c.z < 1.0);
    }

    #[test]
    fn test_casters_extend_depth_range() {
        let far_caster = Aabb::from_center_half_extents(
            request().camera_position - request().forward.normalize() * 200.0,
            Vec3::ONE,
        );
        let fit = fit_directional(&request(), Some(far_caster)).expect("fit");
        let z = clip(&fit, far_caster.center()).z;
        assert!((-1.0..=1.0).contains(&z), "caster depth {z} outside clip range");
    }

    #[test]
    fn test_near_plane_offset_pulls_near_plane_back() {
        let mut with_offset = request();
        with_offset.near_plane_offset = 10.0;
        let plain = fit_directional(&request(), None).expect("fit");
        let offset = fit_directional(&with_offset, None).expect("fit");
        // A point just beyond the sphere towards the light is clipped only
        // without the offset.
        let p = request().camera_position - request().forward.normalize() * 55.0;
        assert!(clip(&plain, p).z < -1.0);
        assert!(clip(&offset, p).z >= -1.0);
    }

    #[test]
    fn test_split_ratio_shrinks_early_cascades() {
        let mut req = request();
        req.split_count = 2;
        req.split_ratio = Vec3::new(0.25, 0.0, 0.0);
        let first = fit_directional(&req, None).expect("fit");
        assert_abs_diff_eq!(first.split_data.culling_sphere.w, 12.5);
        req.split_index = 1;
        let last = fit_directional(&req, None).expect("fit");
        assert_abs_diff_eq!(last.split_data.culling_sphere.w, 50.0);
    }

    #[test]
    fn test_invalid_requests() {
        let mut req = request();
        req.tile_size = 0;
        assert!(fit_directional(&req, None).is_none());

        let mut req = request();
        req.split_index = 1;
        assert!(fit_directional(&req, None).is_none());

        let mut req = request();
        req.forward = Vec3::ZERO;
        assert!(fit_directional(&req, None).is_none());

        let mut req = request();
        req.shadow_distance = 0.0;
        assert!(fit_directional(&req, None).is_none());
    }

    #[test]
    fn test_straight_down_light_uses_z_up() {
        let mut req = request();
        req.forward = Vec3::new(0.0, -1.0, 0.0);
        assert!(fit_directional(&req, None).is_some());
    }
}
