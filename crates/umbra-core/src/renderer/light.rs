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

//! Defines the per-frame light records produced by culling.
//!
//! A [`VisibleLight`] is a read-only snapshot of one light that survived the
//! camera cull. The lighting and shadow lanes consume them in the order the
//! culling results list them; that order decides which lights win when a fixed
//! capacity is exceeded.

use crate::math::{LinearRgba, Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// The kind of light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightType {
    /// An infinitely distant light with parallel rays, like the sun.
    Directional,
    /// A local light emitting in all directions.
    Point,
    /// A local light restricted to a cone.
    Spot,
}

/// How a light casts shadows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LightShadows {
    /// The light casts no shadows.
    #[default]
    None,
    /// Hard-edged shadows.
    Hard,
    /// Filtered shadows.
    Soft,
}

/// A light that survived culling for the current camera.
///
/// # Examples
///
/// ```
/// use umbra_core::math::{LinearRgba, Vec3};
/// use umbra_core::renderer::light::{LightShadows, VisibleLight};
///
/// let sun = VisibleLight::directional_towards(
///     Vec3::new(0.0, -1.0, 0.3),
///     LinearRgba::rgb(1.0, 0.95, 0.8),
///     2.0,
/// )
/// .with_shadows(LightShadows::Soft, 0.8);
///
/// assert!(sun.casts_shadows());
/// assert_eq!(sun.final_color.r, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleLight {
    /// The kind of light.
    pub light_type: LightType,
    /// The light color in linear space, already multiplied by `intensity`.
    pub final_color: LinearRgba,
    /// The intensity multiplier that was folded into `final_color`.
    pub intensity: f32,
    /// The light's world transform. Its third column is the forward axis.
    pub local_to_world: Mat4,
    /// The shadow mode of the light.
    pub shadows: LightShadows,
    /// Shadow strength in `[0, 1]`. A strength of zero disables shadows.
    pub shadow_strength: f32,
}

impl VisibleLight {
    /// Creates a directional light from its world transform.
    pub fn directional(color: LinearRgba, intensity: f32, local_to_world: Mat4) -> Self {
        Self {
            light_type: LightType::Directional,
            final_color: color * intensity,
            intensity,
            local_to_world,
            shadows: LightShadows::None,
            shadow_strength: 0.0,
        }
    }

    /// Creates a directional light whose rays travel along `forward`.
    ///
    /// Falls back to the identity rotation when `forward` is degenerate.
    pub fn directional_towards(forward: Vec3, color: LinearRgba, intensity: f32) -> Self {
        let up = if forward.normalize().y.abs() > 0.99 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let local_to_world =
            Mat4::from_position_forward(Vec3::ZERO, forward, up).unwrap_or(Mat4::IDENTITY);
        Self::directional(color, intensity, local_to_world)
    }

    /// Creates a non-directional light of the given type at `position`.
    pub fn local(light_type: LightType, color: LinearRgba, intensity: f32, position: Vec3) -> Self {
        Self {
            light_type,
            final_color: color * intensity,
            intensity,
            local_to_world: Mat4::from_translation(position),
            shadows: LightShadows::None,
            shadow_strength: 0.0,
        }
    }

    /// Returns the light with the given shadow mode and strength.
    pub fn with_shadows(mut self, shadows: LightShadows, strength: f32) -> Self {
        self.shadows = shadows;
        self.shadow_strength = strength;
        self
    }

    /// Returns `true` for directional lights.
    #[inline]
    pub fn is_directional(&self) -> bool {
        self.light_type == LightType::Directional
    }

    /// The forward axis of the light (third column of `local_to_world`).
    #[inline]
    pub fn forward(&self) -> Vec4 {
        self.local_to_world.cols[2]
    }

    /// The direction *towards* the light, as shaders consume it: the negated
    /// forward axis with `w = 0`.
    #[inline]
    pub fn direction(&self) -> Vec4 {
        let f = self.forward();
        Vec4::new(-f.x, -f.y, -f.z, 0.0)
    }

    /// Returns `true` if the light wants shadows this frame.
    ///
    /// This says nothing about casters; culling still has to report bounds.
    #[inline]
    pub fn casts_shadows(&self) -> bool {
        self.shadows != LightShadows::None && self.shadow_strength > 0.0
    }
}
