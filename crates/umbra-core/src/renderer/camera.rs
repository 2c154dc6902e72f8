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

//! Camera description handed to the pipeline by the host, and the culling
//! parameters derived from it.

use crate::math::{LinearRgba, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Which kind of view a camera renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraType {
    /// A regular in-game camera.
    #[default]
    Game,
    /// The editor scene view.
    SceneView,
    /// A material/asset preview camera.
    Preview,
    /// An offscreen reflection probe capture.
    Reflection,
}

/// How a camera clears its target before drawing.
///
/// The variants are ordered: every mode up to and including
/// [`CameraClearFlags::Depth`] clears depth, and only
/// [`CameraClearFlags::Color`] clears color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum CameraClearFlags {
    /// Clear depth and draw the skybox over the background.
    #[default]
    Skybox,
    /// Clear depth and fill with the background color.
    Color,
    /// Clear depth only.
    Depth,
    /// Do not clear.
    Nothing,
}

impl CameraClearFlags {
    /// Returns `true` if this mode clears the depth buffer.
    #[inline]
    pub fn clears_depth(self) -> bool {
        self <= CameraClearFlags::Depth
    }

    /// Returns `true` if this mode clears the color buffer.
    #[inline]
    pub fn clears_color(self) -> bool {
        self == CameraClearFlags::Color
    }
}

/// A camera to render this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Display name, used as the profiling sample name of the camera's frame.
    pub name: String,
    /// The kind of camera.
    pub camera_type: CameraType,
    /// World-space position.
    pub position: Vec3,
    /// World-to-view matrix.
    pub view: Mat4,
    /// View-to-clip matrix.
    pub projection: Mat4,
    /// Distance to the near clip plane.
    pub near_clip_plane: f32,
    /// Distance to the far clip plane.
    pub far_clip_plane: f32,
    /// How the target is cleared before drawing.
    pub clear_flags: CameraClearFlags,
    /// Fill color used with [`CameraClearFlags::Color`].
    pub background_color: LinearRgba,
}

impl Camera {
    /// Creates a perspective game camera at `position` looking at `target`.
    ///
    /// Returns `None` if the look-at is degenerate.
    pub fn perspective(
        name: impl Into<String>,
        position: Vec3,
        target: Vec3,
        fov_y_radians: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Option<Self> {
        let view = Mat4::look_at_rh(position, target, Vec3::Y)?;
        Some(Self {
            name: name.into(),
            camera_type: CameraType::Game,
            position,
            view,
            projection: Mat4::perspective_rh_zo(fov_y_radians, aspect_ratio, near, far),
            near_clip_plane: near,
            far_clip_plane: far,
            clear_flags: CameraClearFlags::Skybox,
            background_color: LinearRgba::BLACK,
        })
    }

    /// Returns the camera with a different clear mode.
    pub fn with_clear_flags(mut self, flags: CameraClearFlags, background: LinearRgba) -> Self {
        self.clear_flags = flags;
        self.background_color = background;
        self
    }

    /// Combined world-to-clip matrix.
    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Derives the culling parameters for this camera.
    ///
    /// Returns `None` when the camera cannot be culled: non-positive near plane,
    /// far plane not beyond the near plane, or a singular view-projection. The
    /// shadow distance defaults to the far plane; the frame renderer clamps it.
    pub fn try_get_culling_parameters(&self) -> Option<CullingParameters> {
        let (near, far) = (self.near_clip_plane, self.far_clip_plane);
        if !(near > 0.0 && far > near && far.is_finite()) {
            return None;
        }
        let view_projection = self.view_projection();
        view_projection.inverse()?;
        Some(CullingParameters {
            camera_position: self.position,
            view_projection,
            shadow_distance: far,
        })
    }
}

/// Inputs to the host's culling pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CullingParameters {
    /// World-space camera position.
    pub camera_position: Vec3,
    /// World-to-clip matrix of the camera.
    pub view_projection: Mat4,
    /// Distance from the camera beyond which shadow casters are ignored.
    pub shadow_distance: f32,
}
