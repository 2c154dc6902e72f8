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

//! Render-pipeline contracts: the data the host engine hands to the pipeline,
//! and the traits through which the pipeline talks back to it.
//!
//! The pipeline never touches a graphics API directly. It records
//! [`api::CommandList`]s and asks a [`RenderContext`] to execute them, and it
//! reads lights and shadow-caster information through [`CullingResults`].

pub mod api;
pub mod camera;
pub mod culling;
pub mod light;
pub mod traits;

pub use self::camera::{Camera, CameraClearFlags, CameraType, CullingParameters};
pub use self::culling::{CullingResults, DirectionalShadowFit, ShadowSplitData};
pub use self::light::{LightShadows, LightType, VisibleLight};
pub use self::traits::{GraphicsSettings, RenderContext};
