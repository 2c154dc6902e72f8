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

//! The render lanes, from the pipeline entry point down to the shadow atlas.

pub mod camera;
pub mod lighting;
pub mod pipeline;
pub mod shadow;

pub use self::camera::{FrameOutcome, FrameRenderer, LIT_SHADER_TAG, UNLIT_SHADER_TAG};
pub use self::lighting::{DirectionalLightSet, LightingLane, LightingMetrics};
pub use self::pipeline::RenderPipeline;
pub use self::shadow::{
    AtlasLayout, ShadowMetrics, ShadowPassState, ShadowRenderer, ShadowedDirectionalLight,
    MAX_SHADOWED_DIRECTIONAL_LIGHTS,
};
