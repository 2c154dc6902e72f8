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

//! # Umbra Lanes
//!
//! The render lanes of the Umbra pipeline. A [`RenderPipeline`] renders each
//! camera with a [`FrameRenderer`], whose [`LightingLane`] publishes the
//! directional lights and drives the [`ShadowRenderer`] that packs their
//! shadow maps into one atlas.

#![warn(missing_docs)]

pub mod error;
pub mod render_lane;

pub use error::PipelineError;
pub use render_lane::*;
