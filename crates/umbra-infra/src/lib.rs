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

//! # Umbra Infra
//!
//! A CPU-only implementation of the `umbra-core` render contracts.
//!
//! - [`scene`]: an in-memory scene of lights and shadow-caster bounds, and the
//!   culling results computed from it, including directional shadow frustum
//!   fitting.
//! - [`recording`]: a [`RenderContext`](umbra_core::renderer::RenderContext)
//!   that executes command lists by recording them, tracks temporary texture
//!   lifetimes, and exposes the resulting shader globals for inspection.

#![warn(missing_docs)]

pub mod recording;
pub mod scene;

pub use recording::{RecordedEvent, RecordingContext};
pub use scene::{Scene, SceneCullingResults, ShadowCaster};
