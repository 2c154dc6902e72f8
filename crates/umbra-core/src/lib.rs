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

//! # Umbra Core
//!
//! Foundational crate containing the math primitives, light records, pipeline
//! settings, and render-context contracts that the Umbra lanes are written
//! against.
//!
//! Nothing in this crate talks to a graphics API. The host engine (or the
//! headless backend in `umbra-infra`) implements [`renderer::RenderContext`]
//! and [`renderer::CullingResults`]; the lanes only ever see those traits.

#![warn(missing_docs)]

pub mod math;
pub mod renderer;
pub mod settings;
pub mod telemetry;

pub use settings::{AtlasSize, PipelineSettings, SettingsError, ShadowSettings};
