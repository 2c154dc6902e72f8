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

//! Errors raised while configuring the pipeline.

use thiserror::Error;
use umbra_core::telemetry::MetricsError;
use umbra_core::SettingsError;

/// Errors returned by [`crate::RenderPipeline`] construction.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The settings failed validation.
    #[error("Invalid pipeline settings: {0}")]
    InvalidSettings(#[from] SettingsError),
    /// A metric could not be registered.
    #[error("Failed to register pipeline metrics: {0}")]
    Metrics(#[from] MetricsError),
}
