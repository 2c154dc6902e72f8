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

//! Pipeline configuration: the render-pipeline asset and its shadow settings.
//!
//! Settings are plain serde types stored as RON:
//!
//! ```ron
//! (
//!     use_dynamic_batching: true,
//!     use_gpu_instancing: true,
//!     use_srp_batcher: true,
//!     shadows: (
//!         max_distance: 100.0,
//!         directional: (atlas_size: 1024),
//!     ),
//! )
//! ```
//!
//! Every field has a default, so a partial file is valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Edge length in pixels of the square directional shadow atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum AtlasSize {
    /// 256 x 256.
    Size256,
    /// 512 x 512.
    Size512,
    /// 1024 x 1024.
    #[default]
    Size1024,
    /// 2048 x 2048.
    Size2048,
    /// 4096 x 4096.
    Size4096,
}

impl AtlasSize {
    /// Every supported size, smallest first.
    pub const ALL: [AtlasSize; 5] = [
        AtlasSize::Size256,
        AtlasSize::Size512,
        AtlasSize::Size1024,
        AtlasSize::Size2048,
        AtlasSize::Size4096,
    ];

    /// The edge length in pixels.
    pub const fn pixels(self) -> u32 {
        match self {
            AtlasSize::Size256 => 256,
            AtlasSize::Size512 => 512,
            AtlasSize::Size1024 => 1024,
            AtlasSize::Size2048 => 2048,
            AtlasSize::Size4096 => 4096,
        }
    }
}

impl TryFrom<u32> for AtlasSize {
    type Error = SettingsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        AtlasSize::ALL
            .into_iter()
            .find(|size| size.pixels() == value)
            .ok_or(SettingsError::UnsupportedAtlasSize(value))
    }
}

impl From<AtlasSize> for u32 {
    fn from(size: AtlasSize) -> Self {
        size.pixels()
    }
}

/// Shadow settings for directional lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalShadowSettings {
    /// Size of the shared atlas all directional shadow tiles are packed into.
    pub atlas_size: AtlasSize,
}

/// Shadow settings for the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    /// Distance from the camera beyond which nothing casts shadows.
    pub max_distance: f32,
    /// Directional-light shadow settings.
    pub directional: DirectionalShadowSettings,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            max_distance: 100.0,
            directional: DirectionalShadowSettings::default(),
        }
    }
}

impl ShadowSettings {
    /// Checks the values are usable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.max_distance.is_finite() || self.max_distance < 0.0 {
            return Err(SettingsError::InvalidMaxDistance(self.max_distance));
        }
        Ok(())
    }
}

/// The render-pipeline asset. Every batching switch is off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Merge small meshes sharing a material into one draw.
    pub use_dynamic_batching: bool,
    /// Use GPU instancing where materials support it.
    pub use_gpu_instancing: bool,
    /// Use the host's per-material constant batching.
    pub use_srp_batcher: bool,
    /// Shadow settings.
    pub shadows: ShadowSettings,
}

impl PipelineSettings {
    /// Parses and validates settings from a RON string.
    pub fn from_ron_str(source: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            ron::de::from_str(source).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses, and validates settings from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        log::debug!("Loading pipeline settings from '{}'", path.display());
        Self::from_ron_str(&source)
    }

    /// Serializes the settings as pretty-printed RON.
    pub fn to_ron(&self) -> Result<String, SettingsError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SettingsError::Serialize(e.to_string()))
    }

    /// Checks the values are usable.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.shadows.validate()
    }
}

/// An error raised while loading or validating pipeline settings.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// The atlas size is not one of the supported powers of two.
    UnsupportedAtlasSize(u32),
    /// The shadow distance is negative or not finite.
    InvalidMaxDistance(f32),
    /// The settings file could not be read.
    Io {
        /// Path of the file.
        path: String,
        /// The underlying I/O error.
        message: String,
    },
    /// The RON source is malformed.
    Parse(String),
    /// The settings could not be serialized.
    Serialize(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnsupportedAtlasSize(size) => {
                write!(
                    f,
                    "Unsupported shadow atlas size {size} (expected 256, 512, 1024, 2048 or 4096)"
                )
            }
            SettingsError::InvalidMaxDistance(distance) => {
                write!(f, "Shadow max distance must be finite and >= 0, got {distance}")
            }
            SettingsError::Io { path, message } => {
                write!(f, "Failed to read settings from '{path}': {message}")
            }
            SettingsError::Parse(message) => write!(f, "Failed to parse settings: {message}"),
            SettingsError::Serialize(message) => {
                write!(f, "Failed to serialize settings: {message}")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = PipelineSettings::default();
        assert_eq!(settings.shadows.max_distance, 100.0);
        assert_eq!(settings.shadows.directional.atlas_size, AtlasSize::Size1024);
        assert_eq!(settings.shadows.directional.atlas_size.pixels(), 1024);
        assert!(!settings.use_dynamic_batching);
        assert!(!settings.use_gpu_instancing);
        assert!(!settings.use_srp_batcher);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let settings =
            PipelineSettings::from_ron_str("(shadows: (directional: (atlas_size: 2048)))")
                .expect("valid settings");
        assert_eq!(settings.shadows.directional.atlas_size, AtlasSize::Size2048);
        assert_eq!(settings.shadows.max_distance, 100.0);
        assert!(!settings.use_srp_batcher);
    }

    #[test]
    fn test_ron_output_parses_back() {
        let mut settings = PipelineSettings::default();
        settings.use_dynamic_batching = true;
        settings.shadows.max_distance = 42.5;
        let text = settings.to_ron().expect("serializable");
        assert!(text.contains("atlas_size: 1024"));
        assert_eq!(PipelineSettings::from_ron_str(&text), Ok(settings));
    }

    #[test]
    fn test_unsupported_atlas_size_is_rejected() {
        assert_eq!(AtlasSize::try_from(300), Err(SettingsError::UnsupportedAtlasSize(300)));
        let err = PipelineSettings::from_ron_str("(shadows: (directional: (atlas_size: 300)))")
            .unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_negative_distance_is_rejected() {
        let err = PipelineSettings::from_ron_str("(shadows: (max_distance: -1.0))").unwrap_err();
        assert_eq!(err, SettingsError::InvalidMaxDistance(-1.0));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PipelineSettings::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
