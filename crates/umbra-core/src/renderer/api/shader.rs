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

//! Shader-facing identifiers.

use std::fmt;

/// Names a global shader property (a uniform or a globally bound texture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderPropertyId(&'static str);

impl ShaderPropertyId {
    /// Creates a property id from its shader-side name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The shader-side name.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ShaderPropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Names a shader pass tag, used to select which passes a draw renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderTagId(&'static str);

impl ShaderTagId {
    /// Creates a tag id from its name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The tag name.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}
