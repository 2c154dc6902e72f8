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

//! Provides the linear algebra primitives used by the pipeline.
//!
//! All matrices are column-major and all angular functions take **radians**.
//! Vectors and matrices implement [`approx::AbsDiffEq`] so tests and callers can
//! compare them with a tolerance.

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

pub use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

// --- Declare Sub-Modules ---

pub mod color;
pub mod geometry;
pub mod matrix;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::color::LinearRgba;
pub use self::geometry::Aabb;
pub use self::matrix::Mat4;
pub use self::vector::{Vec2, Vec3, Vec4};
