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

//! World-to-atlas-tile shadow transforms.

use umbra_core::math::{Mat4, Vec2};

/// Converts a light's world-to-clip matrix into a world-to-tile transform.
///
/// `view_projection` must produce a `[-1, 1]` clip range on all three axes.
/// The result maps world positions to `[0, 1]` texture coordinates inside the
/// tile at `offset` (in tile units) of an atlas split `split` ways, with depth
/// remapped to `[0, 1]`. With a reversed depth buffer the depth row is
/// negated first, so larger stored depths are closer to the light.
pub fn to_atlas_matrix(view_projection: Mat4, offset: Vec2, split: u32, reversed_z: bool) -> Mat4 {
    let mut m = view_projection;
    if reversed_z {
        m.set_row(2, -m.get_row(2));
    }

    let scale = 1.0 / split as f32;
    let row0 = m.get_row(0);
    let row1 = m.get_row(1);
    let row2 = m.get_row(2);
    let row3 = m.get_row(3);

    m.set_row(0, ((row0 + row3) * 0.5 + row3 * offset.x) * scale);
    m.set_row(1, ((row1 + row3) * 0.5 + row3 * offset.y) * scale);
    m.set_row(2, (row2 + row3) * 0.5);
    m
}
