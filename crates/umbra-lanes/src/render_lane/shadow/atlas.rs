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

//! Packing of directional shadow maps into one square atlas.

use umbra_core::math::Vec2;
use umbra_core::renderer::api::Viewport;

/// How the atlas is divided for the current frame.
///
/// A single shadowed light gets the whole atlas. Two to four lights share it
/// as a 2x2 grid, so `split * split` always covers the reserved count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    atlas_size: u32,
    split: u32,
    tile_size: u32,
}

impl AtlasLayout {
    /// Lays out `reserved_count` tiles in an atlas of `atlas_size` pixels.
    pub fn new(atlas_size: u32, reserved_count: usize) -> Self {
        let split = if reserved_count <= 1 { 1 } else { 2 };
        debug_assert!(reserved_count <= (split * split) as usize);
        Self {
            atlas_size,
            split,
            tile_size: atlas_size / split,
        }
    }

    /// Atlas edge length in pixels.
    pub fn atlas_size(&self) -> u32 {
        self.atlas_size
    }

    /// Tiles per atlas row.
    pub fn split(&self) -> u32 {
        self.split
    }

    /// Tile edge length in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Position of tile `index` in tile units: column `index % split`, row
    /// `index / split`.
    pub fn tile_offset(&self, index: usize) -> Vec2 {
        let index = index as u32;
        Vec2::new((index % self.split) as f32, (index / self.split) as f32)
    }

    /// Pixel rectangle of the tile at `offset`.
    pub fn tile_viewport(&self, offset: Vec2) -> Viewport {
        let tile = self.tile_size as f32;
        let origin = offset * tile;
        Viewport::new(origin.x, origin.y, tile, tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_rule() {
        for (count, split) in [(0, 1), (1, 1), (2, 2), (3, 2), (4, 2)] {
            let layout = AtlasLayout::new(1024, count);
            assert_eq!(layout.split(), split, "count {count}");
            assert_eq!(layout.tile_size(), 1024 / split);
            assert!((layout.split() * layout.split()) as usize >= count);
        }
    }

    #[test]
    fn test_tile_offsets_fill_rows_first() {
        let layout = AtlasLayout::new(1024, 4);
        let offsets: Vec<Vec2> = (0..4).map(|i| layout.tile_offset(i)).collect();
        assert_eq!(
            offsets,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_tile_viewport_in_pixels() {
        let layout = AtlasLayout::new(2048, 3);
        let viewport = layout.tile_viewport(layout.tile_offset(2));
        assert_eq!(viewport, Viewport::new(0.0, 1024.0, 1024.0, 1024.0));

        let single = AtlasLayout::new(512, 1);
        assert_eq!(
            single.tile_viewport(single.tile_offset(0)),
            Viewport::new(0.0, 0.0, 512.0, 512.0)
        );
    }
}
