use bevy::math::{Rect, UVec2, Vec2};

use crate::error::PuzzleError;
use crate::grid::Tile;

/// Pixel geometry of one dealt puzzle.
///
/// Canvas coordinates have their origin at the board's top-left corner
/// with y growing downwards, like the pointer positions reported for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    image: Vec2,
    canvas: Vec2,
    pieces: u32,
}

impl BoardLayout {
    /// Shrinks `max_canvas` along one axis so it has the image's aspect
    /// ratio, then splits it into `pieces` × `pieces` tiles.
    pub fn fit(image: UVec2, max_canvas: Vec2, pieces: u32) -> Result<Self, PuzzleError> {
        if image.x == 0 || image.y == 0 {
            return Err(PuzzleError::EmptyImage);
        }
        if pieces == 0 {
            return Err(PuzzleError::InvalidPieceCount(pieces.to_string()));
        }
        let image = image.as_vec2();
        let aspect = image.x / image.y;
        let canvas = if max_canvas.x / aspect <= max_canvas.y {
            Vec2::new(max_canvas.x, max_canvas.x / aspect)
        } else {
            Vec2::new(max_canvas.y * aspect, max_canvas.y)
        };
        Ok(Self {
            image,
            canvas,
            pieces,
        })
    }

    pub const fn canvas_size(&self) -> Vec2 {
        self.canvas
    }

    pub const fn image_size(&self) -> Vec2 {
        self.image
    }

    pub fn tile_size(&self) -> Vec2 {
        self.canvas / self.pieces as f32
    }

    fn image_tile_size(&self) -> Vec2 {
        self.image / self.pieces as f32
    }

    /// Grid slot under a canvas position, if it is on the board.
    pub fn slot_at(&self, position: Vec2) -> Option<UVec2> {
        let slot = (position / self.tile_size()).floor();
        let range = 0.0..self.pieces as f32;
        (range.contains(&slot.x) && range.contains(&slot.y)).then(|| slot.as_uvec2())
    }

    /// Region of the source image a tile shows, in image pixels.
    pub fn source_rect(&self, tile: &Tile) -> Rect {
        let size = self.image_tile_size();
        let min = tile.correct().as_vec2() * size;
        Rect::from_corners(min, min + size)
    }

    /// Where a tile is drawn, in canvas pixels.
    pub fn dest_rect(&self, tile: &Tile) -> Rect {
        let size = self.tile_size();
        let min = tile.current().as_vec2() * size;
        Rect::from_corners(min, min + size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileGrid;

    #[test]
    fn wide_image_keeps_width() {
        let layout = BoardLayout::fit(UVec2::new(800, 400), Vec2::new(320.0, 320.0), 4).unwrap();
        assert_eq!(layout.canvas_size(), Vec2::new(320.0, 160.0), "height shrinks");
        assert_eq!(layout.tile_size(), Vec2::new(80.0, 40.0), "tile size");
    }

    #[test]
    fn tall_image_keeps_height() {
        let layout = BoardLayout::fit(UVec2::new(300, 600), Vec2::new(320.0, 320.0), 2).unwrap();
        assert_eq!(layout.canvas_size(), Vec2::new(160.0, 320.0), "width shrinks");
    }

    #[test]
    fn empty_image_is_rejected() {
        assert_eq!(
            BoardLayout::fit(UVec2::new(0, 10), Vec2::splat(320.0), 3),
            Err(PuzzleError::EmptyImage),
            "zero width"
        );
    }

    #[test]
    fn pointer_positions_floor_to_slots() {
        let layout = BoardLayout::fit(UVec2::new(300, 300), Vec2::splat(300.0), 3).unwrap();
        assert_eq!(layout.slot_at(Vec2::new(0.0, 0.0)), Some(UVec2::new(0, 0)), "origin");
        assert_eq!(layout.slot_at(Vec2::new(199.9, 100.0)), Some(UVec2::new(1, 1)), "inside");
        assert_eq!(layout.slot_at(Vec2::new(299.0, 250.0)), Some(UVec2::new(2, 2)), "corner");
        assert_eq!(layout.slot_at(Vec2::new(300.0, 10.0)), None, "right edge");
        assert_eq!(layout.slot_at(Vec2::new(-0.5, 10.0)), None, "left of board");
    }

    #[test]
    fn rects_use_their_own_pixel_space() {
        let layout = BoardLayout::fit(UVec2::new(600, 600), Vec2::splat(300.0), 3).unwrap();
        let mut grid = TileGrid::new(3).unwrap();
        grid.swap(0, 8).unwrap();
        let tile = grid.tiles()[0];

        let source = layout.source_rect(&tile);
        assert_eq!(source.min, Vec2::ZERO, "source follows the correct slot");
        assert_eq!(source.size(), Vec2::splat(200.0), "image pixels");

        let dest = layout.dest_rect(&tile);
        assert_eq!(dest.min, Vec2::splat(200.0), "dest follows the current slot");
        assert_eq!(dest.size(), Vec2::splat(100.0), "canvas pixels");
    }
}
