use std::fmt::{self, Display, Formatter};

use bevy::math::UVec2;

use crate::error::PuzzleError;

/// One slice of the source image.
///
/// `correct` never changes after the grid is built; `current` is only
/// touched by [`TileGrid::swap`] and the shuffle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    correct: UVec2,
    pub(crate) current: UVec2,
}

impl Tile {
    pub const fn correct(&self) -> UVec2 {
        self.correct
    }

    pub const fn current(&self) -> UVec2 {
        self.current
    }

    pub fn is_at_correct_position(&self) -> bool {
        self.correct == self.current
    }
}

/// The N×N tiles of a puzzle, stored in the order they were cut
/// (row-major over `correct`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    size: u32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Builds the solved layout: every tile sits on its own slot.
    pub fn new(size: u32) -> Result<Self, PuzzleError> {
        if size == 0 {
            return Err(PuzzleError::InvalidPieceCount(size.to_string()));
        }
        let tiles = (0..size)
            .flat_map(|y| (0..size).map(move |x| UVec2::new(x, y)))
            .map(|pos| Tile {
                correct: pos,
                current: pos,
            })
            .collect();
        Ok(Self { size, tiles })
    }

    pub const fn size(&self) -> u32 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    /// Index of the tile currently occupying `slot`.
    pub fn find_tile_at(&self, slot: UVec2) -> Option<usize> {
        self.tiles.iter().position(|tile| tile.current == slot)
    }

    /// Exchanges the current slots of two tiles. Swapping a tile with
    /// itself is allowed and changes nothing.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<(), PuzzleError> {
        let slot_a = self.tiles.get(a).ok_or(PuzzleError::UnknownTile(a))?.current;
        let slot_b = self.tiles.get(b).ok_or(PuzzleError::UnknownTile(b))?.current;
        if let Some(tile) = self.tiles.get_mut(a) {
            tile.current = slot_b;
        }
        if let Some(tile) = self.tiles.get_mut(b) {
            tile.current = slot_a;
        }
        Ok(())
    }

    /// Row-major index of a slot, used for ordering tiles by placement.
    pub(crate) const fn slot_index(&self, slot: UVec2) -> u32 {
        slot.y * self.size + slot.x
    }

    pub(crate) fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }
}

impl Display for TileGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            for x in 0..self.size {
                match self
                    .find_tile_at(UVec2::new(x, y))
                    .and_then(|index| self.tiles.get(index))
                {
                    Some(tile) => write!(f, "{:>02} ", self.slot_index(tile.correct))?,
                    None => write!(f, "   ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
