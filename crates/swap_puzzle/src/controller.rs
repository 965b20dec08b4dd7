use bevy::math::UVec2;
use tracing::debug;

use crate::error::PuzzleError;
use crate::grid::TileGrid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    /// A tile is waiting for its swap partner.
    Armed(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click landed outside every tile.
    Ignored,
    Selected(usize),
    Swapped { first: usize, second: usize },
}

/// Two-click swap interaction. There is no way to cancel a selection:
/// the next click on any tile, the selected one included, performs the
/// swap and returns to idle.
#[derive(Debug, Clone, Default)]
pub struct SwapController {
    selection: Selection,
}

impl SwapController {
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    pub const fn selected(&self) -> Option<usize> {
        match self.selection {
            Selection::Idle => None,
            Selection::Armed(index) => Some(index),
        }
    }

    pub fn click(&mut self, grid: &mut TileGrid, slot: UVec2) -> Result<ClickOutcome, PuzzleError> {
        let Some(clicked) = grid.find_tile_at(slot) else {
            return Ok(ClickOutcome::Ignored);
        };

        match self.selection {
            Selection::Idle => {
                debug!(tile = clicked, %slot, "tile selected");
                self.selection = Selection::Armed(clicked);
                Ok(ClickOutcome::Selected(clicked))
            }
            Selection::Armed(first) => {
                self.selection = Selection::Idle;
                grid.swap(first, clicked)?;
                debug!(first, second = clicked, "tiles swapped");
                Ok(ClickOutcome::Swapped {
                    first,
                    second: clicked,
                })
            }
        }
    }
}
