use crate::grid::TileGrid;
use crate::message::PuzzleMessage;

/// Snapshot of how far the player is from the solved image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub misplaced: usize,
}

impl Progress {
    /// Full recount; nothing is tracked incrementally between swaps.
    pub fn evaluate(grid: &TileGrid) -> Self {
        let misplaced = grid
            .tiles()
            .iter()
            .filter(|tile| !tile.is_at_correct_position())
            .count();
        Self { misplaced }
    }

    pub const fn is_complete(self) -> bool {
        self.misplaced == 0
    }

    pub const fn message(self) -> PuzzleMessage {
        if self.is_complete() {
            PuzzleMessage::Completed
        } else {
            PuzzleMessage::Clear
        }
    }
}
