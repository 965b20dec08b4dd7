use bevy::math::{Rect, UVec2};
use bevy::prelude::Resource;

use crate::grid::Tile;
use crate::message::PuzzleMessage;

/// Everything the puzzle asks of whoever draws it.
///
/// Rects are in the pixel spaces described by
/// [`BoardLayout`](crate::layout::BoardLayout): `source` in image pixels,
/// `dest` in canvas pixels.
pub trait PresentationAdapter {
    /// Drop whatever the previous redraw produced.
    fn clear_board(&mut self) {}
    fn render_tile(&mut self, tile: &Tile, source: Rect, dest: Rect);
    fn highlight_tile(&mut self, tile: &Tile, dest: Rect);
    fn report_misplaced_count(&mut self, count: usize);
    fn report_message(&mut self, message: PuzzleMessage);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear,
    Tile {
        correct: UVec2,
        source: Rect,
        dest: Rect,
    },
    Highlight {
        dest: Rect,
    },
}

/// Buffers requests until the Bevy systems apply them to sprites and text.
#[derive(Resource, Debug, Default)]
pub struct FrameQueue {
    pub draws: Vec<DrawCommand>,
    pub misplaced: Option<usize>,
    pub message: Option<PuzzleMessage>,
}

impl FrameQueue {
    pub fn take_draws(&mut self) -> Vec<DrawCommand> {
        core::mem::take(&mut self.draws)
    }
}

impl PresentationAdapter for FrameQueue {
    fn clear_board(&mut self) {
        // Anything queued before the clear would be wiped anyway.
        self.draws.clear();
        self.draws.push(DrawCommand::Clear);
    }

    fn render_tile(&mut self, tile: &Tile, source: Rect, dest: Rect) {
        self.draws.push(DrawCommand::Tile {
            correct: tile.correct(),
            source,
            dest,
        });
    }

    fn highlight_tile(&mut self, _tile: &Tile, dest: Rect) {
        self.draws.push(DrawCommand::Highlight { dest });
    }

    fn report_misplaced_count(&mut self, count: usize) {
        self.misplaced = Some(count);
    }

    fn report_message(&mut self, message: PuzzleMessage) {
        self.message = Some(message);
    }
}
