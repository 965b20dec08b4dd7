use bevy::math::{UVec2, Vec2};
use bevy::prelude::Resource;
use tracing::{info, warn};

use crate::completion::Progress;
use crate::config::{PieceCount, PuzzleConfig};
use crate::controller::{ClickOutcome, SwapController};
use crate::error::PuzzleError;
use crate::grid::TileGrid;
use crate::layout::BoardLayout;
use crate::message::PuzzleMessage;
use crate::presentation::PresentationAdapter;
use crate::shuffle;

/// The dealt puzzle: replaced as a whole on reset and reconfiguration.
#[derive(Debug, Clone)]
struct ActivePuzzle {
    grid: TileGrid,
    controller: SwapController,
    layout: BoardLayout,
}

/// Owns all puzzle state between pointer events.
#[derive(Resource, Debug)]
pub struct PuzzleSession {
    config: PuzzleConfig,
    rng: fastrand::Rng,
    image: Option<UVec2>,
    active: Option<ActivePuzzle>,
}

impl PuzzleSession {
    pub fn new(config: PuzzleConfig) -> Self {
        Self::with_rng(config, fastrand::Rng::new())
    }

    pub const fn with_rng(config: PuzzleConfig, rng: fastrand::Rng) -> Self {
        Self {
            config,
            rng,
            image: None,
            active: None,
        }
    }

    pub const fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub const fn piece_count(&self) -> PieceCount {
        self.config.piece_count
    }

    pub fn grid(&self) -> Option<&TileGrid> {
        self.active.as_ref().map(|active| &active.grid)
    }

    pub fn layout(&self) -> Option<&BoardLayout> {
        self.active.as_ref().map(|active| &active.layout)
    }

    pub fn selected(&self) -> Option<usize> {
        self.active
            .as_ref()
            .and_then(|active| active.controller.selected())
    }

    pub fn progress(&self) -> Option<Progress> {
        self.grid().map(Progress::evaluate)
    }

    pub fn is_complete(&self) -> bool {
        self.progress().is_some_and(Progress::is_complete)
    }

    /// Changes the image that the next load fetches.
    pub fn set_image_source(&mut self, source: Option<String>) {
        self.config.image = source;
    }

    /// Validates the configured image source before it is fetched. The
    /// puzzle itself is only rebuilt once [`Self::on_image_ready`] runs.
    pub fn request_load(
        &self,
        adapter: &mut impl PresentationAdapter,
    ) -> Result<String, PuzzleError> {
        Self::request_load_from(self.config.image.as_deref(), adapter)
    }

    /// Same check for a source that did not come from the configuration,
    /// such as a file the player picked.
    pub fn request_load_from(
        source: Option<&str>,
        adapter: &mut impl PresentationAdapter,
    ) -> Result<String, PuzzleError> {
        match source.map(str::trim) {
            Some(source) if !source.is_empty() => Ok(source.to_owned()),
            _ => {
                adapter.report_message(PuzzleMessage::SelectFile);
                Err(PuzzleError::NoFileSelected)
            }
        }
    }

    pub fn on_image_ready(
        &mut self,
        width: u32,
        height: u32,
        adapter: &mut impl PresentationAdapter,
    ) -> Result<(), PuzzleError> {
        let image = UVec2::new(width, height);
        self.deal(image)?;
        self.image = Some(image);
        info!(width, height, pieces = self.piece_count().get(), "puzzle image ready");
        self.publish(adapter, PuzzleMessage::Clear);
        Ok(())
    }

    /// Reshuffles the current image from scratch. Does nothing before the
    /// first image is ready.
    pub fn reset(&mut self, adapter: &mut impl PresentationAdapter) -> Result<(), PuzzleError> {
        let Some(image) = self.image else {
            return Ok(());
        };
        self.deal(image)?;
        info!(pieces = self.piece_count().get(), "puzzle reset");
        self.publish(adapter, PuzzleMessage::Clear);
        Ok(())
    }

    pub fn reconfigure(
        &mut self,
        piece_count: PieceCount,
        adapter: &mut impl PresentationAdapter,
    ) -> Result<(), PuzzleError> {
        let previous = self.config.piece_count;
        self.config.piece_count = piece_count;
        if let Err(err) = self.reset(adapter) {
            self.config.piece_count = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Like [`Self::reconfigure`], for raw input. Invalid values leave the
    /// current puzzle untouched.
    pub fn reconfigure_from_str(
        &mut self,
        raw: &str,
        adapter: &mut impl PresentationAdapter,
    ) -> Result<(), PuzzleError> {
        let piece_count = PieceCount::parse(raw).inspect_err(|err| warn!("{err}"))?;
        self.reconfigure(piece_count, adapter)
    }

    /// Handles a press at `position` in canvas pixels. Presses off the
    /// board, or before any image is ready, are ignored.
    pub fn pointer_event(
        &mut self,
        position: Vec2,
        adapter: &mut impl PresentationAdapter,
    ) -> Result<ClickOutcome, PuzzleError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(ClickOutcome::Ignored);
        };
        let Some(slot) = active.layout.slot_at(position) else {
            return Ok(ClickOutcome::Ignored);
        };

        let outcome = active.controller.click(&mut active.grid, slot)?;
        match outcome {
            ClickOutcome::Ignored => {}
            ClickOutcome::Selected(_) => self.redraw(adapter),
            ClickOutcome::Swapped { .. } => {
                let progress = Progress::evaluate(&active.grid);
                if progress.is_complete() {
                    info!("puzzle completed");
                }
                self.publish(adapter, progress.message());
            }
        }
        Ok(outcome)
    }

    /// Clears the board, draws every tile in grid order, then the
    /// selection highlight.
    pub fn redraw(&self, adapter: &mut impl PresentationAdapter) {
        let Some(active) = &self.active else {
            return;
        };
        adapter.clear_board();
        for tile in active.grid.tiles() {
            adapter.render_tile(
                tile,
                active.layout.source_rect(tile),
                active.layout.dest_rect(tile),
            );
        }
        if let Some(tile) = active
            .controller
            .selected()
            .and_then(|index| active.grid.tile(index))
        {
            adapter.highlight_tile(tile, active.layout.dest_rect(tile));
        }
    }

    fn deal(&mut self, image: UVec2) -> Result<(), PuzzleError> {
        let pieces = self.config.piece_count.get();
        let layout = BoardLayout::fit(image, self.config.max_canvas, pieces)?;
        let mut grid = TileGrid::new(pieces)?;
        shuffle::shuffle(&mut grid, &mut self.rng);
        self.active = Some(ActivePuzzle {
            grid,
            controller: SwapController::default(),
            layout,
        });
        Ok(())
    }

    fn publish(&self, adapter: &mut impl PresentationAdapter, message: PuzzleMessage) {
        self.redraw(adapter);
        if let Some(progress) = self.progress() {
            adapter.report_misplaced_count(progress.misplaced);
        }
        adapter.report_message(message);
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::Rect;

    use super::*;
    use crate::grid::Tile;
    use crate::presentation::{DrawCommand, FrameQueue};

    fn session(pieces: u32) -> PuzzleSession {
        let config = PuzzleConfig {
            piece_count: PieceCount::new(pieces).unwrap(),
            max_canvas: Vec2::splat(300.0),
            image: Some("tiles.png".to_owned()),
            ..PuzzleConfig::default()
        };
        PuzzleSession::with_rng(config, fastrand::Rng::with_seed(9))
    }

    fn ready(pieces: u32) -> (PuzzleSession, FrameQueue) {
        let mut session = session(pieces);
        let mut frame = FrameQueue::default();
        session.on_image_ready(300, 300, &mut frame).unwrap();
        (session, frame)
    }

    /// Canvas point in the middle of a slot of a 300px board.
    fn centre_of(session: &PuzzleSession, slot: UVec2) -> Vec2 {
        let tile = session.layout().unwrap().tile_size();
        (slot.as_vec2() + 0.5) * tile
    }

    fn click_tile(session: &mut PuzzleSession, frame: &mut FrameQueue, index: usize) {
        let slot = session.grid().unwrap().tiles()[index].current();
        let position = centre_of(session, slot);
        session.pointer_event(position, frame).unwrap();
    }

    fn solve(session: &mut PuzzleSession, frame: &mut FrameQueue) {
        loop {
            let grid = session.grid().unwrap();
            let Some(index) = grid.tiles().iter().position(|tile| !tile.is_at_correct_position())
            else {
                return;
            };
            let target = grid.tiles()[index].correct();
            let occupant = grid.find_tile_at(target).unwrap();
            click_tile(session, frame, index);
            click_tile(session, frame, occupant);
        }
    }

    #[derive(Default)]
    struct Recorder {
        tiles: Vec<Tile>,
        highlights: Vec<Rect>,
        counts: Vec<usize>,
        messages: Vec<PuzzleMessage>,
    }

    impl PresentationAdapter for Recorder {
        fn clear_board(&mut self) {
            self.tiles.clear();
            self.highlights.clear();
        }
        fn render_tile(&mut self, tile: &Tile, _source: Rect, _dest: Rect) {
            self.tiles.push(*tile);
        }
        fn highlight_tile(&mut self, _tile: &Tile, dest: Rect) {
            self.highlights.push(dest);
        }
        fn report_misplaced_count(&mut self, count: usize) {
            self.counts.push(count);
        }
        fn report_message(&mut self, message: PuzzleMessage) {
            self.messages.push(message);
        }
    }

    #[test]
    fn loading_without_a_file_only_reports() {
        let mut session = session(3);
        session.set_image_source(None);
        let mut recorder = Recorder::default();

        assert_eq!(
            session.request_load(&mut recorder),
            Err(PuzzleError::NoFileSelected),
            "nothing to load"
        );
        assert_eq!(recorder.messages, vec![PuzzleMessage::SelectFile], "user told to pick a file");
        assert!(session.grid().is_none(), "no puzzle appears");
    }

    #[test]
    fn blank_source_counts_as_no_file() {
        let (mut session, mut frame) = ready(3);
        let before = session.grid().cloned();
        session.set_image_source(Some("   ".to_owned()));

        assert_eq!(session.request_load(&mut frame), Err(PuzzleError::NoFileSelected), "blank");
        assert_eq!(frame.message, Some(PuzzleMessage::SelectFile), "message shown");
        assert_eq!(session.grid().cloned(), before, "previous puzzle kept");
    }

    #[test]
    fn load_hands_back_the_source() {
        let session = session(3);
        let mut frame = FrameQueue::default();
        assert_eq!(session.request_load(&mut frame), Ok("tiles.png".to_owned()), "path");
        assert!(session.grid().is_none(), "grid waits for the image");
    }

    #[test]
    fn cancelled_pick_reports_even_with_a_configured_image() {
        let session = session(3);
        let mut frame = FrameQueue::default();

        assert_eq!(
            PuzzleSession::request_load_from(None, &mut frame),
            Err(PuzzleError::NoFileSelected),
            "picker closed without a file"
        );
        assert_eq!(frame.message, Some(PuzzleMessage::SelectFile), "message shown");
        assert_eq!(session.config().image.as_deref(), Some("tiles.png"), "configuration untouched");
        assert_eq!(
            PuzzleSession::request_load_from(Some("cat.jpg"), &mut frame),
            Ok("cat.jpg".to_owned()),
            "picked name"
        );
    }

    #[test]
    fn image_ready_deals_and_reports() {
        let mut session = session(4);
        let mut recorder = Recorder::default();
        session.on_image_ready(300, 300, &mut recorder).unwrap();

        let grid = session.grid().unwrap();
        assert_eq!(grid.len(), 16, "4x4 tiles");
        assert!(shuffle::is_solvable(grid), "dealt layout is even");
        assert_eq!(recorder.tiles, grid.tiles(), "every tile drawn in grid order");
        assert_eq!(
            recorder.counts,
            vec![session.progress().unwrap().misplaced],
            "count reported"
        );
        assert_eq!(recorder.messages, vec![PuzzleMessage::Clear], "message cleared");
    }

    #[test]
    fn empty_image_keeps_the_previous_puzzle() {
        let (mut session, mut frame) = ready(3);
        let before = session.grid().cloned();
        assert_eq!(
            session.on_image_ready(0, 0, &mut frame),
            Err(PuzzleError::EmptyImage),
            "nothing to slice"
        );
        assert_eq!(session.grid().cloned(), before, "grid retained");
    }

    #[test]
    fn selecting_draws_a_highlight() {
        let (mut session, _) = ready(3);
        let mut recorder = Recorder::default();
        click_tile(&mut session, &mut FrameQueue::default(), 0);
        session.redraw(&mut recorder);

        let expected = session
            .layout()
            .unwrap()
            .dest_rect(&session.grid().unwrap().tiles()[0]);
        assert_eq!(session.selected(), Some(0), "armed");
        assert_eq!(recorder.highlights, vec![expected], "outline on the selected tile");
    }

    #[test]
    fn second_click_swaps_and_clears_selection() {
        let (mut session, mut frame) = ready(3);
        let first_slot = session.grid().unwrap().tiles()[0].current();
        let second_slot = session.grid().unwrap().tiles()[1].current();

        click_tile(&mut session, &mut frame, 0);
        click_tile(&mut session, &mut frame, 1);

        let grid = session.grid().unwrap();
        assert_eq!(grid.tiles()[0].current(), second_slot, "first tile moved");
        assert_eq!(grid.tiles()[1].current(), first_slot, "second tile moved");
        assert_eq!(session.selected(), None, "idle again");
        assert!(
            !frame.take_draws().iter().any(|draw| matches!(draw, DrawCommand::Highlight { .. })),
            "no highlight after the swap"
        );
    }

    #[test]
    fn solving_reports_completion_and_displacing_clears_it() {
        let (mut session, mut frame) = ready(3);
        solve(&mut session, &mut frame);

        assert!(session.is_complete(), "every tile home");
        assert_eq!(frame.misplaced, Some(0), "count reaches zero");
        assert_eq!(frame.message, Some(PuzzleMessage::Completed), "completed message");

        click_tile(&mut session, &mut frame, 0);
        click_tile(&mut session, &mut frame, 4);
        assert!(!session.is_complete(), "displaced again");
        assert_eq!(frame.misplaced, Some(2), "two tiles off");
        assert_eq!(frame.message, Some(PuzzleMessage::Clear), "message cleared");
    }

    #[test]
    fn self_swap_returns_to_idle() {
        let (mut session, mut frame) = ready(3);
        let before = session.grid().cloned();
        click_tile(&mut session, &mut frame, 2);
        click_tile(&mut session, &mut frame, 2);
        assert_eq!(session.grid().cloned(), before, "grid unchanged");
        assert_eq!(session.selected(), None, "selection cleared");
    }

    #[test]
    fn presses_off_the_board_are_ignored() {
        let (mut session, mut frame) = ready(3);
        frame.take_draws();
        let outcome = session.pointer_event(Vec2::new(-10.0, 500.0), &mut frame).unwrap();
        assert_eq!(outcome, ClickOutcome::Ignored, "miss");
        assert!(frame.draws.is_empty(), "nothing redrawn");
    }

    #[test]
    fn presses_before_an_image_are_ignored() {
        let mut session = session(3);
        let mut frame = FrameQueue::default();
        let outcome = session.pointer_event(Vec2::splat(10.0), &mut frame).unwrap();
        assert_eq!(outcome, ClickOutcome::Ignored, "no puzzle yet");
    }

    #[test]
    fn invalid_piece_count_keeps_the_grid() {
        let (mut session, mut frame) = ready(3);
        let before = session.grid().cloned();
        for raw in ["0", "-2", "lots"] {
            assert!(
                matches!(
                    session.reconfigure_from_str(raw, &mut frame),
                    Err(PuzzleError::InvalidPieceCount(_))
                ),
                "{raw:?} rejected"
            );
        }
        assert_eq!(session.grid().cloned(), before, "grid retained");
        assert_eq!(session.piece_count().get(), 3, "count retained");
    }

    #[test]
    fn reconfigure_replaces_the_grid() {
        let (mut session, mut frame) = ready(3);
        session.reconfigure_from_str("5", &mut frame).unwrap();
        assert_eq!(session.grid().unwrap().len(), 25, "5x5 tiles");
        assert_eq!(session.layout().unwrap().tile_size(), Vec2::splat(60.0), "smaller tiles");
    }

    #[test]
    fn reconfigure_before_an_image_only_stores_the_count() {
        let mut session = session(3);
        let mut frame = FrameQueue::default();
        session.reconfigure_from_str("6", &mut frame).unwrap();
        assert!(session.grid().is_none(), "still waiting for an image");

        session.on_image_ready(300, 300, &mut frame).unwrap();
        assert_eq!(session.grid().unwrap().size(), 6, "new count used on load");
    }

    #[test]
    fn reset_deals_a_fresh_grid_and_clears_selection() {
        let (mut session, mut frame) = ready(4);
        solve(&mut session, &mut frame);
        click_tile(&mut session, &mut frame, 3);

        session.reset(&mut frame).unwrap();
        assert_eq!(session.selected(), None, "selection dropped");
        assert_eq!(frame.message, Some(PuzzleMessage::Clear), "message cleared");
        assert!(shuffle::is_solvable(session.grid().unwrap()), "even layout");
    }

    #[test]
    fn reset_before_an_image_does_nothing() {
        let mut session = session(3);
        let mut frame = FrameQueue::default();
        session.reset(&mut frame).unwrap();
        assert!(session.grid().is_none(), "no grid");
        assert!(frame.draws.is_empty() && frame.message.is_none(), "nothing reported");
    }
}
