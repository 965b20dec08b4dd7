use bevy::prelude::*;
use widget_helpers::buttons::ButtonPalettePlugin;

pub mod completion;
pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod layout;
pub mod message;
pub mod presentation;
pub mod session;
pub mod shuffle;

mod board;
mod hud;
mod loading;
mod picker;

use board::BoardPlugin;
use config::{PuzzleConfig, MAX_PIECE_COUNT};
use hud::HudPlugin;
use loading::LoadingPlugin;
use presentation::FrameQueue;
use session::PuzzleSession;

/// Requests coming from the on-screen controls.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleAction {
    /// Fetch the configured image source.
    Load,
    /// Let the player choose an image file in the browser.
    PickFile,
    Reset,
    ToggleOriginal,
    /// Change the piece count by this many tiles per axis.
    Pieces(i32),
}

/// Frame phases: controls and pointer input, then session updates, then
/// sprites and text catching up with the session.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
enum PuzzleSystems {
    Input,
    Load,
    Draw,
}

pub fn run() {
    let config = PuzzleConfig::from_environment();
    let autoload = config.image.is_some();

    let mut app = widget_helpers::get_default_app("Swap Puzzle", env!("CARGO_CRATE_NAME"));
    app.insert_resource(PuzzleSession::new(config))
        .init_resource::<FrameQueue>()
        .add_event::<PuzzleAction>()
        .configure_sets(
            Update,
            (
                PuzzleSystems::Input,
                PuzzleSystems::Load,
                PuzzleSystems::Draw,
            )
                .chain(),
        )
        .add_plugins(ButtonPalettePlugin)
        .add_plugins((LoadingPlugin, BoardPlugin, HudPlugin))
        .add_systems(Startup, setup)
        .add_systems(Update, apply_actions.in_set(PuzzleSystems::Load));

    if autoload {
        app.add_systems(PostStartup, |mut actions: EventWriter<PuzzleAction>| {
            actions.send(PuzzleAction::Load);
        });
    }

    app.run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn apply_actions(
    mut actions: EventReader<PuzzleAction>,
    mut session: ResMut<PuzzleSession>,
    mut frame: ResMut<FrameQueue>,
) {
    for action in actions.read() {
        let result = match *action {
            PuzzleAction::Reset => session.reset(&mut *frame),
            PuzzleAction::Pieces(delta) => {
                let count = session.piece_count().step(delta, MAX_PIECE_COUNT);
                if count == session.piece_count() {
                    continue;
                }
                info!("piece count changed to {}", count.get());
                session.reconfigure(count, &mut *frame)
            }
            // handled by the loading and board plugins
            PuzzleAction::Load | PuzzleAction::PickFile | PuzzleAction::ToggleOriginal => continue,
        };
        if let Err(err) = result {
            warn!("{action:?} failed: {err}");
        }
    }
}
