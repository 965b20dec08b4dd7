use bevy::prelude::*;
use widget_helpers::pointer::{board_to_world, just_pressed_world_position, world_to_board};

use crate::loading::PuzzleImage;
use crate::presentation::{DrawCommand, FrameQueue};
use crate::session::PuzzleSession;
use crate::{PuzzleAction, PuzzleSystems};

/// World position of the board's centre; the HUD sits above and below it.
const BOARD_CENTRE: Vec2 = Vec2::new(0.0, 90.0);
const PREVIEW_CENTRE: Vec2 = Vec2::new(0.0, -140.0);
const PREVIEW_SCALE: f32 = 0.3;
const OUTLINE_WIDTH: f32 = 3.0;
const OUTLINE_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

#[derive(Component)]
struct TileSprite;

#[derive(Component)]
struct SelectionOutline;

#[derive(Component)]
struct OriginalPreview;

pub struct BoardPlugin;

impl Plugin for BoardPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, press_tiles.in_set(PuzzleSystems::Input))
            .add_systems(
                Update,
                (
                    spawn_original_preview,
                    toggle_original_preview,
                    apply_draws,
                )
                    .in_set(PuzzleSystems::Draw),
            );
    }
}

fn press_tiles(
    windows: Query<&Window>,
    buttons: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    camera: Query<(&Camera, &GlobalTransform)>,
    mut session: ResMut<PuzzleSession>,
    mut frame: ResMut<FrameQueue>,
) {
    let Some(world_position) = just_pressed_world_position(&buttons, &touch_input, &windows, &camera)
    else {
        return;
    };
    let Some(canvas) = session.layout().map(|layout| layout.canvas_size()) else {
        return;
    };

    let position = world_to_board(world_position, BOARD_CENTRE, canvas);
    if let Err(err) = session.pointer_event(position, &mut *frame) {
        error!("press at {position} failed: {err}");
    }
}

/// Turns queued draw requests into sprites. A clear removes every tile and
/// outline spawned by earlier redraws.
fn apply_draws(
    mut commands: Commands,
    mut frame: ResMut<FrameQueue>,
    session: Res<PuzzleSession>,
    image: Res<PuzzleImage>,
    drawn: Query<Entity, Or<(With<TileSprite>, With<SelectionOutline>)>>,
) {
    if frame.draws.is_empty() {
        return;
    }
    let draws = frame.take_draws();
    let (Some(layout), Some(image)) = (session.layout(), &image.0) else {
        warn!("dropping {} draw requests without a puzzle image", draws.len());
        return;
    };
    let canvas = layout.canvas_size();

    for draw in draws {
        match draw {
            DrawCommand::Clear => {
                for entity in &drawn {
                    commands.entity(entity).despawn_recursive();
                }
            }
            DrawCommand::Tile {
                correct,
                source,
                dest,
            } => {
                let centre = board_to_world(dest.center(), BOARD_CENTRE, canvas);
                commands.spawn((
                    TileSprite,
                    Name::new(format!("tile {};{}", correct.x, correct.y)),
                    Sprite {
                        image: image.clone(),
                        rect: Some(source),
                        custom_size: Some(dest.size()),
                        ..default()
                    },
                    Transform::from_translation(centre.extend(0.0)),
                ));
            }
            DrawCommand::Highlight { dest } => {
                let centre = board_to_world(dest.center(), BOARD_CENTRE, canvas);
                spawn_outline(&mut commands, centre, dest.size());
            }
        }
    }
}

fn spawn_outline(commands: &mut Commands, centre: Vec2, size: Vec2) {
    let half = size / 2.0;
    let horizontal = Vec2::new(size.x, OUTLINE_WIDTH);
    let vertical = Vec2::new(OUTLINE_WIDTH, size.y);
    let edges = [
        (Vec2::new(0.0, half.y - OUTLINE_WIDTH / 2.0), horizontal),
        (Vec2::new(0.0, OUTLINE_WIDTH / 2.0 - half.y), horizontal),
        (Vec2::new(OUTLINE_WIDTH / 2.0 - half.x, 0.0), vertical),
        (Vec2::new(half.x - OUTLINE_WIDTH / 2.0, 0.0), vertical),
    ];

    commands
        .spawn((
            SelectionOutline,
            Transform::from_translation(centre.extend(1.0)),
            Visibility::default(),
        ))
        .with_children(|parent| {
            for (offset, edge) in edges {
                parent.spawn((
                    Sprite::from_color(OUTLINE_COLOR, edge),
                    Transform::from_translation(offset.extend(0.0)),
                ));
            }
        });
}

/// Every accepted image gets a fresh, hidden preview of the whole picture.
fn spawn_original_preview(
    mut commands: Commands,
    session: Res<PuzzleSession>,
    image: Res<PuzzleImage>,
    previews: Query<Entity, With<OriginalPreview>>,
) {
    if !image.is_changed() {
        return;
    }
    let (Some(layout), Some(image)) = (session.layout(), &image.0) else {
        return;
    };

    for entity in &previews {
        commands.entity(entity).despawn_recursive();
    }
    commands.spawn((
        OriginalPreview,
        Sprite {
            image: image.clone(),
            custom_size: Some(layout.canvas_size() * PREVIEW_SCALE),
            ..default()
        },
        Transform::from_translation(PREVIEW_CENTRE.extend(0.0)),
        Visibility::Hidden,
    ));
}

fn toggle_original_preview(
    mut actions: EventReader<PuzzleAction>,
    mut previews: Query<&mut Visibility, With<OriginalPreview>>,
) {
    for action in actions.read() {
        if *action != PuzzleAction::ToggleOriginal {
            continue;
        }
        for mut visibility in &mut previews {
            visibility.toggle_visible_hidden();
        }
    }
}
