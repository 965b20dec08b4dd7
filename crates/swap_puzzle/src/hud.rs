use bevy::prelude::*;
use strum::{EnumIter, IntoEnumIterator};
use widget_helpers::buttons::button_bundle;

use crate::message::{Label, Locale, PuzzleMessage};
use crate::presentation::FrameQueue;
use crate::session::PuzzleSession;
use crate::{PuzzleAction, PuzzleSystems};

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
enum HudButton {
    Load,
    Reset,
    Original,
    Fewer,
    More,
}

impl HudButton {
    const fn action(self) -> PuzzleAction {
        match self {
            // Browsers can only read local files the player chose
            Self::Load if cfg!(target_arch = "wasm32") => PuzzleAction::PickFile,
            Self::Load => PuzzleAction::Load,
            Self::Reset => PuzzleAction::Reset,
            Self::Original => PuzzleAction::ToggleOriginal,
            Self::Fewer => PuzzleAction::Pieces(-1),
            Self::More => PuzzleAction::Pieces(1),
        }
    }

    const fn label(self, locale: Locale) -> &'static str {
        match self {
            Self::Load => Label::Load.text(locale),
            Self::Reset => Label::Reset.text(locale),
            Self::Original => Label::ShowOriginal.text(locale),
            Self::Fewer => "-",
            Self::More => "+",
        }
    }

    const fn is_piece_control(self) -> bool {
        matches!(self, Self::Fewer | Self::More)
    }

    const fn width(self) -> f32 {
        if self.is_piece_control() { 40.0 } else { 96.0 }
    }
}

#[derive(Component)]
struct MisplacedText;

#[derive(Component)]
struct MessageText;

#[derive(Component)]
struct PiecesText;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_hud)
            .add_systems(Update, press_buttons.in_set(PuzzleSystems::Input))
            .add_systems(
                Update,
                (show_reports, show_piece_count).in_set(PuzzleSystems::Draw),
            );
    }
}

fn text_bundle(text: impl Into<String>, font_size: f32) -> (Text, TextFont) {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
    )
}

fn spawn_hud(mut commands: Commands, session: Res<PuzzleSession>) {
    let locale = session.config().locale;

    // Status lines above the board
    commands
        .spawn(Node {
            width: Val::Percent(100.),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            padding: UiRect::top(Val::Px(8.0)),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                text_bundle(format!("{}: -", Label::Misplaced.text(locale)), 20.0),
                MisplacedText,
            ));
            parent.spawn((
                text_bundle("", 24.0),
                TextColor(Color::srgb(1.0, 0.85, 0.2)),
                MessageText,
            ));
        });

    // Controls along the bottom edge
    commands
        .spawn(Node {
            width: Val::Percent(100.),
            height: Val::Percent(100.),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::End,
            align_items: AlignItems::Center,
            padding: UiRect::bottom(Val::Px(8.0)),
            ..default()
        })
        .with_children(|parent| {
            parent
                .spawn(Node {
                    align_items: AlignItems::Center,
                    ..default()
                })
                .with_children(|row| {
                    spawn_button(row, HudButton::Fewer, locale);
                    row.spawn((
                        text_bundle(piece_label(&session), 20.0),
                        Node {
                            margin: UiRect::horizontal(Val::Px(8.0)),
                            ..default()
                        },
                        PiecesText,
                    ));
                    spawn_button(row, HudButton::More, locale);
                });
            parent.spawn(Node::default()).with_children(|row| {
                for button in HudButton::iter().filter(|button| !button.is_piece_control()) {
                    spawn_button(row, button, locale);
                }
            });
        });
}

fn spawn_button(parent: &mut ChildBuilder, button: HudButton, locale: Locale) {
    parent
        .spawn((button_bundle(button.width()), button))
        .with_children(|parent| {
            parent.spawn(text_bundle(button.label(locale), 20.0));
        });
}

fn piece_label(session: &PuzzleSession) -> String {
    let pieces = session.piece_count().get();
    format!(
        "{}: {pieces}x{pieces}",
        Label::Pieces.text(session.config().locale)
    )
}

fn press_buttons(
    buttons: Query<(&Interaction, &HudButton), Changed<Interaction>>,
    mut actions: EventWriter<PuzzleAction>,
) {
    for (interaction, button) in &buttons {
        if *interaction == Interaction::Pressed {
            actions.send(button.action());
        }
    }
}

/// Copies the latest count and message reported by the session into the
/// status lines.
fn show_reports(
    mut frame: ResMut<FrameQueue>,
    session: Res<PuzzleSession>,
    mut misplaced: Query<&mut Text, (With<MisplacedText>, Without<MessageText>)>,
    mut message: Query<&mut Text, (With<MessageText>, Without<MisplacedText>)>,
) {
    let locale = session.config().locale;
    if let Some(count) = frame.misplaced.take() {
        for mut text in &mut misplaced {
            text.0 = format!("{}: {count}", Label::Misplaced.text(locale));
        }
    }
    if let Some(report) = frame.message.take() {
        if report != PuzzleMessage::Clear {
            info!("{}", report.text(locale));
        }
        for mut text in &mut message {
            report.text(locale).clone_into(&mut text.0);
        }
    }
}

fn show_piece_count(session: Res<PuzzleSession>, mut texts: Query<&mut Text, With<PiecesText>>) {
    if !session.is_changed() {
        return;
    }
    let label = piece_label(&session);
    for mut text in &mut texts {
        if text.0 != label {
            text.0.clone_from(&label);
        }
    }
}
