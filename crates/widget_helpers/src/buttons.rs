use bevy::prelude::*;

const BUTTON_NORMAL: Color = Color::srgb(0.15, 0.15, 0.15);
const BUTTON_HOVERED: Color = Color::srgb(0.25, 0.25, 0.25);
const BUTTON_PRESSED: Color = Color::srgb(0.35, 0.35, 0.35);
const BUTTON_FRAME_NORMAL: Color = Color::srgb(0.25, 0.25, 0.25);
const BUTTON_FRAME_HOVERED: Color = Color::srgb(0.5, 0.5, 0.5);
const BUTTON_FRAME_PRESSED: Color = Color::srgb(1., 1., 1.);

/// Node, border and background shared by every widget button.
pub fn button_bundle(width: f32) -> impl Bundle {
    (
        Button,
        Node {
            width: Val::Px(width),
            height: Val::Px(40.0),
            margin: UiRect::all(Val::Px(2.0)),
            border: UiRect::all(Val::Px(3.0)),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BorderColor(BUTTON_FRAME_NORMAL),
        BorderRadius::all(Val::Px(8.0)),
        BackgroundColor(BUTTON_NORMAL),
    )
}

pub const fn palette(interaction: Interaction) -> (Color, Color) {
    match interaction {
        Interaction::Pressed => (BUTTON_PRESSED, BUTTON_FRAME_PRESSED),
        Interaction::Hovered => (BUTTON_HOVERED, BUTTON_FRAME_HOVERED),
        Interaction::None => (BUTTON_NORMAL, BUTTON_FRAME_NORMAL),
    }
}

pub fn paint_buttons(
    mut query: Query<
        (&Interaction, &mut BackgroundColor, &mut BorderColor),
        (Changed<Interaction>, With<Button>),
    >,
) {
    for (interaction, mut color, mut border_color) in &mut query {
        let (fill, frame) = palette(*interaction);
        *color = fill.into();
        border_color.0 = frame;
    }
}

pub struct ButtonPalettePlugin;

impl Plugin for ButtonPalettePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, paint_buttons);
    }
}
