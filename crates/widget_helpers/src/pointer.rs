use bevy::prelude::*;

/// Screen position of a press that started this frame, from the left mouse
/// button or the first new touch.
pub fn just_pressed_screen_position(
    button_input: &ButtonInput<MouseButton>,
    touch_input: &Touches,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    if button_input.just_pressed(MouseButton::Left) {
        windows.get_single().ok()?.cursor_position()
    } else {
        touch_input
            .iter_just_pressed()
            .next()
            .map(bevy::input::touch::Touch::position)
    }
}

/// Same press, projected through the camera into world space.
pub fn just_pressed_world_position(
    button_input: &ButtonInput<MouseButton>,
    touch_input: &Touches,
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let position = just_pressed_screen_position(button_input, touch_input, windows)?;
    let (camera, camera_transform) = camera.get_single().ok()?;

    camera
        .viewport_to_world_2d(camera_transform, position)
        .ok()
}

/// Converts a world position into the pixel space of a board centred on
/// `centre`: origin at the board's top-left corner, y growing downwards.
pub fn world_to_board(world: Vec2, centre: Vec2, board_size: Vec2) -> Vec2 {
    let local = world - centre;
    Vec2::new(local.x + board_size.x / 2.0, board_size.y / 2.0 - local.y)
}

/// Inverse of [`world_to_board`].
pub fn board_to_world(board: Vec2, centre: Vec2, board_size: Vec2) -> Vec2 {
    centre + Vec2::new(board.x - board_size.x / 2.0, board_size.y / 2.0 - board.y)
}
