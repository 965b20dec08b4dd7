#[cfg(target_arch = "wasm32")]
use bevy::prelude::*;

/// Largest surface wgpu accepts on most browsers.
pub const MAX_SURFACE_EXTENT: f32 = 2048.0;

/// Window size that follows the browser but never exceeds what the GPU
/// surface can be configured with.
pub fn clamp_to_surface(width: f32, height: f32) -> (f32, f32) {
    (width.min(MAX_SURFACE_EXTENT), height.min(MAX_SURFACE_EXTENT))
}

#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(
    mut primary_query: Query<&mut Window, With<bevy::window::PrimaryWindow>>,
) {
    let Some(browser) = web_sys::window() else {
        return;
    };
    let Some(target_width) = browser.inner_width().ok().and_then(|w| w.as_f64()) else {
        return;
    };
    let Some(target_height) = browser.inner_height().ok().and_then(|h| h.as_f64()) else {
        return;
    };
    let (width, height) = clamp_to_surface(target_width as f32, target_height as f32);

    for mut window in &mut primary_query {
        if (window.resolution.width() - width).abs() > f32::EPSILON
            || (window.resolution.height() - height).abs() > f32::EPSILON
        {
            window.resolution.set(width, height);
        }
    }
}
