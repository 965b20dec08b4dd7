use wasm_bindgen::prelude::*;
use web_sys::console;

pub(crate) fn main_wasm() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document to attach the puzzle to"))?;
    // Bevy binds to this canvas.
    if document.query_selector("#widget")?.is_none() {
        return Err(JsValue::from_str("page has no <canvas id=\"widget\">"));
    }
    console::log_1(&format!("Starting swap_puzzle {}", env!("CARGO_PKG_VERSION")).into());
    swap_puzzle::run();
    Ok(())
}
