//! Image files that reach the widget without going through the asset
//! server: a file chosen in the browser, or one dropped on a native window.

use std::sync::LazyLock;

use bevy::image::{CompressedImageFormats, ImageSampler, ImageType};
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use parking_lot::Mutex;

use crate::error::PuzzleError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickedFile {
    /// The chooser was closed without a file.
    Nothing,
    Image {
        name: String,
        /// Empty when the platform does not report one.
        mime: String,
        bytes: Vec<u8>,
    },
}

/// Filled by browser callbacks, drained once per frame.
static PICKED_FILES: LazyLock<Mutex<Vec<PickedFile>>> = LazyLock::new(|| Mutex::new(Vec::new()));

pub fn push(file: PickedFile) {
    PICKED_FILES.lock().push(file);
}

pub fn drain() -> Vec<PickedFile> {
    PICKED_FILES.lock().drain(..).collect()
}

/// Decodes raw file contents, picking the format from the MIME type or,
/// failing that, the file extension.
pub fn decode(name: &str, mime: &str, bytes: &[u8]) -> Result<Image, PuzzleError> {
    let image_type = if mime.is_empty() {
        ImageType::Extension(name.rsplit_once('.').map_or("", |(_, extension)| extension))
    } else {
        ImageType::MimeType(mime)
    };

    Image::from_buffer(
        bytes,
        image_type,
        CompressedImageFormats::NONE,
        true,
        ImageSampler::Default,
        RenderAssetUsages::default(),
    )
    .map_err(|err| PuzzleError::UnreadableImage(format!("{name}: {err}")))
}

#[cfg(target_arch = "wasm32")]
pub use browser::open;

#[cfg(target_arch = "wasm32")]
mod browser {
    use bevy::prelude::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Event, File, FileReader, HtmlInputElement};

    use super::{PickedFile, push};

    /// Shows the browser's file chooser. The result arrives later through
    /// [`super::drain`].
    pub fn open() {
        if let Err(err) = show_chooser() {
            error!("could not open the file chooser: {err:?}");
        }
    }

    fn show_chooser() -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let input: HtmlInputElement = document.create_element("input")?.dyn_into()?;
        input.set_type("file");
        input.set_accept("image/*");

        let on_change = Closure::<dyn FnMut(Event)>::new(|event: Event| {
            let file = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            match file {
                Some(file) => read(file),
                None => push(PickedFile::Nothing),
            }
        });
        input.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
        on_change.forget();

        let on_cancel = Closure::<dyn FnMut()>::new(|| push(PickedFile::Nothing));
        input.add_event_listener_with_callback("cancel", on_cancel.as_ref().unchecked_ref())?;
        on_cancel.forget();

        input.click();
        Ok(())
    }

    fn read(file: File) {
        let name = file.name();
        let reader = match FileReader::new() {
            Ok(reader) => reader,
            Err(err) => {
                error!("could not read {name}: {err:?}");
                return;
            }
        };

        let mime = file.type_();
        let on_load = {
            let reader = reader.clone();
            let name = name.clone();
            Closure::once(move || match reader.result() {
                Ok(buffer) => push(PickedFile::Image {
                    name,
                    mime,
                    bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
                }),
                Err(err) => error!("could not read {name}: {err:?}"),
            })
        };
        reader.set_onload(Some(on_load.as_ref().unchecked_ref()));
        on_load.forget();

        if let Err(err) = reader.read_as_array_buffer(&file) {
            error!("could not read {name}: {err:?}");
        }
    }
}
