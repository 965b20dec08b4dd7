use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::window::FileDragAndDrop;

use crate::picker::{self, PickedFile};
use crate::presentation::FrameQueue;
use crate::session::PuzzleSession;
use crate::{PuzzleAction, PuzzleSystems};

/// Image the current puzzle is cut from. Only switched once the session
/// has accepted the new picture.
#[derive(Resource, Default)]
pub struct PuzzleImage(pub Option<Handle<Image>>);

/// Image requested by the last load, until it finishes decoding.
#[derive(Resource, Default)]
struct PendingImage(Option<Handle<Image>>);

/// Fired once the requested image is decoded; the only way the session
/// learns about a new picture.
#[derive(Event, Debug, Clone)]
pub struct ImageReady {
    pub handle: Handle<Image>,
    pub width: u32,
    pub height: u32,
}

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PuzzleImage>()
            .init_resource::<PendingImage>()
            .add_event::<ImageReady>()
            .add_systems(Update, accept_dropped_files.in_set(PuzzleSystems::Input))
            .add_systems(
                Update,
                (
                    start_load,
                    receive_picked_files,
                    poll_pending_image,
                    deal_ready_image,
                )
                    .chain()
                    .in_set(PuzzleSystems::Load),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Update, open_file_chooser.in_set(PuzzleSystems::Load));
    }
}

/// Native windows accept a picture dropped on them as the puzzle image.
fn accept_dropped_files(mut drops: EventReader<FileDragAndDrop>) {
    for drop in drops.read() {
        if let FileDragAndDrop::DroppedFile { path_buf, .. } = drop {
            let name = path_buf.to_string_lossy().into_owned();
            match std::fs::read(path_buf) {
                Ok(bytes) => picker::push(PickedFile::Image {
                    name,
                    mime: String::new(),
                    bytes,
                }),
                Err(err) => error!("could not read dropped file {name}: {err}"),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn open_file_chooser(mut actions: EventReader<PuzzleAction>) {
    if actions.read().any(|action| *action == PuzzleAction::PickFile) {
        picker::open();
    }
}

fn start_load(
    mut actions: EventReader<PuzzleAction>,
    session: Res<PuzzleSession>,
    mut frame: ResMut<FrameQueue>,
    mut pending: ResMut<PendingImage>,
    asset_server: Res<AssetServer>,
) {
    for action in actions.read() {
        if *action != PuzzleAction::Load {
            continue;
        }
        match session.request_load(&mut *frame) {
            Ok(path) => {
                info!("loading puzzle image {path}");
                pending.0 = Some(asset_server.load(path));
            }
            Err(err) => info!("{err}"),
        }
    }
}

fn receive_picked_files(
    mut frame: ResMut<FrameQueue>,
    mut pending: ResMut<PendingImage>,
    mut images: ResMut<Assets<Image>>,
) {
    for file in picker::drain() {
        if let Some(handle) = load_picked_file(file, &mut *frame, &mut images) {
            pending.0 = Some(handle);
        }
    }
}

/// Decodes a picked file into a new image asset. A closed chooser is
/// reported like a load without a file.
fn load_picked_file(
    file: PickedFile,
    frame: &mut FrameQueue,
    images: &mut Assets<Image>,
) -> Option<Handle<Image>> {
    let (name, mime, bytes) = match file {
        PickedFile::Nothing => (None, String::new(), Vec::new()),
        PickedFile::Image { name, mime, bytes } => (Some(name), mime, bytes),
    };
    let name = match PuzzleSession::request_load_from(name.as_deref(), frame) {
        Ok(name) => name,
        Err(err) => {
            info!("{err}");
            return None;
        }
    };

    match picker::decode(&name, &mime, &bytes) {
        Ok(image) => {
            info!("loading picked image {name}");
            Some(images.add(image))
        }
        Err(err) => {
            error!("could not load puzzle image: {err}");
            None
        }
    }
}

fn poll_pending_image(
    mut pending: ResMut<PendingImage>,
    mut ready: EventWriter<ImageReady>,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
) {
    let Some(handle) = pending.0.take() else {
        return;
    };

    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(&handle) {
        error!("could not load puzzle image: {err}");
        return;
    }
    let Some(image) = images.get(&handle) else {
        pending.0 = Some(handle);
        return;
    };

    let size = image.size();
    ready.send(ImageReady {
        handle,
        width: size.x,
        height: size.y,
    });
}

fn deal_ready_image(
    mut ready: EventReader<ImageReady>,
    mut session: ResMut<PuzzleSession>,
    mut frame: ResMut<FrameQueue>,
    mut puzzle_image: ResMut<PuzzleImage>,
) {
    for image in ready.read() {
        match session.on_image_ready(image.width, image.height, &mut *frame) {
            Ok(()) => puzzle_image.0 = Some(image.handle.clone()),
            Err(err) => warn!("puzzle image rejected: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PuzzleConfig;
    use crate::message::PuzzleMessage;

    fn app() -> App {
        let session = PuzzleSession::with_rng(PuzzleConfig::default(), fastrand::Rng::with_seed(5));
        let mut app = App::new();
        app.insert_resource(session)
            .init_resource::<FrameQueue>()
            .init_resource::<PuzzleImage>()
            .add_event::<ImageReady>()
            .add_systems(Update, deal_ready_image);
        app
    }

    fn shown(app: &App) -> Option<Handle<Image>> {
        app.world().resource::<PuzzleImage>().0.clone()
    }

    #[test]
    fn accepted_image_becomes_the_texture() {
        let mut app = app();
        let handle = Handle::<Image>::weak_from_u128(1);
        app.world_mut().send_event(ImageReady {
            handle: handle.clone(),
            width: 200,
            height: 100,
        });
        app.update();

        assert_eq!(shown(&app), Some(handle), "texture switched");
        assert!(
            app.world().resource::<PuzzleSession>().grid().is_some(),
            "puzzle dealt"
        );
    }

    #[test]
    fn rejected_image_keeps_the_current_texture() {
        let mut app = app();
        let first = Handle::<Image>::weak_from_u128(1);
        app.world_mut().send_event(ImageReady {
            handle: first.clone(),
            width: 200,
            height: 100,
        });
        app.update();
        let layout = app.world().resource::<PuzzleSession>().layout().copied();

        app.world_mut().send_event(ImageReady {
            handle: Handle::weak_from_u128(2),
            width: 0,
            height: 0,
        });
        app.update();

        assert_eq!(shown(&app), Some(first), "old texture still drawn");
        assert_eq!(
            app.world().resource::<PuzzleSession>().layout().copied(),
            layout,
            "old layout kept"
        );
    }

    #[test]
    fn closed_chooser_asks_for_a_file() {
        let mut frame = FrameQueue::default();
        let mut images = Assets::<Image>::default();

        let handle = load_picked_file(PickedFile::Nothing, &mut frame, &mut images);

        assert!(handle.is_none(), "nothing to load");
        assert_eq!(frame.message, Some(PuzzleMessage::SelectFile), "user told to pick a file");
    }

    #[test]
    fn unreadable_pick_adds_no_asset() {
        let mut frame = FrameQueue::default();
        let mut images = Assets::<Image>::default();
        let file = PickedFile::Image {
            name: "broken.png".to_owned(),
            mime: "image/png".to_owned(),
            bytes: vec![0; 16],
        };

        assert!(load_picked_file(file, &mut frame, &mut images).is_none(), "decode fails");
        assert!(images.is_empty(), "no asset created");
        assert_eq!(frame.message, None, "no status message for a bad file");
    }
}
