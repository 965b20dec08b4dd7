use core::num::NonZeroU32;
use core::str::FromStr;

use bevy::math::Vec2;
use bevy::prelude::Resource;
use tracing::warn;

use crate::error::PuzzleError;
use crate::message::Locale;

/// Largest piece count offered by the on-screen "+" control.
pub const MAX_PIECE_COUNT: u32 = 10;

/// Tiles per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PieceCount(NonZeroU32);

impl PieceCount {
    pub const DEFAULT: Self = Self(NonZeroU32::MIN.saturating_add(2));

    pub fn new(count: u32) -> Result<Self, PuzzleError> {
        NonZeroU32::new(count)
            .map(Self)
            .ok_or_else(|| PuzzleError::InvalidPieceCount(count.to_string()))
    }

    pub fn parse(raw: &str) -> Result<Self, PuzzleError> {
        let invalid = || PuzzleError::InvalidPieceCount(raw.to_owned());
        let count = raw.trim().parse::<u32>().map_err(|_err| invalid())?;
        NonZeroU32::new(count).map(Self).ok_or_else(invalid)
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Neighbouring count for the "-"/"+" control, clamped to `1..=max`.
    pub fn step(self, delta: i32, max: u32) -> Self {
        let stepped = self.get().saturating_add_signed(delta).clamp(1, max.max(1));
        NonZeroU32::new(stepped).map_or(self, Self)
    }
}

impl Default for PieceCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for PieceCount {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PuzzleConfig {
    pub piece_count: PieceCount,
    /// Largest board the image is fitted into, in canvas pixels.
    pub max_canvas: Vec2,
    /// Asset path or URL of the puzzle image; `None` until one is chosen.
    pub image: Option<String>,
    pub locale: Locale,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            piece_count: PieceCount::DEFAULT,
            max_canvas: Vec2::new(320.0, 320.0),
            image: None,
            locale: Locale::default(),
        }
    }
}

impl PuzzleConfig {
    /// Reads `pieces`, `image` and `lang` from `key=value` pairs joined by
    /// `&`, as found in a page query string. Bad values are logged and the
    /// defaults kept.
    pub fn from_query(query: &str) -> Self {
        Self::from_pairs(query.trim_start_matches('?').split('&'))
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> Self {
        let mut config = Self::default();
        for pair in pairs {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "pieces" => match PieceCount::parse(value) {
                    Ok(count) => config.piece_count = count,
                    Err(err) => warn!("{err}, keeping {}", config.piece_count.get()),
                },
                "image" => {
                    let value = value.trim();
                    config.image = (!value.is_empty()).then(|| value.to_owned());
                }
                "lang" => match Locale::from_str(value) {
                    Ok(locale) => config.locale = locale,
                    Err(_err) => warn!("unsupported language {value:?}, keeping {}", config.locale),
                },
                _ => warn!("ignoring unknown setting {key:?}"),
            }
        }
        config
    }

    /// Settings for the running platform: the page query string in the
    /// browser, command line arguments natively.
    pub fn from_environment() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let query = web_sys::window()
                .and_then(|window| window.location().search().ok())
                .unwrap_or_default();
            Self::from_query(&query)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let args: Vec<String> = std::env::args().skip(1).collect();
            Self::from_pairs(args.iter().map(String::as_str))
        }
    }
}
