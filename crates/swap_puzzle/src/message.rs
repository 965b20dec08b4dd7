use strum::{Display, EnumString};

/// Status line shown under the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PuzzleMessage {
    #[default]
    Clear,
    Completed,
    SelectFile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl PuzzleMessage {
    pub const fn text(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Clear, _) => "",
            (Self::Completed, Locale::Es) => "¡Puzzle completado!",
            (Self::Completed, Locale::En) => "Puzzle completed!",
            (Self::SelectFile, Locale::Es) => "Por favor, selecciona un archivo de puzzle.",
            (Self::SelectFile, Locale::En) => "Please select a puzzle file.",
        }
    }
}

/// Labels of the on-screen controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Load,
    Reset,
    ShowOriginal,
    Misplaced,
    Pieces,
}

impl Label {
    pub const fn text(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Load, Locale::Es) => "Cargar",
            (Self::Load, Locale::En) => "Load",
            (Self::Reset, Locale::Es) => "Reiniciar",
            (Self::Reset, Locale::En) => "Reset",
            (Self::ShowOriginal, _) => "Original",
            (Self::Misplaced, Locale::Es) => "Piezas fuera de lugar",
            (Self::Misplaced, Locale::En) => "Misplaced pieces",
            (Self::Pieces, Locale::Es) => "Piezas",
            (Self::Pieces, Locale::En) => "Pieces",
        }
    }
}
