use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("no puzzle image selected")]
    NoFileSelected,
    #[error("invalid piece count {0:?}, expected a positive integer")]
    InvalidPieceCount(String),
    #[error("puzzle image has no pixels")]
    EmptyImage,
    #[error("could not decode {0}")]
    UnreadableImage(String),
    #[error("tile {0} does not exist in this grid")]
    UnknownTile(usize),
}
