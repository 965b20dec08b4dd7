mod app;
pub use app::*;

pub mod buttons;
pub mod pointer;

pub mod window_resizing;
