mod core;
mod width;

pub use self::core::{RendererSettings, TextRenderer, status_line};
pub use width::{display_width, fit_to_width, strip_ansi};
