//! Template catalog used to seed new cards.

mod core;

pub use self::core::{Palette, Template, WidthClass};
