//! Crate-wide error surface.

mod types;

pub use types::{GridError, Result};
