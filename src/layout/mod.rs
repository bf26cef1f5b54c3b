//! Derived layout: rows and drop slots.
//!
//! Both builders are pure functions of the stored state and never mutate
//! their inputs. Geometry (pixels) lives in [`crate::geometry`].

mod rows;
mod slots;

pub use rows::{Row, RowCell, build_rows, partner_index, row_containing};
pub use slots::{DropSlot, SlotKind, build_drop_slots};
