use serde::Serialize;

use super::rows::Row;
use crate::model::GRID_COLUMNS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Starts a new row.
    Boundary,
    /// Fills the unused columns beside a lone half card.
    Inline,
}

/// A legal drag-and-drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DropSlot {
    /// Position in the card sequence where the dropped card lands.
    pub insertion_index: usize,
    pub kind: SlotKind,
    /// Free columns: `12 - span` for inline slots, 12 for boundaries.
    pub available_span: u8,
    /// Row the slot belongs to. Boundaries use the index of the row they
    /// precede (`rows.len()` for the trailing boundary).
    pub row: usize,
}

impl DropSlot {
    pub const fn boundary(insertion_index: usize, row: usize) -> Self {
        Self {
            insertion_index,
            kind: SlotKind::Boundary,
            available_span: GRID_COLUMNS,
            row,
        }
    }

    pub const fn inline(insertion_index: usize, row: usize, available_span: u8) -> Self {
        Self {
            insertion_index,
            kind: SlotKind::Inline,
            available_span,
            row,
        }
    }

    pub const fn is_inline(&self) -> bool {
        matches!(self.kind, SlotKind::Inline)
    }

    /// Index of the lone card an inline slot attaches to.
    pub fn anchor(&self) -> Option<usize> {
        match self.kind {
            SlotKind::Inline => self.insertion_index.checked_sub(1),
            SlotKind::Boundary => None,
        }
    }
}

/// Enumerate every insertion point for the given rows.
///
/// One boundary before the first row and one after each row; a lone half card
/// additionally gets an inline slot right after it, listed before the boundary
/// that follows its row.
pub fn build_drop_slots(rows: &[Row]) -> Vec<DropSlot> {
    let mut slots = Vec::with_capacity(rows.len() * 2 + 1);
    slots.push(DropSlot::boundary(
        rows.first().map(Row::start).unwrap_or(0),
        0,
    ));
    for (row_index, row) in rows.iter().enumerate() {
        if let Some(span) = row.lone_half_span() {
            slots.push(DropSlot::inline(row.end(), row_index, span.remaining()));
        }
        slots.push(DropSlot::boundary(row.end(), row_index + 1));
    }
    slots
}
