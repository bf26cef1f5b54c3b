//! Pointer-driven sessions that write back into the grid state.
//!
//! ```text
//! DragController:   Idle -> Dragging -> Idle (pointer up: drop or no-op)
//! ResizeController: Idle -> Resizing -> Idle (pointer up: commit last span)
//! ```
//!
//! Both machines are independent of any UI event model. Gestures never fail:
//! anything that cannot be honoured comes back as [`GestureOutcome::Noop`]
//! with the reason attached.

mod drag;
mod resize;

use serde::Serialize;

use crate::model::CardId;

pub use drag::{
    DragController, DragState, DropItem, apply_drop, insert_card, move_card, resolve_target,
};
pub use resize::{ResizeController, ResizeSession, ResizeState, resize_span};

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "id", rename_all = "snake_case")]
pub enum DragSource {
    /// An existing card being reordered.
    Card(CardId),
    /// A palette template being instantiated.
    Template(String),
}

/// Why a gesture left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    /// Another drag or resize session owns the pointer.
    SessionActive,
    /// Move or release without a session in progress.
    NoActiveSession,
    /// The referenced card is no longer in the store.
    CardMissing,
    /// The dragged template is not in the palette.
    UnknownTemplate,
    /// Full-width cards have no resize handle.
    FullWidthNotResizable,
    /// The release point resolved to no drop slot.
    NoDropTarget,
    /// The resolved slot is the card's current position.
    SamePosition,
    /// A new card reused an id already present in the store.
    DuplicateCard,
}

impl NoopReason {
    pub fn label(self) -> &'static str {
        match self {
            NoopReason::SessionActive => "session_active",
            NoopReason::NoActiveSession => "no_active_session",
            NoopReason::CardMissing => "card_missing",
            NoopReason::UnknownTemplate => "unknown_template",
            NoopReason::FullWidthNotResizable => "full_width_not_resizable",
            NoopReason::NoDropTarget => "no_drop_target",
            NoopReason::SamePosition => "same_position",
            NoopReason::DuplicateCard => "duplicate_card",
        }
    }
}

/// Result of feeding one pointer event into a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GestureOutcome {
    Started,
    /// Drag pointer moved; nothing is written until release.
    Tracking,
    /// Live span applied during a resize.
    SpanChanged { card: CardId, span: u8 },
    Inserted { card: CardId, index: usize },
    Relocated { card: CardId, from: usize, to: usize },
    ResizeCommitted { card: CardId, span: u8 },
    Noop { reason: NoopReason },
}

impl GestureOutcome {
    pub const fn noop(reason: NoopReason) -> Self {
        GestureOutcome::Noop { reason }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, GestureOutcome::Noop { .. })
    }

    pub fn noop_reason(&self) -> Option<NoopReason> {
        match self {
            GestureOutcome::Noop { reason } => Some(*reason),
            _ => None,
        }
    }

    /// Whether the outcome wrote into the card store or break set.
    pub fn mutated(&self) -> bool {
        matches!(
            self,
            GestureOutcome::SpanChanged { .. }
                | GestureOutcome::Inserted { .. }
                | GestureOutcome::Relocated { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            GestureOutcome::Started => "started",
            GestureOutcome::Tracking => "tracking",
            GestureOutcome::SpanChanged { .. } => "span_changed",
            GestureOutcome::Inserted { .. } => "inserted",
            GestureOutcome::Relocated { .. } => "relocated",
            GestureOutcome::ResizeCommitted { .. } => "resize_committed",
            GestureOutcome::Noop { .. } => "noop",
        }
    }
}
