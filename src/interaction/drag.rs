use super::{DragSource, GestureOutcome, NoopReason};
use crate::geometry::{Point, SlotRegion};
use crate::layout::{DropSlot, partner_index};
use crate::model::{Card, CardId, CardStore, GridState, Span};
use crate::palette::Palette;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: DragSource,
        /// Full-width sources never resolve to inline slots.
        full_width: bool,
        current: Point,
    },
}

/// Drag-and-drop session for palette insertion and card reordering.
#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    default_span: Span,
    next_sequence: u64,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(Span::default())
    }
}

impl DragController {
    pub fn new(default_span: Span) -> Self {
        Self {
            state: DragState::Idle,
            default_span,
            next_sequence: 0,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn source(&self) -> Option<&DragSource> {
        match &self.state {
            DragState::Dragging { source, .. } => Some(source),
            DragState::Idle => None,
        }
    }

    /// Last pointer position of the active drag.
    pub fn pointer(&self) -> Option<Point> {
        match self.state {
            DragState::Dragging { current, .. } => Some(current),
            DragState::Idle => None,
        }
    }

    pub fn default_span(&self) -> Span {
        self.default_span
    }

    pub fn begin(&mut self, source: DragSource, full_width: bool, at: Point) -> GestureOutcome {
        if self.is_active() {
            return GestureOutcome::noop(NoopReason::SessionActive);
        }
        self.state = DragState::Dragging {
            source,
            full_width,
            current: at,
        };
        GestureOutcome::Started
    }

    pub fn track(&mut self, at: Point) -> GestureOutcome {
        match &mut self.state {
            DragState::Dragging { current, .. } => {
                *current = at;
                GestureOutcome::Tracking
            }
            DragState::Idle => GestureOutcome::noop(NoopReason::NoActiveSession),
        }
    }

    /// End the session at `at`, resolving a target among `regions` and applying
    /// the drop to `state`. The controller is idle afterwards whatever the
    /// outcome.
    pub fn release(
        &mut self,
        at: Point,
        regions: &[SlotRegion],
        state: &mut GridState,
        palette: &Palette,
    ) -> GestureOutcome {
        let DragState::Dragging {
            source, full_width, ..
        } = std::mem::take(&mut self.state)
        else {
            return GestureOutcome::noop(NoopReason::NoActiveSession);
        };

        let Some(slot) = resolve_target(regions, at, !full_width) else {
            return GestureOutcome::noop(NoopReason::NoDropTarget);
        };

        let item = match source {
            DragSource::Card(id) => DropItem::Existing(id),
            DragSource::Template(template_id) => {
                let Some(template) = palette.get(&template_id) else {
                    return GestureOutcome::noop(NoopReason::UnknownTemplate);
                };
                let id = self.allocate_id(&template_id, &state.cards);
                DropItem::New(template.instantiate(id, self.default_span))
            }
        };
        apply_drop(state, item, &slot)
    }

    fn allocate_id(&mut self, template_id: &str, cards: &CardStore) -> CardId {
        loop {
            self.next_sequence += 1;
            let id = CardId::new(format!("{template_id}-{}", self.next_sequence));
            if !cards.contains(&id) {
                return id;
            }
        }
    }
}

/// What lands on a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum DropItem {
    New(Card),
    Existing(CardId),
}

pub fn apply_drop(state: &mut GridState, item: DropItem, slot: &DropSlot) -> GestureOutcome {
    match item {
        DropItem::New(card) => insert_card(state, card, slot),
        DropItem::Existing(id) => move_card(state, &id, slot),
    }
}

/// Pick the slot for a release at `at`.
///
/// Slots whose region contains the point win, inline before boundary. With no
/// containing region the slot with the nearest centre is used.
pub fn resolve_target(regions: &[SlotRegion], at: Point, allow_inline: bool) -> Option<DropSlot> {
    let eligible: Vec<&SlotRegion> = regions
        .iter()
        .filter(|region| allow_inline || !region.slot.is_inline())
        .collect();
    let containing: Vec<&SlotRegion> = eligible
        .iter()
        .copied()
        .filter(|region| region.rect.contains(at))
        .collect();

    if !containing.is_empty() {
        let inline = containing
            .iter()
            .copied()
            .filter(|region| region.slot.is_inline());
        return nearest(inline, at).or_else(|| nearest(containing.iter().copied(), at));
    }
    nearest(eligible.into_iter(), at)
}

fn nearest<'a>(candidates: impl Iterator<Item = &'a SlotRegion>, at: Point) -> Option<DropSlot> {
    candidates
        .min_by(|a, b| {
            a.rect
                .distance_sq_to_center(at)
                .total_cmp(&b.rect.distance_sq_to_center(at))
        })
        .map(|region| region.slot)
}

/// Card that an inline drop at `target` pairs with, if inline semantics apply.
fn inline_anchor(cards: &CardStore, slot: &DropSlot, card: &Card, target: usize) -> Option<usize> {
    if !slot.is_inline() || !card.is_half() {
        return None;
    }
    let anchor = target.checked_sub(1)?;
    cards
        .get(anchor)
        .filter(|existing| existing.is_half())
        .map(|_| anchor)
}

/// Insert a new card at `slot`.
pub fn insert_card(state: &mut GridState, mut card: Card, slot: &DropSlot) -> GestureOutcome {
    if state.cards.contains(&card.id) {
        return GestureOutcome::noop(NoopReason::DuplicateCard);
    }
    let target = slot.insertion_index.min(state.cards.len());
    let anchor = inline_anchor(&state.cards, slot, &card, target);
    if anchor.is_some() {
        card.set_span(Span::clamped(i32::from(slot.available_span)));
    }
    let half = card.is_half();
    let id = card.id.clone();

    let index = state.insert_card(target, card);
    settle_breaks(state, index, anchor, half);

    GestureOutcome::Inserted { card: id, index }
}

/// Move an existing card to `slot`.
///
/// A card whose former partner is left behind gets that partner boxed in by
/// breaks so it does not silently pair with whatever now sits beside it. The
/// gap the card leaves is forced too when half cards end up on both sides of
/// it, so its old neighbours never pair with each other.
pub fn move_card(state: &mut GridState, id: &CardId, slot: &DropSlot) -> GestureOutcome {
    let Some(from) = state.cards.position(id) else {
        return GestureOutcome::noop(NoopReason::CardMissing);
    };
    let target = slot.insertion_index.min(state.cards.len());
    let to = if from < target { target - 1 } else { target };
    if to == from {
        return GestureOutcome::noop(NoopReason::SamePosition);
    }

    let partner = partner_index(&state.rows(), from);
    let Some(mut card) = state.remove_card(from) else {
        return GestureOutcome::noop(NoopReason::CardMissing);
    };
    let partner = partner.map(|index| if index > from { index - 1 } else { index });
    if halves_meet_at(&state.cards, from) {
        state.breaks.insert(from);
    }

    let anchor = inline_anchor(&state.cards, slot, &card, to);
    if anchor.is_some() {
        card.set_span(Span::clamped(i32::from(slot.available_span)));
    }
    let half = card.is_half();

    let to = state.insert_card(to, card);
    if let Some(index) = partner.map(|index| if index >= to { index + 1 } else { index }) {
        state.breaks.isolate_card(index);
    }
    settle_breaks(state, to, anchor, half);

    GestureOutcome::Relocated {
        card: id.clone(),
        from,
        to,
    }
}

/// Whether the cards on both sides of boundary `index` are half cards.
fn halves_meet_at(cards: &CardStore, index: usize) -> bool {
    let Some(before) = index.checked_sub(1) else {
        return false;
    };
    cards.get(before).is_some_and(Card::is_half) && cards.get(index).is_some_and(Card::is_half)
}

fn settle_breaks(state: &mut GridState, index: usize, anchor: Option<usize>, half: bool) {
    match anchor {
        Some(anchor) => state.breaks.isolate_pair(anchor),
        None if half => state.breaks.isolate_card(index),
        None => {}
    }
    state.breaks.prune(state.cards.len());
}
