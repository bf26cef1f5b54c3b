use super::{GestureOutcome, NoopReason};
use crate::geometry::GridGeometry;
use crate::layout::{partner_index, build_rows};
use crate::model::{CardId, GridState, Span};

/// Values captured when a resize session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub card: CardId,
    pub origin_x: f64,
    pub initial_span: Span,
    /// Span of the row partner at session start, if the card had one.
    pub partner_span: Option<Span>,
    /// Last span written to the card.
    pub current_span: Span,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Resizing(ResizeSession),
}

/// Column-span resize session for half cards.
///
/// Every pointer move writes the new span straight into the store; releasing
/// the pointer keeps whatever was last written. There is no revert path.
#[derive(Debug, Clone, Default)]
pub struct ResizeController {
    state: ResizeState,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ResizeState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ResizeState::Resizing(_))
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        match &self.state {
            ResizeState::Resizing(session) => Some(session),
            ResizeState::Idle => None,
        }
    }

    pub fn begin(&mut self, state: &GridState, card: &CardId, pointer_x: f64) -> GestureOutcome {
        if self.is_active() {
            return GestureOutcome::noop(NoopReason::SessionActive);
        }
        let Some(index) = state.cards.position(card) else {
            return GestureOutcome::noop(NoopReason::CardMissing);
        };
        let Some(initial_span) = state.cards.get(index).and_then(|card| card.span()) else {
            return GestureOutcome::noop(NoopReason::FullWidthNotResizable);
        };

        let rows = build_rows(&state.cards, &state.breaks);
        let partner_span = partner_index(&rows, index)
            .and_then(|partner| state.cards.get(partner))
            .and_then(|partner| partner.span());

        self.state = ResizeState::Resizing(ResizeSession {
            card: card.clone(),
            origin_x: pointer_x,
            initial_span,
            partner_span,
            current_span: initial_span,
        });
        GestureOutcome::Started
    }

    /// Recompute the span for the pointer at `pointer_x` and apply it.
    pub fn update(
        &mut self,
        state: &mut GridState,
        pointer_x: f64,
        geometry: &GridGeometry,
    ) -> GestureOutcome {
        let ResizeState::Resizing(session) = &mut self.state else {
            return GestureOutcome::noop(NoopReason::NoActiveSession);
        };

        let span = resize_span(
            session.initial_span,
            session.partner_span,
            pointer_x - session.origin_x,
            geometry.column_width(),
        );
        if !state.cards.set_span(&session.card, span) {
            return GestureOutcome::noop(NoopReason::CardMissing);
        }
        session.current_span = span;
        GestureOutcome::SpanChanged {
            card: session.card.clone(),
            span: span.get(),
        }
    }

    /// End the session. The last live span is the committed one.
    pub fn release(&mut self, state: &GridState) -> GestureOutcome {
        let ResizeState::Resizing(session) = std::mem::take(&mut self.state) else {
            return GestureOutcome::noop(NoopReason::NoActiveSession);
        };
        match state.cards.find(&session.card).and_then(|card| card.span()) {
            Some(span) => GestureOutcome::ResizeCommitted {
                card: session.card,
                span: span.get(),
            },
            None => GestureOutcome::noop(NoopReason::CardMissing),
        }
    }
}

/// Span for a pointer that moved `delta_x` pixels since the session began.
///
/// The delta is rounded to whole columns, the result clamped to
/// `[MIN_SPAN, MAX_SPAN]`, and with a partner further capped at
/// `12 - partner_span`. A degenerate column width counts as no movement.
pub fn resize_span(
    initial: Span,
    partner: Option<Span>,
    delta_x: f64,
    column_width: f64,
) -> Span {
    let delta_columns = if column_width.is_finite() && column_width > 0.0 && delta_x.is_finite() {
        (delta_x / column_width).round() as i32
    } else {
        0
    };
    let candidate = Span::clamped(i32::from(initial.get()).saturating_add(delta_columns));
    match partner {
        Some(partner) => Span::clamped(i32::from(candidate.get().min(partner.remaining()))),
        None => candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::model::{BreakSet, Card, CardStore};

    fn geometry() -> GridGeometry {
        // 84px columns, 16px gaps.
        GridGeometry::new(1184.0, &GridConfig::default())
    }

    fn grid(cards: Vec<Card>) -> GridState {
        GridState::new(CardStore::from_cards(cards).unwrap(), BreakSet::new())
    }

    fn span_of(state: &GridState, id: &str) -> Option<u8> {
        state
            .cards
            .find(&id.into())
            .and_then(|card| card.span())
            .map(Span::get)
    }

    #[test]
    fn partner_caps_growth() {
        let initial = Span::clamped(6);
        let partner = Some(Span::clamped(6));
        assert_eq!(resize_span(initial, partner, 8.0 * 84.0, 84.0).get(), 6);
        assert_eq!(resize_span(initial, None, 8.0 * 84.0, 84.0).get(), 10);
        assert_eq!(resize_span(initial, partner, -2.0 * 84.0, 84.0).get(), 4);
    }

    #[test]
    fn shrink_is_floored() {
        assert_eq!(resize_span(Span::clamped(4), None, -1000.0, 84.0).get(), 2);
    }

    #[test]
    fn degenerate_column_width_is_no_movement() {
        let initial = Span::clamped(5);
        assert_eq!(resize_span(initial, None, 300.0, 0.0), initial);
        assert_eq!(resize_span(initial, None, 300.0, -3.0), initial);
        assert_eq!(resize_span(initial, None, f64::NAN, 84.0), initial);
    }

    #[test]
    fn rounding_to_nearest_column() {
        let initial = Span::clamped(5);
        assert_eq!(resize_span(initial, None, 41.0, 84.0).get(), 5);
        assert_eq!(resize_span(initial, None, 43.0, 84.0).get(), 6);
        assert_eq!(resize_span(initial, None, -43.0, 84.0).get(), 4);
    }

    #[test]
    fn live_updates_and_commit() {
        let mut state = grid(vec![Card::half("a", "A", 4)]);
        let mut resize = ResizeController::new();

        assert_eq!(resize.begin(&state, &"a".into(), 100.0), GestureOutcome::Started);
        assert_eq!(
            resize.update(&mut state, 300.0, &geometry()),
            GestureOutcome::SpanChanged {
                card: "a".into(),
                span: 6
            }
        );
        assert_eq!(span_of(&state, "a"), Some(6));

        resize.update(&mut state, 150.0, &geometry());
        assert_eq!(span_of(&state, "a"), Some(5));

        assert_eq!(
            resize.release(&state),
            GestureOutcome::ResizeCommitted {
                card: "a".into(),
                span: 5
            }
        );
        assert!(!resize.is_active());
    }

    #[test]
    fn full_cards_are_rejected() {
        let state = grid(vec![Card::full("f", "F")]);
        let mut resize = ResizeController::new();
        assert_eq!(
            resize.begin(&state, &"f".into(), 0.0).noop_reason(),
            Some(NoopReason::FullWidthNotResizable)
        );
        assert!(!resize.is_active());
    }

    #[test]
    fn second_begin_is_rejected() {
        let state = grid(vec![Card::half("a", "A", 4), Card::half("b", "B", 4)]);
        let mut resize = ResizeController::new();
        resize.begin(&state, &"a".into(), 0.0);
        assert_eq!(
            resize.begin(&state, &"b".into(), 0.0).noop_reason(),
            Some(NoopReason::SessionActive)
        );
        assert_eq!(resize.session().map(|s| s.card.as_str()), Some("a"));
        assert_eq!(resize.session().and_then(|s| s.partner_span).map(Span::get), Some(4));
    }

    #[test]
    fn card_removed_mid_session() {
        let mut state = grid(vec![Card::half("a", "A", 4)]);
        let mut resize = ResizeController::new();
        resize.begin(&state, &"a".into(), 0.0);
        state.remove_card(0);

        assert_eq!(
            resize.update(&mut state, 500.0, &geometry()).noop_reason(),
            Some(NoopReason::CardMissing)
        );
        assert_eq!(
            resize.release(&state).noop_reason(),
            Some(NoopReason::CardMissing)
        );
        assert!(!resize.is_active());
    }

    #[test]
    fn updates_without_session_are_noops() {
        let mut state = grid(vec![Card::half("a", "A", 4)]);
        let mut resize = ResizeController::new();
        assert_eq!(
            resize.update(&mut state, 10.0, &geometry()).noop_reason(),
            Some(NoopReason::NoActiveSession)
        );
        assert_eq!(
            resize.release(&state).noop_reason(),
            Some(NoopReason::NoActiveSession)
        );
    }
}
