use serde::{Deserialize, Serialize};

use super::breaks::BreakSet;
use super::card::{Card, CardWidth};
use super::store::CardStore;
use crate::layout::{Row, build_rows};

/// Card sequence plus forced boundaries: the complete stored layout state.
///
/// Splices go through [`GridState::insert_card`] and [`GridState::remove_card`]
/// so break indices stay attached to the boundaries they describe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridState {
    pub cards: CardStore,
    #[serde(default)]
    pub breaks: BreakSet,
}

impl GridState {
    pub fn new(cards: CardStore, mut breaks: BreakSet) -> Self {
        breaks.prune(cards.len());
        Self { cards, breaks }
    }

    pub fn rows(&self) -> Vec<Row> {
        build_rows(&self.cards, &self.breaks)
    }

    pub fn insert_card(&mut self, index: usize, card: Card) -> usize {
        let index = self.cards.insert(index, card);
        self.breaks.shift_for_insert(index);
        self.breaks.prune(self.cards.len());
        index
    }

    pub fn remove_card(&mut self, index: usize) -> Option<Card> {
        let card = self.cards.remove(index)?;
        self.breaks.shift_for_remove(index);
        self.breaks.prune(self.cards.len());
        Some(card)
    }

    /// Hash of everything that influences layout: ids, widths, spans and
    /// forced boundaries. Titles and payloads are not part of it.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(self.cards.len() as u64).to_le_bytes());
        for card in &self.cards {
            hasher.update(card.id.as_str().as_bytes());
            hasher.update(&[0]);
            let width = match card.width {
                CardWidth::Full => 0,
                CardWidth::Half(span) => span.get(),
            };
            hasher.update(&[width]);
        }
        for index in self.breaks.iter() {
            hasher.update(&(index as u64).to_le_bytes());
        }
        hasher.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Span;

    fn state() -> GridState {
        let cards = CardStore::from_cards(vec![
            Card::half("a", "A", 6),
            Card::half("b", "B", 6),
            Card::half("c", "C", 8),
        ])
        .unwrap();
        GridState::new(cards, BreakSet::from_indices([2, 11]))
    }

    #[test]
    fn construction_prunes_stale_breaks() {
        let state = state();
        assert_eq!(state.breaks.iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn splices_translate_breaks() {
        let mut state = state();
        state.insert_card(0, Card::full("banner", "Banner"));
        assert_eq!(state.breaks.iter().collect::<Vec<_>>(), vec![3]);

        state.remove_card(0);
        assert_eq!(state.breaks.iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn fingerprint_tracks_layout_but_not_titles() {
        let mut state = state();
        let before = state.fingerprint();

        let mut retitled = state.clone();
        retitled.cards = CardStore::from_cards(
            retitled
                .cards
                .iter()
                .cloned()
                .map(|mut card| {
                    card.title.push('!');
                    card
                })
                .collect(),
        )
        .unwrap();
        assert_eq!(retitled.fingerprint(), before);

        state.cards.set_span(&"a".into(), Span::clamped(4));
        assert_ne!(state.fingerprint(), before);
    }
}
