use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::card::{Card, CardId, Span};
use crate::error::{GridError, Result};

/// Ordered card sequence. Card ids are unique within a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardStore {
    cards: Vec<Card>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Result<Self> {
        let mut seen = HashSet::new();
        for card in &cards {
            if !seen.insert(card.id.clone()) {
                return Err(GridError::DuplicateCard(card.id.to_string()));
            }
        }
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub fn position(&self, id: &CardId) -> Option<usize> {
        self.cards.iter().position(|card| &card.id == id)
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.position(id).is_some()
    }

    pub fn find(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|card| &card.id == id)
    }

    /// Insert `card` at `index`, clamped to the end of the sequence. Returns
    /// the index the card actually landed at.
    pub(crate) fn insert(&mut self, index: usize, card: Card) -> usize {
        let index = index.min(self.cards.len());
        self.cards.insert(index, card);
        index
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<Card> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    /// Returns `false` for a missing card or a full-width card.
    pub(crate) fn set_span(&mut self, id: &CardId, span: Span) -> bool {
        self.cards
            .iter_mut()
            .find(|card| &card.id == id)
            .map(|card| card.set_span(span))
            .unwrap_or(false)
    }
}

impl<'a> IntoIterator for &'a CardStore {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CardStore {
        CardStore::from_cards(vec![
            Card::half("a", "A", 6),
            Card::full("b", "B"),
            Card::half("c", "C", 4),
        ])
        .unwrap()
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = CardStore::from_cards(vec![Card::full("x", "X"), Card::half("x", "X", 4)])
            .unwrap_err();
        assert!(matches!(err, GridError::DuplicateCard(id) if id == "x"));
    }

    #[test]
    fn insert_clamps_past_the_end() {
        let mut cards = store();
        let landed = cards.insert(99, Card::half("d", "D", 5));
        assert_eq!(landed, 3);
        assert_eq!(cards.position(&CardId::from("d")), Some(3));
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut cards = store();
        assert!(cards.remove(7).is_none());
        assert_eq!(cards.remove(1).map(|card| card.id), Some(CardId::from("b")));
        assert_eq!(cards.len(), 2);
    }

    #[test]
    fn set_span_only_touches_half_cards() {
        let mut cards = store();
        assert!(cards.set_span(&CardId::from("a"), Span::clamped(9)));
        assert!(!cards.set_span(&CardId::from("b"), Span::clamped(9)));
        assert!(!cards.set_span(&CardId::from("zzz"), Span::clamped(9)));
        assert_eq!(cards.get(0).and_then(Card::span).map(Span::get), Some(9));
    }
}
