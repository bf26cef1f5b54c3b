use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Forced row boundaries over the card sequence.
///
/// Index `i` means "start a new row at card `i`", i.e. card `i - 1` and card
/// `i` never share a row. Valid indices lie in `0..=len`; indices are carried
/// through every insert/remove so they keep pointing at the same boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreakSet {
    indices: BTreeSet<usize>,
}

impl BreakSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn insert(&mut self, index: usize) -> bool {
        self.indices.insert(index)
    }

    pub fn remove(&mut self, index: usize) -> bool {
        self.indices.remove(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Drop indices past `card_count`. Returns how many were removed.
    pub fn prune(&mut self, card_count: usize) -> usize {
        let stale = self.indices.split_off(&(card_count + 1));
        stale.len()
    }

    /// Account for a card inserted at `index`: every boundary at or after it
    /// moves one position right.
    pub fn shift_for_insert(&mut self, index: usize) {
        self.indices = self
            .indices
            .iter()
            .map(|&i| if i >= index { i + 1 } else { i })
            .collect();
    }

    /// Account for the card at `index` being removed. Its leading and trailing
    /// boundaries collapse into one, which survives if either side was forced.
    pub fn shift_for_remove(&mut self, index: usize) {
        let merged = self.contains(index) || self.contains(index + 1);
        let mut shifted: BTreeSet<usize> = self
            .indices
            .iter()
            .filter(|&&i| i != index && i != index + 1)
            .map(|&i| if i > index + 1 { i - 1 } else { i })
            .collect();
        if merged {
            shifted.insert(index);
        }
        self.indices = shifted;
    }

    /// Pin cards `first` and `first + 1` together as a row of their own: the
    /// boundary between them is cleared and both outer boundaries are forced.
    pub fn isolate_pair(&mut self, first: usize) {
        self.remove(first + 1);
        self.insert(first);
        self.insert(first + 2);
    }

    /// Force boundaries on both sides of the card at `index`.
    pub fn isolate_card(&mut self, index: usize) {
        self.insert(index);
        self.insert(index + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(breaks: &BreakSet) -> Vec<usize> {
        breaks.iter().collect()
    }

    #[test]
    fn prune_drops_indices_past_len() {
        let mut breaks = BreakSet::from_indices([0, 2, 3, 9]);
        assert_eq!(breaks.prune(3), 1);
        assert_eq!(collect(&breaks), vec![0, 2, 3]);
    }

    #[test]
    fn insert_shifts_boundaries_at_and_after() {
        let mut breaks = BreakSet::from_indices([0, 2, 4]);
        breaks.shift_for_insert(2);
        assert_eq!(collect(&breaks), vec![0, 3, 5]);
    }

    #[test]
    fn remove_merges_adjacent_boundaries() {
        let mut breaks = BreakSet::from_indices([1, 4]);
        breaks.shift_for_remove(1);
        assert_eq!(collect(&breaks), vec![1, 3]);

        let mut breaks = BreakSet::from_indices([2, 5]);
        breaks.shift_for_remove(1);
        assert_eq!(collect(&breaks), vec![1, 4]);

        let mut breaks = BreakSet::from_indices([0, 5]);
        breaks.shift_for_remove(2);
        assert_eq!(collect(&breaks), vec![0, 4]);
    }

    #[test]
    fn isolate_pair_clears_inner_boundary() {
        let mut breaks = BreakSet::from_indices([1]);
        breaks.isolate_pair(0);
        assert_eq!(collect(&breaks), vec![0, 2]);
    }
}
