use crate::model::{BreakSet, CardId, CardStore, CardWidth, Span};

/// One card as it appears inside a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCell {
    pub index: usize,
    pub id: CardId,
    pub width: CardWidth,
}

impl RowCell {
    pub fn columns(&self) -> u8 {
        self.width.columns()
    }
}

/// A rendered grid row: one card, or two adjacent half cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Single(RowCell),
    Pair(RowCell, RowCell),
}

impl Row {
    pub fn first(&self) -> &RowCell {
        match self {
            Row::Single(cell) | Row::Pair(cell, _) => cell,
        }
    }

    pub fn second(&self) -> Option<&RowCell> {
        match self {
            Row::Single(_) => None,
            Row::Pair(_, cell) => Some(cell),
        }
    }

    pub fn last(&self) -> &RowCell {
        self.second().unwrap_or_else(|| self.first())
    }

    pub fn cells(&self) -> impl Iterator<Item = &RowCell> {
        std::iter::once(self.first()).chain(self.second())
    }

    /// Index of the first card in the row.
    pub fn start(&self) -> usize {
        self.first().index
    }

    /// Index one past the last card in the row.
    pub fn end(&self) -> usize {
        self.last().index + 1
    }

    pub fn len(&self) -> usize {
        if self.is_pair() { 2 } else { 1 }
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Row::Pair(..))
    }

    pub fn contains(&self, index: usize) -> bool {
        self.cells().any(|cell| cell.index == index)
    }

    /// The other card of a pair, if `index` is one of its members.
    pub fn partner_of(&self, index: usize) -> Option<&RowCell> {
        match self {
            Row::Pair(a, b) if a.index == index => Some(b),
            Row::Pair(a, b) if b.index == index => Some(a),
            _ => None,
        }
    }

    /// Span of the card if this row is a half card without a partner.
    pub fn lone_half_span(&self) -> Option<Span> {
        match self {
            Row::Single(cell) => cell.width.span(),
            Row::Pair(..) => None,
        }
    }

    pub fn used_columns(&self) -> u8 {
        self.cells().map(RowCell::columns).sum()
    }
}

/// Group the card sequence into rows.
///
/// Full cards always stand alone. Two consecutive half cards share a row unless
/// a forced break sits between them. Pairing is greedy from the left: once two
/// cards form a pair neither is considered again.
pub fn build_rows(cards: &CardStore, breaks: &BreakSet) -> Vec<Row> {
    let cell = |index: usize| {
        cards.get(index).map(|card| RowCell {
            index,
            id: card.id.clone(),
            width: card.width,
        })
    };

    let mut rows = Vec::with_capacity(cards.len());
    let mut index = 0;
    while let Some(current) = cell(index) {
        if current.width.is_half() && !breaks.contains(index + 1) {
            if let Some(next) = cell(index + 1).filter(|next| next.width.is_half()) {
                rows.push(Row::Pair(current, next));
                index += 2;
                continue;
            }
        }
        rows.push(Row::Single(current));
        index += 1;
    }
    rows
}

pub fn row_containing(rows: &[Row], index: usize) -> Option<&Row> {
    rows.iter().find(|row| row.contains(index))
}

/// Index of the card sharing a row with `index`, if any.
pub fn partner_index(rows: &[Row], index: usize) -> Option<usize> {
    row_containing(rows, index)
        .and_then(|row| row.partner_of(index))
        .map(|cell| cell.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Card;

    fn store(cards: Vec<Card>) -> CardStore {
        CardStore::from_cards(cards).unwrap()
    }

    fn shape(rows: &[Row]) -> Vec<Vec<usize>> {
        rows.iter()
            .map(|row| row.cells().map(|cell| cell.index).collect())
            .collect()
    }

    #[test]
    fn two_halves_pair_up() {
        let cards = store(vec![Card::half("a", "A", 6), Card::half("b", "B", 6)]);
        let rows = build_rows(&cards, &BreakSet::new());
        assert_eq!(shape(&rows), vec![vec![0, 1]]);
        assert_eq!(rows[0].used_columns(), 12);
    }

    #[test]
    fn full_cards_stand_alone() {
        let cards = store(vec![
            Card::half("a", "A", 6),
            Card::full("f", "F"),
            Card::half("b", "B", 6),
        ]);
        let rows = build_rows(&cards, &BreakSet::new());
        assert_eq!(shape(&rows), vec![vec![0], vec![1], vec![2]]);
        assert_eq!(rows[1].lone_half_span(), None);
        assert_eq!(rows[2].lone_half_span().map(Span::get), Some(6));
    }

    #[test]
    fn break_splits_a_pair() {
        let cards = store(vec![Card::half("a", "A", 6), Card::half("b", "B", 6)]);
        let rows = build_rows(&cards, &BreakSet::from_indices([1]));
        assert_eq!(shape(&rows), vec![vec![0], vec![1]]);
    }

    #[test]
    fn pairing_is_greedy() {
        let cards = store(vec![
            Card::half("a", "A", 4),
            Card::half("b", "B", 4),
            Card::half("c", "C", 4),
        ]);
        let rows = build_rows(&cards, &BreakSet::new());
        assert_eq!(shape(&rows), vec![vec![0, 1], vec![2]]);

        let rows = build_rows(&cards, &BreakSet::from_indices([1]));
        assert_eq!(shape(&rows), vec![vec![0], vec![1, 2]]);
    }

    #[test]
    fn partner_lookup() {
        let cards = store(vec![
            Card::half("a", "A", 6),
            Card::half("b", "B", 6),
            Card::full("c", "C"),
        ]);
        let rows = build_rows(&cards, &BreakSet::new());
        assert_eq!(partner_index(&rows, 0), Some(1));
        assert_eq!(partner_index(&rows, 1), Some(0));
        assert_eq!(partner_index(&rows, 2), None);
        assert_eq!(partner_index(&rows, 9), None);
        assert_eq!(rows[0].end(), 2);
    }

    #[test]
    fn empty_store_has_no_rows() {
        assert!(build_rows(&CardStore::new(), &BreakSet::from_indices([0])).is_empty());
    }
}
