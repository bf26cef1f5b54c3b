//! Screen-space geometry for rows, cards and drop slots.
//!
//! Coordinates are pixels with the origin at the grid's top-left corner. Rows
//! stack vertically with `gap_px` between them; columns are laid out as
//! twelve equal tracks separated by `gap_px`.

use crate::config::GridConfig;
use crate::layout::{DropSlot, Row, SlotKind};
use crate::model::{CardId, GRID_COLUMNS};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle; edges count as inside.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    pub fn distance_sq_to_center(&self, point: Point) -> f64 {
        let center = self.center();
        let dx = center.x - point.x;
        let dy = center.y - point.y;
        dx * dx + dy * dy
    }
}

/// Pixel metrics of a grid of a given width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub width_px: f64,
    pub gap_px: f64,
    pub row_height_px: f64,
    pub boundary_band_px: f64,
    pub resize_handle_px: f64,
}

impl GridGeometry {
    pub fn new(width_px: f64, config: &GridConfig) -> Self {
        Self {
            width_px,
            gap_px: config.gap_px,
            row_height_px: config.row_height_px,
            boundary_band_px: config.boundary_band_px,
            resize_handle_px: config.resize_handle_px,
        }
    }

    /// Width of one column track: `(width - gap * 11) / 12`.
    pub fn column_width(&self) -> f64 {
        let gaps = self.gap_px * f64::from(GRID_COLUMNS - 1);
        (self.width_px - gaps) / f64::from(GRID_COLUMNS)
    }

    /// Pixel width of `columns` tracks including the gaps between them.
    pub fn span_width(&self, columns: u8) -> f64 {
        if columns == 0 {
            return 0.0;
        }
        let columns = f64::from(columns);
        (columns * self.column_width() + (columns - 1.0) * self.gap_px).max(0.0)
    }

    /// Horizontal offset of the track following `columns` tracks.
    pub fn column_offset(&self, columns: u8) -> f64 {
        f64::from(columns) * (self.column_width() + self.gap_px)
    }

    pub fn row_top(&self, row: usize) -> f64 {
        row as f64 * (self.row_height_px + self.gap_px)
    }

    /// Vertical centre of the boundary preceding `row`.
    pub fn boundary_center(&self, row: usize) -> f64 {
        self.row_top(row) - self.gap_px / 2.0
    }

    pub fn total_height(&self, row_count: usize) -> f64 {
        if row_count == 0 {
            0.0
        } else {
            self.row_top(row_count) - self.gap_px
        }
    }
}

/// Hit region of a drop slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotRegion {
    pub slot: DropSlot,
    pub rect: Rect,
}

/// Painted area of a card, plus its resize handle for half cards.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRegion {
    pub index: usize,
    pub id: CardId,
    pub row: usize,
    pub rect: Rect,
    pub resize_handle: Option<Rect>,
}

/// Default hit regions for `slots`: a full-width band centred on each row
/// boundary, and the unused columns to the right of each lone half card.
pub fn slot_regions(slots: &[DropSlot], rows: &[Row], geometry: &GridGeometry) -> Vec<SlotRegion> {
    slots
        .iter()
        .map(|slot| {
            let rect = match slot.kind {
                SlotKind::Boundary => {
                    let center = geometry.boundary_center(slot.row);
                    Rect::new(
                        0.0,
                        center - geometry.boundary_band_px / 2.0,
                        geometry.width_px,
                        geometry.boundary_band_px,
                    )
                }
                SlotKind::Inline => {
                    let used = rows
                        .get(slot.row)
                        .map(Row::used_columns)
                        .unwrap_or(GRID_COLUMNS - slot.available_span);
                    let x = geometry.column_offset(used);
                    Rect::new(
                        x,
                        geometry.row_top(slot.row),
                        (geometry.width_px - x).max(0.0),
                        geometry.row_height_px,
                    )
                }
            };
            SlotRegion { slot: *slot, rect }
        })
        .collect()
}

pub fn card_regions(rows: &[Row], geometry: &GridGeometry) -> Vec<CardRegion> {
    let mut regions = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        let top = geometry.row_top(row_index);
        let mut offset_columns = 0u8;
        for cell in row.cells() {
            let columns = cell.columns();
            let rect = Rect::new(
                geometry.column_offset(offset_columns),
                top,
                geometry.span_width(columns),
                geometry.row_height_px,
            );
            let resize_handle = cell.width.is_half().then(|| {
                let handle = geometry.resize_handle_px.min(rect.width);
                Rect::new(rect.right() - handle, rect.y, handle, rect.height)
            });
            regions.push(CardRegion {
                index: cell.index,
                id: cell.id.clone(),
                row: row_index,
                rect,
                resize_handle,
            });
            offset_columns = offset_columns.saturating_add(columns);
        }
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{build_drop_slots, build_rows};
    use crate::model::{BreakSet, Card, CardStore};

    fn geometry() -> GridGeometry {
        // 12 columns of 84px with 16px gaps.
        GridGeometry::new(1184.0, &GridConfig::default())
    }

    #[test]
    fn column_math() {
        let geometry = geometry();
        assert_eq!(geometry.column_width(), 84.0);
        assert_eq!(geometry.span_width(12), 1184.0);
        assert_eq!(geometry.span_width(6), 584.0);
        assert_eq!(geometry.column_offset(6), 600.0);
    }

    #[test]
    fn inline_region_covers_unused_columns() {
        let cards = CardStore::from_cards(vec![Card::half("a", "A", 8)]).unwrap();
        let rows = build_rows(&cards, &BreakSet::new());
        let slots = build_drop_slots(&rows);
        let regions = slot_regions(&slots, &rows, &geometry());

        let inline = regions.iter().find(|r| r.slot.is_inline()).unwrap();
        assert_eq!(inline.rect.x, 800.0);
        assert_eq!(inline.rect.width, 384.0);
        assert!(inline.rect.contains(Point::new(900.0, 100.0)));

        let trailing = regions.last().unwrap();
        assert_eq!(trailing.rect.y, 240.0 + 8.0 - 12.0);
    }

    #[test]
    fn half_cards_expose_resize_handles() {
        let cards = CardStore::from_cards(vec![
            Card::full("banner", "Banner"),
            Card::half("a", "A", 6),
            Card::half("b", "B", 4),
        ])
        .unwrap();
        let rows = build_rows(&cards, &BreakSet::new());
        let regions = card_regions(&rows, &geometry());

        assert_eq!(regions.len(), 3);
        assert!(regions[0].resize_handle.is_none());
        let b = &regions[2];
        assert_eq!(b.row, 1);
        assert_eq!(b.rect.x, 600.0);
        let handle = b.resize_handle.unwrap();
        assert_eq!(handle.right(), b.rect.right());
        assert_eq!(handle.width, 8.0);
    }
}
