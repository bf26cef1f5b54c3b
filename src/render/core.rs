use std::io::Write;

use unicode_width::UnicodeWidthChar;

use super::width::fit_to_width;
use crate::dashboard::{Dashboard, SessionKind};
use crate::error::Result;
use crate::geometry::{CardRegion, Rect, SlotRegion};
use crate::interaction::DragSource;
use crate::layout::SlotKind;
use crate::model::{Card, CardPayload, GRID_COLUMNS};

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// Paint drop slots while a drag is running.
    pub show_slots: bool,
    /// Terminal row (0-based) of the first painted line.
    pub origin_row: u16,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            show_slots: true,
            origin_row: 0,
        }
    }
}

/// Paints a dashboard onto a character grid, one geometry pixel per cell.
///
/// Meant for dashboards built with [`GridConfig::terminal`]. Lines carry no
/// escape sequences; [`TextRenderer::render`] adds cursor positioning.
///
/// [`GridConfig::terminal`]: crate::config::GridConfig::terminal
pub struct TextRenderer {
    settings: RendererSettings,
}

impl TextRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    /// Lines of the current frame, each exactly the grid width in cells.
    ///
    /// One margin line sits above the first row so the leading drop slot has
    /// somewhere to go.
    pub fn frame(&self, dashboard: &Dashboard) -> Vec<String> {
        let geometry = dashboard.geometry();
        let width = geometry.width_px.max(0.0).floor() as usize;
        let top = geometry.gap_px.max(0.0).ceil();
        let mut canvas = Canvas::new(width, top);

        for region in dashboard.card_regions() {
            if let Some(card) = dashboard.state().cards.get(region.index) {
                paint_card(&mut canvas, &region, card);
            }
        }
        if self.settings.show_slots {
            for region in dashboard.slot_regions() {
                paint_slot(&mut canvas, &region);
            }
        }
        canvas.into_lines()
    }

    pub fn render(&mut self, writer: &mut impl Write, dashboard: &Dashboard) -> Result<()> {
        let origin = usize::from(self.settings.origin_row);
        for (offset, line) in self.frame(dashboard).iter().enumerate() {
            write!(writer, "\x1b[{};1H{}\x1b[K", origin + offset + 1, line)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// One-line description of what the pointer is doing.
pub fn status_line(dashboard: &Dashboard) -> String {
    match dashboard.active_session() {
        Some(SessionKind::Drag) => match dashboard.drag().source() {
            Some(DragSource::Card(id)) => format!("moving {id}: release on a slot to drop"),
            Some(DragSource::Template(template)) => {
                format!("adding {template}: release on a slot to drop")
            }
            None => String::new(),
        },
        Some(SessionKind::Resize) => match dashboard.resize().session() {
            Some(session) => format!(
                "resizing {}: span {}/{}",
                session.card,
                session.current_span.get(),
                GRID_COLUMNS
            ),
            None => String::new(),
        },
        None => format!(
            "{} cards · drag to move · drag a right edge to resize · 1-{} adds a card · q quits",
            dashboard.state().cards.len(),
            dashboard.palette().len().clamp(1, 9)
        ),
    }
}

fn paint_card(canvas: &mut Canvas, region: &CardRegion, card: &Card) {
    let Some(area) = canvas.area(&region.rect) else {
        return;
    };
    if area.width < 2 || area.height < 2 {
        canvas.put(area.x, area.y, '▪');
        return;
    }

    let right = area.x + area.width - 1;
    let bottom = area.y + area.height - 1;
    let edge = if card.is_half() { '┃' } else { '│' };

    canvas.put(area.x, area.y, '┌');
    canvas.put(right, area.y, '┐');
    canvas.put(area.x, bottom, '└');
    canvas.put(right, bottom, '┘');
    for x in area.x + 1..right {
        canvas.put(x, area.y, '─');
        canvas.put(x, bottom, '─');
    }
    for y in area.y + 1..bottom {
        canvas.put(area.x, y, '│');
        canvas.put(right, y, edge);
    }

    let inner = area.width - 2;
    if inner > 4 {
        // Title sits in the top border, one cell clear of each corner.
        let title = fit_to_width(&card.title, inner - 4);
        canvas.put_str(area.x + 2, area.y, &format!(" {title} "), inner - 2);
    }
    if area.height > 2 {
        canvas.put_str(area.x + 1, area.y + 1, &fit_to_width(&summary(card), inner), inner);
    }
    if area.height > 3 {
        let meta = match card.span() {
            Some(span) => format!("{} · {}/{}", card.kind(), span.get(), GRID_COLUMNS),
            None => format!("{} · full", card.kind()),
        };
        canvas.put_str(area.x + 1, area.y + 2, &fit_to_width(&meta, inner), inner);
    }
}

fn paint_slot(canvas: &mut Canvas, region: &SlotRegion) {
    match region.slot.kind {
        SlotKind::Boundary => {
            let center = region.rect.y + region.rect.height / 2.0;
            let Some(y) = canvas.line(center) else {
                return;
            };
            for x in 0..canvas.width {
                canvas.put(x, y, '╌');
            }
            let label = format!(" ▸ {} ", region.slot.insertion_index);
            canvas.put_str(2, y, &label, canvas.width.saturating_sub(2));
        }
        SlotKind::Inline => {
            let Some(area) = canvas.area(&region.rect) else {
                return;
            };
            if area.width < 2 || area.height < 2 {
                return;
            }
            let right = area.x + area.width - 1;
            let bottom = area.y + area.height - 1;
            for x in area.x..=right {
                canvas.put(x, area.y, '┄');
                canvas.put(x, bottom, '┄');
            }
            for y in area.y + 1..bottom {
                canvas.put(area.x, y, '┆');
                canvas.put(right, y, '┆');
            }
            let label = format!("+{} cols", region.slot.available_span);
            let inner = area.width - 2;
            canvas.put_str(area.x + 1, area.y + 1, &fit_to_width(&label, inner), inner);
        }
    }
}

fn summary(card: &Card) -> String {
    match &card.payload {
        CardPayload::Stat(stat) => match stat.delta {
            Some(delta) => format!("{}: {} ({delta:+})", stat.label, stat.value),
            None => format!("{}: {}", stat.label, stat.value),
        },
        CardPayload::Text(text) => text.body.lines().next().unwrap_or_default().to_string(),
        CardPayload::Chart(chart) => sparkline(&chart.values),
        CardPayload::Contacts(contacts) => format!("{} contacts", contacts.contacts.len()),
        CardPayload::Opaque { kind, .. } => format!("[{kind}]"),
    }
}

fn sparkline(values: &[f64]) -> String {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    values
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| {
            if max <= min {
                return SPARK[SPARK.len() / 2];
            }
            let level = ((v - min) / (max - min) * (SPARK.len() - 1) as f64).round() as usize;
            SPARK[level.min(SPARK.len() - 1)]
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Area {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

/// Character grid that grows downwards as lines are touched.
///
/// `None` marks the trailing half of a double-width glyph.
struct Canvas {
    width: usize,
    top: f64,
    lines: Vec<Vec<Option<char>>>,
}

impl Canvas {
    fn new(width: usize, top: f64) -> Self {
        Self {
            width,
            top,
            lines: Vec::new(),
        }
    }

    fn line(&self, y: f64) -> Option<usize> {
        let line = (y + self.top).floor();
        (line >= 0.0).then_some(line as usize)
    }

    fn area(&self, rect: &Rect) -> Option<Area> {
        let y = (rect.y + self.top).round();
        if y < 0.0 {
            return None;
        }
        let x = rect.x.max(0.0).round() as usize;
        let width = (rect.width.round().max(0.0) as usize).min(self.width.saturating_sub(x));
        let height = rect.height.round().max(0.0) as usize;
        (width > 0 && height > 0).then_some(Area {
            x,
            y: y as usize,
            width,
            height,
        })
    }

    fn row_mut(&mut self, y: usize) -> &mut Vec<Option<char>> {
        while self.lines.len() <= y {
            self.lines.push(vec![Some(' '); self.width]);
        }
        &mut self.lines[y]
    }

    fn put(&mut self, x: usize, y: usize, ch: char) {
        if x >= self.width {
            return;
        }
        let row = self.row_mut(y);
        // Never leave half of a wide glyph behind.
        if row[x].is_none() && x > 0 {
            row[x - 1] = Some(' ');
        }
        if row.get(x + 1).is_some_and(Option::is_none) {
            row[x + 1] = Some(' ');
        }
        row[x] = Some(ch);
    }

    /// Write `text` from column `x`, using at most `limit` cells.
    fn put_str(&mut self, x: usize, y: usize, text: &str, limit: usize) {
        let end = x.saturating_add(limit).min(self.width);
        let mut col = x;
        for ch in text.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if w == 0 {
                continue;
            }
            if col + w > end {
                break;
            }
            self.put(col, y, ch);
            if w == 2 {
                self.put(col + 1, y, ' ');
                self.row_mut(y)[col + 1] = None;
            }
            col += w;
        }
    }

    fn into_lines(self) -> Vec<String> {
        self.lines
            .into_iter()
            .map(|row| row.into_iter().flatten().collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::dashboard::DashboardConfig;
    use crate::geometry::Point;
    use crate::model::{BreakSet, CardStore, GridState, StatData};
    use crate::palette::Palette;
    use crate::render::display_width;

    // 107 cells: twelve 8-cell columns with 1-cell gaps.
    fn dashboard(cards: Vec<Card>) -> Dashboard {
        let config = DashboardConfig {
            grid: GridConfig::terminal(),
            grid_width_px: 107.0,
            ..DashboardConfig::default()
        };
        let state = GridState::new(CardStore::from_cards(cards).unwrap(), BreakSet::new());
        Dashboard::with_config(state, Palette::builtin(), config).unwrap()
    }

    fn sample() -> Vec<Card> {
        vec![
            Card::half("a", "Revenue", 6).with_payload(CardPayload::Stat(StatData {
                label: "MRR".into(),
                value: "$12k".into(),
                delta: Some(2.5),
            })),
            Card::half("b", "Notes", 6),
            Card::full("c", "Activity"),
        ]
    }

    fn at(line: &str, col: usize) -> Option<char> {
        line.chars().nth(col)
    }

    #[test]
    fn paints_pair_and_full_rows() {
        let frame = TextRenderer::with_default().frame(&dashboard(sample()));
        assert_eq!(frame.len(), 10);
        assert!(frame[0].trim().is_empty());

        assert_eq!(at(&frame[1], 0), Some('┌'));
        assert_eq!(at(&frame[1], 52), Some('┐'));
        assert_eq!(at(&frame[1], 54), Some('┌'));
        assert!(frame[1].contains(" Revenue "));
        assert!(frame[2].contains("MRR: $12k (+2.5)"));
        assert!(frame[3].contains("stat · 6/12"));
        // Half cards show a heavy right edge as their resize handle.
        assert_eq!(at(&frame[2], 52), Some('┃'));

        assert_eq!(at(&frame[6], 0), Some('┌'));
        assert_eq!(at(&frame[6], 106), Some('┐'));
        assert_eq!(at(&frame[7], 106), Some('│'));
        assert!(frame[8].contains("blank · full"));

        for line in &frame {
            assert_eq!(display_width(line), 107);
        }
    }

    #[test]
    fn slots_are_painted_only_while_dragging() {
        let mut dashboard = dashboard(vec![Card::half("a", "A", 6)]);
        let idle = TextRenderer::with_default().frame(&dashboard);
        assert!(!idle.iter().any(|line| line.contains('╌')));

        dashboard.begin_template_drag("stat", Point::default());
        let frame = TextRenderer::with_default().frame(&dashboard);
        assert!(frame[0].contains("▸ 0"));
        assert!(frame[2].contains("+6 cols"));
        assert!(frame[5].contains("▸ 1"));
    }

    #[test]
    fn wide_titles_keep_lines_aligned() {
        let frame = TextRenderer::with_default().frame(&dashboard(vec![
            Card::half("a", "日本語のダッシュボードカード", 2),
            Card::half("b", "b", 2),
        ]));
        for line in &frame {
            assert_eq!(display_width(line), 107);
        }
        assert!(frame[1].contains('…'));
    }

    #[test]
    fn render_positions_each_line() {
        let dashboard = dashboard(vec![Card::full("c", "Activity")]);
        let mut renderer = TextRenderer::with_default();
        renderer.settings_mut().origin_row = 2;
        let mut output = Vec::new();
        renderer.render(&mut output, &dashboard).unwrap();
        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("\u{1b}[3;1H"));
        assert!(rendered.contains("\u{1b}[4;1H┌"));
    }

    #[test]
    fn status_line_follows_session() {
        let mut dashboard = dashboard(sample());
        assert!(status_line(&dashboard).starts_with("3 cards"));
        dashboard.begin_resize(&"a".into(), 52.0);
        assert_eq!(status_line(&dashboard), "resizing a: span 6/12");
    }

    #[test]
    fn sparkline_scales_to_range() {
        assert_eq!(sparkline(&[0.0, 7.0]), "▁█");
        assert_eq!(sparkline(&[3.0, 3.0]), "▅▅");
        assert_eq!(sparkline(&[]), "");
    }
}
