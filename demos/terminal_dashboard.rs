//! Interactive card grid in the terminal.
//!
//! Drag cards with the left mouse button, drag a half card's right edge to
//! resize it, press 1-9 to pick up a palette template and click to drop it.
//! Set `CARD_GRID_LOG` to a file path to capture JSON-lines logs.

use std::sync::Arc;

use card_grid::{
    BreakSet, Card, CardPayload, CardStore, CliDriver, Dashboard, DashboardConfig, DriverResult,
    FileSink, GridConfig, GridState, LogLevel, Logger, MemoryLayoutAudit, Palette,
};
use card_grid::model::{ChartData, StatData, TextData};

fn main() -> DriverResult<()> {
    let audit = Arc::new(MemoryLayoutAudit::new());
    let mut config = DashboardConfig {
        grid: GridConfig::terminal(),
        audit: audit.clone(),
        ..DashboardConfig::default()
    };
    if let Ok(path) = std::env::var("CARD_GRID_LOG") {
        let sink = FileSink::new(path, 1 << 20).map_err(card_grid::GridError::from)?;
        config.logger = Some(Logger::new(sink).with_min_level(LogLevel::Info));
    }
    config.enable_metrics();

    let dashboard = Dashboard::with_config(seed_state()?, Palette::builtin(), config)?;
    let dashboard = CliDriver::new(dashboard).run()?;
    dashboard.emit_metrics();

    if let Some(snapshot) = dashboard.metrics_snapshot() {
        println!(
            "{} cards, {} inserts, {} moves, {} resizes, {} audit records",
            dashboard.state().cards.len(),
            snapshot.inserts,
            snapshot.moves,
            snapshot.resize_commits,
            audit.events().len()
        );
    }
    Ok(())
}

fn seed_state() -> card_grid::Result<GridState> {
    let cards = vec![
        Card::half("revenue", "Revenue", 6).with_payload(CardPayload::Stat(StatData {
            label: "MRR".into(),
            value: "$48.2k".into(),
            delta: Some(3.1),
        })),
        Card::half("signups", "Signups", 6).with_payload(CardPayload::Chart(ChartData {
            labels: Vec::new(),
            values: vec![3.0, 5.0, 4.0, 8.0, 6.0, 9.0, 12.0],
        })),
        Card::full("activity", "Activity"),
        Card::half("notes", "Notes", 8).with_payload(CardPayload::Text(TextData {
            body: "Quarterly review on Friday".into(),
        })),
    ];
    Ok(GridState::new(CardStore::from_cards(cards)?, BreakSet::new()))
}
