//! Adaptive card-grid layout engine.
//!
//! Cards live in a single ordered store on a 12-column grid. Full cards take a
//! whole row; half cards pair greedily two to a row unless a forced break sits
//! between them. Drag sessions insert or move cards through drop slots derived
//! from the row sequence, and resize sessions change a half card's span while
//! respecting its row partner.

pub mod audit;
pub mod config;
pub mod dashboard;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod palette;
pub mod render;

pub use audit::{
    LayoutAudit, LayoutAuditEvent, LayoutAuditEventBuilder, LayoutAuditStage, MemoryLayoutAudit,
    NullLayoutAudit,
};
pub use config::GridConfig;
pub use dashboard::{Dashboard, DashboardConfig, SessionKind};
pub use driver::{CliDriver, CliDriverError, DriverResult};
pub use error::{GridError, Result};
pub use geometry::{CardRegion, GridGeometry, Point, Rect, SlotRegion, card_regions, slot_regions};
pub use interaction::{
    DragController, DragSource, DragState, DropItem, GestureOutcome, NoopReason, ResizeController,
    ResizeSession, ResizeState, apply_drop, resize_span, resolve_target,
};
pub use layout::{DropSlot, Row, RowCell, SlotKind, build_drop_slots, build_rows};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, NullSink,
};
pub use metrics::{InteractionMetrics, MetricSnapshot};
pub use model::{
    BreakSet, Card, CardId, CardPayload, CardStore, CardWidth, GRID_COLUMNS, GridState, MAX_SPAN,
    MIN_SPAN, Span,
};
pub use palette::{Palette, Template, WidthClass};
pub use render::{RendererSettings, TextRenderer, display_width};
