//! Session host tying the grid state to the drag and resize controllers.
//!
//! A [`Dashboard`] owns the stored layout and admits at most one pointer
//! session at a time. Every gesture is reported to the configured logger,
//! metrics and audit sink; none of them can fail a gesture.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde_json::Value;

use crate::audit::{LayoutAudit, LayoutAuditEventBuilder, LayoutAuditStage, NullLayoutAudit};
use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::geometry::{CardRegion, GridGeometry, Point, SlotRegion, card_regions, slot_regions};
use crate::interaction::{
    DragController, DragSource, GestureOutcome, NoopReason, ResizeController,
};
use crate::layout::{DropSlot, Row, build_drop_slots};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv, json_str};
use crate::metrics::{InteractionMetrics, MetricSnapshot};
use crate::model::{Card, CardId, GridState};
use crate::palette::Palette;

const DASHBOARD_TARGET: &str = "card_grid::dashboard";
const DRAG_TARGET: &str = "card_grid::drag";
const RESIZE_TARGET: &str = "card_grid::resize";

/// Knobs and hooks for a [`Dashboard`].
#[derive(Clone)]
pub struct DashboardConfig {
    pub grid: GridConfig,
    /// Rendered width of the grid container in pixels.
    pub grid_width_px: f64,
    pub logger: Option<Logger>,
    pub metrics: Option<Arc<Mutex<InteractionMetrics>>>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    pub audit: Arc<dyn LayoutAudit>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            grid_width_px: 1200.0,
            logger: None,
            metrics: None,
            metrics_target: "card_grid::metrics".to_string(),
            audit: Arc::new(NullLayoutAudit),
        }
    }
}

impl DashboardConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(InteractionMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<InteractionMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Which controller currently owns the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Drag,
    Resize,
}

impl SessionKind {
    fn label(self) -> &'static str {
        match self {
            SessionKind::Drag => "drag",
            SessionKind::Resize => "resize",
        }
    }
}

pub struct Dashboard {
    state: GridState,
    palette: Palette,
    config: DashboardConfig,
    drag: DragController,
    resize: ResizeController,
    /// Fingerprint of the layout handed out by the last `take_dirty`.
    rendered: blake3::Hash,
    started_at: Instant,
}

impl Dashboard {
    pub fn new(state: GridState, palette: Palette) -> Self {
        let config = DashboardConfig::default();
        Self::assemble(state, palette, config)
    }

    pub fn with_config(state: GridState, palette: Palette, config: DashboardConfig) -> Result<Self> {
        config.grid.validate()?;
        if !config.grid_width_px.is_finite() || config.grid_width_px < 0.0 {
            return Err(GridError::InvalidConfig(format!(
                "grid_width_px must be a finite, non-negative number (got {})",
                config.grid_width_px
            )));
        }
        Ok(Self::assemble(state, palette, config))
    }

    fn assemble(state: GridState, palette: Palette, config: DashboardConfig) -> Self {
        let dashboard = Self {
            drag: DragController::new(config.grid.default_span()),
            resize: ResizeController::new(),
            rendered: blake3::Hash::from([0u8; 32]),
            started_at: Instant::now(),
            state,
            palette,
            config,
        };
        dashboard.log(
            LogLevel::Info,
            DASHBOARD_TARGET,
            "dashboard_ready",
            [
                json_kv("cards", dashboard.state.cards.len()),
                json_kv("breaks", dashboard.state.breaks.len()),
                json_kv("templates", dashboard.palette.len()),
            ],
        );
        dashboard
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn active_session(&self) -> Option<SessionKind> {
        if self.drag.is_active() {
            Some(SessionKind::Drag)
        } else if self.resize.is_active() {
            Some(SessionKind::Resize)
        } else {
            None
        }
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn resize(&self) -> &ResizeController {
        &self.resize
    }

    // Layout views

    pub fn rows(&self) -> Vec<Row> {
        self.state.rows()
    }

    /// Drop slots for the current layout; empty unless a drag is running.
    pub fn drop_slots(&self) -> Vec<DropSlot> {
        if !self.drag.is_active() {
            return Vec::new();
        }
        build_drop_slots(&self.rows())
    }

    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(self.config.grid_width_px, &self.config.grid)
    }

    pub fn set_grid_width(&mut self, width_px: f64) {
        if width_px.is_finite() && width_px >= 0.0 {
            self.config.grid_width_px = width_px;
        }
    }

    /// Hit regions of the current drop slots; empty unless a drag is running.
    pub fn slot_regions(&self) -> Vec<SlotRegion> {
        if !self.drag.is_active() {
            return Vec::new();
        }
        self.current_slot_regions()
    }

    fn current_slot_regions(&self) -> Vec<SlotRegion> {
        let rows = self.rows();
        slot_regions(&build_drop_slots(&rows), &rows, &self.geometry())
    }

    pub fn card_regions(&self) -> Vec<CardRegion> {
        card_regions(&self.rows(), &self.geometry())
    }

    // Gestures

    pub fn begin_card_drag(&mut self, id: &CardId, at: Point) -> GestureOutcome {
        if let Some(active) = self.active_session() {
            return self.reject(DRAG_TARGET, NoopReason::SessionActive, Some(active));
        }
        let Some(card) = self.state.cards.find(id) else {
            return self.reject(DRAG_TARGET, NoopReason::CardMissing, None);
        };
        let full_width = !card.is_half();
        let outcome = self.drag.begin(DragSource::Card(id.clone()), full_width, at);
        self.session_started(SessionKind::Drag, id.as_str(), &outcome);
        outcome
    }

    pub fn begin_template_drag(&mut self, template_id: &str, at: Point) -> GestureOutcome {
        if let Some(active) = self.active_session() {
            return self.reject(DRAG_TARGET, NoopReason::SessionActive, Some(active));
        }
        let Some(template) = self.palette.get(template_id) else {
            return self.reject(DRAG_TARGET, NoopReason::UnknownTemplate, None);
        };
        let full_width = template.is_full_width();
        let outcome = self.drag.begin(
            DragSource::Template(template_id.to_string()),
            full_width,
            at,
        );
        self.session_started(SessionKind::Drag, template_id, &outcome);
        outcome
    }

    /// Start a resize of `id` with the pointer at horizontal position `pointer_x`.
    pub fn begin_resize(&mut self, id: &CardId, pointer_x: f64) -> GestureOutcome {
        if let Some(active) = self.active_session() {
            return self.reject(RESIZE_TARGET, NoopReason::SessionActive, Some(active));
        }
        let outcome = self.resize.begin(&self.state, id, pointer_x);
        if let Some(reason) = outcome.noop_reason() {
            return self.reject(RESIZE_TARGET, reason, None);
        }
        self.session_started(SessionKind::Resize, id.as_str(), &outcome);
        outcome
    }

    /// Feed a pointer move into whichever session is running.
    ///
    /// Drags only track the pointer; resizes write the live span immediately.
    pub fn pointer_move(&mut self, at: Point) -> GestureOutcome {
        if self.drag.is_active() {
            return self.drag.track(at);
        }
        if !self.resize.is_active() {
            return GestureOutcome::noop(NoopReason::NoActiveSession);
        }

        let geometry = self.geometry();
        let outcome = self.resize.update(&mut self.state, at.x, &geometry);
        match &outcome {
            GestureOutcome::SpanChanged { card, span } => {
                self.with_metrics(InteractionMetrics::record_resize_update);
                self.audit(
                    LayoutAuditEventBuilder::new(LayoutAuditStage::ResizeUpdated)
                        .detail("card", card.as_str())
                        .detail("span", *span),
                );
                self.log(
                    LogLevel::Debug,
                    RESIZE_TARGET,
                    "resize_updated",
                    [json_str("card", card.as_str()), json_kv("span", *span)],
                );
            }
            GestureOutcome::Noop { reason } => {
                self.log(
                    LogLevel::Debug,
                    RESIZE_TARGET,
                    "resize_update_skipped",
                    [json_str("reason", reason.label())],
                );
            }
            _ => {}
        }
        outcome
    }

    /// End the running session at `at`.
    pub fn pointer_up(&mut self, at: Point) -> GestureOutcome {
        if self.drag.is_active() {
            let regions = self.current_slot_regions();
            let outcome = self
                .drag
                .release(at, &regions, &mut self.state, &self.palette);
            self.drop_finished(&outcome);
            return outcome;
        }
        if self.resize.is_active() {
            let outcome = self.resize.release(&self.state);
            self.resize_finished(&outcome);
            return outcome;
        }
        GestureOutcome::noop(NoopReason::NoActiveSession)
    }

    /// Remove a card by id, keeping forced boundaries attached to their cards.
    pub fn remove_card(&mut self, id: &CardId) -> Result<Card> {
        let index = self
            .state
            .cards
            .position(id)
            .ok_or_else(|| GridError::CardNotFound(id.to_string()))?;
        let card = self
            .state
            .remove_card(index)
            .ok_or_else(|| GridError::CardNotFound(id.to_string()))?;
        self.log(
            LogLevel::Info,
            DASHBOARD_TARGET,
            "card_removed",
            [json_str("card", id.as_str()), json_kv("index", index)],
        );
        Ok(card)
    }

    // Change detection

    pub fn fingerprint(&self) -> blake3::Hash {
        self.state.fingerprint()
    }

    /// Whether the layout differs from the one last taken with [`take_dirty`].
    ///
    /// [`take_dirty`]: Dashboard::take_dirty
    pub fn layout_changed(&self) -> bool {
        self.fingerprint() != self.rendered
    }

    /// Report whether the layout changed and mark the current one as rendered.
    pub fn take_dirty(&mut self) -> bool {
        let current = self.fingerprint();
        let changed = current != self.rendered;
        self.rendered = current;
        changed
    }

    // Metrics

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        let guard = metrics.lock().ok()?;
        Some(guard.snapshot(self.started_at.elapsed()))
    }

    /// Write the current metrics snapshot to the logger, if both are enabled.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(snapshot)) = (self.config.logger.as_ref(), self.metrics_snapshot())
        {
            let _ = logger.log_event(snapshot.to_log_event(&self.config.metrics_target));
        }
    }

    fn session_started(&self, kind: SessionKind, subject: &str, outcome: &GestureOutcome) {
        if outcome.is_noop() {
            return;
        }
        match kind {
            SessionKind::Drag => self.with_metrics(InteractionMetrics::record_drag_started),
            SessionKind::Resize => self.with_metrics(InteractionMetrics::record_resize_started),
        }
        self.audit(
            LayoutAuditEventBuilder::new(LayoutAuditStage::SessionStarted)
                .detail("kind", kind.label())
                .detail("subject", subject),
        );
        let target = match kind {
            SessionKind::Drag => DRAG_TARGET,
            SessionKind::Resize => RESIZE_TARGET,
        };
        self.log(
            LogLevel::Info,
            target,
            "session_started",
            [json_str("subject", subject)],
        );
    }

    fn drop_finished(&self, outcome: &GestureOutcome) {
        self.with_metrics(|metrics| metrics.record_release(outcome, true));
        match outcome {
            GestureOutcome::Inserted { card, index } => {
                self.audit(
                    LayoutAuditEventBuilder::new(LayoutAuditStage::DropApplied)
                        .detail("card", card.as_str())
                        .detail("to", *index),
                );
                self.log(
                    LogLevel::Info,
                    DRAG_TARGET,
                    "card_inserted",
                    [json_str("card", card.as_str()), json_kv("index", *index)],
                );
            }
            GestureOutcome::Relocated { card, from, to } => {
                self.audit(
                    LayoutAuditEventBuilder::new(LayoutAuditStage::DropApplied)
                        .detail("card", card.as_str())
                        .detail("from", *from)
                        .detail("to", *to),
                );
                self.log(
                    LogLevel::Info,
                    DRAG_TARGET,
                    "card_moved",
                    [
                        json_str("card", card.as_str()),
                        json_kv("from", *from),
                        json_kv("to", *to),
                    ],
                );
            }
            GestureOutcome::Noop { reason } => {
                self.audit(
                    LayoutAuditEventBuilder::new(LayoutAuditStage::DropIgnored)
                        .detail("reason", reason.label()),
                );
                self.log(
                    LogLevel::Info,
                    DRAG_TARGET,
                    "drop_ignored",
                    [json_str("reason", reason.label())],
                );
            }
            _ => {}
        }
    }

    fn resize_finished(&self, outcome: &GestureOutcome) {
        self.with_metrics(|metrics| metrics.record_release(outcome, false));
        match outcome {
            GestureOutcome::ResizeCommitted { card, span } => {
                self.audit(
                    LayoutAuditEventBuilder::new(LayoutAuditStage::ResizeCommitted)
                        .detail("card", card.as_str())
                        .detail("span", *span),
                );
                self.log(
                    LogLevel::Info,
                    RESIZE_TARGET,
                    "resize_committed",
                    [json_str("card", card.as_str()), json_kv("span", *span)],
                );
            }
            GestureOutcome::Noop { reason } => {
                self.audit(
                    LayoutAuditEventBuilder::new(LayoutAuditStage::GestureRejected)
                        .detail("reason", reason.label()),
                );
                self.log(
                    LogLevel::Warn,
                    RESIZE_TARGET,
                    "resize_abandoned",
                    [json_str("reason", reason.label())],
                );
            }
            _ => {}
        }
    }

    fn reject(
        &self,
        target: &str,
        reason: NoopReason,
        active: Option<SessionKind>,
    ) -> GestureOutcome {
        self.with_metrics(InteractionMetrics::record_rejected);
        let mut builder = LayoutAuditEventBuilder::new(LayoutAuditStage::GestureRejected)
            .detail("reason", reason.label());
        let mut fields = vec![json_str("reason", reason.label())];
        if let Some(active) = active {
            builder = builder.detail("active", active.label());
            fields.push(json_str("active", active.label()));
        }
        self.audit(builder);
        self.log(LogLevel::Info, target, "gesture_rejected", fields);
        GestureOutcome::noop(reason)
    }

    fn audit(&self, builder: LayoutAuditEventBuilder) {
        self.config.audit.record(builder.finish());
    }

    fn with_metrics(&self, record: impl FnOnce(&mut InteractionMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }

    fn log<I>(&self, level: LogLevel, target: &str, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, target, message, fields);
            let _ = logger.log_event(event);
        }
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("cards", &self.state.cards.len())
            .field("breaks", &self.state.breaks.len())
            .field("session", &self.active_session())
            .field("fingerprint", &self.fingerprint().to_hex())
            .finish()
    }
}
