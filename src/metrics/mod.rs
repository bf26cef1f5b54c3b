use crate::interaction::GestureOutcome;
use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters for pointer sessions handled by a dashboard.
#[derive(Debug, Default, Clone)]
pub struct InteractionMetrics {
    drags_started: u64,
    inserts: u64,
    moves: u64,
    drops_ignored: u64,
    resize_sessions: u64,
    resize_updates: u64,
    resize_commits: u64,
    gestures_rejected: u64,
}

impl InteractionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_drag_started(&mut self) {
        self.drags_started = self.drags_started.saturating_add(1);
    }

    pub fn record_resize_started(&mut self) {
        self.resize_sessions = self.resize_sessions.saturating_add(1);
    }

    /// Fold the outcome of a pointer release into the counters.
    pub fn record_release(&mut self, outcome: &GestureOutcome, was_drag: bool) {
        match outcome {
            GestureOutcome::Inserted { .. } => self.inserts = self.inserts.saturating_add(1),
            GestureOutcome::Relocated { .. } => self.moves = self.moves.saturating_add(1),
            GestureOutcome::ResizeCommitted { .. } => {
                self.resize_commits = self.resize_commits.saturating_add(1)
            }
            GestureOutcome::Noop { .. } if was_drag => {
                self.drops_ignored = self.drops_ignored.saturating_add(1)
            }
            _ => {}
        }
    }

    pub fn record_resize_update(&mut self) {
        self.resize_updates = self.resize_updates.saturating_add(1);
    }

    pub fn record_rejected(&mut self) {
        self.gestures_rejected = self.gestures_rejected.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            drags_started: self.drags_started,
            inserts: self.inserts,
            moves: self.moves,
            drops_ignored: self.drops_ignored,
            resize_sessions: self.resize_sessions,
            resize_updates: self.resize_updates,
            resize_commits: self.resize_commits,
            gestures_rejected: self.gestures_rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub drags_started: u64,
    pub inserts: u64,
    pub moves: u64,
    pub drops_ignored: u64,
    pub resize_sessions: u64,
    pub resize_updates: u64,
    pub resize_commits: u64,
    pub gestures_rejected: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "interaction_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("drags_started".to_string(), json!(self.drags_started));
        map.insert("inserts".to_string(), json!(self.inserts));
        map.insert("moves".to_string(), json!(self.moves));
        map.insert("drops_ignored".to_string(), json!(self.drops_ignored));
        map.insert("resize_sessions".to_string(), json!(self.resize_sessions));
        map.insert("resize_updates".to_string(), json!(self.resize_updates));
        map.insert("resize_commits".to_string(), json!(self.resize_commits));
        map.insert("gestures_rejected".to_string(), json!(self.gestures_rejected));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::NoopReason;

    #[test]
    fn release_outcomes_are_bucketed() {
        let mut metrics = InteractionMetrics::new();
        metrics.record_drag_started();
        metrics.record_release(
            &GestureOutcome::Inserted {
                card: "a".into(),
                index: 0,
            },
            true,
        );
        metrics.record_release(&GestureOutcome::noop(NoopReason::NoDropTarget), true);
        metrics.record_release(&GestureOutcome::noop(NoopReason::CardMissing), false);

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.uptime_ms, 1500);
        assert_eq!(snapshot.drags_started, 1);
        assert_eq!(snapshot.inserts, 1);
        assert_eq!(snapshot.drops_ignored, 1);
        assert_eq!(snapshot.resize_commits, 0);

        let event = snapshot.to_log_event("card_grid::metrics");
        assert_eq!(event.message, "interaction_metrics");
        assert_eq!(event.field("inserts"), Some(&json!(1)));
    }
}
