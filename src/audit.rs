//! Layout audit hooks.
//!
//! Each pointer session emits a small number of audit records so callers can
//! trace how a gesture was resolved without wiring into the log stream.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

/// Checkpoints emitted by the dashboard while a gesture runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutAuditStage {
    /// A drag or resize session began.
    SessionStarted,
    /// A drop changed the card order.
    DropApplied,
    /// A drop was released without a usable target.
    DropIgnored,
    /// A live resize changed a span.
    ResizeUpdated,
    /// A resize session ended and its span was kept.
    ResizeCommitted,
    /// A gesture could not start or was refused.
    GestureRejected,
}

#[derive(Debug, Clone)]
pub struct LayoutAuditEvent {
    pub timestamp: SystemTime,
    pub stage: LayoutAuditStage,
    pub details: Vec<(String, Value)>,
}

impl LayoutAuditEvent {
    fn new(stage: LayoutAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

pub struct LayoutAuditEventBuilder {
    event: LayoutAuditEvent,
}

impl LayoutAuditEventBuilder {
    pub fn new(stage: LayoutAuditStage) -> Self {
        Self {
            event: LayoutAuditEvent::new(stage),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event.details.push((key.into(), value.into()));
        self
    }

    pub fn finish(self) -> LayoutAuditEvent {
        self.event
    }
}

pub trait LayoutAudit: Send + Sync {
    fn record(&self, event: LayoutAuditEvent);
}

#[derive(Debug, Default)]
pub struct NullLayoutAudit;

impl LayoutAudit for NullLayoutAudit {
    fn record(&self, _event: LayoutAuditEvent) {}
}

/// Buffers every record; mostly useful in tests and demos.
#[derive(Debug, Default)]
pub struct MemoryLayoutAudit {
    events: Mutex<Vec<LayoutAuditEvent>>,
}

impl MemoryLayoutAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LayoutAuditEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<LayoutAuditStage> {
        self.events().into_iter().map(|event| event.stage).collect()
    }
}

impl LayoutAudit for MemoryLayoutAudit {
    fn record(&self, event: LayoutAuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_audit_keeps_order_and_details() {
        let audit = MemoryLayoutAudit::new();
        audit.record(
            LayoutAuditEventBuilder::new(LayoutAuditStage::SessionStarted)
                .detail("kind", "drag")
                .finish(),
        );
        audit.record(
            LayoutAuditEventBuilder::new(LayoutAuditStage::DropApplied)
                .detail("index", 2)
                .finish(),
        );

        assert_eq!(
            audit.stages(),
            vec![LayoutAuditStage::SessionStarted, LayoutAuditStage::DropApplied]
        );
        assert_eq!(audit.events()[1].detail("index"), Some(&json!(2)));
        assert!(audit.events()[1].detail("missing").is_none());
    }
}
