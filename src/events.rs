// 📜 Bundle Events - What happened to the bundle, and when

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Events kept before the oldest ones are dropped
pub const EVENT_HISTORY_LIMIT: usize = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    ProductAdded { id: String },
    ProductRemoved { id: String },
    QuantityChanged { id: String, quantity: u32 },
    BundleConfirmed { confirmation_id: Uuid, total: f64 },
    /// Confirm requested while below the discount threshold
    BundleRejected { selected: usize, required: usize },
    BundleReset,
    ElementMissing { element: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleEvent {
    pub at: DateTime<Utc>,
    pub kind: EventKind,
}

impl BundleEvent {
    pub fn now(kind: EventKind) -> Self {
        BundleEvent {
            at: Utc::now(),
            kind,
        }
    }

    pub fn is_confirmation(&self) -> bool {
        matches!(self.kind, EventKind::BundleConfirmed { .. })
    }
}

/// Bounded history kept by the controller; the oldest events fall off
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<BundleEvent>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(EVENT_HISTORY_LIMIT)
    }
}

impl EventLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        EventLog {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, kind: EventKind) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(BundleEvent::now(kind));
    }

    /// Oldest first
    pub fn events(&self) -> &VecDeque<BundleEvent> {
        &self.events
    }

    pub fn last(&self) -> Option<&BundleEvent> {
        self.events.back()
    }
}
