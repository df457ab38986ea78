//! Event logging system for displaying recent game events.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A logged event for display in the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Frame in which the event occurred
    pub frame: u64,
    /// Human-readable description of the event
    pub description: String,
    /// Category of the event
    pub kind: EventKind,
}

/// Event categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A bird flew into the ground
    GroundHit,
    /// A bird hit a pipe
    GateHit,
    /// A bird flew through a gate
    GatePassed,
    /// A new gate entered the screen
    GateSpawned,
}

/// Event log that tracks recent game events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLog {
    /// Recent events, newest first
    events: VecDeque<LoggedEvent>,
    /// Maximum number of events to keep
    max_events: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(20)
    }
}

impl EventLog {
    /// Creates a new event log with specified capacity
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Adds a new event to the log
    pub fn log(&mut self, frame: u64, description: String, kind: EventKind) {
        tracing::debug!(frame, ?kind, "{description}");
        self.events.push_front(LoggedEvent {
            frame,
            description,
            kind,
        });

        // Keep only the most recent events
        while self.events.len() > self.max_events {
            self.events.pop_back();
        }
    }

    /// Returns all events, newest first
    pub fn events(&self) -> &VecDeque<LoggedEvent> {
        &self.events
    }

    /// Clears all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
