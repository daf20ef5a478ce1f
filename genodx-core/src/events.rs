//! Clinic event log
//!
//! Registry and diagnosis operations report what they did through an
//! [`EventSink`] handed to them by the caller. [`EventLog`] is the in-memory
//! sink a [`Clinic`](crate::registry::Clinic) owns.

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::fmt;

/// A single logged clinic event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub logged_at: DateTime<Local>,
    pub description: String,
}

impl Event {
    /// Create an event stamped with the current local time
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            logged_at: Local::now(),
            description: description.into(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.logged_at.format("%a %b %d %H:%M:%S %Y"), self.description)
    }
}

/// Receiver of clinic events
pub trait EventSink: Send + Sync {
    fn record(&self, event: Event);
}

/// Thread-safe, append-only list of events
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<Event>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events in logging order
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .map(|event| event.description.clone())
            .collect()
    }

    /// Drop every event, then record that the log was cleared
    pub fn clear(&self) {
        let mut events = self.events.lock();
        events.clear();
        events.push(Event::new("Event log cleared."));
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for EventLog {
    fn record(&self, event: Event) {
        log::debug!("Event: {}", event.description);
        self.events.lock().push(event);
    }
}
