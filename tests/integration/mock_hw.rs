//! Mock adapters for integration tests.
//!
//! Record every port call so tests can assert on the full history without
//! touching real pins or a broker.

use std::collections::VecDeque;

use parcelbutton::app::events::AppEvent;
use parcelbutton::app::ports::{
    ButtonPort, EventSink, InboundMessage, IndicatorPort, TransportPort,
};
use parcelbutton::error::CommsError;
use parcelbutton::messages;

// ── MockPanel ─────────────────────────────────────────────────

/// Scriptable button level plus the complete LED command history.
pub struct MockPanel {
    pub pressed: bool,
    pub led_history: Vec<bool>,
}

#[allow(dead_code)]
impl MockPanel {
    pub fn new() -> Self {
        Self {
            pressed: false,
            led_history: Vec::new(),
        }
    }

    /// The most recent LED command, if any was issued.
    pub fn led(&self) -> Option<bool> {
        self.led_history.last().copied()
    }

    /// Number of LED commands issued (one per indicator transition).
    pub fn led_writes(&self) -> usize {
        self.led_history.len()
    }
}

impl ButtonPort for MockPanel {
    fn is_pressed(&mut self) -> bool {
        self.pressed
    }
}

impl IndicatorPort for MockPanel {
    fn set_indicator(&mut self, on: bool) {
        self.led_history.push(on);
    }
}

// ── MockTransport ─────────────────────────────────────────────

/// In-memory transport with scriptable connectivity and inbound frames.
pub struct MockTransport {
    pub connected: bool,
    pub inbound: VecDeque<InboundMessage>,
    pub published: Vec<(String, Vec<u8>)>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Self {
        Self {
            connected: true,
            inbound: VecDeque::new(),
            published: Vec::new(),
        }
    }

    pub fn push_raw(&mut self, topic: &str, payload: &[u8]) {
        self.inbound.push_back(InboundMessage {
            topic: topic.to_string(),
            payload: payload.to_vec(),
        });
    }

    /// Queue a well-formed existence notification from a peer.
    pub fn push_existence(&mut self, exists: bool) {
        let payload = messages::encode_existence(exists).unwrap();
        self.push_raw(messages::TOPIC_PACKAGE_EXISTS, &payload);
    }

    /// Queue a well-formed acknowledgment from a peer.
    pub fn push_acknowledged(&mut self, timestamp_ms: u64) {
        let payload = messages::encode_acknowledged(timestamp_ms).unwrap();
        self.push_raw(messages::TOPIC_USER_HANDLED, &payload);
    }

    /// Payloads published on `user_handled` so far.
    pub fn acks_published(&self) -> usize {
        self.published
            .iter()
            .filter(|(topic, _)| topic == messages::TOPIC_USER_HANDLED)
            .count()
    }
}

impl TransportPort for MockTransport {
    fn poll(&mut self) {}

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        if !self.connected {
            return Err(CommsError::NotConnected);
        }
        self.published.push((topic.to_string(), payload.to_vec()));
        Ok(())
    }

    fn next_inbound(&mut self) -> Option<InboundMessage> {
        self.inbound.pop_front()
    }
}

// ── EventRecorder ─────────────────────────────────────────────

/// Sink that keeps every emitted event for later assertions.
pub struct EventRecorder {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl EventRecorder {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }

    pub fn count(&self, event: &AppEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl EventSink for EventRecorder {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
