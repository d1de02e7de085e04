//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to the
//! logger (UART / USB-CDC in production). A future diagnostics-topic adapter
//! would implement the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::AlertChanged { from, to } => {
                info!("ALERT | {:?} -> {:?}", from, to);
            }
            AppEvent::PackageChanged { exists } => {
                info!("PKG   | exists={}", exists);
            }
            AppEvent::AckBroadcast { timestamp_ms } => {
                info!("ACK   | broadcast at {}ms", timestamp_ms);
            }
            AppEvent::CooldownExpired => {
                info!("COOL  | cooldown expired");
            }
        }
    }
}
