//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the coordinator, the button debouncer, and the
//! indicator driver. It exposes one hardware-agnostic `tick` that the main
//! loop calls cooperatively; all I/O flows through port traits injected at
//! the call site, making the entire service testable with mock adapters.
//!
//! ```text
//!   ButtonPort ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                  │         AppService           │
//! TransportPort ◀─▶│ Debouncer · Coordinator ·    │
//! IndicatorPort ◀──│ IndicatorDriver              │
//!                  └─────────────────────────────┘
//! ```
//!
//! Per tick, in order: (a) transport maintenance and inbound drain,
//! (b) debounced button sampling, (c) cooldown-deadline check, (d) indicator
//! update. The tick never blocks, and nothing but the tick mutates state —
//! inbound notifications are queued at the transport boundary and consumed
//! here, keeping a single-writer discipline over the whole state record.

use log::{info, warn};

use crate::config::SystemConfig;
use crate::coordinator::{AlertState, Coordinator};
use crate::drivers::button::Debouncer;
use crate::drivers::indicator::{IndicatorCommand, IndicatorDriver};
use crate::messages;

use super::events::AppEvent;
use super::ports::{ButtonPort, EventSink, IndicatorPort, TransportPort};

/// The application service orchestrates all domain logic.
pub struct AppService {
    coordinator: Coordinator,
    debouncer: Debouncer,
    indicator: IndicatorDriver,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            coordinator: Coordinator::new(config.cooldown_duration_ms),
            debouncer: Debouncer::new(config.debounce_window_ms),
            indicator: IndicatorDriver::new(config.flash_interval_ms),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(self.coordinator.alert_state()));
        info!("AppService started in {:?}", self.coordinator.alert_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle at monotonic time `now_ms`.
    ///
    /// The `hw` parameter satisfies **both** [`ButtonPort`] and
    /// [`IndicatorPort`] — this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl ButtonPort + IndicatorPort),
        transport: &mut impl TransportPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        let prev_state = self.coordinator.alert_state();

        // (a) Transport maintenance, then drain queued peer notifications.
        transport.poll();
        while let Some(msg) = transport.next_inbound() {
            match messages::decode(&msg.topic, &msg.payload) {
                Ok(Some(note)) => {
                    let existed = self.coordinator.package_exists();
                    self.coordinator.apply(note, now_ms);
                    let exists = self.coordinator.package_exists();
                    if exists != existed {
                        sink.emit(&AppEvent::PackageChanged { exists });
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    // The core's only error path: drop, log, carry on.
                    warn!("dropping inbound frame on '{}': {}", msg.topic, e);
                }
            }
        }

        // (b) Debounced button sampling.
        let raw = hw.is_pressed();
        if let Some(edge) = self.debouncer.sample(raw, now_ms) {
            if let Some(timestamp_ms) = self.coordinator.on_button_edge(edge, now_ms) {
                self.broadcast_acknowledgment(timestamp_ms, transport);
                sink.emit(&AppEvent::AckBroadcast { timestamp_ms });
            }
        }

        // (c) Cooldown-deadline check.
        if self.coordinator.tick(now_ms) {
            sink.emit(&AppEvent::CooldownExpired);
        }

        // (d) Indicator update.
        match self.indicator.update(self.coordinator.should_flash(), now_ms) {
            Some(IndicatorCommand::Off) => hw.set_indicator(false),
            Some(IndicatorCommand::On) => hw.set_indicator(true),
            Some(IndicatorCommand::Toggle) => hw.set_indicator(self.indicator.is_on()),
            None => {}
        }

        let new_state = self.coordinator.alert_state();
        if new_state != prev_state {
            sink.emit(&AppEvent::AlertChanged {
                from: prev_state,
                to: new_state,
            });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current derived alert posture.
    pub fn alert_state(&self) -> AlertState {
        self.coordinator.alert_state()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    /// Publish the acknowledgment broadcast for a local press. The local
    /// cooldown is already entered at this point; a failed publish is logged
    /// and the device self-corrects via its own cooldown timer.
    fn broadcast_acknowledgment(&mut self, timestamp_ms: u64, transport: &mut impl TransportPort) {
        match messages::encode_acknowledged(timestamp_ms) {
            Ok(payload) => {
                if let Err(e) = transport.publish(messages::TOPIC_USER_HANDLED, &payload) {
                    warn!("acknowledgment broadcast failed: {}", e);
                }
            }
            Err(e) => warn!("acknowledgment encode failed: {}", e),
        }
    }
}
