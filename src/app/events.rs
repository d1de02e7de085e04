//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them — log to serial, mirror to a diagnostics
//! topic, etc.

use crate::coordinator::AlertState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The application service has started (carries initial posture).
    Started(AlertState),

    /// The derived alert posture moved.
    AlertChanged { from: AlertState, to: AlertState },

    /// An existence notification flipped the package flag.
    PackageChanged { exists: bool },

    /// This device's button press was broadcast to peers.
    AckBroadcast { timestamp_ms: u64 },

    /// The local cooldown deadline passed.
    CooldownExpired,
}
