//! Coordination core: one device's view of the shared package alert.
//!
//! The [`Coordinator`] owns the only mutable state in the system and
//! reconciles three asynchronous inputs — debounced button edges, inbound
//! existence notifications, and inbound acknowledgment notifications — into
//! a single derived [`AlertState`]. Peer notifications are idempotent facts:
//! replays and out-of-order delivery must land the device in a valid state.
//!
//! ```text
//!            ExistenceChanged{true}            Acknowledged / button press
//!   Idle ───────────────────────────▶ Alerting ───────────────────────────▶ Cooldown
//!    ▲                                    ▲                                    │
//!    │      ExistenceChanged{false}       │        deadline reached            │
//!    └──────────── (from any state) ◀─────┴────────────────────────────────────┘
//! ```
//!
//! Invariants:
//! - `in_cooldown` implies `package_exists` and a set deadline.
//! - `ExistenceChanged{false}` clears everything unconditionally — event
//!   resolution is authoritative over any local cooldown, including one this
//!   device started with its own press.
//! - Acknowledgment is earliest-wins: a second `Acknowledged` while already
//!   in cooldown neither extends nor shortens the deadline.

use log::{debug, info};

use crate::drivers::button::ButtonEdge;
use crate::messages::PeerNotification;

// ---------------------------------------------------------------------------
// Device state
// ---------------------------------------------------------------------------

/// The single mutable state record, owned by the [`Coordinator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceState {
    /// Whether an unhandled package is currently known to exist.
    /// Set only from inbound existence notifications.
    package_exists: bool,
    /// Whether this device (or a peer) already acknowledged the package.
    in_cooldown: bool,
    /// Monotonic time at which cooldown ends; `Some` iff `in_cooldown`.
    cooldown_deadline_ms: Option<u64>,
}

/// Alert posture, derived from `(package_exists, in_cooldown)` — never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertState {
    /// No package known; nothing to do.
    Idle,
    /// A package exists and nobody has acknowledged it — flash.
    Alerting,
    /// A package exists but was acknowledged — suppress re-alerting.
    Cooldown,
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Device-local state machine for the shared package alert.
pub struct Coordinator {
    state: DeviceState,
    cooldown_duration_ms: u64,
}

impl Coordinator {
    pub fn new(cooldown_duration_ms: u64) -> Self {
        Self {
            state: DeviceState::default(),
            cooldown_duration_ms,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current derived posture.
    pub fn alert_state(&self) -> AlertState {
        match (self.state.package_exists, self.state.in_cooldown) {
            (false, _) => AlertState::Idle,
            (true, false) => AlertState::Alerting,
            (true, true) => AlertState::Cooldown,
        }
    }

    /// The indicator input: flash while alerting, dark otherwise.
    pub fn should_flash(&self) -> bool {
        self.state.package_exists && !self.state.in_cooldown
    }

    pub fn package_exists(&self) -> bool {
        self.state.package_exists
    }

    pub fn in_cooldown(&self) -> bool {
        self.state.in_cooldown
    }

    pub fn cooldown_deadline_ms(&self) -> Option<u64> {
        self.state.cooldown_deadline_ms
    }

    // ── Transitions ───────────────────────────────────────────

    /// Apply an inbound peer notification at monotonic time `now_ms`.
    pub fn apply(&mut self, note: PeerNotification, now_ms: u64) {
        match note {
            PeerNotification::ExistenceChanged { exists: true } => {
                if !self.state.package_exists {
                    info!("package appeared");
                }
                // An active cooldown is kept as-is: the package re-announcing
                // itself does not undo an earlier acknowledgment.
                self.state.package_exists = true;
            }
            PeerNotification::ExistenceChanged { exists: false } => {
                if self.state.package_exists {
                    info!("package resolved");
                }
                self.state.package_exists = false;
                self.state.in_cooldown = false;
                self.state.cooldown_deadline_ms = None;
            }
            PeerNotification::Acknowledged { timestamp_ms } => {
                debug!("peer acknowledgment (sender ts {timestamp_ms}ms)");
                self.enter_cooldown(now_ms);
            }
        }
    }

    /// Feed a confirmed button edge. Returns `Some(timestamp)` when the
    /// press counts as a local acknowledgment and an `Acknowledged`
    /// broadcast must be published; `None` for releases and for presses
    /// with nothing to acknowledge.
    pub fn on_button_edge(&mut self, edge: ButtonEdge, now_ms: u64) -> Option<u64> {
        if !edge.pressed {
            return None;
        }
        if self.alert_state() != AlertState::Alerting {
            debug!("button press ignored in {:?}", self.alert_state());
            return None;
        }
        info!("button pressed - package handled here");
        self.enter_cooldown(now_ms);
        Some(now_ms)
    }

    /// Periodic deadline check. Returns `true` when the cooldown expired on
    /// this tick (Cooldown → Alerting, or already Idle).
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if let Some(deadline) = self.state.cooldown_deadline_ms {
            if self.state.in_cooldown && now_ms >= deadline {
                info!("cooldown complete");
                self.state.in_cooldown = false;
                self.state.cooldown_deadline_ms = None;
                return true;
            }
        }
        false
    }

    // ── Internal ──────────────────────────────────────────────

    /// Idempotent cooldown entry: first acknowledgment wins, and cooldown
    /// without an existing package is impossible.
    fn enter_cooldown(&mut self, now_ms: u64) {
        if !self.state.package_exists || self.state.in_cooldown {
            return;
        }
        self.state.in_cooldown = true;
        self.state.cooldown_deadline_ms = Some(now_ms + self.cooldown_duration_ms);
    }
}
