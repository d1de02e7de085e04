//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (pins, broker transport, storage, event sinks) implement
//! these traits. The [`AppService`](super::service::AppService) consumes
//! them via generics, so the domain core never touches hardware directly and
//! the whole coordination logic runs under test with mock adapters.

use crate::config::SystemConfig;
use crate::error::CommsError;

// ───────────────────────────────────────────────────────────────
// Panel ports (driven adapters: pins ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: raw, undebounced button level.
pub trait ButtonPort {
    /// `true` while the button is physically held down.
    fn is_pressed(&mut self) -> bool;
}

/// Write-side port: the alert indicator LED.
pub trait IndicatorPort {
    fn set_indicator(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: broker ↔ domain)
// ───────────────────────────────────────────────────────────────

/// A raw inbound frame; decoding happens inside the core so malformed
/// payloads are counted and dropped there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// Duplex publish/subscribe channel to the shared notification broker.
///
/// Implementations own connection maintenance: [`poll`](Self::poll) must
/// never block, and reconnection runs as a backoff state machine behind the
/// connected/disconnected flag. Inbound frames are queued adapter-side so
/// the polling loop remains the single writer of all coordination state.
pub trait TransportPort {
    /// Drive connection maintenance; cheap and non-blocking.
    fn poll(&mut self);

    /// Whether the broker connection is currently up.
    fn is_connected(&self) -> bool;

    /// Publish a payload on a topic.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError>;

    /// Pop the next queued inbound frame, if any.
    fn next_inbound(&mut self) -> Option<InboundMessage>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, a future
/// diagnostics topic, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before persisting: invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
