//! Peer notification wire format.
//!
//! Two logical topics are shared by every device watching the same mailbox:
//!
//! | Topic            | Payload                                  | Meaning                          |
//! |------------------|------------------------------------------|----------------------------------|
//! | `package_exists` | `{"exists": <bool>}`                     | an unhandled package appeared/left |
//! | `user_handled`   | `{"handled": true, "timestamp": <ms>}`   | somebody pressed their button    |
//!
//! Inbound messages are decoded into the [`PeerNotification`] tagged variant
//! and fed to the coordinator through one entry point, so the core can be
//! unit-tested without a real transport. Missing fields fall back to their
//! defaults (a `package_exists` payload without `exists` reads as `false`);
//! only unparseable JSON or an unknown topic is treated as malformed.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// Topic carrying package existence changes.
pub const TOPIC_PACKAGE_EXISTS: &str = "package_exists";
/// Topic carrying acknowledgment broadcasts.
pub const TOPIC_USER_HANDLED: &str = "user_handled";

/// A fact received from (or broadcast to) sibling devices.
///
/// Both variants are idempotent facts, not commands: replays and
/// out-of-order delivery must leave the receiving device in a valid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerNotification {
    /// An unhandled package appeared (`true`) or was resolved (`false`).
    ExistenceChanged { exists: bool },
    /// Some device acknowledged the package. The timestamp is the sender's
    /// monotonic clock in milliseconds and is informational only.
    Acknowledged { timestamp_ms: u64 },
}

#[derive(Debug, Serialize, Deserialize)]
struct ExistencePayload {
    #[serde(default)]
    exists: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct HandledPayload {
    #[serde(default)]
    handled: bool,
    #[serde(default)]
    timestamp: u64,
}

/// Decode an inbound frame into a notification.
///
/// Returns `Ok(None)` for frames that are well-formed but carry no state
/// change (a `user_handled` payload with `handled == false`).
pub fn decode(topic: &str, payload: &[u8]) -> Result<Option<PeerNotification>, DecodeError> {
    match topic {
        TOPIC_PACKAGE_EXISTS => {
            let p: ExistencePayload =
                serde_json::from_slice(payload).map_err(|_| DecodeError::InvalidPayload)?;
            Ok(Some(PeerNotification::ExistenceChanged { exists: p.exists }))
        }
        TOPIC_USER_HANDLED => {
            let p: HandledPayload =
                serde_json::from_slice(payload).map_err(|_| DecodeError::InvalidPayload)?;
            if p.handled {
                Ok(Some(PeerNotification::Acknowledged {
                    timestamp_ms: p.timestamp,
                }))
            } else {
                Ok(None)
            }
        }
        _ => Err(DecodeError::UnknownTopic),
    }
}

/// Encode the acknowledgment broadcast published on a local button press.
pub fn encode_acknowledged(timestamp_ms: u64) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&HandledPayload {
        handled: true,
        timestamp: timestamp_ms,
    })
}

/// Encode a `package_exists` payload (published by the mailbox sensor; used
/// here by the simulation backend and tests).
pub fn encode_existence(exists: bool) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&ExistencePayload { exists })
}
