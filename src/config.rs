//! System configuration parameters
//!
//! All tunable parameters for the ParcelButton device. Values can be
//! overridden via NVS (non-volatile storage).

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Button ---
    /// Debounce window for the acknowledgment button (milliseconds)
    pub debounce_window_ms: u64,

    // --- Cooldown ---
    /// Re-alert suppression window after an acknowledgment (milliseconds)
    pub cooldown_duration_ms: u64,

    // --- Indicator ---
    /// Half-period of the alert flash (milliseconds)
    pub flash_interval_ms: u64,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u64,

    // --- Network ---
    pub wifi: WifiConfig,
    pub mqtt: MqttConfig,
}

/// WiFi station credentials. Empty SSID means "not provisioned": the device
/// boots offline and alerts only from its own button until configured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WifiConfig {
    pub ssid: heapless::String<32>,
    pub password: heapless::String<64>,
}

/// MQTT broker connection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    /// Broker URL, e.g. `mqtt://192.168.1.100:2000`
    pub broker_url: heapless::String<64>,
    pub username: heapless::String<32>,
    pub password: heapless::String<32>,
    /// Client id prefix; a MAC-derived suffix is appended at connect time.
    pub client_id_prefix: heapless::String<24>,
}

/// Build a fixed-capacity string from a known-fit literal.
fn hstr<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    let _ = out.push_str(s);
    out
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            debounce_window_ms: 50,
            cooldown_duration_ms: 2 * 60 * 1000, // 2 minutes
            flash_interval_ms: 500,
            control_loop_interval_ms: 10,
            wifi: WifiConfig::default(),
            mqtt: MqttConfig::default(),
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_url: hstr("mqtt://192.168.1.100:2000"),
            username: hstr("user"),
            password: hstr("pass"),
            client_id_prefix: hstr("parcelbutton"),
        }
    }
}
