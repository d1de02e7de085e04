//! ParcelButton Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single cooperative control loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  PanelAdapter      MqttTransport    NvsAdapter   Monotonic-  │
//! │  (Button+Indicator)(TransportPort)  (ConfigPort) Clock       │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │             AppService (pure logic)                  │    │
//! │  │  Debouncer · Coordinator · IndicatorDriver           │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop runs for the process lifetime: sample the clock once, run one
//! service tick (transport → button → cooldown → indicator), sleep for the
//! configured interval. Nothing in the tick blocks; WiFi association is the
//! only blocking step and happens once during boot.

#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration, EspWifi};

use parcelbutton::adapters::hardware::{PanelAdapter, PanelPolarity};
use parcelbutton::adapters::log_sink::LogEventSink;
use parcelbutton::adapters::mqtt::MqttTransport;
use parcelbutton::adapters::nvs::NvsAdapter;
use parcelbutton::adapters::time::MonotonicClock;
use parcelbutton::app::ports::ConfigPort;
use parcelbutton::app::service::AppService;
use parcelbutton::config::SystemConfig;

// Panel wiring on the reference board.
// Button: momentary switch to ground on GPIO5 (internal pull-up).
// LED: wired to the supply rail on GPIO4 (drive low to light).

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("ParcelButton v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let config = match NvsAdapter::new() {
        Ok(nvs) => match nvs.load() {
            Ok(cfg) => {
                info!("Config loaded from NVS");
                cfg
            }
            Err(e) => {
                warn!("NVS config load failed ({}), using defaults", e);
                SystemConfig::default()
            }
        },
        Err(e) => {
            warn!("NVS init failed ({}), using defaults", e);
            SystemConfig::default()
        }
    };

    // ── 3. WiFi station ───────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    let mut wifi = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs_partition))?,
        sysloop,
    )?;

    if config.wifi.ssid.is_empty() {
        warn!("WiFi not provisioned; alerts from peers will not arrive");
    } else {
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: config.wifi.ssid.clone(),
            password: config.wifi.password.clone(),
            ..Default::default()
        }))?;
        wifi.start()?;
        wifi.connect()?;
        wifi.wait_netif_up()?;
        info!("WiFi connected");
    }

    // ── 4. Panel pins ─────────────────────────────────────────
    let mut button = PinDriver::input(peripherals.pins.gpio5)?;
    button.set_pull(Pull::Up)?;
    let led = PinDriver::output(peripherals.pins.gpio4)?;
    let mut panel = PanelAdapter::new(button, led, PanelPolarity::default());

    // ── 5. Broker transport ───────────────────────────────────
    let id = device_id();
    let mut transport = MqttTransport::new(&config.mqtt, &id)
        .map_err(|e| anyhow::anyhow!("mqtt init: {}", e))?;

    // ── 6. Service + control loop ─────────────────────────────
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();
    let mut app = AppService::new(&config);
    app.start(&mut sink);

    info!("System ready. Entering control loop.");
    loop {
        app.tick(clock.now_ms(), &mut panel, &mut transport, &mut sink);
        FreeRtos::delay_ms(config.control_loop_interval_ms as u32);
    }
}

/// Short device id from the factory MAC, used to make broker client ids
/// unique across sibling buttons.
fn device_id() -> String {
    let mut mac = [0u8; 6];
    // SAFETY: fills the 6-byte buffer with the factory-programmed MAC.
    let _ = unsafe { esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr()) };
    format!("{:02x}{:02x}{:02x}", mac[3], mac[4], mac[5])
}
