//! MQTT transport adapter.
//!
//! Implements [`TransportPort`] over the shared notification broker.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::mqtt::client::EspMqttClient`
//!   with a callback that forwards connection events and inbound frames
//!   through an `mpsc` channel. The polling loop drains that channel in
//!   [`poll`](MqttTransport::poll), so only the loop ever touches
//!   coordination state. Reconnection-with-backoff runs inside the client's
//!   own task (`reconnect_timeout`); this adapter only mirrors the link as a
//!   connected/disconnected flag and re-subscribes on every connect.
//! - **all other targets**: an in-memory broker simulation for host-side
//!   tests. Publishes to a subscribed topic are echoed back into the inbound
//!   queue, the way a real broker delivers a client its own publish.

use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::app::ports::{InboundMessage, TransportPort};
use crate::config::MqttConfig;
use crate::error::CommsError;
use crate::messages::{TOPIC_PACKAGE_EXISTS, TOPIC_USER_HANDLED};

// ───────────────────────────────────────────────────────────────
// Link state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
}

#[cfg(target_os = "espidf")]
enum LinkEvent {
    Connected,
    Disconnected,
    Received(InboundMessage),
}

// ───────────────────────────────────────────────────────────────
// Transport adapter
// ───────────────────────────────────────────────────────────────

pub struct MqttTransport {
    state: LinkState,
    inbound: VecDeque<InboundMessage>,

    #[cfg(target_os = "espidf")]
    client: esp_idf_svc::mqtt::client::EspMqttClient<'static>,
    #[cfg(target_os = "espidf")]
    events: std::sync::mpsc::Receiver<LinkEvent>,

    /// Simulation: whether the fake broker currently accepts connections.
    #[cfg(not(target_os = "espidf"))]
    sim_online: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_published: Vec<(String, Vec<u8>)>,
}

impl MqttTransport {
    /// Connect to the broker named in `config`. `device_id` is appended to
    /// the configured client-id prefix so sibling buttons stay distinct.
    #[cfg(target_os = "espidf")]
    pub fn new(config: &MqttConfig, device_id: &str) -> Result<Self, CommsError> {
        use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration};

        let client_id = format!("{}-{}", config.client_id_prefix, device_id);
        let mqtt_config = MqttClientConfiguration {
            client_id: Some(&client_id),
            username: Some(config.username.as_str()),
            password: Some(config.password.as_str()),
            reconnect_timeout: Some(core::time::Duration::from_secs(5)),
            ..Default::default()
        };

        let (tx, rx) = std::sync::mpsc::channel();
        let client = EspMqttClient::new_cb(config.broker_url.as_str(), &mqtt_config, move |event| {
            // Runs on the MQTT client task: forward everything through the
            // channel, never touch coordination state here.
            match event.payload() {
                EventPayload::Connected(_) => {
                    let _ = tx.send(LinkEvent::Connected);
                }
                EventPayload::Disconnected => {
                    let _ = tx.send(LinkEvent::Disconnected);
                }
                EventPayload::Received {
                    topic: Some(topic),
                    data,
                    ..
                } => {
                    let _ = tx.send(LinkEvent::Received(InboundMessage {
                        topic: topic.to_string(),
                        payload: data.to_vec(),
                    }));
                }
                _ => {}
            }
        })
        .map_err(|e| {
            warn!("MQTT client init failed: {}", e);
            CommsError::ConnectFailed
        })?;

        info!("MQTT client '{}' -> {}", client_id, config.broker_url);
        Ok(Self {
            state: LinkState::Connecting,
            inbound: VecDeque::new(),
            client,
            events: rx,
        })
    }

    /// Simulation constructor: a broker that is immediately reachable.
    #[cfg(not(target_os = "espidf"))]
    pub fn new(config: &MqttConfig, device_id: &str) -> Result<Self, CommsError> {
        info!(
            "MQTT simulation '{}-{}' -> {}",
            config.client_id_prefix, device_id, config.broker_url
        );
        Ok(Self {
            state: LinkState::Connecting,
            inbound: VecDeque::new(),
            sim_online: true,
            sim_published: Vec::new(),
        })
    }

    pub fn link_state(&self) -> LinkState {
        self.state
    }

    #[cfg(target_os = "espidf")]
    fn subscribe_all(&mut self) {
        use esp_idf_svc::mqtt::client::QoS;
        for topic in [TOPIC_PACKAGE_EXISTS, TOPIC_USER_HANDLED] {
            match self.client.subscribe(topic, QoS::AtMostOnce) {
                Ok(_) => debug!("subscribed to {}", topic),
                Err(e) => warn!("subscribe to {} failed: {}", topic, e),
            }
        }
    }

    // ── Simulation controls (host tests only) ─────────────────

    /// Take the simulated broker offline or online.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_online(&mut self, online: bool) {
        self.sim_online = online;
        if !online {
            warn!("MQTT disconnected (simulated outage)");
            self.state = LinkState::Reconnecting { attempt: 0 };
        }
    }

    /// Deliver a frame from a simulated peer.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_inject(&mut self, topic: &str, payload: &[u8]) {
        self.inbound.push_back(InboundMessage {
            topic: topic.to_string(),
            payload: payload.to_vec(),
        });
    }

    /// Everything published so far, oldest first.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_published(&self) -> &[(String, Vec<u8>)] {
        &self.sim_published
    }
}

impl TransportPort for MqttTransport {
    #[cfg(target_os = "espidf")]
    fn poll(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                LinkEvent::Connected => {
                    info!("MQTT connected");
                    self.state = LinkState::Connected;
                    // Subscriptions do not survive a reconnect with a clean
                    // session: renew them on every connect.
                    self.subscribe_all();
                }
                LinkEvent::Disconnected => {
                    let attempt = match self.state {
                        LinkState::Reconnecting { attempt } => attempt + 1,
                        _ => 1,
                    };
                    warn!("MQTT disconnected (reconnect attempt {})", attempt);
                    self.state = LinkState::Reconnecting { attempt };
                }
                LinkEvent::Received(msg) => self.inbound.push_back(msg),
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn poll(&mut self) {
        if self.state != LinkState::Connected && self.sim_online {
            info!("MQTT connected (simulation)");
            self.state = LinkState::Connected;
        }
    }

    fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    #[cfg(target_os = "espidf")]
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        if !self.is_connected() {
            return Err(CommsError::NotConnected);
        }
        use esp_idf_svc::mqtt::client::QoS;
        // enqueue() hands the frame to the client task without blocking the
        // control loop.
        self.client
            .enqueue(topic, QoS::AtMostOnce, false, payload)
            .map(|_| ())
            .map_err(|e| {
                warn!("publish to {} failed: {}", topic, e);
                CommsError::PublishFailed
            })
    }

    #[cfg(not(target_os = "espidf"))]
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        if !self.is_connected() {
            return Err(CommsError::NotConnected);
        }
        self.sim_published.push((topic.to_string(), payload.to_vec()));
        // The broker echoes publishes on subscribed topics back to us.
        if topic == TOPIC_PACKAGE_EXISTS || topic == TOPIC_USER_HANDLED {
            self.inbound.push_back(InboundMessage {
                topic: topic.to_string(),
                payload: payload.to_vec(),
            });
        }
        Ok(())
    }

    fn next_inbound(&mut self) -> Option<InboundMessage> {
        let msg = self.inbound.pop_front();
        if let Some(m) = &msg {
            debug!("inbound {} ({} bytes)", m.topic, m.payload.len());
        }
        msg
    }
}
