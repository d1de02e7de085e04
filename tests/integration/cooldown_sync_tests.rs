//! Cross-device cooldown synchronization tests.
//!
//! A peer's acknowledgment must silence this device exactly like a local
//! press, resolution must override every cooldown, and replayed or
//! out-of-order notifications must never corrupt state.

use crate::mock_hw::{EventRecorder, MockPanel, MockTransport};

use parcelbutton::app::events::AppEvent;
use parcelbutton::app::service::AppService;
use parcelbutton::config::SystemConfig;
use parcelbutton::coordinator::AlertState;

const COOLDOWN: u64 = 120_000;

fn make_app() -> (AppService, MockPanel, MockTransport, EventRecorder) {
    let mut app = AppService::new(&SystemConfig::default());
    let mut sink = EventRecorder::new();
    app.start(&mut sink);
    (app, MockPanel::new(), MockTransport::new(), sink)
}

#[test]
fn peer_acknowledgment_silences_this_device() {
    let (mut app, mut hw, mut tr, mut sink) = make_app();

    tr.push_existence(true);
    app.tick(0, &mut hw, &mut tr, &mut sink);
    app.tick(500, &mut hw, &mut tr, &mut sink); // flashing
    assert_eq!(hw.led(), Some(true));

    tr.push_acknowledged(777);
    app.tick(600, &mut hw, &mut tr, &mut sink);

    assert_eq!(app.alert_state(), AlertState::Cooldown);
    assert_eq!(hw.led(), Some(false));
    // A peer's press is not re-broadcast by this device.
    assert_eq!(tr.acks_published(), 0);
}

// ── Scenario C: deadline boundary is exact ────────────────────

#[test]
fn cooldown_holds_until_the_exact_deadline() {
    let (mut app, mut hw, mut tr, mut sink) = make_app();

    tr.push_existence(true);
    app.tick(0, &mut hw, &mut tr, &mut sink);
    tr.push_acknowledged(0);
    app.tick(1_000, &mut hw, &mut tr, &mut sink); // deadline = 1_000 + COOLDOWN

    app.tick(1_000 + COOLDOWN - 1, &mut hw, &mut tr, &mut sink);
    assert_eq!(app.alert_state(), AlertState::Cooldown);
    assert!(!sink.contains(&AppEvent::CooldownExpired));

    app.tick(1_000 + COOLDOWN, &mut hw, &mut tr, &mut sink);
    assert_eq!(app.alert_state(), AlertState::Alerting);
    assert!(sink.contains(&AppEvent::CooldownExpired));
    assert_eq!(tr.acks_published(), 0);
}

// ── Scenario D: resolution overrides an active cooldown ───────

#[test]
fn resolution_ends_cooldown_immediately() {
    let (mut app, mut hw, mut tr, mut sink) = make_app();

    tr.push_existence(true);
    tr.push_acknowledged(5);
    app.tick(0, &mut hw, &mut tr, &mut sink);
    assert_eq!(app.alert_state(), AlertState::Cooldown);

    tr.push_existence(false);
    app.tick(100, &mut hw, &mut tr, &mut sink);
    assert_eq!(app.alert_state(), AlertState::Idle);

    // Long after the old deadline would have fired: still idle, no expiry
    // event from the cancelled cooldown.
    app.tick(100 + 2 * COOLDOWN, &mut hw, &mut tr, &mut sink);
    assert_eq!(app.alert_state(), AlertState::Idle);
    assert!(!sink.contains(&AppEvent::CooldownExpired));
}

// ── Scenario E: acknowledgment without a package ──────────────

#[test]
fn acknowledgment_while_idle_is_a_noop() {
    let (mut app, mut hw, mut tr, mut sink) = make_app();

    tr.push_acknowledged(123);
    app.tick(0, &mut hw, &mut tr, &mut sink);

    assert_eq!(app.alert_state(), AlertState::Idle);
    assert!(sink.events.iter().all(|e| matches!(e, AppEvent::Started(_))));
}

// ── Idempotence & replay tolerance ────────────────────────────

#[test]
fn duplicate_acknowledgments_keep_the_first_deadline() {
    let (mut app, mut hw, mut tr, mut sink) = make_app();

    tr.push_existence(true);
    app.tick(0, &mut hw, &mut tr, &mut sink);
    tr.push_acknowledged(10);
    app.tick(1_000, &mut hw, &mut tr, &mut sink); // deadline = 1_000 + COOLDOWN

    // Replays with the same and different timestamps, delivered later.
    tr.push_acknowledged(10);
    tr.push_acknowledged(99_999);
    app.tick(60_000, &mut hw, &mut tr, &mut sink);
    assert_eq!(app.alert_state(), AlertState::Cooldown);

    // Were the replay honored, the deadline would have moved to
    // 60_000 + COOLDOWN; it must still fire at 1_000 + COOLDOWN.
    app.tick(1_000 + COOLDOWN, &mut hw, &mut tr, &mut sink);
    assert_eq!(app.alert_state(), AlertState::Alerting);
}

#[test]
fn replayed_existence_does_not_restart_anything() {
    let (mut app, mut hw, mut tr, mut sink) = make_app();

    tr.push_existence(true);
    app.tick(0, &mut hw, &mut tr, &mut sink);
    tr.push_acknowledged(0);
    app.tick(1_000, &mut hw, &mut tr, &mut sink);

    // The sensor re-announces the package while we are cooling down.
    tr.push_existence(true);
    app.tick(50_000, &mut hw, &mut tr, &mut sink);
    assert_eq!(app.alert_state(), AlertState::Cooldown);

    app.tick(1_000 + COOLDOWN, &mut hw, &mut tr, &mut sink);
    assert_eq!(app.alert_state(), AlertState::Alerting);
}

#[test]
fn stale_acknowledgment_before_existence_is_dropped() {
    let (mut app, mut hw, mut tr, mut sink) = make_app();

    // Out-of-order delivery: the ack for a previous package arrives first.
    tr.push_acknowledged(400);
    app.tick(0, &mut hw, &mut tr, &mut sink);
    tr.push_existence(true);
    app.tick(100, &mut hw, &mut tr, &mut sink);

    // The stale ack must not have pre-silenced the new package.
    assert_eq!(app.alert_state(), AlertState::Alerting);
}

#[test]
fn two_devices_converge_through_the_broker() {
    // Two services sharing one simulated broker: device A presses, device B
    // receives the broadcast and enters the same cooldown.
    let config = SystemConfig::default();
    let mut sink_a = EventRecorder::new();
    let mut sink_b = EventRecorder::new();
    let mut app_a = AppService::new(&config);
    let mut app_b = AppService::new(&config);
    app_a.start(&mut sink_a);
    app_b.start(&mut sink_b);
    let mut hw_a = MockPanel::new();
    let mut hw_b = MockPanel::new();
    let mut tr_a = MockTransport::new();
    let mut tr_b = MockTransport::new();

    // The mailbox sensor announces the package to both.
    tr_a.push_existence(true);
    tr_b.push_existence(true);
    app_a.tick(0, &mut hw_a, &mut tr_a, &mut sink_a);
    app_b.tick(0, &mut hw_b, &mut tr_b, &mut sink_b);
    app_b.tick(500, &mut hw_b, &mut tr_b, &mut sink_b); // B is flashing
    assert_eq!(hw_b.led(), Some(true));

    // Device A's user presses.
    hw_a.pressed = true;
    for t in (10..=100).step_by(10) {
        app_a.tick(t, &mut hw_a, &mut tr_a, &mut sink_a);
    }
    assert_eq!(app_a.alert_state(), AlertState::Cooldown);
    assert_eq!(tr_a.acks_published(), 1);

    // The broker relays A's broadcast to B.
    let (topic, payload) = tr_a.published[0].clone();
    tr_b.push_raw(&topic, &payload);
    app_b.tick(700, &mut hw_b, &mut tr_b, &mut sink_b);

    assert_eq!(app_b.alert_state(), AlertState::Cooldown);
    assert_eq!(tr_b.acks_published(), 0);
    assert_eq!(hw_b.led(), Some(false));
}
