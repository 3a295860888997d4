//! Display tick, status text and chart interaction.

use embassy_time::Duration;

use ess_demo::app::commands::{AppCommand, UiInput};
use ess_demo::app::events::AppEvent;
use ess_demo::config::AppConfig;
use ess_demo::link::{ConnectionEvent, PeerAddress};
use ess_demo::sensors::Quantity;

use crate::mock_hw::{DisplayCall, LogSink, MockBoard};
use crate::{TestNode, boot_running};

const CENTRAL: PeerAddress = PeerAddress::new(0, [0x10, 0x32, 0x54, 0x76, 0x98, 0xba]);

fn booted(sink: &mut LogSink) -> TestNode {
    let mut board = MockBoard::full();
    boot_running(&mut board, &AppConfig::default(), sink)
}

fn tick(node: &mut TestNode, sink: &mut LogSink) {
    node.advance(Duration::from_millis(10));
    node.run_pending(sink);
}

fn last_status(node: &TestNode) -> String {
    node.display()
        .unwrap()
        .statuses()
        .last()
        .map(|s| (*s).to_owned())
        .unwrap_or_default()
}

// ── Status text ───────────────────────────────────────────────

#[test]
fn status_refreshes_every_hundred_ticks() {
    let mut sink = LogSink::new();
    let mut node = booted(&mut sink);
    assert_eq!(node.display().unwrap().statuses().len(), 1);

    for _ in 0..99 {
        tick(&mut node, &mut sink);
    }
    assert_eq!(node.display().unwrap().statuses().len(), 1);

    tick(&mut node, &mut sink);
    assert_eq!(node.display().unwrap().statuses().len(), 2);
    assert_eq!(
        last_status(&node),
        "Up 1 seconds, advertising\nName: ESS Demo\nAddress: 01 c12233445566"
    );

    // Every tick also lets the toolkit run.
    let run_pending = node.display().unwrap().count(&DisplayCall::RunPending);
    assert_eq!(run_pending, 1 + 100);
}

#[test]
fn link_events_refresh_status_immediately() {
    let mut sink = LogSink::new();
    let mut node = booted(&mut sink);

    node.on_connection_event(ConnectionEvent::Connected(CENTRAL));
    node.run_pending(&mut sink);
    assert_eq!(
        last_status(&node),
        "Up 0 seconds, connected\nRemote Address: 00 ba9876543210"
    );
    assert!(node.service().link().is_connected());
    assert!(sink.events.contains(&AppEvent::Connected(CENTRAL)));

    node.on_connection_event(ConnectionEvent::Disconnected { reason: 0x13 });
    node.run_pending(&mut sink);
    assert!(last_status(&node).starts_with("Up 0 seconds, advertising"));
    assert!(sink.events.contains(&AppEvent::Disconnected { reason: 0x13 }));
}

#[test]
fn failed_connection_leaves_status_alone() {
    let mut sink = LogSink::new();
    let mut node = booted(&mut sink);
    let before = node.display().unwrap().statuses().len();

    node.on_connection_event(ConnectionEvent::ConnectFailed(0x3e));
    node.run_pending(&mut sink);

    assert_eq!(node.display().unwrap().statuses().len(), before);
    assert!(!node.service().link().is_connected());
}

// ── Chart interaction ─────────────────────────────────────────

#[test]
fn hiding_a_series_clears_it_and_stops_pushes() {
    let mut sink = LogSink::new();
    let mut node = booted(&mut sink);
    node.advance(Duration::from_millis(2_000));
    node.run_pending(&mut sink);

    node.display_mut().unwrap().input.push_back(UiInput::CheckboxChanged {
        series: Quantity::Pressure,
        checked: false,
    });
    tick(&mut node, &mut sink);

    let display = node.display().unwrap();
    assert!(display.calls.contains(&DisplayCall::Clear(Quantity::Pressure)));
    assert!(sink.events.contains(&AppEvent::SeriesVisibility {
        series: Quantity::Pressure,
        visible: false,
    }));

    node.advance(Duration::from_millis(10_000));
    node.run_pending(&mut sink);
    let display = node.display().unwrap();
    assert_eq!(display.pushes(Quantity::Pressure), vec![33]);
    assert_eq!(display.pushes(Quantity::Temperature), vec![23, 23]);

    // History keeps recording while hidden.
    assert_eq!(
        node.service().chart().history(Quantity::Pressure).filled_count(),
        2
    );
}

#[test]
fn showing_a_series_replays_only_filled_history() {
    let mut sink = LogSink::new();
    let mut node = booted(&mut sink);
    node.submit(AppCommand::SetSeriesVisible(Quantity::Humidity, false));
    node.run_pending(&mut sink);

    node.advance(Duration::from_millis(2_000));
    node.run_pending(&mut sink);
    node.advance(Duration::from_millis(10_000));
    node.run_pending(&mut sink);
    assert!(node.display().unwrap().pushes(Quantity::Humidity).is_empty());

    node.submit(AppCommand::SetSeriesVisible(Quantity::Humidity, true));
    node.run_pending(&mut sink);

    // Two real readings, never the five unfilled zero slots.
    assert_eq!(node.display().unwrap().pushes(Quantity::Humidity), vec![48, 48]);
}

#[test]
fn repeated_visibility_change_is_ignored() {
    let mut sink = LogSink::new();
    let mut node = booted(&mut sink);
    let redraws = node.display().unwrap().count(&DisplayCall::Redraw);

    node.submit(AppCommand::SetSeriesVisible(Quantity::Temperature, true));
    node.run_pending(&mut sink);

    assert_eq!(node.display().unwrap().count(&DisplayCall::Redraw), redraws);
    assert!(!sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::SeriesVisibility { .. })));
}

#[test]
fn clear_button_resets_every_history() {
    let mut sink = LogSink::new();
    let mut node = booted(&mut sink);
    node.advance(Duration::from_millis(2_000));
    node.run_pending(&mut sink);

    node.display_mut().unwrap().input.push_back(UiInput::ClearClicked);
    tick(&mut node, &mut sink);

    for q in Quantity::ALL {
        assert_eq!(node.service().chart().history(q).filled_count(), 0);
        assert!(node.display().unwrap().calls.contains(&DisplayCall::Clear(q)));
    }
    assert!(sink.events.contains(&AppEvent::HistoryCleared));

    node.advance(Duration::from_millis(10_000));
    node.run_pending(&mut sink);
    assert_eq!(
        node.service().chart().history(Quantity::Temperature).recent(),
        &[23]
    );
}
