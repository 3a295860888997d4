//! Boot → timers → update cycle → telemetry and chart.

use embassy_time::Duration;

use ess_demo::app::events::AppEvent;
use ess_demo::app::ports::TimerId;
use ess_demo::config::{AppConfig, UpdateGating};
use ess_demo::link::{ConnectionEvent, PeerAddress};
use ess_demo::presence::PresenceFlags;
use ess_demo::sensors::Quantity;
use ess_demo::sensors::sample::{SensorSample, SensorValue};

use crate::boot_running;
use crate::mock_hw::{DisplayCall, LogSink, MockBoard, MockDisplay, MockSensor, indoor_sample};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn full_boot_lays_out_chart_and_arms_both_timers() {
    let mut board = MockBoard::full();
    let mut sink = LogSink::new();
    let node = boot_running(&mut board, &AppConfig::default(), &mut sink);

    assert_eq!(board.sensor_lookups, vec!["BME280".to_owned()]);
    assert_eq!(board.display_lookups, vec!["ILI9340".to_owned()]);
    assert_eq!(node.radio().advertised.as_deref(), Some("ESS Demo"));
    assert!(node.radio().enabled);

    let display = node.display().unwrap();
    assert!(matches!(display.calls[0], DisplayCall::ConfigureChart(l) if l.point_count == 7));
    assert_eq!(
        display.statuses(),
        vec!["Up 0 seconds, advertising\nName: ESS Demo\nAddress: 01 c12233445566"]
    );

    assert!(node.scheduler().is_armed(TimerId::DisplayInput));
    assert!(node.scheduler().is_armed(TimerId::ServiceUpdate));
    assert_eq!(sink.events, vec![AppEvent::Started(PresenceFlags::new(true, true))]);

    // The cache is primed once at boot.
    assert_eq!(node.sensor().driver().unwrap().fetches, 1);
    assert_eq!(node.service().cycle_count(), 0);
}

// ── Timing ────────────────────────────────────────────────────

#[test]
fn first_update_after_warm_up_then_every_period() {
    let mut board = MockBoard::full();
    let mut sink = LogSink::new();
    let mut node = boot_running(&mut board, &AppConfig::default(), &mut sink);

    node.advance(ms(1_999));
    node.run_pending(&mut sink);
    assert!(node.telemetry().updates.is_empty());

    node.advance(ms(1));
    node.run_pending(&mut sink);
    assert_eq!(node.service().cycle_count(), 1);

    node.advance(ms(9_999));
    node.run_pending(&mut sink);
    assert_eq!(node.service().cycle_count(), 1);

    node.advance(ms(1));
    node.run_pending(&mut sink);
    assert_eq!(node.service().cycle_count(), 2);
    assert_eq!(sink.telemetry_count(), 2);
}

#[test]
fn long_stall_catches_up_without_flooding_the_queue() {
    let mut board = MockBoard::full();
    let mut sink = LogSink::new();
    let mut node = boot_running(&mut board, &AppConfig::default(), &mut sink);

    // Warm-up plus five periods in one step.
    node.advance(ms(52_000));
    assert!(node.queue().len() <= 2);
    node.run_pending(&mut sink);
    assert_eq!(node.service().cycle_count(), 1);
    assert_eq!(node.queue().dropped(), 0);
}

// ── Update cycle ──────────────────────────────────────────────

#[test]
fn cycle_dispatches_all_four_quantities() {
    let mut board = MockBoard::full();
    let mut sink = LogSink::new();
    let mut node = boot_running(&mut board, &AppConfig::default(), &mut sink);

    node.advance(ms(2_000));
    node.run_pending(&mut sink);

    assert_eq!(
        node.telemetry().updates,
        vec![
            (Quantity::Temperature, 2345),
            (Quantity::Humidity, 4850),
            (Quantity::Pressure, 1_013_250),
            (Quantity::DewPoint, 11),
        ]
    );

    let chart = node.service().chart();
    assert_eq!(chart.history(Quantity::Temperature).recent(), &[23]);
    assert_eq!(chart.history(Quantity::Humidity).recent(), &[48]);
    assert_eq!(chart.history(Quantity::Pressure).recent(), &[33]);
    assert_eq!(chart.history(Quantity::DewPoint).recent(), &[11]);

    let display = node.display().unwrap();
    assert_eq!(display.pushes(Quantity::Pressure), vec![33]);
    assert_eq!(display.pushes(Quantity::DewPoint), vec![11]);
    assert_eq!(display.count(&DisplayCall::Redraw), 1);

    let Some(AppEvent::Telemetry(report)) = sink.events.last() else {
        panic!("no telemetry event");
    };
    assert_eq!(report.dew_point, Ok(11));
    assert!((report.pressure_pa - 101_325.0).abs() < 0.5);
}

#[test]
fn history_keeps_only_the_last_seven_cycles() {
    let mut board = MockBoard::full();
    let mut sink = LogSink::new();
    let mut node = boot_running(&mut board, &AppConfig::default(), &mut sink);

    node.advance(ms(2_000));
    node.run_pending(&mut sink);
    for _ in 0..9 {
        node.advance(ms(10_000));
        node.run_pending(&mut sink);
    }
    assert_eq!(node.service().cycle_count(), 10);

    let h = node.service().chart().history(Quantity::Temperature);
    assert_eq!(h.filled_count(), 7);
    assert_eq!(h.recent(), &[23; 7]);
}

#[test]
fn dew_point_failure_skips_dew_only() {
    let dry = SensorSample {
        humidity: SensorValue::ZERO,
        ..indoor_sample()
    };
    let mut board = MockBoard::new(Some(MockSensor::new(dry)), Some(MockDisplay::new()));
    let mut sink = LogSink::new();
    let mut node = boot_running(&mut board, &AppConfig::default(), &mut sink);

    node.advance(ms(2_000));
    node.run_pending(&mut sink);

    assert_eq!(node.telemetry().updates.len(), 3);
    assert!(node.telemetry().of(Quantity::DewPoint).is_empty());
    assert_eq!(node.telemetry().of(Quantity::Humidity), vec![0]);

    let chart = node.service().chart();
    assert_eq!(chart.history(Quantity::DewPoint).filled_count(), 0);
    assert_eq!(chart.history(Quantity::Temperature).filled_count(), 1);
    assert!(node.display().unwrap().pushes(Quantity::DewPoint).is_empty());
}

#[test]
fn failing_sensor_reports_zeroed_values() {
    let mut sensor = MockSensor::new(indoor_sample());
    sensor.fail_fetch = true;
    let mut board = MockBoard::new(Some(sensor), None);
    let mut sink = LogSink::new();
    let mut node = boot_running(&mut board, &AppConfig::default(), &mut sink);

    node.advance(ms(2_000));
    node.run_pending(&mut sink);

    assert_eq!(
        node.telemetry().updates,
        vec![
            (Quantity::Temperature, 0),
            (Quantity::Humidity, 0),
            (Quantity::Pressure, 0),
        ]
    );
}

// ── Connection gating ─────────────────────────────────────────

#[test]
fn while_connected_gating_follows_the_link() {
    let config = AppConfig {
        update_gating: UpdateGating::WhileConnected,
        ..AppConfig::default()
    };
    let mut board = MockBoard::full();
    let mut sink = LogSink::new();
    let mut node = boot_running(&mut board, &config, &mut sink);
    assert!(!node.scheduler().is_armed(TimerId::ServiceUpdate));

    node.advance(ms(20_000));
    node.run_pending(&mut sink);
    assert_eq!(node.service().cycle_count(), 0);

    let peer = PeerAddress::new(0, [1, 2, 3, 4, 5, 6]);
    assert!(node.on_connection_event(ConnectionEvent::Connected(peer)));
    node.run_pending(&mut sink);
    assert_eq!(node.service().cycle_count(), 1, "connect runs one cycle at once");
    assert!(node.scheduler().is_armed(TimerId::ServiceUpdate));

    node.advance(ms(10_000));
    node.run_pending(&mut sink);
    assert_eq!(node.service().cycle_count(), 2);

    node.on_connection_event(ConnectionEvent::Disconnected { reason: 0x13 });
    node.run_pending(&mut sink);
    assert!(!node.scheduler().is_armed(TimerId::ServiceUpdate));

    node.advance(ms(30_000));
    node.run_pending(&mut sink);
    assert_eq!(node.service().cycle_count(), 2);
}

#[test]
fn always_gating_ignores_the_link() {
    let mut board = MockBoard::full();
    let mut sink = LogSink::new();
    let mut node = boot_running(&mut board, &AppConfig::default(), &mut sink);

    node.on_connection_event(ConnectionEvent::Connected(PeerAddress::default()));
    node.run_pending(&mut sink);
    assert_eq!(node.service().cycle_count(), 0);

    node.on_connection_event(ConnectionEvent::Disconnected { reason: 0x08 });
    node.run_pending(&mut sink);
    assert!(node.scheduler().is_armed(TimerId::ServiceUpdate));
}
