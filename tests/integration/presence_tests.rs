//! Boot-time presence gate: hard and soft dependencies.

use embassy_time::Duration;

use ess_demo::app::events::AppEvent;
use ess_demo::app::ports::TimerId;
use ess_demo::config::AppConfig;
use ess_demo::error::{InitError, RadioError};
use ess_demo::presence::PresenceFlags;
use ess_demo::runtime::{Boot, Node};
use ess_demo::sensors::Quantity;

use crate::boot_running;
use crate::mock_hw::{DisplayCall, LogSink, MockBoard, MockDisplay, MockRadio, MockTelemetry};

#[test]
fn missing_sensor_halts_with_banner() {
    let mut board = MockBoard::new(None, Some(MockDisplay::new()));
    let mut sink = LogSink::new();

    let boot: Boot<_, _, _, _> = Node::boot(
        &mut board,
        MockRadio::new(),
        MockTelemetry::new(),
        &AppConfig::default(),
        &mut sink,
    );
    let Boot::Halted(halted) = boot else {
        panic!("node must not run without its sensor");
    };

    assert_eq!(halted.reason, InitError::SensorNotDetected);
    assert!(!halted.radio.enabled, "radio is never touched");
    assert!(halted.telemetry.updates.is_empty());

    let display = halted.display.expect("display still bound for the banner");
    assert_eq!(
        display.calls,
        vec![
            DisplayCall::Error("Error occurred during initialisation\nSensor not detected".into()),
            DisplayCall::RunPending,
        ]
    );
    assert_eq!(sink.events, vec![AppEvent::Halted(InitError::SensorNotDetected)]);
}

#[test]
fn missing_sensor_and_display_halts_silently() {
    let mut board = MockBoard::new(None, None);
    let mut sink = LogSink::new();
    let boot = Node::boot(
        &mut board,
        MockRadio::new(),
        MockTelemetry::new(),
        &AppConfig::default(),
        &mut sink,
    );
    match boot {
        Boot::Halted(h) => assert!(h.display.is_none()),
        Boot::Running(_) => panic!("expected halt"),
    }
}

#[test]
fn radio_failure_halts() {
    let mut board = MockBoard::full();
    let mut sink = LogSink::new();
    let boot = Node::boot(
        &mut board,
        MockRadio::failing_enable(-5),
        MockTelemetry::new(),
        &AppConfig::default(),
        &mut sink,
    );
    let Boot::Halted(halted) = boot else {
        panic!("node must not run without its radio");
    };

    assert_eq!(halted.reason, InitError::RadioInitFailed(RadioError::EnableFailed(-5)));
    assert_eq!(
        halted.display.unwrap().calls[0],
        DisplayCall::Error("Error occurred during initialisation\nBluetooth init failed".into())
    );
    assert!(!sink.events.iter().any(|e| matches!(e, AppEvent::Started(_))));
}

#[test]
fn advertising_failure_is_not_fatal() {
    let mut board = MockBoard::full();
    let mut sink = LogSink::new();
    let radio = MockRadio {
        advertise_error: Some(-12),
        ..MockRadio::new()
    };
    let boot = Node::boot(&mut board, radio, MockTelemetry::new(), &AppConfig::default(), &mut sink);
    assert!(matches!(boot, Boot::Running(_)));
}

#[test]
fn headless_node_runs_the_pipeline() {
    let mut board = MockBoard::headless();
    let mut sink = LogSink::new();
    let mut node = boot_running(&mut board, &AppConfig::default(), &mut sink);

    assert_eq!(node.service().presence(), PresenceFlags::new(true, false));
    assert!(node.display().is_none());
    assert!(!node.scheduler().is_armed(TimerId::DisplayInput));
    assert!(node.scheduler().is_armed(TimerId::ServiceUpdate));

    node.advance(Duration::from_millis(2_000));
    node.run_pending(&mut sink);
    assert_eq!(node.telemetry().updates.len(), 4);
}

#[test]
fn headless_and_full_nodes_agree_on_telemetry_and_history() {
    let mut full_board = MockBoard::full();
    let mut bare_board = MockBoard::headless();
    let mut sink_a = LogSink::new();
    let mut sink_b = LogSink::new();
    let mut full = boot_running(&mut full_board, &AppConfig::default(), &mut sink_a);
    let mut bare = boot_running(&mut bare_board, &AppConfig::default(), &mut sink_b);

    for step in [2_000, 10_000, 10_000] {
        full.advance(Duration::from_millis(step));
        bare.advance(Duration::from_millis(step));
        full.run_pending(&mut sink_a);
        bare.run_pending(&mut sink_b);
    }

    assert_eq!(full.telemetry().updates, bare.telemetry().updates);
    for q in Quantity::ALL {
        assert_eq!(
            full.service().chart().history(q),
            bare.service().chart().history(q),
            "{:?}",
            q
        );
    }
}
