//! ESS Demo host simulation entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimBoard          BlePeripheral   EssCharacteristics          │
//! │  (DeviceBinder)    (RadioPort)     (TelemetrySink)             │
//! │  ConsoleDisplay    LogEventSink    HostClock                   │
//! │  (DisplaySink)     (EventSink)                                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Dew point · Chart history · Link status               │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Node: Scheduler (delegate-driven) · WorkQueue                 │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Environment:
//! - `ESS_CONFIG`    path to a JSON config (defaults otherwise)
//! - `ESS_RUN_SECS`  stop after this many seconds (default 60, 0 = forever)
//! - `ESS_HEADLESS`  set to run without the display
//! - `RUST_LOG`      log filter (default `info`)

use std::time::Duration as StdDuration;

use anyhow::{Context, Result, bail};
use log::{debug, info};

use ess_demo::adapters::ble::{ADDR_TYPE_RANDOM, BlePeripheral};
use ess_demo::adapters::console_display::ConsoleDisplay;
use ess_demo::adapters::ess::{EssCharacteristics, characteristic_uuid};
use ess_demo::adapters::log_sink::LogEventSink;
use ess_demo::adapters::sim::{SimBoard, SimSensor};
use ess_demo::adapters::time::HostClock;
use ess_demo::app::commands::UiInput;
use ess_demo::config::AppConfig;
use ess_demo::link::PeerAddress;
use ess_demo::runtime::{Boot, Node};
use ess_demo::sensors::Quantity;

const DEFAULT_RUN_SECS: u64 = 60;
const LOOP_SLEEP: StdDuration = StdDuration::from_millis(10);

const LOCAL_ADDRESS: PeerAddress = PeerAddress::new(ADDR_TYPE_RANDOM, [0x3a, 0x91, 0x5e, 0x0c, 0x7d, 0xc4]);
const CENTRAL_ADDRESS: PeerAddress = PeerAddress::new(0, [0x10, 0x32, 0x54, 0x76, 0x98, 0xba]);

/// HCI "remote user terminated connection".
const REASON_REMOTE_USER: u8 = 0x13;

// ── Scripted peer activity ────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Action {
    Connect,
    Disconnect,
    Touch(UiInput),
}

/// (uptime seconds, action)
const SCRIPT: &[(u32, Action)] = &[
    (15, Action::Connect),
    (
        25,
        Action::Touch(UiInput::CheckboxChanged {
            series: Quantity::Pressure,
            checked: false,
        }),
    ),
    (
        35,
        Action::Touch(UiInput::CheckboxChanged {
            series: Quantity::Pressure,
            checked: true,
        }),
    ),
    (40, Action::Disconnect),
    (50, Action::Touch(UiInput::ClearClicked)),
];

type SimNode = Node<SimSensor, ConsoleDisplay, BlePeripheral, EssCharacteristics>;

fn perform(node: &mut SimNode, action: Action) {
    match action {
        Action::Connect => {
            let event = node.radio_mut().on_central_connected(CENTRAL_ADDRESS);
            node.on_connection_event(event);
        }
        Action::Disconnect => {
            let event = node.radio_mut().on_central_disconnected(REASON_REMOTE_USER);
            node.on_connection_event(event);
        }
        Action::Touch(input) => match node.display_mut() {
            Some(display) => {
                display.inject(input);
            }
            None => info!("Touch {:?} ignored, no display", input),
        },
    }
}

/// Hand pending characteristic notifications to the (simulated) central.
fn flush_notifications(node: &mut SimNode) {
    let connected = node.service().link().is_connected();
    for q in Quantity::ALL {
        if let Some(value) = node.telemetry_mut().take_notification(q) {
            if connected {
                debug!("Notify 0x{:04X} {:02x?}", characteristic_uuid(q), value.as_slice());
            }
        }
    }
}

// ── Setup ─────────────────────────────────────────────────────

fn load_config() -> Result<AppConfig> {
    let Ok(path) = std::env::var("ESS_CONFIG") else {
        info!("Using default configuration");
        return Ok(AppConfig::default());
    };
    let bytes = std::fs::read(&path).with_context(|| format!("reading {}", path))?;
    let config = AppConfig::from_json(&bytes).map_err(|e| anyhow::anyhow!("{}: {}", path, e))?;
    info!("Configuration loaded from {}", path);
    Ok(config)
}

fn run_secs() -> Result<u64> {
    match std::env::var("ESS_RUN_SECS") {
        Ok(s) => s
            .parse()
            .with_context(|| format!("ESS_RUN_SECS={} is not a number", s)),
        Err(_) => Ok(DEFAULT_RUN_SECS),
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("╔══════════════════════════════════════╗");
    info!("║  ESS Demo v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = load_config()?;
    config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
    let run_secs = run_secs()?;

    let mut board = SimBoard::empty().with_sensor(&config.sensor_device, SimSensor::new());
    if std::env::var_os("ESS_HEADLESS").is_none() {
        board = board.with_display(&config.display_device, ConsoleDisplay::new());
    }

    let mut sink = LogEventSink::new();
    let radio = BlePeripheral::new(LOCAL_ADDRESS);

    let mut node: SimNode =
        match Node::boot(&mut board, radio, EssCharacteristics::new(), &config, &mut sink) {
            Boot::Running(node) => node,
            Boot::Halted(halted) => bail!("initialisation failed: {}", halted.reason),
        };

    info!("System ready. Entering work loop.");

    let mut clock = HostClock::new();
    let mut script = SCRIPT.iter().peekable();

    loop {
        std::thread::sleep(LOOP_SLEEP);
        node.advance(clock.lap());

        while let Some(&&(at, action)) = script.peek() {
            if node.uptime_secs() < at {
                break;
            }
            info!("Script @{}s: {:?}", at, action);
            perform(&mut node, action);
            script.next();
        }

        node.run_pending(&mut sink);
        flush_notifications(&mut node);

        if run_secs != 0 && clock.uptime_secs() >= run_secs {
            break;
        }
    }

    info!(
        "Stopping after {}s: {} update cycles, {} characteristic updates, {} dropped work items",
        node.uptime_secs(),
        node.service().cycle_count(),
        node.telemetry().update_count(),
        node.queue().dropped()
    );
    Ok(())
}
