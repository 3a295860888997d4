//! Node runtime: boot sequence, presence gate, timers and the work queue.
//!
//! ```text
//!   boot() ── sensor? ──no──▶ Halted (error banner, nothing armed)
//!              │yes
//!              ▼
//!           radio.enable() ──err──▶ Halted
//!              │ok
//!              ▼
//!           advertise · bind display · AppService::start · arm timers
//!              │
//!              ▼
//!   advance(elapsed) ──▶ Scheduler ──▶ WorkQueue ──▶ run_pending()
//! ```
//!
//! Everything after boot happens inside [`Node::run_pending`], one work
//! item at a time.

use embassy_time::Duration;
use log::{error, info, warn};

use crate::app::commands::AppCommand;
use crate::app::events::AppEvent;
use crate::app::ports::{
    DeviceBinder, DisplaySink, EventSink, RadioPort, SchedulerDelegate, SensorDriver,
    TelemetrySink, TimerId,
};
use crate::app::service::AppService;
use crate::config::{AppConfig, UpdateGating};
use crate::error::InitError;
use crate::events::{Work, WorkQueue};
use crate::link::{self, ConnectionEvent};
use crate::presence::PresenceFlags;
use crate::scheduler::{Scheduler, TimerSpec};
use crate::sensors::SensorReadingAdapter;

/// Result of [`Node::boot`].
pub enum Boot<S, D, R, T> {
    Running(Node<S, D, R, T>),
    Halted(Halted<D, R, T>),
}

/// Terminal boot failure. The adapters are handed back untouched apart
/// from the error banner on the display.
pub struct Halted<D, R, T> {
    pub reason: InitError,
    pub display: Option<D>,
    pub radio: R,
    pub telemetry: T,
}

/// A booted node.
pub struct Node<S, D, R, T> {
    service: AppService,
    sensor: SensorReadingAdapter<S>,
    display: Option<D>,
    radio: R,
    telemetry: T,
    scheduler: Scheduler,
    queue: WorkQueue,
    gating: UpdateGating,
    uptime: Duration,
}

impl<S, D, R, T> Node<S, D, R, T>
where
    S: SensorDriver,
    D: DisplaySink,
    R: RadioPort,
    T: TelemetrySink,
{
    /// Bring the node up.
    ///
    /// The sensor and the radio are hard dependencies: if either fails the
    /// node halts with an error banner and arms nothing. The display is
    /// optional.
    pub fn boot<B>(
        binder: &mut B,
        mut radio: R,
        telemetry: T,
        config: &AppConfig,
        sink: &mut impl EventSink,
    ) -> Boot<S, D, R, T>
    where
        B: DeviceBinder<Sensor = S, Display = D>,
    {
        // 1. Sensor
        let sensor = SensorReadingAdapter::setup(
            binder.bind_sensor(&config.sensor_device),
            &config.sensor_device,
        );
        if !sensor.is_present() {
            error!("Sensor not detected, application cannot start");
            return Self::halt(InitError::SensorNotDetected, binder, radio, telemetry, config, sink);
        }

        // 2. Radio
        if let Err(e) = radio.enable() {
            error!("Bluetooth init failed ({})", e);
            return Self::halt(InitError::RadioInitFailed(e), binder, radio, telemetry, config, sink);
        }
        info!("Bluetooth initialized");

        // 3. Advertising is best effort
        match radio.start_advertising(&config.device_name) {
            Ok(()) => info!("Advertising successfully started"),
            Err(e) => error!("Advertising failed to start ({})", e),
        }

        // 4. Display
        let mut display = binder.bind_display(&config.display_device);
        if display.is_none() {
            warn!("Display device {} was not found, running headless", config.display_device);
        }
        let presence = PresenceFlags::new(true, display.is_some());

        let mut node = Self {
            service: AppService::new(config, presence, radio.local_identity()),
            sensor,
            display: None,
            radio,
            telemetry,
            scheduler: Scheduler::new(),
            queue: WorkQueue::new(),
            gating: config.update_gating,
            uptime: Duration::from_ticks(0),
        };
        node.service.start(&mut display, 0, sink);
        node.display = display;

        // 5. Timers
        let display_period = Duration::from_millis(u64::from(config.display_input_interval_ms));
        node.scheduler.add(TimerSpec::periodic(
            TimerId::DisplayInput,
            display_period,
            display_period,
        ));
        if presence.display() {
            node.scheduler.start(TimerId::DisplayInput);
        }

        node.scheduler.add(TimerSpec::periodic(
            TimerId::ServiceUpdate,
            Duration::from_millis(u64::from(config.service_start_delay_ms)),
            Duration::from_millis(u64::from(config.service_update_interval_ms)),
        ));
        if node.gating == UpdateGating::Always {
            node.scheduler.start(TimerId::ServiceUpdate);
        }

        // 6. Prime the cache so the first display refresh has real data
        node.sensor.fetch();

        Boot::Running(node)
    }

    fn halt<B>(
        reason: InitError,
        binder: &mut B,
        radio: R,
        telemetry: T,
        config: &AppConfig,
        sink: &mut impl EventSink,
    ) -> Boot<S, D, R, T>
    where
        B: DeviceBinder<Sensor = S, Display = D>,
    {
        let mut display = binder.bind_display(&config.display_device);
        display.show_error(&link::error_text(reason.display_message()));
        display.run_pending();
        sink.emit(&AppEvent::Halted(reason));
        Boot::Halted(Halted {
            reason,
            display,
            radio,
            telemetry,
        })
    }

    // ── Driving ───────────────────────────────────────────────

    /// Advance virtual time and enqueue whatever timers expired.
    pub fn advance(&mut self, elapsed: Duration) {
        self.uptime += elapsed;
        let mut enqueue = QueueDelegate {
            queue: &mut self.queue,
        };
        self.scheduler.tick(elapsed, &mut enqueue);
    }

    /// Queue a connection notification from the wireless stack.
    pub fn on_connection_event(&mut self, event: ConnectionEvent) -> bool {
        self.queue.push(Work::Link(event))
    }

    /// Queue an external command.
    pub fn submit(&mut self, cmd: AppCommand) -> bool {
        self.queue.push(Work::Command(cmd))
    }

    /// Drain the work queue, one item at a time. Returns items processed.
    pub fn run_pending(&mut self, sink: &mut impl EventSink) -> usize {
        let mut processed = 0;
        while let Some(work) = self.queue.pop() {
            self.run_work(work, sink);
            processed += 1;
        }
        processed
    }

    fn run_work(&mut self, work: Work, sink: &mut impl EventSink) {
        let uptime_secs = self.uptime_secs();
        match work {
            Work::ServiceUpdate => {
                self.service.run_update_cycle(
                    &mut self.sensor,
                    &mut self.telemetry,
                    &mut self.display,
                    sink,
                );
            }
            Work::DisplayInput => {
                self.service
                    .on_display_tick(&mut self.display, uptime_secs, sink);
            }
            Work::Command(cmd) => {
                self.service.handle_command(cmd, &mut self.display, sink);
            }
            Work::Link(event) => {
                self.service
                    .handle_link_event(event, &mut self.display, uptime_secs, sink);
                self.apply_gating(event, sink);
            }
        }
    }

    /// Connection-gated updates: run now and arm on connect, stop on
    /// disconnect.
    fn apply_gating(&mut self, event: ConnectionEvent, sink: &mut impl EventSink) {
        if self.gating != UpdateGating::WhileConnected {
            return;
        }
        match event {
            ConnectionEvent::Connected(_) => {
                self.scheduler.start_periodic_now(TimerId::ServiceUpdate);
                self.service.run_update_cycle(
                    &mut self.sensor,
                    &mut self.telemetry,
                    &mut self.display,
                    sink,
                );
            }
            ConnectionEvent::Disconnected { .. } => {
                self.scheduler.stop(TimerId::ServiceUpdate);
            }
            ConnectionEvent::ConnectFailed(_) => {}
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn service(&self) -> &AppService {
        &self.service
    }

    pub fn sensor(&self) -> &SensorReadingAdapter<S> {
        &self.sensor
    }

    pub fn display(&self) -> Option<&D> {
        self.display.as_ref()
    }

    /// Simulated touch input goes in through here.
    pub fn display_mut(&mut self) -> Option<&mut D> {
        self.display.as_mut()
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    pub fn telemetry_mut(&mut self) -> &mut T {
        &mut self.telemetry
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn queue(&self) -> &WorkQueue {
        &self.queue
    }

    /// Whole seconds since boot.
    pub fn uptime_secs(&self) -> u32 {
        (self.uptime.as_secs()).min(u64::from(u32::MAX)) as u32
    }
}

/// Forwards timer expiries into the work queue.
struct QueueDelegate<'a> {
    queue: &'a mut WorkQueue,
}

impl SchedulerDelegate for QueueDelegate<'_> {
    fn on_timer_fired(&mut self, id: TimerId) {
        let work = match id {
            TimerId::DisplayInput => Work::DisplayInput,
            TimerId::ServiceUpdate => Work::ServiceUpdate,
        };
        self.queue.push(work);
    }
}
