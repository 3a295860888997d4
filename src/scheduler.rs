//! Timer engine.
//!
//! Tracks a handful of one-shot / periodic timers against elapsed time
//! supplied by the caller and notifies a [`SchedulerDelegate`] when one
//! expires. The node implements the delegate to push work items into its
//! queue; the scheduler itself does no work.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Timer sources                           │
//! │                                                              │
//! │   ┌──────────────────┐              ┌──────────────────┐     │
//! │   │ DisplayInput     │              │ ServiceUpdate    │     │
//! │   │ 10 ms / 10 ms    │              │ 2 s, then 10 s   │     │
//! │   └────────┬─────────┘              └────────┬─────────┘     │
//! │            │                                 │               │
//! │            ▼                                 ▼               │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              SchedulerDelegate                         │  │
//! │  │         (node pushes into the work queue)              │  │
//! │  └───────────────────────┬────────────────────────────────┘  │
//! │                          ▼                                   │
//! │                 Node::run_pending()                          │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use embassy_time::Duration;
use log::{debug, info, warn};

use crate::app::ports::{SchedulerDelegate, TimerId};

// ═══════════════════════════════════════════════════════════════
//  Timer types
// ═══════════════════════════════════════════════════════════════

/// How a timer fires once armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSpec {
    pub id: TimerId,
    /// Delay before the first fire.
    pub initial_delay: Duration,
    /// Period after the first fire; `None` for one-shot.
    pub period: Option<Duration>,
}

impl TimerSpec {
    pub const fn periodic(id: TimerId, initial_delay: Duration, period: Duration) -> Self {
        Self {
            id,
            initial_delay,
            period: Some(period),
        }
    }

    pub const fn one_shot(id: TimerId, delay: Duration) -> Self {
        Self {
            id,
            initial_delay: delay,
            period: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Maximum number of registered timers (stack-allocated).
const MAX_TIMERS: usize = 4;

/// Upper bound on catch-up fires per timer per tick.
const MAX_CATCH_UP: u32 = 64;

/// The timer engine.
///
/// Decoupled from the work queue: expiries go to the
/// [`SchedulerDelegate`], so the engine is testable on its own.
pub struct Scheduler {
    timers: [Option<TimerEntry>; MAX_TIMERS],
}

/// Internal bookkeeping for a registered timer.
#[derive(Debug, Clone, Copy)]
struct TimerEntry {
    spec: TimerSpec,
    armed: bool,
    /// Time left until the next fire.
    remaining: Duration,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub const fn new() -> Self {
        Self {
            timers: [None; MAX_TIMERS],
        }
    }

    /// Register a timer, disarmed. Replaces any timer with the same id.
    ///
    /// Returns `false` if the table is full or the period is zero.
    pub fn add(&mut self, spec: TimerSpec) -> bool {
        if spec.period == Some(Duration::from_ticks(0)) {
            warn!("Scheduler: rejected {:?} with zero period", spec.id);
            return false;
        }

        let entry = TimerEntry {
            spec,
            armed: false,
            remaining: spec.initial_delay,
        };

        if let Some(slot) = self.slot_mut(spec.id) {
            *slot = entry;
            return true;
        }
        for slot in &mut self.timers {
            if slot.is_none() {
                *slot = Some(entry);
                return true;
            }
        }
        false // All slots full.
    }

    /// Arm a registered timer from its initial delay.
    pub fn start(&mut self, id: TimerId) {
        if let Some(entry) = self.slot_mut(id) {
            entry.armed = true;
            entry.remaining = entry.spec.initial_delay;
            info!(
                "Scheduler: {:?} armed ({} ms, then {:?} ms)",
                id,
                entry.spec.initial_delay.as_millis(),
                entry.spec.period.map(|p| p.as_millis())
            );
        } else {
            warn!("Scheduler: start of unregistered {:?}", id);
        }
    }

    /// Arm a registered timer so its first fire comes one period from now.
    pub fn start_periodic_now(&mut self, id: TimerId) {
        if let Some(entry) = self.slot_mut(id) {
            entry.armed = true;
            entry.remaining = entry.spec.period.unwrap_or(entry.spec.initial_delay);
            info!("Scheduler: {:?} armed on period", id);
        }
    }

    /// Disarm a timer. Its registration is kept.
    pub fn stop(&mut self, id: TimerId) {
        if let Some(entry) = self.slot_mut(id) {
            if entry.armed {
                info!("Scheduler: {:?} stopped", id);
            }
            entry.armed = false;
        }
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers
            .iter()
            .flatten()
            .any(|e| e.spec.id == id && e.armed)
    }

    /// Number of armed timers.
    pub fn armed_count(&self) -> usize {
        self.timers.iter().flatten().filter(|e| e.armed).count()
    }

    /// Advance every armed timer by `elapsed`.
    ///
    /// A periodic timer that fell behind fires once per whole period that
    /// elapsed, up to a catch-up bound. A one-shot disarms after firing.
    pub fn tick(&mut self, elapsed: Duration, delegate: &mut dyn SchedulerDelegate) {
        for entry in self.timers.iter_mut().flatten() {
            if !entry.armed {
                continue;
            }

            let mut budget = elapsed;
            let mut fires = 0;
            loop {
                if budget < entry.remaining {
                    entry.remaining -= budget;
                    break;
                }
                budget -= entry.remaining;
                delegate.on_timer_fired(entry.spec.id);
                fires += 1;

                match entry.spec.period {
                    Some(p) => entry.remaining = p,
                    None => {
                        entry.armed = false;
                        break;
                    }
                }

                if fires >= MAX_CATCH_UP {
                    warn!(
                        "Scheduler: {:?} fell behind, dropping {} ms",
                        entry.spec.id,
                        budget.as_millis()
                    );
                    break;
                }
            }

            if fires > 1 {
                debug!("Scheduler: {:?} caught up {} fires", entry.spec.id, fires);
            }
        }
    }

    fn slot_mut(&mut self, id: TimerId) -> Option<&mut TimerEntry> {
        self.timers.iter_mut().flatten().find(|e| e.spec.id == id)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
