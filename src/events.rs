//! Serialized work queue.
//!
//! Work items are produced by:
//! - Timer expiries (display input tick, service update tick)
//! - Connection notifications from the wireless stack
//! - External commands (chart interaction)
//!
//! and consumed by [`Node::run_pending`](crate::runtime::Node::run_pending),
//! which runs them to completion one at a time in FIFO order. No two work
//! items ever interleave, so the state they touch needs no locking.
//!
//! Timer work is coalesced: a timer item that is already pending is not
//! queued a second time.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Timers      │────▶│              │     │              │
//! │ Link events │────▶│  Work Queue  │────▶│  Node        │
//! │ Commands    │────▶│  (bounded)   │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::commands::AppCommand;
use crate::link::ConnectionEvent;

/// Maximum number of pending work items.
pub const WORK_QUEUE_DEPTH: usize = 16;

/// One unit of deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Work {
    /// Sample → dew point → telemetry → chart.
    ServiceUpdate,
    /// Display toolkit housekeeping, input and status refresh.
    DisplayInput,
    /// Connect / disconnect notification.
    Link(ConnectionEvent),
    /// Chart interaction or other external command.
    Command(AppCommand),
}

impl Work {
    /// Pending-bit for timer-driven items; `None` for everything else.
    const fn timer_bit(&self) -> Option<u8> {
        match self {
            Self::ServiceUpdate => Some(1 << 0),
            Self::DisplayInput => Some(1 << 1),
            Self::Link(_) | Self::Command(_) => None,
        }
    }
}

/// Bounded FIFO of [`Work`] items.
pub struct WorkQueue {
    channel: Channel<CriticalSectionRawMutex, Work, WORK_QUEUE_DEPTH>,
    /// Timer items currently queued.
    pending_timers: u8,
    dropped: u32,
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            pending_timers: 0,
            dropped: 0,
        }
    }

    /// Enqueue an item. Returns `false` if the queue is full (item dropped).
    ///
    /// A timer item that is already pending is coalesced and reported as
    /// accepted.
    pub fn push(&mut self, work: Work) -> bool {
        let bit = work.timer_bit();
        if let Some(b) = bit {
            if self.pending_timers & b != 0 {
                return true;
            }
        }
        match self.channel.try_send(work) {
            Ok(()) => {
                if let Some(b) = bit {
                    self.pending_timers |= b;
                }
                true
            }
            Err(_) => {
                self.dropped = self.dropped.saturating_add(1);
                warn!("Work queue full, dropped {:?}", work);
                false
            }
        }
    }

    /// Dequeue the oldest item.
    pub fn pop(&mut self) -> Option<Work> {
        let work = self.channel.try_receive().ok()?;
        if let Some(b) = work.timer_bit() {
            self.pending_timers &= !b;
        }
        Some(work)
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Items dropped because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.channel.clear();
        self.pending_timers = 0;
    }
}
