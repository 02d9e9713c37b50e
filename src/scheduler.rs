//! Run/idle cycle engine.
//!
//! One loop drives every fan in the registry through the same periodic
//! schedule:
//!
//! ```text
//!   ┌──────────┐  runtime   ┌──────────────┐  0s   ┌──────────┐
//!   │ Running  │ ─────────▶ │ CooldownWait │ ────▶ │   Idle   │
//!   │ fans on  │            │ speed report │       │ fans off │
//!   └──────────┘            └──────────────┘       └────┬─────┘
//!        ▲                                              │
//!        └──────────────────── interval ────────────────┘
//! ```
//!
//! There is no terminal state.  The run time and interval are re-read
//! from the registry every time a phase is entered, so a setter call takes
//! effect at the next boundary and never shortens a hold already in
//! progress.
//!
//! [`FanScheduler::step`] performs exactly one phase and returns how long
//! the caller should hold before the next one; [`FanScheduler::run`] wraps
//! it with cancellable holds on a [`ShutdownSignal`].

use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::app::events::FanEvent;
use crate::app::ports::EventSink;
use crate::registry::FanRegistry;
use crate::shutdown::ShutdownSignal;

// ═══════════════════════════════════════════════════════════════
//  Phases
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// Every fan at its stored power for `runtime` seconds.
    Running,
    /// Run window over; fan speeds are reported.
    CooldownWait,
    /// Every fan off for `interval` seconds.
    Idle,
}

impl CyclePhase {
    pub const fn next(self) -> Self {
        match self {
            Self::Running => Self::CooldownWait,
            Self::CooldownWait => Self::Idle,
            Self::Idle => Self::Running,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

pub struct FanScheduler<S: EventSink> {
    registry: Arc<FanRegistry>,
    sink: S,
    phase: CyclePhase,
    cycle: u64,
}

impl<S: EventSink> FanScheduler<S> {
    pub fn new(registry: Arc<FanRegistry>, sink: S) -> Self {
        Self {
            registry,
            sink,
            phase: CyclePhase::Running,
            cycle: 0,
        }
    }

    /// Phase the next [`step`](Self::step) will execute.
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Completed or in-progress cycles.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Execute the pending phase.  Returns that phase and the number of
    /// seconds to hold before calling again.
    pub fn step(&mut self) -> (CyclePhase, u32) {
        let phase = self.phase;
        let hold_secs = match phase {
            CyclePhase::Running => {
                self.cycle += 1;
                self.sink.emit(&FanEvent::CycleStarted { cycle: self.cycle });
                self.registry.start_fans(&mut self.sink);
                self.registry.runtime_secs()
            }
            CyclePhase::CooldownWait => {
                self.registry.report_speeds(&mut self.sink);
                0
            }
            CyclePhase::Idle => {
                self.registry.stop_fans(&mut self.sink);
                self.registry.interval_secs()
            }
        };
        self.sink.emit(&FanEvent::PhaseEntered { phase, hold_secs });
        self.phase = phase.next();
        (phase, hold_secs)
    }

    /// Cycle until `shutdown` is triggered, then switch every fan off.
    pub fn run(&mut self, shutdown: &ShutdownSignal) {
        info!(
            "Scheduler: {} fan(s), runtime {}s, interval {}s",
            self.registry.len(),
            self.registry.runtime_secs(),
            self.registry.interval_secs()
        );

        while !shutdown.is_triggered() {
            let (_, hold_secs) = self.step();
            if hold_secs > 0 && shutdown.wait_timeout(Duration::from_secs(u64::from(hold_secs))) {
                break;
            }
        }

        self.registry.stop_fans(&mut self.sink);
        self.sink.emit(&FanEvent::Stopped { cycle: self.cycle });
    }
}
