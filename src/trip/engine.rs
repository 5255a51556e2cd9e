use statig::blocking::IntoStateMachineExt as _;

use crate::config::TripConfig;
use crate::types::GnssSample;

use super::machine::{TickFrame, TripCommand, TripHsm};
use super::snapshot::{RestoredTotals, TripSnapshot};

/// The trip motion state machine behind a plain call interface. One `tick`
/// per scheduler pass; the command methods are driven by user gestures and
/// by boot-time restore.
pub struct TripEngine {
    machine: statig::blocking::StateMachine<TripHsm>,
}

impl TripEngine {
    pub fn new(config: TripConfig) -> Self {
        Self {
            machine: TripHsm::new(config).state_machine(),
        }
    }

    /// Advance by one tick. `sample` is `None` on ticks without a fresh
    /// fix; elapsed time still accumulates from `now_ms`.
    pub fn tick(&mut self, now_ms: u32, sample: Option<GnssSample>) -> TripSnapshot {
        self.machine
            .handle(&TripCommand::Tick(TickFrame { now_ms, sample }));
        self.snapshot()
    }

    pub fn pause_toggle(&mut self) {
        self.machine.handle(&TripCommand::PauseToggle);
    }

    /// Zeroes trip distance and both time counters; the odometer survives.
    pub fn reset_trip(&mut self) {
        self.machine.handle(&TripCommand::ResetTrip);
    }

    /// Zeroes the lifetime odometer and drops the distance reference
    /// point; the next valid fix starts a fresh baseline.
    pub fn reset_odometer(&mut self) {
        self.machine.handle(&TripCommand::ResetOdometer);
    }

    pub fn reset_max_speed(&mut self) {
        self.machine.handle(&TripCommand::ResetMaxSpeed);
    }

    /// Trip and odometer reset together.
    pub fn reset_all(&mut self) {
        self.machine.handle(&TripCommand::ResetAll);
    }

    /// Seed the persisted fields at boot; the machine always wakes up
    /// Stopped.
    pub fn restore(&mut self, totals: RestoredTotals) {
        self.machine.handle(&TripCommand::Restore(totals));
    }

    pub fn snapshot(&self) -> TripSnapshot {
        self.machine.inner().snapshot
    }
}
