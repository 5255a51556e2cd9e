use statig::prelude::*;

use crate::config::TripConfig;
use crate::types::{GnssSample, RideStatus};

use super::features;
use super::snapshot::{RestoredTotals, TripSnapshot};

const MS_PER_HOUR: f32 = 3_600_000.0;

#[derive(Clone, Copy, Debug)]
pub(super) struct TickFrame {
    pub(super) now_ms: u32,
    pub(super) sample: Option<GnssSample>,
}

#[derive(Clone, Copy, Debug)]
pub(super) enum TripCommand {
    Tick(TickFrame),
    PauseToggle,
    ResetTrip,
    ResetOdometer,
    ResetMaxSpeed,
    ResetAll,
    Restore(RestoredTotals),
}

pub(super) struct TripHsm {
    config: TripConfig,
    pub(super) snapshot: TripSnapshot,
    last_update_ms: Option<u32>,
    last_fix_ms: Option<u32>,
    reference_point: Option<(f64, f64)>,
    last_avg_ms: u32,
}

impl TripHsm {
    pub(super) fn new(config: TripConfig) -> Self {
        Self {
            config,
            snapshot: TripSnapshot::default(),
            last_update_ms: None,
            last_fix_ms: None,
            reference_point: None,
            last_avg_ms: 0,
        }
    }

    /// One tick of accumulation shared by every state. Returns the status
    /// the machine should be in afterwards; the state handlers translate
    /// that into transitions.
    fn step(&mut self, frame: TickFrame, status: RideStatus) -> RideStatus {
        let now_ms = frame.now_ms;
        let Some(last_ms) = self.last_update_ms else {
            // First call only establishes the time baseline.
            self.last_update_ms = Some(now_ms);
            self.last_avg_ms = now_ms;
            return status;
        };
        let dt_ms = now_ms.wrapping_sub(last_ms);
        self.last_update_ms = Some(now_ms);

        let paused = matches!(status, RideStatus::Paused);
        if !paused {
            self.snapshot.elapsed_ms += u64::from(dt_ms);
        }
        if matches!(status, RideStatus::Moving) {
            self.snapshot.moving_ms += u64::from(dt_ms);
        }

        let mut next = status;
        if let Some(sample) = frame.sample {
            let raw_kmh = features::kmh_from_mps(sample.speed_mps);
            let fix_valid = sample.fix.is_valid();
            if fix_valid {
                // The receiver stamps the sample; the timeout runs against
                // that, not against when this tick got around to it.
                self.last_fix_ms = Some(sample.t_ms);
            }
            let in_motion = fix_valid && raw_kmh > self.config.min_moving_kmh;

            // Speed and max keep updating even while paused; only the
            // status itself is sticky there.
            self.snapshot.speed_kmh = if in_motion { raw_kmh } else { 0.0 };
            if self.snapshot.speed_kmh > self.snapshot.max_speed_kmh {
                self.snapshot.max_speed_kmh = self.snapshot.speed_kmh;
            }
            if !paused {
                next = if in_motion {
                    RideStatus::Moving
                } else {
                    RideStatus::Stopped
                };
            }

            if fix_valid && !features::is_degenerate(sample.lat_deg, sample.lon_deg) {
                self.accumulate_distance(sample.lat_deg, sample.lon_deg, paused);
            }
            self.refresh_average(now_ms);
        }

        if matches!(next, RideStatus::Moving) && self.fix_timed_out(now_ms) {
            next = RideStatus::Stopped;
            self.snapshot.speed_kmh = 0.0;
        }

        if now_ms.wrapping_sub(self.last_avg_ms) >= self.config.avg_refresh_ms {
            self.refresh_average(now_ms);
        }

        self.snapshot.status = next;
        next
    }

    fn fix_timed_out(&self, now_ms: u32) -> bool {
        match self.last_fix_ms {
            Some(fix_ms) => now_ms.wrapping_sub(fix_ms) > self.config.signal_timeout_ms,
            None => true,
        }
    }

    fn accumulate_distance(&mut self, lat_deg: f64, lon_deg: f64, paused: bool) {
        let Some(reference) = self.reference_point else {
            self.reference_point = Some((lat_deg, lon_deg));
            return;
        };
        let dist_m = features::planar_distance_m(reference, (lat_deg, lon_deg));
        if !features::delta_accepted(dist_m, self.config.min_delta_m, self.config.max_delta_m) {
            // Jitter and jumps both keep the reference point where it was.
            return;
        }
        self.reference_point = Some((lat_deg, lon_deg));
        let dist_km = (dist_m / 1000.0) as f32;
        self.snapshot.total_km += dist_km;
        if !paused {
            self.snapshot.trip_km += dist_km;
        }
    }

    fn refresh_average(&mut self, now_ms: u32) {
        self.last_avg_ms = now_ms;
        self.snapshot.avg_speed_kmh = if self.snapshot.moving_ms == 0 {
            0.0
        } else {
            self.snapshot.trip_km / (self.snapshot.moving_ms as f32 / MS_PER_HOUR)
        };
    }

    fn reset_trip_fields(&mut self) {
        self.snapshot.elapsed_ms = 0;
        self.snapshot.moving_ms = 0;
        self.snapshot.trip_km = 0.0;
        self.snapshot.avg_speed_kmh = 0.0;
        self.snapshot.speed_kmh = 0.0;
        self.snapshot.status = RideStatus::Stopped;
    }

    fn reset_odometer_fields(&mut self) {
        self.snapshot.total_km = 0.0;
        self.reference_point = None;
    }

    fn restore_fields(&mut self, totals: RestoredTotals) {
        self.snapshot.total_km = totals.total_km;
        self.snapshot.trip_km = totals.trip_km;
        self.snapshot.moving_ms = totals.moving_ms;
        self.snapshot.max_speed_kmh = totals.max_speed_kmh;
        self.snapshot.status = RideStatus::Stopped;
    }
}

#[state_machine(initial = "State::stopped()")]
impl TripHsm {
    #[state(superstate = "running")]
    fn stopped(&mut self, event: &TripCommand) -> Outcome<State> {
        match event {
            TripCommand::Tick(frame) => match self.step(*frame, RideStatus::Stopped) {
                RideStatus::Moving => Transition(State::moving()),
                _ => Handled,
            },
            TripCommand::PauseToggle => {
                self.snapshot.status = RideStatus::Paused;
                Transition(State::paused())
            }
            _ => Super,
        }
    }

    #[state(superstate = "running")]
    fn moving(&mut self, event: &TripCommand) -> Outcome<State> {
        match event {
            TripCommand::Tick(frame) => match self.step(*frame, RideStatus::Moving) {
                RideStatus::Stopped => Transition(State::stopped()),
                _ => Handled,
            },
            TripCommand::PauseToggle => {
                self.snapshot.status = RideStatus::Paused;
                Transition(State::paused())
            }
            _ => Super,
        }
    }

    #[state(superstate = "running")]
    fn paused(&mut self, event: &TripCommand) -> Outcome<State> {
        match event {
            TripCommand::Tick(frame) => {
                self.step(*frame, RideStatus::Paused);
                Handled
            }
            // A second gesture resumes to Stopped, never straight to
            // Moving; the next sample promotes it if the wheels turn.
            TripCommand::PauseToggle => {
                self.snapshot.status = RideStatus::Stopped;
                Transition(State::stopped())
            }
            _ => Super,
        }
    }

    #[superstate]
    fn running(&mut self, event: &TripCommand) -> Outcome<State> {
        match event {
            TripCommand::ResetTrip => {
                self.reset_trip_fields();
                Transition(State::stopped())
            }
            TripCommand::ResetOdometer => {
                self.reset_odometer_fields();
                Handled
            }
            TripCommand::ResetMaxSpeed => {
                self.snapshot.max_speed_kmh = 0.0;
                Handled
            }
            TripCommand::ResetAll => {
                self.reset_trip_fields();
                self.reset_odometer_fields();
                Transition(State::stopped())
            }
            TripCommand::Restore(totals) => {
                self.restore_fields(*totals);
                Transition(State::stopped())
            }
            _ => Handled,
        }
    }
}
