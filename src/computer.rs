//! The per-tick control loop tying the engines to the hardware
//! collaborators. Single-threaded and cooperative: every tick reads the
//! pins, advances the gesture and trip machines, runs the save policy,
//! and pushes the current page to the display.

use embedded_storage::Storage;

use crate::config::{GestureConfig, PinConfig, SaveConfig, TripConfig};
use crate::display::{render_page, DisplayPage};
use crate::hw::{GnssReceiver, PinReader, TripDisplay};
use crate::input::{GestureEvent, InputEngine};
use crate::storage::TripStore;
use crate::trip::{RestoredTotals, TripEngine, TripSnapshot};
use crate::types::Button;

#[derive(Clone, Copy, Debug, Default)]
pub struct ComputerConfig {
    pub trip: TripConfig,
    pub gesture: GestureConfig,
    pub save: SaveConfig,
    pub pins: PinConfig,
}

pub struct Computer<R, P, D, S> {
    receiver: R,
    pins: P,
    display: D,
    trip: TripEngine,
    input: InputEngine,
    store: TripStore<S>,
    page: DisplayPage,
    voltage: f32,
    pin_config: PinConfig,
}

impl<R, P, D, S> Computer<R, P, D, S>
where
    R: GnssReceiver,
    P: PinReader,
    D: TripDisplay,
    S: Storage,
{
    pub fn new(receiver: R, pins: P, display: D, storage: S, config: ComputerConfig) -> Self {
        Self {
            receiver,
            pins,
            display,
            trip: TripEngine::new(config.trip),
            input: InputEngine::new(config.gesture),
            store: TripStore::new(storage, config.save),
            page: DisplayPage::default(),
            voltage: 0.0,
            pin_config: config.pins,
        }
    }

    /// Restore the persisted totals, then bring up the devices. A false
    /// return means the receiver or the display refused to start; the
    /// caller decides whether to halt or run degraded.
    pub fn begin(&mut self) -> bool {
        let record = self.store.load();
        self.trip.restore(RestoredTotals {
            total_km: record.total_km,
            trip_km: record.trip_km,
            moving_ms: record.moving_ms,
            max_speed_kmh: record.max_speed_kmh,
        });
        if record.total_km > 0.0 {
            log::info!("restored {} km total", record.total_km);
        }
        let receiver_ok = self.receiver.begin();
        let display_ok = self.display.begin();
        receiver_ok && display_ok
    }

    pub fn tick(&mut self, now_ms: u32) {
        let mode_level = self.pins.read_level(self.pin_config.mode_pin);
        let set_level = self.pins.read_level(self.pin_config.set_pin);
        if let Some(event) = self.input.tick(now_ms, mode_level, set_level) {
            self.apply_gesture(event);
        }

        let sample = self.receiver.poll();
        let fresh_sample = sample.is_some();
        let snapshot = self.trip.tick(now_ms, sample);

        self.store
            .maybe_save(&snapshot, self.voltage, now_ms, fresh_sample);
        self.render(&snapshot);
    }

    /// Battery telemetry; rides along in the persisted record but never
    /// triggers a write on its own.
    pub fn note_battery_voltage(&mut self, volts: f32) {
        self.voltage = volts;
    }

    pub fn snapshot(&self) -> TripSnapshot {
        self.trip.snapshot()
    }

    pub fn page(&self) -> DisplayPage {
        self.page
    }

    fn apply_gesture(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::Single(Button::Mode) => self.page = self.page.toggled(),
            GestureEvent::Single(Button::Set) => self.trip.pause_toggle(),
            GestureEvent::Reset => self.trip.reset_trip(),
            GestureEvent::ResetLong => {
                self.trip.reset_all();
                self.trip.reset_max_speed();
                self.store.clear();
            }
        }
    }

    fn render(&mut self, snapshot: &TripSnapshot) {
        for line in render_page(self.page, snapshot) {
            self.display.show(line.field, line.value.as_str());
        }
    }
}
