use embedded_storage::Storage;

use crate::config::{SaveConfig, TRIP_STORE_OFFSET};
use crate::trip::TripSnapshot;

use super::record::{RecordStore, TripRecord};

/// Decides when the totals are worth a storage write. Writes are spaced by
/// the save interval, skipped when nothing but the telemetry voltage
/// changed, and deferred past ticks that carry a fresh satellite sample so
/// the slow write never overlaps sample processing.
pub struct TripStore<S> {
    store: RecordStore<S>,
    config: SaveConfig,
    last_written: TripRecord,
    last_save_ms: u32,
}

impl<S: Storage> TripStore<S> {
    pub fn new(storage: S, config: SaveConfig) -> Self {
        Self {
            store: RecordStore::new(storage, TRIP_STORE_OFFSET),
            config,
            last_written: TripRecord::default(),
            last_save_ms: 0,
        }
    }

    /// Boot-time read; also seeds the change detector so an unchanged
    /// session never rewrites the same totals.
    pub fn load(&mut self) -> TripRecord {
        let record = self.store.load();
        self.last_written = record;
        record
    }

    pub fn maybe_save(
        &mut self,
        snapshot: &TripSnapshot,
        voltage: f32,
        now_ms: u32,
        fresh_sample: bool,
    ) {
        if now_ms.wrapping_sub(self.last_save_ms) < self.config.interval_ms {
            return;
        }
        if fresh_sample {
            // Interval already elapsed; pick the next quiet tick instead.
            return;
        }
        let current = TripRecord {
            total_km: snapshot.total_km,
            trip_km: snapshot.trip_km,
            moving_ms: snapshot.moving_ms,
            max_speed_kmh: snapshot.max_speed_kmh,
            voltage,
        };
        if current.totals_match(self.last_written) {
            self.last_save_ms = now_ms;
            return;
        }
        self.store.save(current);
        self.last_written = current;
        self.last_save_ms = now_ms;
        log::debug!("totals saved at {} km", current.total_km);
    }

    /// Full-reset gesture: zero the stored totals through the same
    /// two-phase protocol.
    pub fn clear(&mut self) {
        self.store.clear();
        self.last_written = TripRecord::default();
    }
}
