use embedded_storage::Storage;

use crate::config::{
    TRIP_STORE_MAGIC, TRIP_STORE_MAGIC_INVALID, TRIP_STORE_MAX_KM, TRIP_STORE_RECORD_LEN,
};

/// The persisted totals. `voltage` rides along for telemetry and is
/// deliberately left out of [`TripRecord::totals_match`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TripRecord {
    pub total_km: f32,
    pub trip_km: f32,
    pub moving_ms: u64,
    pub max_speed_kmh: f32,
    pub voltage: f32,
}

impl TripRecord {
    /// Little-endian layout:
    /// `magic:u32 | total_km:f32 | trip_km:f32 | moving_ms:u64 |
    ///  max_speed:f32 | voltage:f32 | crc:u32`.
    pub(crate) fn record_bytes(self) -> [u8; TRIP_STORE_RECORD_LEN] {
        let mut record = [0u8; TRIP_STORE_RECORD_LEN];
        record[0..4].copy_from_slice(&TRIP_STORE_MAGIC.to_le_bytes());
        record[4..8].copy_from_slice(&self.total_km.to_le_bytes());
        record[8..12].copy_from_slice(&self.trip_km.to_le_bytes());
        record[12..20].copy_from_slice(&self.moving_ms.to_le_bytes());
        record[20..24].copy_from_slice(&self.max_speed_kmh.to_le_bytes());
        record[24..28].copy_from_slice(&self.voltage.to_le_bytes());
        let crc = crc32(&record[..TRIP_STORE_RECORD_LEN - 4]);
        record[TRIP_STORE_RECORD_LEN - 4..].copy_from_slice(&crc.to_le_bytes());
        record
    }

    pub(crate) fn from_record(record: &[u8; TRIP_STORE_RECORD_LEN]) -> Option<Self> {
        let magic = u32::from_le_bytes([record[0], record[1], record[2], record[3]]);
        if magic != TRIP_STORE_MAGIC {
            return None;
        }
        let stored_crc = u32::from_le_bytes([
            record[TRIP_STORE_RECORD_LEN - 4],
            record[TRIP_STORE_RECORD_LEN - 3],
            record[TRIP_STORE_RECORD_LEN - 2],
            record[TRIP_STORE_RECORD_LEN - 1],
        ]);
        if stored_crc != crc32(&record[..TRIP_STORE_RECORD_LEN - 4]) {
            return None;
        }
        let decoded = Self {
            total_km: f32::from_le_bytes([record[4], record[5], record[6], record[7]]),
            trip_km: f32::from_le_bytes([record[8], record[9], record[10], record[11]]),
            moving_ms: u64::from_le_bytes([
                record[12], record[13], record[14], record[15], record[16], record[17],
                record[18], record[19],
            ]),
            max_speed_kmh: f32::from_le_bytes([record[20], record[21], record[22], record[23]]),
            voltage: f32::from_le_bytes([record[24], record[25], record[26], record[27]]),
        };
        if !decoded.is_plausible() {
            return None;
        }
        Some(decoded)
    }

    /// Domain validation on top of the checksum: a record that passes CRC
    /// but carries garbage totals still reads as corrupt.
    fn is_plausible(&self) -> bool {
        let finite_and_positive = |value: f32| value.is_finite() && value >= 0.0;
        finite_and_positive(self.total_km)
            && finite_and_positive(self.trip_km)
            && finite_and_positive(self.max_speed_kmh)
            && self.total_km < TRIP_STORE_MAX_KM
            && self.trip_km < TRIP_STORE_MAX_KM
    }

    /// Field equality for the save policy; the telemetry voltage alone
    /// must never trigger a storage write.
    pub(crate) fn totals_match(self, other: Self) -> bool {
        self.total_km == other.total_km
            && self.trip_km == other.trip_km
            && self.moving_ms == other.moving_ms
            && self.max_speed_kmh == other.max_speed_kmh
    }
}

/// One fixed-size totals record over byte-addressable non-volatile
/// storage. Corruption is detected on read and answered with a zeroed
/// default, never an error: a bad record must not block boot.
pub struct RecordStore<S> {
    pub(crate) storage: S,
    offset: u32,
}

impl<S: Storage> RecordStore<S> {
    pub fn new(storage: S, offset: u32) -> Self {
        Self { storage, offset }
    }

    pub fn load(&mut self) -> TripRecord {
        let mut record = [0u8; TRIP_STORE_RECORD_LEN];
        if self.storage.read(self.offset, &mut record).is_err() {
            log::warn!("totals record unreadable, starting from zeroed totals");
            return TripRecord::default();
        }
        match TripRecord::from_record(&record) {
            Some(decoded) => decoded,
            None => {
                log::warn!("totals record invalid, starting from zeroed totals");
                TripRecord::default()
            }
        }
    }

    /// Two-phase update: stamp the magic word invalid first, then write
    /// the whole record. A write torn anywhere in between reads back as
    /// invalid instead of as stale totals. Each call costs flash wear;
    /// the save policy above decides when calling is worth it.
    pub fn save(&mut self, record: TripRecord) {
        let _ = self
            .storage
            .write(self.offset, &TRIP_STORE_MAGIC_INVALID.to_le_bytes());
        let _ = self.storage.write(self.offset, &record.record_bytes());
    }

    pub fn clear(&mut self) {
        self.save(TripRecord::default());
    }
}

/// CRC-32, reflected polynomial 0xEDB88320, init 0xFFFFFFFF, final
/// complement.
pub(crate) fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB8_8320;
            } else {
                crc >>= 1;
            }
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TRIP_STORE_OFFSET;
    use embedded_storage::ReadStorage;

    /// 1024-byte RAM stand-in for the EEPROM-class part.
    struct RamStorage {
        data: [u8; 1024],
    }

    impl RamStorage {
        fn new() -> Self {
            Self { data: [0xFF; 1024] }
        }
    }

    impl ReadStorage for RamStorage {
        type Error = core::convert::Infallible;

        fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
            let start = offset as usize;
            bytes.copy_from_slice(&self.data[start..start + bytes.len()]);
            Ok(())
        }

        fn capacity(&self) -> usize {
            self.data.len()
        }
    }

    impl Storage for RamStorage {
        fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
            let start = offset as usize;
            self.data[start..start + bytes.len()].copy_from_slice(bytes);
            Ok(())
        }
    }

    fn sample_record() -> TripRecord {
        TripRecord {
            total_km: 1542.25,
            trip_km: 23.5,
            moving_ms: 5_400_000,
            max_speed_kmh: 51.3,
            voltage: 3.92,
        }
    }

    #[test]
    fn crc32_matches_the_standard_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = RecordStore::new(RamStorage::new(), TRIP_STORE_OFFSET);
        store.save(sample_record());
        assert_eq!(store.load(), sample_record());
    }

    #[test]
    fn erased_storage_loads_as_defaults() {
        let mut store = RecordStore::new(RamStorage::new(), TRIP_STORE_OFFSET);
        assert_eq!(store.load(), TripRecord::default());
    }

    #[test]
    fn any_corrupt_crc_byte_falls_back_to_defaults() {
        for i in TRIP_STORE_RECORD_LEN - 4..TRIP_STORE_RECORD_LEN {
            let mut store = RecordStore::new(RamStorage::new(), TRIP_STORE_OFFSET);
            store.save(sample_record());
            store.storage.data[i] ^= 0x40;
            assert_eq!(store.load(), TripRecord::default(), "byte {i}");
        }
    }

    #[test]
    fn corrupt_payload_byte_falls_back_to_defaults() {
        let mut store = RecordStore::new(RamStorage::new(), TRIP_STORE_OFFSET);
        store.save(sample_record());
        store.storage.data[9] ^= 0x01;
        assert_eq!(store.load(), TripRecord::default());
    }

    #[test]
    fn torn_write_reads_as_defaults_not_stale_totals() {
        let mut store = RecordStore::new(RamStorage::new(), TRIP_STORE_OFFSET);
        store.save(sample_record());
        // Power lost between the invalidate phase and the record write.
        let _ = store
            .storage
            .write(TRIP_STORE_OFFSET, &TRIP_STORE_MAGIC_INVALID.to_le_bytes());
        assert_eq!(store.load(), TripRecord::default());
    }

    #[test]
    fn implausible_totals_fail_domain_validation() {
        for bad in [
            TripRecord {
                total_km: -1.0,
                ..sample_record()
            },
            TripRecord {
                trip_km: f32::NAN,
                ..sample_record()
            },
            TripRecord {
                total_km: 2_000_000.0,
                ..sample_record()
            },
        ] {
            let mut store = RecordStore::new(RamStorage::new(), TRIP_STORE_OFFSET);
            store.save(bad);
            assert_eq!(store.load(), TripRecord::default());
        }
    }

    #[test]
    fn clear_overwrites_previous_totals() {
        let mut store = RecordStore::new(RamStorage::new(), TRIP_STORE_OFFSET);
        store.save(sample_record());
        store.clear();
        assert_eq!(store.load(), TripRecord::default());
    }

    #[test]
    fn voltage_is_excluded_from_totals_equality() {
        let base = sample_record();
        let retuned = TripRecord {
            voltage: 4.05,
            ..base
        };
        assert!(base.totals_match(retuned));
        let ridden = TripRecord {
            trip_km: base.trip_km + 0.1,
            ..base
        };
        assert!(!base.totals_match(ridden));
    }
}
