use crate::types::RideStatus;

/// Trip statistics as shown and persisted. Copied out of the engine once
/// per tick; the engine keeps the coordinate/timestamp bookkeeping private.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TripSnapshot {
    pub speed_kmh: f32,
    pub max_speed_kmh: f32,
    pub avg_speed_kmh: f32,
    /// Lifetime odometer; grows whenever a distance delta is accepted,
    /// paused or not.
    pub total_km: f32,
    /// Resettable trip odometer; frozen while paused.
    pub trip_km: f32,
    pub moving_ms: u64,
    pub elapsed_ms: u64,
    pub status: RideStatus,
}

/// The persisted fields seeded back into the engine at boot.
#[derive(Clone, Copy, Debug, Default)]
pub struct RestoredTotals {
    pub total_km: f32,
    pub trip_km: f32,
    pub moving_ms: u64,
    pub max_speed_kmh: f32,
}
