//! Tuning constants, grouped per engine and passed into constructors so
//! tests can pin their own values. No global mutable state.

/// Thresholds for the trip motion state machine.
#[derive(Clone, Copy, Debug)]
pub struct TripConfig {
    /// Instantaneous speed above which a valid fix counts as riding.
    pub min_moving_kmh: f32,
    /// No valid fix for this long forces Moving back to Stopped.
    pub signal_timeout_ms: u32,
    /// Fix-to-fix displacements at or below this are GNSS jitter.
    pub min_delta_m: f64,
    /// Fix-to-fix displacements above this are spurious jumps.
    pub max_delta_m: f64,
    /// Average speed is refreshed at least this often even without fixes.
    pub avg_refresh_ms: u32,
}

impl TripConfig {
    pub const DEFAULT: Self = Self {
        min_moving_kmh: 0.5,
        signal_timeout_ms: 2500,
        min_delta_m: 2.0,
        max_delta_m: 1000.0,
        avg_refresh_ms: 1000,
    };
}

impl Default for TripConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Timing windows for the button debounce and gesture layers.
#[derive(Clone, Copy, Debug)]
pub struct GestureConfig {
    /// A raw level must hold this long before it becomes the stable level.
    pub debounce_ms: u32,
    /// Window in which a second press upgrades a single press to a chord.
    pub single_press_ms: u32,
    /// Both buttons held this long emit the long-reset chord.
    pub long_press_ms: u32,
}

impl GestureConfig {
    pub const DEFAULT: Self = Self {
        debounce_ms: 50,
        single_press_ms: 50,
        long_press_ms: 3000,
    };
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Save policy for the persisted totals record.
#[derive(Clone, Copy, Debug)]
pub struct SaveConfig {
    /// Minimum spacing between storage writes.
    pub interval_ms: u32,
}

impl SaveConfig {
    pub const DEFAULT: Self = Self {
        interval_ms: 30_000,
    };
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Digital input pins carrying the two buttons, active low.
#[derive(Clone, Copy, Debug)]
pub struct PinConfig {
    pub mode_pin: u8,
    pub set_pin: u8,
}

impl PinConfig {
    pub const DEFAULT: Self = Self {
        mode_pin: 2,
        set_pin: 3,
    };
}

impl Default for PinConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

pub(crate) const TRIP_STORE_MAGIC: u32 = 0x5645_4C4F;
/// Written over the magic word before the record body; a write torn between
/// the two phases reads back as invalid instead of as stale totals.
pub(crate) const TRIP_STORE_MAGIC_INVALID: u32 = 0xFFFF_FFFF;
pub(crate) const TRIP_STORE_RECORD_LEN: usize = 32;
pub(crate) const TRIP_STORE_OFFSET: u32 = 0;
/// Totals beyond this are storage garbage, not riding history.
pub(crate) const TRIP_STORE_MAX_KM: f32 = 1_000_000.0;
