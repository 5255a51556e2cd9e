//! Collaborator traits for the hardware the core does not own. Storage is
//! not duplicated here: the persistence layer is generic over
//! [`embedded_storage::Storage`] directly.

use crate::display::DisplayField;
use crate::types::GnssSample;

/// Satellite receiver. `poll` is non-blocking and returns `None` on ticks
/// without a fresh fix.
pub trait GnssReceiver {
    /// False when the module fails to start; the caller decides whether to
    /// run degraded.
    fn begin(&mut self) -> bool;
    fn poll(&mut self) -> Option<GnssSample>;
}

/// Raw digital input levels, one read per configured pin per tick. No
/// debouncing happens at this layer.
pub trait PinReader {
    fn read_level(&mut self, pin: u8) -> bool;
}

/// Display driver. Takes a field discriminant plus a pre-formatted value
/// string; deciding which characters actually need redrawing is its job.
pub trait TripDisplay {
    fn begin(&mut self) -> bool;
    fn show(&mut self, field: DisplayField, value: &str);
}
