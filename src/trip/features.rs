//! Pure sample math, kept out of the state machine so it can be pinned
//! down by value tests.

const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Raw speed in km/h; NaN and negative readings from a faulty receiver
/// substitute as standing still.
pub(super) fn kmh_from_mps(speed_mps: f32) -> f32 {
    if !speed_mps.is_finite() || speed_mps < 0.0 {
        return 0.0;
    }
    speed_mps * 3.6
}

/// Receivers without a solution report the (0,0) sentinel pair.
pub(super) fn is_degenerate(lat_deg: f64, lon_deg: f64) -> bool {
    lat_deg == 0.0 && lon_deg == 0.0
}

/// Equirectangular approximation, valid for the short fix-to-fix
/// displacements the acceptance window allows.
pub(super) fn planar_distance_m(from: (f64, f64), to: (f64, f64)) -> f64 {
    let mean_lat_rad = (from.0 + to.0) * 0.5 * DEG_TO_RAD;
    let dx = (to.1 - from.1) * DEG_TO_RAD * libm::cos(mean_lat_rad) * EARTH_RADIUS_M;
    let dy = (to.0 - from.0) * DEG_TO_RAD * EARTH_RADIUS_M;
    libm::sqrt(dx * dx + dy * dy)
}

/// Deltas at or below the floor are jitter, above the ceiling spurious
/// jumps; NaN (from NaN coordinates) fails both comparisons and is
/// rejected the same way.
pub(super) fn delta_accepted(dist_m: f64, min_delta_m: f64, max_delta_m: f64) -> bool {
    dist_m > min_delta_m && dist_m <= max_delta_m
}
