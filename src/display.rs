//! Display pages and value formatting. Only the value strings are built
//! here; labels, layout, and partial redraws belong to the display driver.

use core::fmt::Write as _;

use heapless::String;

use crate::trip::TripSnapshot;

/// Discriminant handed to the display driver next to each value string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayField {
    Speed,
    MaxSpeed,
    AvgSpeed,
    Time,
    MovingTime,
    ElapsedTime,
    Distance,
}

/// The three mode pages the Mode button cycles through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DisplayPage {
    #[default]
    SpeedAndTime,
    AverageAndOdometer,
    MaxAndClock,
}

impl DisplayPage {
    pub fn toggled(self) -> Self {
        match self {
            Self::SpeedAndTime => Self::AverageAndOdometer,
            Self::AverageAndOdometer => Self::MaxAndClock,
            Self::MaxAndClock => Self::SpeedAndTime,
        }
    }
}

pub type ValueString = String<12>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLine {
    pub field: DisplayField,
    pub value: ValueString,
}

/// One formatting function per page variant.
pub fn render_page(page: DisplayPage, snapshot: &TripSnapshot) -> [PageLine; 2] {
    match page {
        DisplayPage::SpeedAndTime => [
            line(DisplayField::Speed, format_speed(snapshot.speed_kmh)),
            line(DisplayField::Time, format_duration(snapshot.elapsed_ms)),
        ],
        DisplayPage::AverageAndOdometer => [
            line(DisplayField::AvgSpeed, format_speed(snapshot.avg_speed_kmh)),
            line(DisplayField::Distance, format_distance(snapshot.total_km)),
        ],
        DisplayPage::MaxAndClock => [
            line(DisplayField::MaxSpeed, format_speed(snapshot.max_speed_kmh)),
            line(DisplayField::MovingTime, format_duration(snapshot.moving_ms)),
        ],
    }
}

fn line(field: DisplayField, value: ValueString) -> PageLine {
    PageLine { field, value }
}

pub fn format_speed(kmh: f32) -> ValueString {
    let mut value = ValueString::new();
    let _ = write!(value, "{kmh:.1}");
    value
}

pub fn format_distance(km: f32) -> ValueString {
    let mut value = ValueString::new();
    let _ = write!(value, "{km:.2}");
    value
}

pub fn format_duration(ms: u64) -> ValueString {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;
    let mut value = ValueString::new();
    let _ = write!(value, "{hours}:{minutes:02}:{seconds:02}");
    value
}
