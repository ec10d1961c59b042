//! # Display Phase Selection
//!
//! Once per minute the face decides which secondary text to show. Two policies
//! exist and both stay available, because they want different things:
//!
//! - [`HourBandPolicy`] is context aware. The exact date matters when the wearer
//!   is away from a desk (morning commute, lunch, evening), the battery matters
//!   overnight so the watch gets charged, and the remaining daytime hours rotate.
//! - [`RotationPolicy`] ignores the hour and cycles weekday, date and battery on
//!   the epoch minute.
//!
//! The scatter face shows everything at once and has no selector.

use crate::config::Variant;
use crate::{ClockReading, DisplayPhase};

/// Every policy uses a three-way rotation
pub const ROTATION_MODULUS: u32 = 3;

/// Hours where the date takes priority, as half-open `[lower, upper)` bands
const DATE_BANDS: [(u32, u32); 3] = [(7, 8), (12, 13), (18, 22)];

/// Hours where the battery takes priority
const BATTERY_BANDS: [(u32, u32); 2] = [(0, 7), (22, 24)];

/// Maps a clock reading to the phase shown for that minute.
pub trait PhaseSelector {
    fn select(&self, reading: &ClockReading) -> DisplayPhase;
}

/// Hour-band priority with minute rotation in between.
#[derive(Debug, Clone, Copy, Default)]
pub struct HourBandPolicy;

/// Pure rotation on the epoch minute.
#[derive(Debug, Clone, Copy, Default)]
pub struct RotationPolicy;

fn in_range(lower: u32, value: u32, upper: u32) -> bool {
    lower <= value && value < upper
}

fn in_any_band(bands: &[(u32, u32)], hour: u32) -> bool {
    bands
        .iter()
        .any(|&(lower, upper)| in_range(lower, hour, upper))
}

impl PhaseSelector for HourBandPolicy {
    fn select(&self, reading: &ClockReading) -> DisplayPhase {
        let hour = reading.hour();

        if in_any_band(&DATE_BANDS, hour) {
            DisplayPhase::Date
        } else if in_any_band(&BATTERY_BANDS, hour) {
            DisplayPhase::Battery
        } else {
            match reading.minute() % ROTATION_MODULUS {
                1 => DisplayPhase::Date,
                2 => DisplayPhase::Battery,
                _ => DisplayPhase::Weekday,
            }
        }
    }
}

impl PhaseSelector for RotationPolicy {
    fn select(&self, reading: &ClockReading) -> DisplayPhase {
        match reading.epoch_minutes().rem_euclid(ROTATION_MODULUS as i64) {
            1 => DisplayPhase::Date,
            2 => DisplayPhase::Battery,
            _ => DisplayPhase::Weekday,
        }
    }
}

/// The selector a variant runs with, or `None` for the scatter face.
pub fn selector_for(variant: Variant) -> Option<Box<dyn PhaseSelector>> {
    match variant {
        Variant::HourBand => Some(Box::new(HourBandPolicy)),
        Variant::Rotation => Some(Box::new(RotationPolicy)),
        Variant::Scatter => None,
    }
}
