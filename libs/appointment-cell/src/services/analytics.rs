// libs/appointment-cell/src/services/analytics.rs
//
// Pure projections over the full, unfiltered repository snapshot. Same
// snapshot in, same statistics out; filters are never consulted.

use crate::models::{Appointment, AppointmentStats};
use crate::services::round_to_tenth;

/// Waits strictly above this many minutes get the high-wait flag.
pub const HIGH_WAIT_THRESHOLD_MINUTES: f64 = 30.0;

pub fn compute_stats(records: &[Appointment]) -> AppointmentStats {
    if records.is_empty() {
        return AppointmentStats { count: 0, avg_wait: 0.0, max_wait: 0.0 };
    }

    let count = records.len();
    let total: f64 = records.iter().map(Appointment::wait_minutes).sum();
    let max_wait = records
        .iter()
        .map(Appointment::wait_minutes)
        .fold(0.0_f64, f64::max);

    AppointmentStats {
        count,
        avg_wait: round_to_tenth(total / count as f64),
        max_wait,
    }
}

/// A wait of exactly the threshold is not flagged.
pub fn is_high_wait(record: &Appointment) -> bool {
    record.wait_minutes() > HIGH_WAIT_THRESHOLD_MINUTES
}
