pub mod analytics;
pub mod filter;
pub mod mutation;
pub mod suggestion;

pub use analytics::{compute_stats, is_high_wait, HIGH_WAIT_THRESHOLD_MINUTES};
pub use filter::AppointmentFilter;
pub use mutation::MutationService;
pub use suggestion::suggest_better_hour;

/// Rounds a wait value to one decimal place for display.
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
