// libs/appointment-cell/src/services/suggestion.rs

use crate::models::{CreateAppointmentResponse, HourSuggestion};
use crate::services::round_to_tenth;

/// Inspects a create response for an alternate lower-wait hour. Fires only
/// when the backend sent a complete alternate pair and the hour actually
/// differs from the booked one; an omitted pair is not an error. Edits and
/// deletes never produce suggestions because only creates carry the pair.
pub fn suggest_better_hour(response: &CreateAppointmentResponse) -> Option<HourSuggestion> {
    let better_hour = response.best_local_hour?;
    let better_wait = response.best_local_wait?;

    if better_hour == response.appointment.hour {
        return None;
    }

    Some(HourSuggestion {
        current_hour: response.appointment.hour,
        current_wait: round_to_tenth(response.appointment.wait_minutes()),
        better_hour,
        better_wait: round_to_tenth(better_wait),
    })
}
