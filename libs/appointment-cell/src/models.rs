// libs/appointment-cell/src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// Canonical backend-shaped appointment record. Field names are the wire
/// names; `predicted_waiting_time` is always backend-supplied, never
/// computed on this side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_name: String,
    pub day_of_week: u8,
    pub month: u8,
    pub hour: u8,
    pub days_between_schedule_and_visit: u32,
    pub sex_encoded: u8,
    pub age: u32,
    #[serde(default)]
    pub predicted_waiting_time: Option<f64>,
}

impl Appointment {
    /// Predicted wait in minutes, with a missing value coerced to 0.
    pub fn wait_minutes(&self) -> f64 {
        self.predicted_waiting_time.unwrap_or(0.0)
    }
}

/// Create response: the stored record plus the optional alternate-hour
/// pair. The alternate pair is advisory only and is never kept on the
/// record itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentResponse {
    #[serde(flatten)]
    pub appointment: Appointment,
    #[serde(default)]
    pub best_local_hour: Option<u8>,
    #[serde(default)]
    pub best_local_wait: Option<f64>,
}

// ==============================================================================
// REQUEST/FORM MODELS
// ==============================================================================

/// Exactly the seven editable fields sent on create and update. Prediction
/// and suggestion fields cannot appear here by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentPayload {
    pub patient_name: String,
    pub day_of_week: u8,
    pub month: u8,
    pub hour: u8,
    pub days_between_schedule_and_visit: u32,
    pub sex_encoded: u8,
    pub age: u32,
}

/// Transient form state for the presentation boundary. The label fields
/// mirror the encoded values for display and are regenerated by the codec,
/// never transmitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentForm {
    pub patient_name: String,
    pub day_label: String,
    pub day_of_week: Option<u8>,
    pub month: Option<u8>,
    pub hour: Option<u8>,
    pub days_between_schedule_and_visit: Option<u32>,
    pub sex_label: String,
    pub sex_encoded: Option<u8>,
    pub age: Option<u32>,
}

impl AppointmentForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Explicit yes/no gate for destructive operations. A declined delete
/// never reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteConfirmation {
    Confirmed,
    Declined,
}

// ==============================================================================
// DERIVED MODELS
// ==============================================================================

/// Aggregate wait statistics over the full, unfiltered repository snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppointmentStats {
    pub count: usize,
    pub avg_wait: f64,
    pub max_wait: f64,
}

/// Alternate-hour suggestion raised after a successful create when the
/// backend reports a materially better nearby hour. Wait values are
/// already rounded to one decimal for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourSuggestion {
    pub current_hour: u8,
    pub current_wait: f64,
    pub better_hour: u8,
    pub better_wait: f64,
}

impl fmt::Display for HourSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Current hour: {}:00, waiting now: {} min. Better nearby hour: {}:00 with {} min",
            self.current_hour, self.current_wait, self.better_hour, self.better_wait
        )
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    /// Malformed or missing form field. Blocks submission; the backend is
    /// never contacted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend record carries a day or sex code outside the known
    /// enumerations. Non-fatal; the record is still shown with raw codes.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Backend request failed. Local state is unchanged and the operation
    /// must be retried manually.
    #[error("Submission failed: {0}")]
    Submission(String),
}
