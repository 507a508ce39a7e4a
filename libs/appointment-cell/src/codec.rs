// libs/appointment-cell/src/codec.rs
//
// Translation between the user-facing form representation (labeled day and
// sex, optional numerics) and the canonical record shape shared with the
// backend. The label tables here are the single source of display strings;
// labels are never stored as independent state on the canonical model.

use tracing::warn;

use crate::models::{Appointment, AppointmentError, AppointmentForm, AppointmentPayload};

/// Monday-first day table, indexed by the wire code 0-6.
pub const DAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Indexed by the wire code: 0=female, 1=male.
pub const SEX_LABELS: [&str; 2] = ["female", "male"];

/// Bookable hours, shared vocabulary with the backend.
pub const WORKING_HOURS: [u8; 9] = [9, 10, 11, 12, 13, 14, 15, 16, 17];

pub fn day_label(code: u8) -> Option<&'static str> {
    DAY_LABELS.get(code as usize).copied()
}

pub fn sex_label(code: u8) -> Option<&'static str> {
    SEX_LABELS.get(code as usize).copied()
}

pub fn is_working_hour(hour: u8) -> bool {
    WORKING_HOURS.contains(&hour)
}

impl AppointmentForm {
    /// Sets the day code and regenerates the matching label.
    pub fn select_day(&mut self, code: u8) {
        self.day_of_week = Some(code);
        self.day_label = day_label(code).unwrap_or_default().to_string();
    }

    /// Sets the sex code and regenerates the matching label.
    pub fn select_sex(&mut self, code: u8) {
        self.sex_encoded = Some(code);
        self.sex_label = sex_label(code).unwrap_or_default().to_string();
    }
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, AppointmentError> {
    value.ok_or_else(|| AppointmentError::Validation(format!("{field} is required")))
}

/// Validates the form and projects it down to the seven canonical editable
/// fields. Prediction and suggestion fields never appear in the payload.
pub fn to_payload(form: &AppointmentForm) -> Result<AppointmentPayload, AppointmentError> {
    let patient_name = form.patient_name.trim();
    if patient_name.is_empty() {
        return Err(AppointmentError::Validation("patient name is required".to_string()));
    }

    let day_of_week = require(form.day_of_week, "day of week")?;
    if day_label(day_of_week).is_none() {
        return Err(AppointmentError::Validation(format!(
            "unknown day of week code {day_of_week}"
        )));
    }

    let month = require(form.month, "month")?;
    if !(1..=12).contains(&month) {
        return Err(AppointmentError::Validation(format!(
            "month must be between 1 and 12, got {month}"
        )));
    }

    let hour = require(form.hour, "hour")?;
    if !is_working_hour(hour) {
        return Err(AppointmentError::Validation(format!(
            "hour {hour} is outside working hours 9-17"
        )));
    }

    let days_between_schedule_and_visit =
        require(form.days_between_schedule_and_visit, "days between schedule and visit")?;

    let sex_encoded = require(form.sex_encoded, "sex")?;
    if sex_label(sex_encoded).is_none() {
        return Err(AppointmentError::Validation(format!(
            "unknown sex code {sex_encoded}"
        )));
    }

    let age = require(form.age, "age")?;

    Ok(AppointmentPayload {
        patient_name: patient_name.to_string(),
        day_of_week,
        month,
        hour,
        days_between_schedule_and_visit,
        sex_encoded,
        age,
    })
}

/// Reconstructs form state from a canonical record, regenerating the label
/// fields from the fixed tables. Fails only when the record references a
/// day or sex code outside the known enumerations.
pub fn from_record(record: &Appointment) -> Result<AppointmentForm, AppointmentError> {
    let day = day_label(record.day_of_week).ok_or_else(|| {
        AppointmentError::Decode(format!(
            "appointment {} has unknown day_of_week code {}",
            record.id, record.day_of_week
        ))
    })?;
    let sex = sex_label(record.sex_encoded).ok_or_else(|| {
        AppointmentError::Decode(format!(
            "appointment {} has unknown sex_encoded code {}",
            record.id, record.sex_encoded
        ))
    })?;

    Ok(AppointmentForm {
        patient_name: record.patient_name.clone(),
        day_label: day.to_string(),
        day_of_week: Some(record.day_of_week),
        month: Some(record.month),
        hour: Some(record.hour),
        days_between_schedule_and_visit: Some(record.days_between_schedule_and_visit),
        sex_label: sex.to_string(),
        sex_encoded: Some(record.sex_encoded),
        age: Some(record.age),
    })
}

/// Display path: decode failures are non-fatal. The record is still shown,
/// with the raw numeric codes standing in for the unknown labels.
pub fn form_with_fallback(record: &Appointment) -> AppointmentForm {
    match from_record(record) {
        Ok(form) => form,
        Err(err) => {
            warn!("{err}; falling back to raw codes");
            AppointmentForm {
                patient_name: record.patient_name.clone(),
                day_label: day_label(record.day_of_week)
                    .map(str::to_string)
                    .unwrap_or_else(|| record.day_of_week.to_string()),
                day_of_week: Some(record.day_of_week),
                month: Some(record.month),
                hour: Some(record.hour),
                days_between_schedule_and_visit: Some(record.days_between_schedule_and_visit),
                sex_label: sex_label(record.sex_encoded)
                    .map(str::to_string)
                    .unwrap_or_else(|| record.sex_encoded.to_string()),
                sex_encoded: Some(record.sex_encoded),
                age: Some(record.age),
            }
        }
    }
}
