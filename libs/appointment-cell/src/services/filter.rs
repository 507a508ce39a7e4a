// libs/appointment-cell/src/services/filter.rs

use crate::models::Appointment;

/// Display filter over the repository snapshot. All set predicates are
/// ANDed; an unset field passes everything. Day and month match the
/// numeric codes exactly, the name is a case-insensitive substring match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilter {
    pub day: Option<u8>,
    pub month: Option<u8>,
    pub name: Option<String>,
}

impl AppointmentFilter {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.day.is_none() && self.month.is_none() && self.active_name().is_none()
    }

    /// A blank or whitespace-only name counts as unset.
    fn active_name(&self) -> Option<&str> {
        match self.name.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(name) => Some(name),
        }
    }

    pub fn matches(&self, record: &Appointment) -> bool {
        let match_day = self.day.map_or(true, |d| record.day_of_week == d);
        let match_month = self.month.map_or(true, |m| record.month == m);
        let match_name = self.active_name().map_or(true, |name| {
            record.patient_name.to_lowercase().contains(&name.to_lowercase())
        });
        match_day && match_month && match_name
    }

    /// Narrowed view of the records, original relative order preserved.
    /// The repository itself is never mutated.
    pub fn apply(&self, records: &[Appointment]) -> Vec<Appointment> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}
