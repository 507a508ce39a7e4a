// libs/appointment-cell/src/repository.rs
//
// In-memory cache of the backend's appointment collection. Single source
// of truth for analytics and display; written only by the mutation
// service's success paths. Insertion order is preserved, no implicit sort.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::models::Appointment;

#[derive(Debug, Default)]
struct RepositoryState {
    records: Vec<Appointment>,
    loaded: bool,
}

#[derive(Debug, Default)]
pub struct AppointmentRepository {
    state: RwLock<RepositoryState>,
}

impl AppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, RepositoryState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RepositoryState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces the entire cached set. Used after fetch-all and after the
    /// post-edit refresh; marks the repository as loaded.
    pub fn load(&self, records: Vec<Appointment>) {
        let mut state = self.write();
        state.records = records;
        state.loaded = true;
    }

    /// Appends a freshly created record without disturbing existing order.
    /// A duplicate id replaces the stale entry in place to keep ids unique.
    pub fn insert(&self, record: Appointment) {
        let mut state = self.write();
        if let Some(existing) = state.records.iter_mut().find(|r| r.id == record.id) {
            warn!("appointment {} already cached, replacing", record.id);
            *existing = record;
        } else {
            state.records.push(record);
        }
        state.loaded = true;
    }

    /// Removes the record with the given id. Returns whether it was present.
    pub fn remove(&self, id: i64) -> bool {
        let mut state = self.write();
        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        state.records.len() < before
    }

    /// Ordered snapshot of the current records for read-only consumption.
    pub fn all(&self) -> Vec<Appointment> {
        self.read().records.clone()
    }

    pub fn get(&self, id: i64) -> Option<Appointment> {
        self.read().records.iter().find(|r| r.id == id).cloned()
    }

    /// Distinguishes an empty collection from one that was never fetched.
    pub fn is_loaded(&self) -> bool {
        self.read().loaded
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }
}
