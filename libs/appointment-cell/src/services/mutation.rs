// libs/appointment-cell/src/services/mutation.rs
//
// Orchestrates create, update, and delete against the prediction backend
// and reconciles the repository afterwards. Failure paths leave the
// repository exactly as it was; nothing is retried automatically.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use shared_backend::BackendClient;
use shared_config::AppConfig;

use crate::codec;
use crate::models::{
    Appointment, AppointmentError, AppointmentForm, CreateAppointmentResponse,
    DeleteConfirmation, HourSuggestion,
};
use crate::repository::AppointmentRepository;
use crate::services::suggestion;

const APPOINTMENTS_PATH: &str = "/api/appointments";

pub struct MutationService {
    backend: Arc<BackendClient>,
    repository: Arc<AppointmentRepository>,
    // One async mutex per record id: mutations against the same id are
    // serialized, distinct ids proceed independently.
    record_locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl MutationService {
    pub fn new(config: &AppConfig, repository: Arc<AppointmentRepository>) -> Self {
        Self {
            backend: Arc::new(BackendClient::new(config)),
            repository,
            record_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn repository(&self) -> &AppointmentRepository {
        &self.repository
    }

    async fn lock_for(&self, id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.record_locks.lock().await;
        Arc::clone(locks.entry(id).or_default())
    }

    /// Fetches the whole collection and replaces the cached set. On failure
    /// the repository keeps its previous contents (empty at startup).
    pub async fn fetch_all(&self) -> Result<usize, AppointmentError> {
        let records: Vec<Appointment> = self
            .backend
            .request(Method::GET, APPOINTMENTS_PATH, None)
            .await
            .map_err(|err| {
                AppointmentError::Submission(format!("loading appointments failed: {err}"))
            })?;

        let count = records.len();
        self.repository.load(records);
        debug!("Loaded {} appointments from backend", count);
        Ok(count)
    }

    /// Validates the form, submits it, and on success caches the returned
    /// record and evaluates the response for an alternate-hour suggestion.
    /// On failure nothing is cached and the caller keeps the form as-is.
    pub async fn create(
        &self,
        form: &AppointmentForm,
    ) -> Result<(Appointment, Option<HourSuggestion>), AppointmentError> {
        let payload = codec::to_payload(form)?;
        info!("Creating appointment for {}", payload.patient_name);

        let body = serde_json::to_value(&payload)
            .map_err(|err| AppointmentError::Submission(format!("encoding payload failed: {err}")))?;

        let response: CreateAppointmentResponse = self
            .backend
            .request(Method::POST, APPOINTMENTS_PATH, Some(body))
            .await
            .map_err(|err| AppointmentError::Submission(format!("create failed: {err}")))?;

        let suggestion = suggestion::suggest_better_hour(&response);
        let appointment = response.appointment;
        self.repository.insert(appointment.clone());

        info!("Appointment {} created", appointment.id);
        Ok((appointment, suggestion))
    }

    /// Full replace of the editable fields. The backend recomputes the
    /// predicted wait, so a successful update is followed by a full reload
    /// rather than an optimistic in-place patch.
    pub async fn update(&self, id: i64, form: &AppointmentForm) -> Result<(), AppointmentError> {
        let payload = codec::to_payload(form)?;

        let lock = self.lock_for(id).await;
        let _guard = lock.lock().await;

        info!("Updating appointment {}", id);
        let body = serde_json::to_value(&payload)
            .map_err(|err| AppointmentError::Submission(format!("encoding payload failed: {err}")))?;

        let _: Value = self
            .backend
            .request(Method::PUT, &format!("{APPOINTMENTS_PATH}/{id}"), Some(body))
            .await
            .map_err(|err| AppointmentError::Submission(format!("update failed: {err}")))?;

        self.fetch_all().await?;
        Ok(())
    }

    /// Deletes after an explicit confirmation. A declined confirmation
    /// returns `Ok(false)` without contacting the backend or touching the
    /// repository; on backend failure the record stays in place.
    pub async fn delete(
        &self,
        id: i64,
        confirmation: DeleteConfirmation,
    ) -> Result<bool, AppointmentError> {
        if confirmation == DeleteConfirmation::Declined {
            debug!("Delete of appointment {} declined, backend not contacted", id);
            return Ok(false);
        }

        let lock = self.lock_for(id).await;
        let _guard = lock.lock().await;

        info!("Deleting appointment {}", id);
        let _: Value = self
            .backend
            .request(Method::DELETE, &format!("{APPOINTMENTS_PATH}/{id}"), None)
            .await
            .map_err(|err| AppointmentError::Submission(format!("delete failed: {err}")))?;

        if !self.repository.remove(id) {
            warn!("deleted appointment {} was not in the local cache", id);
        }
        Ok(true)
    }
}
