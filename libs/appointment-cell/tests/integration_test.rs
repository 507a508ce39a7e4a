use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::{AppointmentError, AppointmentForm, DeleteConfirmation};
use appointment_cell::repository::AppointmentRepository;
use appointment_cell::services::MutationService;
use shared_config::AppConfig;

fn service_for(server: &MockServer) -> (MutationService, Arc<AppointmentRepository>) {
    let config = AppConfig { backend_url: server.uri() };
    let repository = Arc::new(AppointmentRepository::new());
    let service = MutationService::new(&config, Arc::clone(&repository));
    (service, repository)
}

fn stored_record(id: i64, name: &str, wait: f64) -> serde_json::Value {
    json!({
        "id": id,
        "patient_name": name,
        "day_of_week": 1,
        "month": 5,
        "hour": 10,
        "days_between_schedule_and_visit": 3,
        "sex_encoded": 1,
        "age": 61,
        "predicted_waiting_time": wait
    })
}

fn valid_form(name: &str) -> AppointmentForm {
    let mut form = AppointmentForm {
        patient_name: name.to_string(),
        month: Some(5),
        hour: Some(10),
        days_between_schedule_and_visit: Some(3),
        age: Some(61),
        ..Default::default()
    };
    form.select_day(1);
    form.select_sex(1);
    form
}

// ==============================================================================
// FETCH-ALL
// ==============================================================================

#[tokio::test]
async fn fetch_all_loads_the_repository() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            stored_record(1, "Omar Said", 22.0),
            stored_record(2, "Eva Nilsson", 8.5),
        ])))
        .mount(&server)
        .await;

    let (service, repository) = service_for(&server);
    let count = service.fetch_all().await.unwrap();

    assert_eq!(count, 2);
    assert!(repository.is_loaded());
    let ids: Vec<i64> = repository.all().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn startup_fetch_failure_leaves_the_repository_unloaded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let (service, repository) = service_for(&server);
    let result = service.fetch_all().await;

    assert_matches!(result, Err(AppointmentError::Submission(_)));
    assert!(!repository.is_loaded());
    assert!(repository.is_empty());
}

#[tokio::test]
async fn later_fetch_failure_keeps_the_previous_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([stored_record(1, "Omar Said", 22.0)])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let (service, repository) = service_for(&server);
    service.fetch_all().await.unwrap();
    let before = repository.all();

    assert_matches!(service.fetch_all().await, Err(AppointmentError::Submission(_)));
    assert_eq!(repository.all(), before);
}

// ==============================================================================
// CREATE
// ==============================================================================

#[tokio::test]
async fn create_inserts_the_returned_record_and_raises_a_suggestion() {
    let server = MockServer::start().await;
    let mut body = stored_record(7, "Omar Said", 45.2);
    body["hour"] = json!(9);
    body["best_local_hour"] = json!(11);
    body["best_local_wait"] = json!(12.34);
    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let (service, repository) = service_for(&server);
    let mut form = valid_form("Omar Said");
    form.hour = Some(9);
    let (appointment, suggestion) = service.create(&form).await.unwrap();

    assert_eq!(appointment.id, 7);
    assert_eq!(appointment.predicted_waiting_time, Some(45.2));
    assert_eq!(repository.get(7).unwrap(), appointment);

    let suggestion = suggestion.unwrap();
    assert_eq!(suggestion.current_hour, 9);
    assert_eq!(suggestion.current_wait, 45.2);
    assert_eq!(suggestion.better_hour, 11);
    assert_eq!(suggestion.better_wait, 12.3);
}

#[tokio::test]
async fn create_without_a_better_hour_raises_no_suggestion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_record(8, "Eva Nilsson", 10.0)))
        .mount(&server)
        .await;

    let (service, _repository) = service_for(&server);
    let (_, suggestion) = service.create(&valid_form("Eva Nilsson")).await.unwrap();
    assert!(suggestion.is_none());
}

#[tokio::test]
async fn create_sends_exactly_the_canonical_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .and(body_json(json!({
            "patient_name": "Omar Said",
            "day_of_week": 1,
            "month": 5,
            "hour": 10,
            "days_between_schedule_and_visit": 3,
            "sex_encoded": 1,
            "age": 61
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_record(9, "Omar Said", 5.0)))
        .expect(1)
        .mount(&server)
        .await;

    let (service, _repository) = service_for(&server);
    service.create(&valid_form("Omar Said")).await.unwrap();
}

#[tokio::test]
async fn failed_create_leaves_the_repository_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (service, repository) = service_for(&server);
    repository.load(Vec::new());
    let form = valid_form("Omar Said");
    let result = service.create(&form).await;

    assert_matches!(result, Err(AppointmentError::Submission(_)));
    assert!(repository.is_empty());
    // The caller keeps the form for a manual retry.
    assert_eq!(form.patient_name, "Omar Said");
}

#[tokio::test]
async fn invalid_form_never_reaches_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (service, _repository) = service_for(&server);
    let mut form = valid_form("Omar Said");
    form.month = Some(13);
    assert_matches!(
        service.create(&form).await,
        Err(AppointmentError::Validation(_))
    );
}

// ==============================================================================
// UPDATE
// ==============================================================================

#[tokio::test]
async fn update_reloads_the_recomputed_wait_from_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([stored_record(3, "Omar Said", 18.0)])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/appointments/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "updated"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([stored_record(3, "Omar Said", 7.5)])),
        )
        .mount(&server)
        .await;

    let (service, repository) = service_for(&server);
    service.fetch_all().await.unwrap();
    assert_eq!(repository.get(3).unwrap().predicted_waiting_time, Some(18.0));

    service.update(3, &valid_form("Omar Said")).await.unwrap();
    assert_eq!(repository.get(3).unwrap().predicted_waiting_time, Some(7.5));
}

#[tokio::test]
async fn failed_update_leaves_the_record_identical() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([stored_record(3, "Omar Said", 18.0)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/appointments/3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (service, repository) = service_for(&server);
    service.fetch_all().await.unwrap();
    let before = repository.get(3).unwrap();

    let result = service.update(3, &valid_form("Renamed Anyway")).await;
    assert_matches!(result, Err(AppointmentError::Submission(_)));
    assert_eq!(repository.get(3).unwrap(), before);
}

// ==============================================================================
// DELETE
// ==============================================================================

#[tokio::test]
async fn confirmed_delete_removes_the_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([stored_record(4, "Eva Nilsson", 9.0)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/appointments/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let (service, repository) = service_for(&server);
    service.fetch_all().await.unwrap();

    let deleted = service.delete(4, DeleteConfirmation::Confirmed).await.unwrap();
    assert!(deleted);
    assert!(repository.get(4).is_none());
}

#[tokio::test]
async fn declined_delete_never_contacts_the_backend() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/appointments/4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (service, repository) = service_for(&server);
    repository.insert(serde_json::from_value(stored_record(4, "Eva Nilsson", 9.0)).unwrap());

    let deleted = service.delete(4, DeleteConfirmation::Declined).await.unwrap();
    assert!(!deleted);
    assert!(repository.get(4).is_some());
}

#[tokio::test]
async fn failed_delete_keeps_the_record_in_place() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/appointments/4"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (service, repository) = service_for(&server);
    repository.insert(serde_json::from_value(stored_record(4, "Eva Nilsson", 9.0)).unwrap());

    let result = service.delete(4, DeleteConfirmation::Confirmed).await;
    assert_matches!(result, Err(AppointmentError::Submission(_)));
    assert!(repository.get(4).is_some());
}

// ==============================================================================
// PER-ID SERIALIZATION
// ==============================================================================

#[tokio::test]
async fn updates_for_the_same_id_are_serialized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([stored_record(5, "Omar Said", 12.0)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/appointments/5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "updated"}))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let (service, repository) = service_for(&server);
    service.fetch_all().await.unwrap();

    let service = Arc::new(service);
    let first = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.update(5, &valid_form("First")).await })
    };
    let second = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.update(5, &valid_form("Second")).await })
    };

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();
    assert_eq!(repository.len(), 1);
}
