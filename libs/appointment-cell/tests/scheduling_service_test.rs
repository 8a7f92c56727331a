use std::sync::Arc;
use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::{Mock, MockServer, ResponseTemplate};
use wiremock::matchers::{body_partial_json, method, path, query_param};

use appointment_cell::models::{AppointmentError, AppointmentPayload, AppointmentStatus};
use appointment_cell::services::scheduling::AppointmentSchedulingService;
use shared_database::store::EntityStoreClient;
use shared_utils::test_utils::{MockStoreResponses, TestConfig};

fn service_for(mock_server: &MockServer) -> AppointmentSchedulingService {
    let test_config = TestConfig::default();
    let mut config = test_config.to_app_config();
    config.entity_store_url = mock_server.uri();
    AppointmentSchedulingService::with_store(Arc::new(EntityStoreClient::new(&config)))
}

fn payload(patient_id: Uuid, doctor_id: Uuid, clinic_id: Uuid, days_ahead: i64) -> AppointmentPayload {
    AppointmentPayload {
        id: None,
        patient_id,
        doctor_id,
        clinic_id,
        timing: Utc::now().date_naive() + Duration::days(days_ahead),
        description: "Annual physical".to_string(),
        insurance_id: None,
        copay: None,
        status: None,
    }
}

async fn mount_reference_lookups(
    mock_server: &MockServer,
    patient_id: Uuid,
    doctor_id: Uuid,
    clinic_id: Uuid,
) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .and(query_param("id", format!("eq.{}", patient_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::patient_response(&patient_id.to_string(), "Alice", "Nguyen")
        ])))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::doctor_response(&doctor_id.to_string(), "Maya", "Osei", "Dermatology")
        ])))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/clinics"))
        .and(query_param("id", format!("eq.{}", clinic_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::clinic_response(&clinic_id.to_string(), "Riverside Clinic")
        ])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn booking_persists_a_scheduled_record() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);
    let patient_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();
    let clinic_id = Uuid::new_v4();
    let request = payload(patient_id, doctor_id, clinic_id, 14);

    mount_reference_lookups(&mock_server, patient_id, doctor_id, clinic_id).await;

    // The write must carry Scheduled regardless of the payload.
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({
            "patientId": patient_id,
            "status": "Scheduled"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            MockStoreResponses::appointment_response(
                &Uuid::new_v4().to_string(),
                &patient_id.to_string(),
                &doctor_id.to_string(),
                &clinic_id.to_string(),
                request.timing,
                "Scheduled",
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let stored = service.book_appointment(request).await.unwrap();

    assert_eq!(stored.status, AppointmentStatus::Scheduled);
    assert_eq!(stored.patient_id, patient_id);
}

#[tokio::test]
async fn booking_with_unresolved_patient_fails_before_any_write() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);
    let doctor_id = Uuid::new_v4();
    let clinic_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("id", format!("eq.{}", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::doctor_response(&doctor_id.to_string(), "Maya", "Osei", "Dermatology")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/clinics"))
        .and(query_param("id", format!("eq.{}", clinic_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::clinic_response(&clinic_id.to_string(), "Riverside Clinic")
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = service
        .book_appointment(payload(Uuid::new_v4(), doctor_id, clinic_id, 14))
        .await;

    assert_matches!(result, Err(AppointmentError::MissingReference(_)));
}

#[tokio::test]
async fn booking_with_todays_date_is_not_acceptable() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    let result = service
        .book_appointment(payload(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), 0))
        .await;

    assert_matches!(result, Err(AppointmentError::DateNotAcceptable(_)));
}

#[tokio::test]
async fn reschedule_overrides_the_payload_status() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);
    let appointment_id = Uuid::new_v4();
    let patient_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();
    let clinic_id = Uuid::new_v4();
    let existing_timing = Utc::now().date_naive() + Duration::days(10);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::appointment_response(
                &appointment_id.to_string(),
                &patient_id.to_string(),
                &doctor_id.to_string(),
                &clinic_id.to_string(),
                existing_timing,
                "Scheduled",
            )
        ])))
        .mount(&mock_server)
        .await;

    let mut request = payload(patient_id, doctor_id, clinic_id, 30);
    request.status = Some(AppointmentStatus::Cancelled);

    // The stored document must say Rescheduled, whatever the payload claimed.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .and(body_partial_json(json!({"status": "Rescheduled"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::appointment_response(
                &appointment_id.to_string(),
                &patient_id.to_string(),
                &doctor_id.to_string(),
                &clinic_id.to_string(),
                request.timing,
                "Rescheduled",
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let stored = service
        .reschedule_appointment(appointment_id, request)
        .await
        .unwrap();

    assert_eq!(stored.status, AppointmentStatus::Rescheduled);
}

#[tokio::test]
async fn cancel_writes_only_the_status_flip() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);
    let appointment_id = Uuid::new_v4();
    let existing_timing = Utc::now().date_naive() + Duration::days(6);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::appointment_response(
                &appointment_id.to_string(),
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
                existing_timing,
                "Scheduled",
            )
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .and(body_partial_json(json!({"status": "Cancelled"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::appointment_response(
                &appointment_id.to_string(),
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
                existing_timing,
                "Cancelled",
            )
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let stored = service.cancel_appointment(appointment_id).await.unwrap();

    assert_eq!(stored.status, AppointmentStatus::Cancelled);
}

#[tokio::test]
async fn cancel_inside_the_lockout_window_is_rejected_without_a_write() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);
    let appointment_id = Uuid::new_v4();
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", appointment_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockStoreResponses::appointment_response(
                &appointment_id.to_string(),
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
                &Uuid::new_v4().to_string(),
                tomorrow,
                "Scheduled",
            )
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = service.cancel_appointment(appointment_id).await;

    assert_matches!(result, Err(AppointmentError::DateNotAcceptable(_)));
}

#[tokio::test]
async fn store_failures_surface_as_database_errors() {
    let mock_server = MockServer::start().await;
    let service = service_for(&mock_server);

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("store offline"))
        .mount(&mock_server)
        .await;

    let result = service.list_appointments().await;

    assert_matches!(result, Err(AppointmentError::DatabaseError(_)));
}
