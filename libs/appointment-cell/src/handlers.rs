// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{Appointment, AppointmentError, AppointmentFilter, AppointmentPayload};
use crate::services::scheduling::AppointmentSchedulingService;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct AppointmentFilterParams {
    #[serde(rename = "cID")]
    pub clinic_id: Option<Uuid>,
    #[serde(rename = "dID")]
    pub doctor_id: Option<Uuid>,
    #[serde(rename = "pID")]
    pub patient_id: Option<Uuid>,
}

fn display_id(id: Option<Uuid>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "none".to_string())
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let service = AppointmentSchedulingService::new(&state);

    let appointments = service.list_appointments().await
        .map_err(|e| match e {
            AppointmentError::NotFound => {
                AppError::NotFound("No appointments exist in the store".to_string())
            },
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(appointments))
}

/// Filtered listing over any subset of clinic/doctor/patient ids. With no
/// parameters at all this behaves exactly like the plain listing.
#[axum::debug_handler]
pub async fn list_appointments_by_value(
    State(state): State<Arc<AppConfig>>,
    Query(params): Query<AppointmentFilterParams>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let service = AppointmentSchedulingService::new(&state);

    let filter = AppointmentFilter {
        clinic_id: params.clinic_id,
        doctor_id: params.doctor_id,
        patient_id: params.patient_id,
    };

    let appointments = service.find_appointments(&filter).await
        .map_err(|e| match e {
            AppointmentError::NotFound => AppError::NotFound(format!(
                "Appointments for patient {}, doctor {}, and clinic {} not found",
                display_id(params.patient_id),
                display_id(params.doctor_id),
                display_id(params.clinic_id),
            )),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let service = AppointmentSchedulingService::new(&state);

    let appointment = service.get_appointment(appointment_id).await
        .map_err(|e| match e {
            AppointmentError::NotFound => {
                AppError::NotFound(format!("Appointment with id {} not found", appointment_id))
            },
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(payload): Json<AppointmentPayload>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let service = AppointmentSchedulingService::new(&state);

    let appointment = service.book_appointment(payload).await
        .map_err(|e| match e {
            AppointmentError::DateNotAcceptable(msg) => AppError::NotAcceptable(msg),
            AppointmentError::MissingReference(msg) => AppError::BadRequest(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    Json(payload): Json<AppointmentPayload>,
) -> Result<Json<Appointment>, AppError> {
    let service = AppointmentSchedulingService::new(&state);

    let appointment = service.reschedule_appointment(appointment_id, payload).await
        .map_err(|e| match e {
            AppointmentError::NotFound => {
                AppError::NotFound("The requested appointment does not exist".to_string())
            },
            AppointmentError::DateNotAcceptable(msg) => AppError::NotAcceptable(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let service = AppointmentSchedulingService::new(&state);

    let appointment = service.cancel_appointment(appointment_id).await
        .map_err(|e| match e {
            AppointmentError::NotFound => {
                AppError::NotFound("The requested appointment does not exist".to_string())
            },
            AppointmentError::DateNotAcceptable(msg) => AppError::NotAcceptable(msg),
            _ => AppError::Internal(e.to_string()),
        })?;

    Ok(Json(appointment))
}
