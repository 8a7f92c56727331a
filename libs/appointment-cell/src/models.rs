// libs/appointment-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// An appointment as stored and served. Field names follow the wire contract
/// of the store documents (camelCase, `timing` is a calendar date with no time
/// component).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub timing: NaiveDate,
    pub description: String,
    pub insurance_id: Option<String>,
    pub copay: Option<u32>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    Scheduled,
    Rescheduled,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "Scheduled"),
            AppointmentStatus::Rescheduled => write!(f, "Rescheduled"),
            AppointmentStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Request body for booking and rescheduling. Carries the full appointment
/// shape; `id` and `status` are accepted but overridden by the service
/// (the store assigns ids on creation, the service owns status transitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPayload {
    pub id: Option<Uuid>,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub clinic_id: Uuid,
    pub timing: NaiveDate,
    pub description: String,
    pub insurance_id: Option<String>,
    pub copay: Option<u32>,
    pub status: Option<AppointmentStatus>,
}

/// Conjunctive id filter for appointment searches. Empty filter means
/// "everything".
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub clinic_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
}

impl AppointmentFilter {
    pub fn is_empty(&self) -> bool {
        self.clinic_id.is_none() && self.doctor_id.is_none() && self.patient_id.is_none()
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Date not acceptable: {0}")]
    DateNotAcceptable(String),

    #[error("Missing reference: {0}")]
    MissingReference(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
