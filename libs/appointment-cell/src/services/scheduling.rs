// libs/appointment-cell/src/services/scheduling.rs
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::EntityStoreClient;
use shared_models::entities::{Clinic, Doctor, Patient};

use crate::models::{
    Appointment, AppointmentError, AppointmentFilter, AppointmentPayload, AppointmentStatus,
};
use crate::services::lifecycle::AppointmentLifecycleService;

const APPOINTMENTS: &str = "appointments";
const PATIENTS: &str = "patients";
const DOCTORS: &str = "doctors";
const CLINICS: &str = "clinics";

/// Validates and mutates appointment records. Persistence is delegated to the
/// Entity Store; this service holds no state of its own beyond the client and
/// the scheduling rules.
pub struct AppointmentSchedulingService {
    store: Arc<EntityStoreClient>,
    lifecycle: AppointmentLifecycleService,
}

impl AppointmentSchedulingService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_store(Arc::new(EntityStoreClient::new(config)))
    }

    pub fn with_store(store: Arc<EntityStoreClient>) -> Self {
        Self {
            store,
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    /// Every appointment in the store. An empty store is an error, not an
    /// empty success.
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Fetching all appointments");

        let appointments: Vec<Appointment> = self
            .store
            .fetch_all(APPOINTMENTS)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if appointments.is_empty() {
            return Err(AppointmentError::NotFound);
        }

        Ok(appointments)
    }

    /// Appointments matching every id supplied in the filter. The empty
    /// filter falls back to listing everything; an empty match is an error.
    pub async fn find_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        if filter.is_empty() {
            return self.list_appointments().await;
        }

        debug!("Searching appointments with filter: {:?}", filter);

        let mut filters: Vec<(&str, String)> = Vec::new();
        if let Some(clinic_id) = filter.clinic_id {
            filters.push(("clinicId", clinic_id.to_string()));
        }
        if let Some(doctor_id) = filter.doctor_id {
            filters.push(("doctorId", doctor_id.to_string()));
        }
        if let Some(patient_id) = filter.patient_id {
            filters.push(("patientId", patient_id.to_string()));
        }

        let appointments: Vec<Appointment> = self
            .store
            .fetch_matching(APPOINTMENTS, &filters)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if appointments.is_empty() {
            return Err(AppointmentError::NotFound);
        }

        Ok(appointments)
    }

    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Fetching appointment: {}", appointment_id);

        let appointment: Option<Appointment> = self
            .store
            .fetch_by_id(APPOINTMENTS, &appointment_id.to_string())
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        appointment.ok_or(AppointmentError::NotFound)
    }

    /// Book a new appointment. The date must be strictly in the future and
    /// the referenced patient, doctor, and clinic must all exist. The stored
    /// record starts out `Scheduled` with a store-assigned id; any id or
    /// status carried by the payload is ignored.
    pub async fn book_appointment(
        &self,
        request: AppointmentPayload,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for patient {} with doctor {} at clinic {}",
            request.patient_id, request.doctor_id, request.clinic_id
        );

        let today = Utc::now().date_naive();
        self.lifecycle.validate_booking_date(request.timing, today)?;

        self.verify_references(&request).await?;

        let record = json!({
            "patientId": request.patient_id,
            "doctorId": request.doctor_id,
            "clinicId": request.clinic_id,
            "timing": request.timing,
            "description": request.description,
            "insuranceId": request.insurance_id,
            "copay": request.copay,
            "status": AppointmentStatus::Scheduled,
        });

        let stored: Appointment = self
            .store
            .insert(APPOINTMENTS, record)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!("Appointment {} booked", stored.id);
        Ok(stored)
    }

    /// Reschedule an existing appointment. Blocked inside the lockout window
    /// before the currently stored date. Every field of the stored record is
    /// replaced from the payload and the status is forced to `Rescheduled`,
    /// whatever the payload carried.
    pub async fn reschedule_appointment(
        &self,
        appointment_id: Uuid,
        request: AppointmentPayload,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Rescheduling appointment: {}", appointment_id);

        let existing = self.get_appointment(appointment_id).await?;

        let today = Utc::now().date_naive();
        self.lifecycle.validate_change_window(existing.timing, today)?;

        let record = json!({
            "id": request.id.unwrap_or(existing.id),
            "patientId": request.patient_id,
            "doctorId": request.doctor_id,
            "clinicId": request.clinic_id,
            "timing": request.timing,
            "description": request.description,
            "insuranceId": request.insurance_id,
            "copay": request.copay,
            "status": AppointmentStatus::Rescheduled,
        });

        let stored: Appointment = self
            .store
            .update_by_id(APPOINTMENTS, &appointment_id.to_string(), record)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!("Appointment {} rescheduled to {}", appointment_id, stored.timing);
        Ok(stored)
    }

    /// Cancel an appointment: a soft delete that flips the status to
    /// `Cancelled` and leaves the record in place. Subject to the same
    /// lockout window as rescheduling. Cancelling an already-cancelled
    /// appointment succeeds again; there is no terminal-state guard.
    pub async fn cancel_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Cancelling appointment: {}", appointment_id);

        let existing = self.get_appointment(appointment_id).await?;

        let today = Utc::now().date_naive();
        self.lifecycle.validate_change_window(existing.timing, today)?;

        let record = json!({
            "status": AppointmentStatus::Cancelled,
        });

        let stored: Appointment = self
            .store
            .update_by_id(APPOINTMENTS, &appointment_id.to_string(), record)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        info!("Appointment {} cancelled", appointment_id);
        Ok(stored)
    }

    /// All three referenced entities must resolve. The failure message names
    /// the ids the appointment carries without disclosing which lookup came
    /// back empty.
    async fn verify_references(
        &self,
        request: &AppointmentPayload,
    ) -> Result<(), AppointmentError> {
        let patient: Option<Patient> = self
            .store
            .fetch_by_id(PATIENTS, &request.patient_id.to_string())
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let doctor: Option<Doctor> = self
            .store
            .fetch_by_id(DOCTORS, &request.doctor_id.to_string())
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let clinic: Option<Clinic> = self
            .store
            .fetch_by_id(CLINICS, &request.clinic_id.to_string())
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if patient.is_none() || doctor.is_none() || clinic.is_none() {
            warn!(
                "Rejecting appointment with unresolved references (patient {}, doctor {}, clinic {})",
                request.patient_id, request.doctor_id, request.clinic_id
            );
            return Err(AppointmentError::MissingReference(format!(
                "Appointment cannot be created: patient {}, doctor {}, or clinic {} could not be found",
                request.patient_id, request.doctor_id, request.clinic_id
            )));
        }

        Ok(())
    }
}
