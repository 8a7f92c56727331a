use std::sync::Arc;
use chrono::NaiveDate;
use serde_json::{json, Value};

use shared_config::AppConfig;

pub struct TestConfig {
    pub store_url: String,
    pub store_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:54321".to_string(),
            store_api_key: "test-api-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            entity_store_url: self.store_url.clone(),
            entity_store_api_key: self.store_api_key.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Canned Entity Store documents for wiremock-backed tests.
pub struct MockStoreResponses;

impl MockStoreResponses {
    pub fn patient_response(id: &str, first_name: &str, last_name: &str) -> Value {
        json!({
            "id": id,
            "firstName": first_name,
            "lastName": last_name,
            "phoneNumber": "555-0100",
            "addressId": null,
            "socialSecurityNumber": null,
            "birthday": "1990-04-12",
            "insuranceId": "INS-1000",
            "memberId": "M-1000",
            "firstTime": false
        })
    }

    pub fn doctor_response(id: &str, first_name: &str, last_name: &str, specialty: &str) -> Value {
        json!({
            "id": id,
            "firstName": first_name,
            "lastName": last_name,
            "phoneNumber": "555-0200",
            "addressId": null,
            "socialSecurityNumber": null,
            "birthday": "1978-09-30",
            "specialty": specialty
        })
    }

    pub fn clinic_response(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "addressId": null,
            "name": name,
            "phoneNumber": "555-0300"
        })
    }

    pub fn appointment_response(
        id: &str,
        patient_id: &str,
        doctor_id: &str,
        clinic_id: &str,
        timing: NaiveDate,
        status: &str,
    ) -> Value {
        json!({
            "id": id,
            "patientId": patient_id,
            "doctorId": doctor_id,
            "clinicId": clinic_id,
            "timing": timing,
            "description": "Routine checkup",
            "insuranceId": "INS-1000",
            "copay": 25,
            "status": status
        })
    }
}
