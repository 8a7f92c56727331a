use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attributes shared by every person-shaped record. Embedded by value in
/// Patient and Doctor; the store keeps the fields inline on each document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetails {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub address_id: Option<Uuid>,
    pub social_security_number: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl PersonDetails {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    #[serde(flatten)]
    pub person: PersonDetails,
    pub insurance_id: Option<String>,
    pub member_id: Option<String>,
    pub first_time: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    #[serde(flatten)]
    pub person: PersonDetails,
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clinic {
    pub id: Uuid,
    pub address_id: Option<Uuid>,
    pub name: String,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl Address {
    // Domestic-only deployment; the store does not carry a country field.
    pub const COUNTRY: &'static str = "United States";
}
