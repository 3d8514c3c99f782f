//! Patient, appointment and walk-in models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The logged-in mobile user's profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub preferred_location: Option<String>,
}

/// Appointment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    CheckedIn,
    Completed,
    Cancelled,
}

/// A scheduled visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    /// Service name
    pub service_type: String,
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub doctor_name: Option<String>,
    pub status: AppointmentStatus,
}

/// Registration form for a person without an appointment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WalkInData {
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    /// ServiceType ID
    pub service: String,
    pub notes: Option<String>,
}

impl WalkInData {
    /// Required-field check run by callers before registering a walk-in.
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("First name cannot be empty".to_string());
        }
        if self.phone.trim().is_empty() {
            return Err("Phone number cannot be empty".to_string());
        }
        if self.service.trim().is_empty() {
            return Err("A service must be selected".to_string());
        }
        Ok(())
    }

    /// "First" or "First Last".
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name.trim(), last),
            _ => self.first_name.trim().to_string(),
        }
    }
}
