//! Service catalog models.

use serde::{Deserialize, Serialize};

/// A category of care offered by the clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceType {
    /// Catalog ID (e.g., "lab")
    pub id: String,
    /// Display name copied onto queue entries at creation
    pub name: String,
    /// Display-only icon name
    pub icon: String,
    /// Average service time in minutes, used as the default wait estimate
    pub avg_service_time: u32,
    /// Service locations; the first one is the default
    pub locations: Vec<String>,
    pub is_active: bool,
    /// Number of staff assigned, kept in sync by staff assignment
    pub staff_count: u32,
    pub today_served: u32,
    pub today_waiting: u32,
}

impl ServiceType {
    /// Create an active service with no locations or staff.
    pub fn new(id: String, name: String, avg_service_time: u32) -> Self {
        Self {
            id,
            name,
            icon: String::new(),
            avg_service_time,
            locations: Vec::new(),
            is_active: true,
            staff_count: 0,
            today_served: 0,
            today_waiting: 0,
        }
    }

    /// Default location, if any.
    pub fn default_location(&self) -> Option<&str> {
        self.locations.first().map(String::as_str)
    }
}
