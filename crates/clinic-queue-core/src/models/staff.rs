//! Staff and lane models.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Staff availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StaffStatus {
    Available,
    Busy,
    Break,
    Offline,
}

impl StaffStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StaffStatus::Available => "available",
            StaffStatus::Busy => "busy",
            StaffStatus::Break => "break",
            StaffStatus::Offline => "offline",
        }
    }
}

impl FromStr for StaffStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "available" => Ok(StaffStatus::Available),
            "busy" => Ok(StaffStatus::Busy),
            "break" => Ok(StaffStatus::Break),
            "offline" => Ok(StaffStatus::Offline),
            _ => Err(format!("Invalid staff status: '{}'", value)),
        }
    }
}

/// A person who can serve one or more services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Staff {
    pub id: String,
    pub name: String,
    /// Job title (e.g., "Nurse", "Lab Technician")
    pub role: String,
    pub status: StaffStatus,
    /// ServiceType IDs this person serves
    pub assigned_services: Vec<String>,
    pub patients_served_today: u32,
}

impl Staff {
    /// Create an available staff member with no assignments.
    pub fn new(id: String, name: String, role: String) -> Self {
        Self {
            id,
            name,
            role,
            status: StaffStatus::Available,
            assigned_services: Vec::new(),
            patients_served_today: 0,
        }
    }

    pub fn serves(&self, service_id: &str) -> bool {
        self.assigned_services.iter().any(|s| s == service_id)
    }
}

/// Lane status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaneStatus {
    Open,
    Break,
    Closed,
}

impl LaneStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LaneStatus::Open => "open",
            LaneStatus::Break => "break",
            LaneStatus::Closed => "closed",
        }
    }
}

impl FromStr for LaneStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "open" => Ok(LaneStatus::Open),
            "break" => Ok(LaneStatus::Break),
            "closed" => Ok(LaneStatus::Closed),
            _ => Err(format!("Invalid lane status: '{}'", value)),
        }
    }
}

/// A physical service channel (counter or room) shown on the display screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lane {
    pub id: String,
    /// Display name (e.g., "Counter 1"); matched against `QueueEntry::lane`
    pub name: String,
    pub status: LaneStatus,
    pub assigned_staff: Option<String>,
    /// Service names this lane can serve
    pub service_types: Vec<String>,
}

impl Lane {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            status: LaneStatus::Open,
            assigned_staff: None,
            service_types: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == LaneStatus::Open
    }
}
