//! Queue configuration.

use serde::{Deserialize, Serialize};

/// Tunables and policy switches for a [`QueueStore`](crate::QueueStore).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use clinic_queue_core::QueueConfig;
///
/// let config = QueueConfig::from_json(r#"{ "enforce_transitions": true }"#).unwrap();
/// assert!(config.enforce_transitions);
/// assert_eq!(config.default_wait_minutes, 15);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QueueConfig {
    /// Wait estimate when no service average is available
    pub default_wait_minutes: u32,
    /// Service name used when a service or appointment does not resolve
    pub default_service_name: String,
    /// Location used when a service has no locations
    pub default_location: String,
    /// Prefix of appointment check-in numbers ("Q" gives "Q-0421")
    pub checkin_number_prefix: String,
    /// Prefix of walk-in numbers ("W" gives "W-0042")
    pub walkin_number_prefix: String,
    /// Prefix of synthetic walk-in patient IDs
    pub walkin_patient_prefix: String,
    /// Reject unknown appointment/service IDs instead of falling back
    pub strict_references: bool,
    /// Reject status changes not allowed by the transition table
    pub enforce_transitions: bool,
    /// Waiting-per-staff ratio at which a service is under strain
    pub load_warning_ratio: f64,
    /// Waiting-per-staff ratio at which a service is overloaded
    pub load_critical_ratio: f64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            default_wait_minutes: 15,
            default_service_name: "General Consultation".to_string(),
            default_location: "Building A".to_string(),
            checkin_number_prefix: "Q".to_string(),
            walkin_number_prefix: "W".to_string(),
            walkin_patient_prefix: "WALK-".to_string(),
            strict_references: false,
            enforce_transitions: false,
            load_warning_ratio: 5.0,
            load_critical_ratio: 10.0,
        }
    }
}

impl QueueConfig {
    /// Strict variant: unknown references and illegal transitions are errors.
    pub fn strict() -> Self {
        Self {
            strict_references: true,
            enforce_transitions: true,
            ..Self::default()
        }
    }

    /// Parse a JSON document, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
