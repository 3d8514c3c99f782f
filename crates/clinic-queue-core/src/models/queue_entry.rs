//! Queue entry models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Call priority of a queue entry.
///
/// Ordering follows the rank, so `Urgent > High > Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Urgent,
    High,
    Normal,
}

impl Priority {
    /// Numeric rank used as the primary call-order key.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 3,
            Priority::High => 2,
            Priority::Normal => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Normal => "normal",
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "urgent" => Ok(Priority::Urgent),
            "high" => Ok(Priority::High),
            "normal" => Ok(Priority::Normal),
            _ => Err(format!(
                "Invalid priority: '{}'. Must be one of: urgent, high, normal",
                value
            )),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an entry is in its visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryStatus {
    /// Arrived, not yet in the waiting line
    CheckedIn,
    /// Waiting to be called
    Waiting,
    /// Currently being served
    InService,
    /// Visit finished
    Completed,
    /// Called but never showed up
    NoShow,
}

impl EntryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryStatus::CheckedIn => "checked-in",
            EntryStatus::Waiting => "waiting",
            EntryStatus::InService => "in-service",
            EntryStatus::Completed => "completed",
            EntryStatus::NoShow => "no-show",
        }
    }

    /// Completed and no-show entries are done.
    pub fn is_terminal(self) -> bool {
        matches!(self, EntryStatus::Completed | EntryStatus::NoShow)
    }

    /// Strict transition table for plain status updates.
    ///
    /// Setting a status to itself is always allowed. Going back from
    /// in-service to waiting is not a plain update, see
    /// [`can_return_to_waiting`](Self::can_return_to_waiting).
    pub fn can_transition_to(self, next: EntryStatus) -> bool {
        use EntryStatus::*;

        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (CheckedIn, Waiting)
                | (CheckedIn, NoShow)
                | (Waiting, InService)
                | (Waiting, NoShow)
                | (InService, Completed)
                | (InService, NoShow)
        )
    }

    /// Whether an explicit "return to waiting" action may apply.
    pub fn can_return_to_waiting(self) -> bool {
        matches!(self, EntryStatus::InService | EntryStatus::Waiting)
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "checked-in" => Ok(EntryStatus::CheckedIn),
            "waiting" => Ok(EntryStatus::Waiting),
            "in-service" => Ok(EntryStatus::InService),
            "completed" => Ok(EntryStatus::Completed),
            "no-show" => Ok(EntryStatus::NoShow),
            _ => Err(format!("Invalid entry status: '{}'", value)),
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One visit of a person through the queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueEntry {
    /// Unique entry ID, the only stable identity
    pub id: String,
    /// Display code (e.g., "Q-0421" for check-ins, "W-0042" for walk-ins)
    pub queue_number: String,
    pub patient_name: String,
    /// Registered patient ID, or a synthetic "WALK-" ID for walk-ins
    pub patient_id: String,
    /// Service name as it was when the entry was created
    pub service_type: String,
    pub priority: Priority,
    pub status: EntryStatus,
    /// Set once at creation, never mutated
    pub check_in_time: DateTime<Utc>,
    /// Estimate taken at creation; not refreshed as the queue moves
    pub estimated_wait_minutes: u32,
    /// Display name of the staff member serving this entry
    pub assigned_staff: Option<String>,
    pub location: Option<String>,
    pub lane: Option<String>,
    pub room: Option<String>,
    pub notes: Option<String>,
    /// First time the visit reached completed; kept if the entry is reopened
    #[serde(default)]
    pub served_at: Option<DateTime<Utc>>,
}

impl QueueEntry {
    /// Create a waiting, normal-priority entry checked in now.
    pub fn new(
        queue_number: String,
        patient_name: String,
        patient_id: String,
        service_type: String,
        estimated_wait_minutes: u32,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            queue_number,
            patient_name,
            patient_id,
            service_type,
            priority: Priority::Normal,
            status: EntryStatus::Waiting,
            check_in_time: Utc::now(),
            estimated_wait_minutes,
            assigned_staff: None,
            location: None,
            lane: None,
            room: None,
            notes: None,
            served_at: None,
        }
    }

    /// Minutes elapsed since check-in, never negative.
    pub fn wait_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.check_in_time).num_minutes().max(0)
    }

    /// Still in the building and not yet finished.
    pub fn is_live(&self) -> bool {
        !self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::High > Priority::Normal);
        assert_eq!(Priority::Urgent.rank(), 3);
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("URGENT".parse::<Priority>(), Ok(Priority::Urgent));
        assert_eq!(" normal ".parse::<Priority>(), Ok(Priority::Normal));
        assert!("emergency".parse::<Priority>().is_err());
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&EntryStatus::InService).unwrap();
        assert_eq!(json, "\"in-service\"");

        let parsed: EntryStatus = serde_json::from_str("\"no-show\"").unwrap();
        assert_eq!(parsed, EntryStatus::NoShow);
    }

    #[test]
    fn test_transition_table() {
        use EntryStatus::*;

        assert!(CheckedIn.can_transition_to(Waiting));
        assert!(Waiting.can_transition_to(InService));
        assert!(InService.can_transition_to(Completed));
        assert!(Waiting.can_transition_to(Waiting));

        // Only the return-to-waiting action may go back
        assert!(!InService.can_transition_to(Waiting));
        assert!(InService.can_return_to_waiting());
        assert!(!Completed.can_return_to_waiting());
        assert!(!CheckedIn.can_return_to_waiting());

        assert!(!Completed.can_transition_to(Waiting));
        assert!(!NoShow.can_transition_to(InService));
        assert!(!CheckedIn.can_transition_to(Completed));
    }

    #[test]
    fn test_new_entry_defaults() {
        let entry = QueueEntry::new(
            "Q-1234".into(),
            "Jane Doe".into(),
            "P-001".into(),
            "Lab Work".into(),
            10,
        );
        assert_eq!(entry.id.len(), 36); // UUID format
        assert_eq!(entry.status, EntryStatus::Waiting);
        assert_eq!(entry.priority, Priority::Normal);
        assert!(entry.served_at.is_none());
        assert!(entry.is_live());
    }

    #[test]
    fn test_wait_minutes() {
        let mut entry = QueueEntry::new(
            "Q-1234".into(),
            "Jane Doe".into(),
            "P-001".into(),
            "Lab Work".into(),
            10,
        );
        let now = Utc::now();
        entry.check_in_time = now - Duration::minutes(25);
        assert_eq!(entry.wait_minutes(now), 25);

        // Clock skew never yields a negative wait
        entry.check_in_time = now + Duration::minutes(5);
        assert_eq!(entry.wait_minutes(now), 0);
    }
}
