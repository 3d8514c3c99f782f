//! Derived views over a queue snapshot.
//!
//! Nothing here is stored; every figure is recomputed from the entries'
//! statuses and check-in times, so it cannot drift from the queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::QueueConfig;
use crate::models::{EntryStatus, QueueEntry};
use crate::store::QueueSnapshot;

/// How stretched a service is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadStatus {
    Normal,
    Warning,
    Critical,
}

impl LoadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadStatus::Normal => "normal",
            LoadStatus::Warning => "warning",
            LoadStatus::Critical => "critical",
        }
    }
}

/// Live load figures for one service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceLoad {
    pub service_id: String,
    pub service_name: String,
    pub waiting: u32,
    pub in_service: u32,
    pub completed: u32,
    pub staff_count: u32,
    /// Waiting patients per assigned staff member; `None` with no staff
    pub waiting_per_staff: Option<f64>,
    pub status: LoadStatus,
}

/// Queue-wide totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueueSummary {
    pub checked_in: u32,
    pub waiting: u32,
    pub in_service: u32,
    pub completed: u32,
    pub no_show: u32,
    /// Mean minutes waited so far by waiting entries
    pub average_wait_minutes: Option<f64>,
    pub longest_wait_minutes: Option<i64>,
}

/// What a display lane is currently showing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaneBoard {
    pub lane_id: String,
    pub lane_name: String,
    pub now_serving: Option<String>,
    pub patient_name: Option<String>,
}

/// 1-based position among waiting entries of the same service.
///
/// Counts waiting entries of that service with an equal or earlier check-in
/// time. `None` unless the entry exists and is waiting.
pub fn queue_position(snapshot: &QueueSnapshot, entry_id: &str) -> Option<u32> {
    let entry = snapshot.find_entry(entry_id)?;
    if entry.status != EntryStatus::Waiting {
        return None;
    }
    let position = snapshot
        .queue
        .iter()
        .filter(|e| e.status == EntryStatus::Waiting)
        .filter(|e| e.service_type == entry.service_type)
        .filter(|e| e.check_in_time <= entry.check_in_time)
        .count();
    Some(position as u32)
}

/// Minutes since check-in.
pub fn wait_minutes(entry: &QueueEntry, now: DateTime<Utc>) -> i64 {
    entry.wait_minutes(now)
}

/// Classify a waiting-per-staff ratio. Waiting patients with no staff is critical.
pub fn load_status(waiting: u32, staff_count: u32, config: &QueueConfig) -> LoadStatus {
    if waiting == 0 {
        return LoadStatus::Normal;
    }
    if staff_count == 0 {
        return LoadStatus::Critical;
    }
    let ratio = waiting as f64 / staff_count as f64;
    if ratio >= config.load_critical_ratio {
        LoadStatus::Critical
    } else if ratio >= config.load_warning_ratio {
        LoadStatus::Warning
    } else {
        LoadStatus::Normal
    }
}

/// Load figures for one service, or `None` if the service does not exist.
///
/// Entries are matched by service name; staff by assignment.
pub fn service_load(
    snapshot: &QueueSnapshot,
    service_id: &str,
    config: &QueueConfig,
) -> Option<ServiceLoad> {
    let service = snapshot.find_service(service_id)?;

    let count = |status: EntryStatus| {
        snapshot
            .queue
            .iter()
            .filter(|e| e.service_type == service.name && e.status == status)
            .count() as u32
    };
    let waiting = count(EntryStatus::Waiting);
    let staff_count = snapshot.staff_for_service(service_id).len() as u32;

    Some(ServiceLoad {
        service_id: service.id.clone(),
        service_name: service.name.clone(),
        waiting,
        in_service: count(EntryStatus::InService),
        completed: count(EntryStatus::Completed),
        staff_count,
        waiting_per_staff: (staff_count > 0).then(|| waiting as f64 / staff_count as f64),
        status: load_status(waiting, staff_count, config),
    })
}

/// Load figures for every service, in catalog order.
pub fn all_service_loads(snapshot: &QueueSnapshot, config: &QueueConfig) -> Vec<ServiceLoad> {
    snapshot
        .services
        .iter()
        .filter_map(|s| service_load(snapshot, &s.id, config))
        .collect()
}

/// Totals per status and wait figures for waiting entries.
pub fn queue_summary(snapshot: &QueueSnapshot, now: DateTime<Utc>) -> QueueSummary {
    let mut summary = QueueSummary::default();
    let mut waits = Vec::new();

    for entry in &snapshot.queue {
        match entry.status {
            EntryStatus::CheckedIn => summary.checked_in += 1,
            EntryStatus::Waiting => {
                summary.waiting += 1;
                waits.push(entry.wait_minutes(now));
            }
            EntryStatus::InService => summary.in_service += 1,
            EntryStatus::Completed => summary.completed += 1,
            EntryStatus::NoShow => summary.no_show += 1,
        }
    }

    if !waits.is_empty() {
        summary.average_wait_minutes =
            Some(waits.iter().sum::<i64>() as f64 / waits.len() as f64);
        summary.longest_wait_minutes = waits.iter().copied().max();
    }
    summary
}

/// In-service entry per open lane, matched on the entry's lane name.
pub fn now_serving_by_lane(snapshot: &QueueSnapshot) -> Vec<LaneBoard> {
    snapshot
        .lanes
        .iter()
        .filter(|lane| lane.is_open())
        .map(|lane| {
            let serving = snapshot
                .queue
                .iter()
                .filter(|e| e.status == EntryStatus::InService)
                .find(|e| e.lane.as_deref() == Some(lane.name.as_str()));
            LaneBoard {
                lane_id: lane.id.clone(),
                lane_name: lane.name.clone(),
                now_serving: serving.map(|e| e.queue_number.clone()),
                patient_name: serving.map(|e| e.patient_name.clone()),
            }
        })
        .collect()
}
