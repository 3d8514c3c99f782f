//! Immutable view of the whole queue state.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{
    Appointment, EntryStatus, Lane, Notification, Patient, QueueEntry, ServiceType, Staff,
};

/// Everything the store holds, published as one unit after every mutation.
///
/// `selected_patient_id` and `active_entry_id` are references into `queue`,
/// so the resolved entries always reflect the current status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueueSnapshot {
    /// Incremented on every committed mutation
    pub version: u64,
    pub queue: Vec<QueueEntry>,
    pub staff: Vec<Staff>,
    pub services: Vec<ServiceType>,
    pub lanes: Vec<Lane>,
    pub notifications: Vec<Notification>,
    /// The logged-in mobile patient
    pub patient: Patient,
    pub appointments: Vec<Appointment>,
    /// Entry last called or picked in the admin view
    pub selected_patient_id: Option<String>,
    /// The logged-in patient's own entry
    pub active_entry_id: Option<String>,
}

/// Call order: higher priority first, then earliest check-in.
pub fn call_order(a: &QueueEntry, b: &QueueEntry) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.check_in_time.cmp(&b.check_in_time))
}

impl QueueSnapshot {
    /// Empty state for the given patient profile.
    pub fn new(patient: Patient) -> Self {
        Self {
            version: 0,
            queue: Vec::new(),
            staff: Vec::new(),
            services: Vec::new(),
            lanes: Vec::new(),
            notifications: Vec::new(),
            patient,
            appointments: Vec::new(),
            selected_patient_id: None,
            active_entry_id: None,
        }
    }

    pub fn find_entry(&self, id: &str) -> Option<&QueueEntry> {
        self.queue.iter().find(|e| e.id == id)
    }

    pub(crate) fn find_entry_mut(&mut self, id: &str) -> Option<&mut QueueEntry> {
        self.queue.iter_mut().find(|e| e.id == id)
    }

    pub fn find_service(&self, id: &str) -> Option<&ServiceType> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn find_service_by_name(&self, name: &str) -> Option<&ServiceType> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn find_staff(&self, id: &str) -> Option<&Staff> {
        self.staff.iter().find(|s| s.id == id)
    }

    pub fn find_lane(&self, id: &str) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.id == id)
    }

    pub fn find_appointment(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn selected_patient(&self) -> Option<&QueueEntry> {
        self.selected_patient_id
            .as_deref()
            .and_then(|id| self.find_entry(id))
    }

    pub fn active_entry(&self) -> Option<&QueueEntry> {
        self.active_entry_id
            .as_deref()
            .and_then(|id| self.find_entry(id))
    }

    /// Waiting entries in call order, optionally restricted to one service name.
    pub fn waiting_entries(&self, service_type: Option<&str>) -> Vec<&QueueEntry> {
        let mut waiting: Vec<&QueueEntry> = self
            .queue
            .iter()
            .filter(|e| e.status == EntryStatus::Waiting)
            .filter(|e| service_type.map_or(true, |s| e.service_type == s))
            .collect();
        waiting.sort_by(|a, b| call_order(a, b));
        waiting
    }

    /// The entry `call_next_patient` would pick.
    pub fn next_in_line(&self, service_type: Option<&str>) -> Option<&QueueEntry> {
        self.queue
            .iter()
            .filter(|e| e.status == EntryStatus::Waiting)
            .filter(|e| service_type.map_or(true, |s| e.service_type == s))
            .min_by(|a, b| call_order(a, b))
    }

    /// Staff whose assignments include the service.
    pub fn staff_for_service(&self, service_id: &str) -> Vec<&Staff> {
        self.staff.iter().filter(|s| s.serves(service_id)).collect()
    }

    pub fn unread_notification_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }
}
