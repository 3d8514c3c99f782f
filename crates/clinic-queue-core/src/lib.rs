//! Clinic Queue Core Library
//!
//! In-memory queue state engine for a clinic: who is waiting, who is being
//! served, who gets called next, and which staff cover which service.
//!
//! # Architecture
//!
//! ```text
//!   Appointment check-in ──┐
//!                          ├──► QueueStore ──► QueueSnapshot (Arc, versioned)
//!   Walk-in registration ──┘        │                  │
//!                                   │                  ├──► admin dashboard
//!   call next / status / assign ────┘                  ├──► display screen
//!                                                      └──► patient app
//! ```
//!
//! # Call Order
//!
//! **Urgent before high before normal; within a priority, earliest check-in first.**
//!
//! # Modules
//!
//! - [`models`]: Domain types (QueueEntry, ServiceType, Staff, Lane, etc.)
//! - [`store`]: The queue store, its operations and subscriptions
//! - [`stats`]: Positions, wait times and service load derived from a snapshot
//! - [`config`]: Defaults and strictness policy
//! - [`seed`]: Demo clinic data

pub mod config;
pub mod models;
pub mod seed;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use config::QueueConfig;
pub use models::{
    Appointment, AppointmentStatus, EntryStatus, Lane, LaneStatus, Notification,
    NotificationKind, Patient, Priority, QueueEntry, ServiceType, Staff, StaffStatus, WalkInData,
};
pub use stats::{LoadStatus, QueueSummary, ServiceLoad};
pub use store::{
    EntryAssignment, QueueError, QueueResult, QueueSnapshot, QueueStore, RecordKind,
    SubscriptionId,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicQueueError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Store error: {0}")]
    StoreError(String),
}

impl From<QueueError> for ClinicQueueError {
    fn from(e: QueueError) -> Self {
        let message = e.to_string();
        match e {
            QueueError::NotFound { .. } => ClinicQueueError::NotFound(message),
            QueueError::InvalidReference { .. } => ClinicQueueError::InvalidReference(message),
            QueueError::InvalidTransition { .. } => ClinicQueueError::InvalidTransition(message),
            QueueError::Validation(_) => ClinicQueueError::InvalidInput(message),
        }
    }
}

impl From<serde_json::Error> for ClinicQueueError {
    fn from(e: serde_json::Error) -> Self {
        ClinicQueueError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicQueueError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicQueueError::StoreError(format!("Lock poisoned: {}", e))
    }
}

fn parse<T: std::str::FromStr<Err = String>>(value: &str) -> Result<T, ClinicQueueError> {
    value.parse().map_err(ClinicQueueError::InvalidInput)
}

// =========================================================================
// Observer (implemented by the host app)
// =========================================================================

/// Change listener implemented in Swift/Kotlin.
///
/// Called after the store lock is released, on the thread that made the
/// change. Implementations may read back from the core inside the callback.
#[uniffi::export(with_foreign)]
pub trait QueueObserver: Send + Sync {
    fn on_snapshot(&self, version: u64);
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open a queue holding the demo clinic data.
#[uniffi::export]
pub fn open_seeded_queue() -> Arc<ClinicQueueCore> {
    Arc::new(ClinicQueueCore::from_store(QueueStore::seeded()))
}

/// Open a queue with demo data and a JSON config (missing fields use defaults).
#[uniffi::export]
pub fn open_seeded_queue_with_config(
    config_json: String,
) -> Result<Arc<ClinicQueueCore>, ClinicQueueError> {
    let config = QueueConfig::from_json(&config_json)?;
    let store = QueueStore::new(seed::demo_snapshot(), config);
    Ok(Arc::new(ClinicQueueCore::from_store(store)))
}

/// Open an empty queue for the demo patient (for testing).
#[uniffi::export]
pub fn open_empty_queue() -> Arc<ClinicQueueCore> {
    Arc::new(ClinicQueueCore::from_store(QueueStore::empty(seed::demo_patient())))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Registered host observers, keyed by subscription handle.
#[derive(Default)]
struct ObserverList {
    next_id: u64,
    observers: Vec<(u64, Arc<dyn QueueObserver>)>,
}

/// Thread-safe queue wrapper for FFI.
///
/// One mutex serializes every operation, so one mutation always completes
/// before the next begins. Observers live outside that mutex and are told
/// about a new version once the store is unlocked.
#[derive(uniffi::Object)]
pub struct ClinicQueueCore {
    store: Arc<Mutex<QueueStore>>,
    observers: Mutex<ObserverList>,
}

impl ClinicQueueCore {
    /// Wrap an existing store.
    pub fn from_store(store: QueueStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            observers: Mutex::new(ObserverList::default()),
        }
    }

    /// Run a mutation under the store lock, then notify observers if it
    /// published a new version.
    fn commit<T, F>(&self, op: F) -> Result<T, ClinicQueueError>
    where
        F: FnOnce(&mut QueueStore) -> QueueResult<T>,
    {
        let (value, published) = {
            let mut store = self.store.lock()?;
            let before = store.version();
            let value = op(&mut *store)?;
            let after = store.version();
            (value, (after != before).then_some(after))
        };

        if let Some(version) = published {
            self.publish(version)?;
        }
        Ok(value)
    }

    fn publish(&self, version: u64) -> Result<(), ClinicQueueError> {
        let observers: Vec<Arc<dyn QueueObserver>> = self
            .observers
            .lock()?
            .observers
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer.on_snapshot(version);
        }
        Ok(())
    }
}

#[uniffi::export]
impl ClinicQueueCore {
    // =========================================================================
    // Reads
    // =========================================================================

    pub fn version(&self) -> Result<u64, ClinicQueueError> {
        Ok(self.store.lock()?.version())
    }

    pub fn queue(&self) -> Result<Vec<FfiQueueEntry>, ClinicQueueError> {
        let store = self.store.lock()?;
        Ok(store.queue().iter().map(FfiQueueEntry::from).collect())
    }

    /// Waiting entries in call order, optionally for one service name.
    pub fn waiting_entries(
        &self,
        service_type: Option<String>,
    ) -> Result<Vec<FfiQueueEntry>, ClinicQueueError> {
        let store = self.store.lock()?;
        Ok(store
            .waiting_entries(service_type.as_deref())
            .into_iter()
            .map(FfiQueueEntry::from)
            .collect())
    }

    pub fn services(&self) -> Result<Vec<FfiServiceType>, ClinicQueueError> {
        let store = self.store.lock()?;
        Ok(store.services().iter().cloned().map(Into::into).collect())
    }

    pub fn staff(&self) -> Result<Vec<FfiStaff>, ClinicQueueError> {
        let store = self.store.lock()?;
        Ok(store.staff().iter().cloned().map(Into::into).collect())
    }

    pub fn lanes(&self) -> Result<Vec<FfiLane>, ClinicQueueError> {
        let store = self.store.lock()?;
        Ok(store.lanes().iter().cloned().map(Into::into).collect())
    }

    pub fn notifications(&self) -> Result<Vec<FfiNotification>, ClinicQueueError> {
        let store = self.store.lock()?;
        Ok(store.notifications().iter().cloned().map(Into::into).collect())
    }

    pub fn appointments(&self) -> Result<Vec<FfiAppointment>, ClinicQueueError> {
        let store = self.store.lock()?;
        Ok(store.appointments().iter().cloned().map(Into::into).collect())
    }

    pub fn patient(&self) -> Result<FfiPatient, ClinicQueueError> {
        let store = self.store.lock()?;
        Ok(store.patient().clone().into())
    }

    pub fn active_entry(&self) -> Result<Option<FfiQueueEntry>, ClinicQueueError> {
        let store = self.store.lock()?;
        Ok(store.active_entry().map(FfiQueueEntry::from))
    }

    pub fn selected_patient(&self) -> Result<Option<FfiQueueEntry>, ClinicQueueError> {
        let store = self.store.lock()?;
        Ok(store.selected_patient().map(FfiQueueEntry::from))
    }

    pub fn get_staff_for_service(
        &self,
        service_id: String,
    ) -> Result<Vec<FfiStaff>, ClinicQueueError> {
        let store = self.store.lock()?;
        Ok(store
            .get_staff_for_service(&service_id)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// 1-based position of a waiting entry within its service.
    pub fn queue_position(&self, entry_id: String) -> Result<Option<u32>, ClinicQueueError> {
        let store = self.store.lock()?;
        Ok(stats::queue_position(&store.snapshot(), &entry_id))
    }

    pub fn service_loads(&self) -> Result<Vec<FfiServiceLoad>, ClinicQueueError> {
        let store = self.store.lock()?;
        Ok(stats::all_service_loads(&store.snapshot(), store.config())
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Full snapshot as JSON.
    pub fn snapshot_json(&self) -> Result<String, ClinicQueueError> {
        let store = self.store.lock()?;
        Ok(serde_json::to_string(store.snapshot().as_ref())?)
    }

    // =========================================================================
    // Queue Operations
    // =========================================================================

    /// Call the next patient, optionally for one service name.
    pub fn call_next_patient(
        &self,
        service_type: Option<String>,
    ) -> Result<Option<FfiQueueEntry>, ClinicQueueError> {
        let called = self.commit(|store| store.call_next_patient(service_type.as_deref()))?;
        Ok(called.as_ref().map(FfiQueueEntry::from))
    }

    /// Set an entry's status ("checked-in", "waiting", "in-service", "completed", "no-show").
    pub fn update_patient_status(
        &self,
        id: String,
        status: String,
    ) -> Result<FfiQueueEntry, ClinicQueueError> {
        let status: EntryStatus = parse(&status)?;
        let entry = self.commit(|store| store.update_patient_status(&id, status))?;
        Ok(FfiQueueEntry::from(&entry))
    }

    pub fn return_to_waiting(&self, id: String) -> Result<FfiQueueEntry, ClinicQueueError> {
        let entry = self.commit(|store| store.return_to_waiting(&id))?;
        Ok(FfiQueueEntry::from(&entry))
    }

    pub fn check_in_patient(
        &self,
        appointment_id: String,
    ) -> Result<FfiQueueEntry, ClinicQueueError> {
        let entry = self.commit(|store| store.check_in_patient(&appointment_id))?;
        Ok(FfiQueueEntry::from(&entry))
    }

    pub fn add_walk_in_patient(
        &self,
        data: FfiWalkInData,
    ) -> Result<FfiQueueEntry, ClinicQueueError> {
        let data: WalkInData = data.into();
        let entry = self.commit(|store| store.add_walk_in_patient(&data))?;
        Ok(FfiQueueEntry::from(&entry))
    }

    /// Leave the queue. Returns false if there was no active entry.
    pub fn leave_queue(&self) -> Result<bool, ClinicQueueError> {
        let removed = self.commit(|store| store.leave_queue())?;
        Ok(removed.is_some())
    }

    // =========================================================================
    // Roster Operations
    // =========================================================================

    pub fn update_staff_status(
        &self,
        id: String,
        status: String,
    ) -> Result<FfiStaff, ClinicQueueError> {
        let status: StaffStatus = parse(&status)?;
        Ok(self.commit(|store| store.update_staff_status(&id, status))?.into())
    }

    pub fn update_lane_status(
        &self,
        id: String,
        status: String,
    ) -> Result<FfiLane, ClinicQueueError> {
        let status: LaneStatus = parse(&status)?;
        Ok(self.commit(|store| store.update_lane_status(&id, status))?.into())
    }

    pub fn assign_staff_to_service(
        &self,
        service_id: String,
        staff_ids: Vec<String>,
    ) -> Result<FfiServiceType, ClinicQueueError> {
        let service =
            self.commit(|store| store.assign_staff_to_service(&service_id, &staff_ids))?;
        Ok(service.into())
    }

    pub fn mark_notification_read(&self, id: String) -> Result<(), ClinicQueueError> {
        self.commit(|store| store.mark_notification_read(&id))?;
        Ok(())
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register an observer. Returns a handle for `unsubscribe`.
    pub fn subscribe(&self, observer: Arc<dyn QueueObserver>) -> Result<u64, ClinicQueueError> {
        let mut list = self.observers.lock()?;
        list.next_id += 1;
        let id = list.next_id;
        list.observers.push((id, observer));
        Ok(id)
    }

    pub fn unsubscribe(&self, subscription: u64) -> Result<bool, ClinicQueueError> {
        let mut list = self.observers.lock()?;
        let before = list.observers.len();
        list.observers.retain(|(id, _)| *id != subscription);
        Ok(list.observers.len() != before)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe queue entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQueueEntry {
    pub id: String,
    pub queue_number: String,
    pub patient_name: String,
    pub patient_id: String,
    pub service_type: String,
    pub priority: String,
    pub status: String,
    /// RFC 3339
    pub check_in_time: String,
    pub estimated_wait_minutes: u32,
    pub assigned_staff: Option<String>,
    pub location: Option<String>,
    pub lane: Option<String>,
    pub room: Option<String>,
    pub notes: Option<String>,
}

impl From<&QueueEntry> for FfiQueueEntry {
    fn from(entry: &QueueEntry) -> Self {
        Self {
            id: entry.id.clone(),
            queue_number: entry.queue_number.clone(),
            patient_name: entry.patient_name.clone(),
            patient_id: entry.patient_id.clone(),
            service_type: entry.service_type.clone(),
            priority: entry.priority.to_string(),
            status: entry.status.to_string(),
            check_in_time: entry.check_in_time.to_rfc3339(),
            estimated_wait_minutes: entry.estimated_wait_minutes,
            assigned_staff: entry.assigned_staff.clone(),
            location: entry.location.clone(),
            lane: entry.lane.clone(),
            room: entry.room.clone(),
            notes: entry.notes.clone(),
        }
    }
}

/// FFI-safe service type.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiServiceType {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub avg_service_time: u32,
    pub locations: Vec<String>,
    pub is_active: bool,
    pub staff_count: u32,
    pub today_served: u32,
    pub today_waiting: u32,
}

impl From<ServiceType> for FfiServiceType {
    fn from(service: ServiceType) -> Self {
        Self {
            id: service.id,
            name: service.name,
            icon: service.icon,
            avg_service_time: service.avg_service_time,
            locations: service.locations,
            is_active: service.is_active,
            staff_count: service.staff_count,
            today_served: service.today_served,
            today_waiting: service.today_waiting,
        }
    }
}

/// FFI-safe staff member.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStaff {
    pub id: String,
    pub name: String,
    pub role: String,
    pub status: String,
    pub assigned_services: Vec<String>,
    pub patients_served_today: u32,
}

impl From<Staff> for FfiStaff {
    fn from(staff: Staff) -> Self {
        Self {
            id: staff.id,
            name: staff.name,
            role: staff.role,
            status: staff.status.as_str().to_string(),
            assigned_services: staff.assigned_services,
            patients_served_today: staff.patients_served_today,
        }
    }
}

/// FFI-safe lane.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLane {
    pub id: String,
    pub name: String,
    pub status: String,
    pub assigned_staff: Option<String>,
    pub service_types: Vec<String>,
}

impl From<Lane> for FfiLane {
    fn from(lane: Lane) -> Self {
        Self {
            id: lane.id,
            name: lane.name,
            status: lane.status.as_str().to_string(),
            assigned_staff: lane.assigned_staff,
            service_types: lane.service_types,
        }
    }
}

/// FFI-safe notification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotification {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub timestamp: String,
    pub read: bool,
}

impl From<Notification> for FfiNotification {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind.as_str().to_string(),
            title: notification.title,
            message: notification.message,
            timestamp: notification.timestamp.to_rfc3339(),
            read: notification.read,
        }
    }
}

/// FFI-safe appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: String,
    pub patient_id: String,
    pub service_type: String,
    pub date_time: String,
    pub location: String,
    pub doctor_name: Option<String>,
    pub status: String,
}

impl From<Appointment> for FfiAppointment {
    fn from(appointment: Appointment) -> Self {
        let status = match appointment.status {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::CheckedIn => "checked-in",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        Self {
            id: appointment.id,
            patient_id: appointment.patient_id,
            service_type: appointment.service_type,
            date_time: appointment.date_time.to_rfc3339(),
            location: appointment.location,
            doctor_name: appointment.doctor_name,
            status: status.to_string(),
        }
    }
}

/// FFI-safe patient profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub preferred_location: Option<String>,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            email: patient.email,
            phone: patient.phone,
            preferred_location: patient.preferred_location,
        }
    }
}

/// FFI-safe walk-in registration form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWalkInData {
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub service: String,
    pub notes: Option<String>,
}

impl From<FfiWalkInData> for WalkInData {
    fn from(data: FfiWalkInData) -> Self {
        WalkInData {
            first_name: data.first_name,
            last_name: data.last_name,
            phone: data.phone,
            email: data.email,
            service: data.service,
            notes: data.notes,
        }
    }
}

/// FFI-safe service load.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiServiceLoad {
    pub service_id: String,
    pub service_name: String,
    pub waiting: u32,
    pub in_service: u32,
    pub completed: u32,
    pub staff_count: u32,
    pub waiting_per_staff: Option<f64>,
    pub status: String,
}

impl From<ServiceLoad> for FfiServiceLoad {
    fn from(load: ServiceLoad) -> Self {
        Self {
            service_id: load.service_id,
            service_name: load.service_name,
            waiting: load.waiting,
            in_service: load.in_service,
            completed: load.completed,
            staff_count: load.staff_count,
            waiting_per_staff: load.waiting_per_staff,
            status: load.status.as_str().to_string(),
        }
    }
}
