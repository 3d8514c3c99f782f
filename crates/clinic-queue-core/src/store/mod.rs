//! In-memory queue store.
//!
//! The store owns one [`QueueSnapshot`] behind an `Arc`. A mutation clones the
//! snapshot, edits the clone and only swaps it in when the edit succeeds, so
//! an `Err` leaves the published state untouched. After each swap every
//! subscriber sees the new snapshot before the mutation returns.

mod observer;
mod queue;
mod roster;
mod snapshot;

pub use observer::SubscriptionId;
pub use queue::EntryAssignment;
pub use snapshot::{call_order, QueueSnapshot};

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::config::QueueConfig;
use crate::models::{
    Appointment, EntryStatus, Lane, Notification, Patient, QueueEntry, ServiceType, Staff,
};
use observer::Subscribers;

/// Kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    QueueEntry,
    Staff,
    Lane,
    Service,
    Appointment,
    Notification,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::QueueEntry => "Queue entry",
            RecordKind::Staff => "Staff member",
            RecordKind::Lane => "Lane",
            RecordKind::Service => "Service",
            RecordKind::Appointment => "Appointment",
            RecordKind::Notification => "Notification",
        };
        f.write_str(name)
    }
}

/// Store errors. State is never modified when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueueError {
    /// The primary target of an operation does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    /// A secondary reference (service, appointment, staff) does not resolve
    #[error("Unknown {kind} reference: {id}")]
    InvalidReference { kind: RecordKind, id: String },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: EntryStatus, to: EntryStatus },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl QueueError {
    pub(crate) fn not_found(kind: RecordKind, id: &str) -> Self {
        QueueError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_reference(kind: RecordKind, id: &str) -> Self {
        QueueError::InvalidReference {
            kind,
            id: id.to_string(),
        }
    }
}

pub type QueueResult<T> = Result<T, QueueError>;

/// The clinic queue state container.
#[derive(Debug)]
pub struct QueueStore {
    state: Arc<QueueSnapshot>,
    config: QueueConfig,
    subscribers: Subscribers,
}

impl QueueStore {
    /// Create a store from an initial snapshot.
    pub fn new(initial: QueueSnapshot, config: QueueConfig) -> Self {
        Self {
            state: Arc::new(initial),
            config,
            subscribers: Subscribers::default(),
        }
    }

    /// Store holding the demo clinic data.
    pub fn seeded() -> Self {
        Self::new(crate::seed::demo_snapshot(), QueueConfig::default())
    }

    /// Store with no queue, staff or services for the given patient.
    pub fn empty(patient: Patient) -> Self {
        Self::new(QueueSnapshot::new(patient), QueueConfig::default())
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current snapshot. Cheap to clone and never changes after it is returned.
    pub fn snapshot(&self) -> Arc<QueueSnapshot> {
        Arc::clone(&self.state)
    }

    pub fn version(&self) -> u64 {
        self.state.version
    }

    pub fn queue(&self) -> &[QueueEntry] {
        &self.state.queue
    }

    pub fn staff(&self) -> &[Staff] {
        &self.state.staff
    }

    pub fn services(&self) -> &[ServiceType] {
        &self.state.services
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.state.lanes
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.state.notifications
    }

    pub fn patient(&self) -> &Patient {
        &self.state.patient
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.state.appointments
    }

    pub fn active_entry(&self) -> Option<&QueueEntry> {
        self.state.active_entry()
    }

    pub fn selected_patient(&self) -> Option<&QueueEntry> {
        self.state.selected_patient()
    }

    pub fn find_entry(&self, id: &str) -> Option<&QueueEntry> {
        self.state.find_entry(id)
    }

    /// Waiting entries in the order they would be called.
    pub fn waiting_entries(&self, service_type: Option<&str>) -> Vec<&QueueEntry> {
        self.state.waiting_entries(service_type)
    }

    /// Staff assigned to a service.
    pub fn get_staff_for_service(&self, service_id: &str) -> Vec<Staff> {
        self.state
            .staff_for_service(service_id)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn unread_notification_count(&self) -> usize {
        self.state.unread_notification_count()
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register a listener called with each new snapshot.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&QueueSnapshot) + Send + Sync + 'static,
    {
        let id = self.subscribers.add(Box::new(listener));
        debug!(subscription = id.0, "Subscriber added");
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Apply `edit` to a copy of the state and publish it on success.
    fn mutate<T, F>(&mut self, edit: F) -> QueueResult<T>
    where
        F: FnOnce(&mut QueueSnapshot, &QueueConfig) -> QueueResult<T>,
    {
        let mut next = QueueSnapshot::clone(&self.state);
        let value = edit(&mut next, &self.config)?;
        next.version += 1;
        self.state = Arc::new(next);
        self.subscribers.notify(&self.state);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn store() -> QueueStore {
        QueueStore::empty(Patient {
            id: "P-001".into(),
            name: "Alex Morgan".into(),
            email: "alex@example.com".into(),
            phone: "555-0100".into(),
            preferred_location: None,
        })
    }

    #[test]
    fn test_mutate_publishes_new_version() {
        let mut store = store();
        let seen = Arc::new(AtomicU64::new(0));
        let seen_by_listener = Arc::clone(&seen);
        store.subscribe(move |snapshot| {
            seen_by_listener.store(snapshot.version, Ordering::SeqCst);
        });

        store.mutate(|_, _| Ok(())).unwrap();
        assert_eq!(store.version(), 1);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_mutate_keeps_state() {
        let mut store = store();
        let before = store.snapshot();

        let result: QueueResult<()> = store.mutate(|state, _| {
            state.queue.clear();
            state.lanes.push(Lane::new("l1".into(), "Counter 1".into()));
            Err(QueueError::Validation("rejected".into()))
        });

        assert!(result.is_err());
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert!(store.lanes().is_empty());
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = store();
        let calls = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&calls);
        let id = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.mutate(|_, _| Ok(())).unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.mutate(|_, _| Ok(())).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_old_snapshot_is_immutable() {
        let mut store = store();
        let old = store.snapshot();
        store
            .mutate(|state, _| {
                state.lanes.push(Lane::new("l1".into(), "Counter 1".into()));
                Ok(())
            })
            .unwrap();

        assert!(old.lanes.is_empty());
        assert_eq!(store.lanes().len(), 1);
    }

    #[test]
    fn test_error_messages() {
        let err = QueueError::not_found(RecordKind::Lane, "l9");
        assert_eq!(err.to_string(), "Lane not found: l9");

        let err = QueueError::InvalidTransition {
            from: EntryStatus::Completed,
            to: EntryStatus::Waiting,
        };
        assert_eq!(err.to_string(), "Invalid status transition: completed -> waiting");
    }
}
