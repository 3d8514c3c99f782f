//! Property tests for call ordering.

use chrono::{Duration, Utc};
use clinic_queue_core::seed::demo_patient;
use clinic_queue_core::{
    EntryStatus, Priority, QueueConfig, QueueEntry, QueueSnapshot, QueueStore,
};
use proptest::prelude::*;

const SERVICES: [&str; 3] = ["General Consultation", "Lab Work", "Pharmacy"];

fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Urgent),
        Just(Priority::High),
        Just(Priority::Normal),
    ]
}

fn status_strategy() -> impl Strategy<Value = EntryStatus> {
    prop_oneof![
        4 => Just(EntryStatus::Waiting),
        1 => Just(EntryStatus::InService),
        1 => Just(EntryStatus::Completed),
        1 => Just(EntryStatus::CheckedIn),
    ]
}

/// (priority, minutes ago, service index, status)
fn entries_strategy() -> impl Strategy<Value = Vec<(Priority, i64, usize, EntryStatus)>> {
    prop::collection::vec(
        (priority_strategy(), 0i64..600, 0usize..SERVICES.len(), status_strategy()),
        0..40,
    )
}

fn build_store(specs: &[(Priority, i64, usize, EntryStatus)]) -> QueueStore {
    let now = Utc::now();
    let mut snapshot = QueueSnapshot::new(demo_patient());
    snapshot.queue = specs
        .iter()
        .enumerate()
        .map(|(i, (priority, minutes_ago, service, status))| {
            let mut entry = QueueEntry::new(
                format!("Q-{:04}", 1000 + i),
                format!("Patient {}", i),
                format!("P-{}", i),
                SERVICES[*service].to_string(),
                10,
            );
            entry.priority = *priority;
            entry.status = *status;
            entry.check_in_time = now - Duration::minutes(*minutes_ago);
            entry
        })
        .collect();
    QueueStore::new(snapshot, QueueConfig::default())
}

proptest! {
    #[test]
    fn called_entry_has_highest_priority(specs in entries_strategy()) {
        let mut store = build_store(&specs);
        let waiting: Vec<QueueEntry> = store
            .queue()
            .iter()
            .filter(|e| e.status == EntryStatus::Waiting)
            .cloned()
            .collect();

        match store.call_next_patient(None).unwrap() {
            Some(called) => {
                let best = waiting.iter().map(|e| e.priority).max().unwrap();
                prop_assert_eq!(called.priority, best);
            }
            None => prop_assert!(waiting.is_empty()),
        }
    }

    #[test]
    fn called_entry_is_earliest_within_priority(specs in entries_strategy()) {
        let mut store = build_store(&specs);
        let waiting: Vec<QueueEntry> = store
            .queue()
            .iter()
            .filter(|e| e.status == EntryStatus::Waiting)
            .cloned()
            .collect();

        if let Some(called) = store.call_next_patient(None).unwrap() {
            let earliest = waiting
                .iter()
                .filter(|e| e.priority == called.priority)
                .map(|e| e.check_in_time)
                .min()
                .unwrap();
            prop_assert_eq!(called.check_in_time, earliest);
        }
    }

    #[test]
    fn service_filter_is_respected(specs in entries_strategy(), service in 0usize..SERVICES.len()) {
        let mut store = build_store(&specs);
        let service_name = SERVICES[service];
        let eligible = store
            .queue()
            .iter()
            .any(|e| e.status == EntryStatus::Waiting && e.service_type == service_name);

        match store.call_next_patient(Some(service_name)).unwrap() {
            Some(called) => prop_assert_eq!(called.service_type.as_str(), service_name),
            None => prop_assert!(!eligible),
        }
    }

    #[test]
    fn draining_follows_waiting_order(specs in entries_strategy()) {
        let mut store = build_store(&specs);
        let expected: Vec<String> = store
            .waiting_entries(None)
            .iter()
            .map(|e| e.id.clone())
            .collect();

        let mut called = Vec::new();
        while let Some(entry) = store.call_next_patient(None).unwrap() {
            called.push(entry.id);
        }

        // Ties on (priority, check-in) may come out in either order
        prop_assert_eq!(called.len(), expected.len());
        let ranks = |ids: &[String]| -> Vec<(u8, i64)> {
            ids.iter()
                .map(|id| {
                    let entry = store.find_entry(id).unwrap();
                    (entry.priority.rank(), entry.check_in_time.timestamp())
                })
                .collect()
        };
        prop_assert_eq!(ranks(&called), ranks(&expected));
    }
}
