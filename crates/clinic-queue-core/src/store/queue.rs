//! Queue entry operations.

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, warn};

use super::{QueueError, QueueResult, QueueSnapshot, QueueStore, RecordKind};
use crate::config::QueueConfig;
use crate::models::{AppointmentStatus, EntryStatus, Priority, QueueEntry, WalkInData};

/// Placement fields an admin can set on an entry. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryAssignment {
    pub assigned_staff: Option<String>,
    pub location: Option<String>,
    pub lane: Option<String>,
    pub room: Option<String>,
}

/// Random `PREFIX-####` number not used by any live entry.
///
/// Starts at a random 4-digit number and walks forward, so it terminates
/// even when most numbers are taken.
fn next_queue_number(queue: &[QueueEntry], prefix: &str) -> String {
    let start: u32 = rand::thread_rng().gen_range(1000..=9999);
    (0..9000)
        .map(|offset| 1000 + (start - 1000 + offset) % 9000)
        .map(|n| format!("{}-{:04}", prefix, n))
        .find(|candidate| {
            !queue
                .iter()
                .any(|e| e.is_live() && &e.queue_number == candidate)
        })
        .unwrap_or_else(|| format!("{}-{:04}", prefix, start))
}

/// How a status change was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusChange {
    /// Plain update, checked against the transition table
    Update,
    /// Explicit return to the waiting line
    ReturnToWaiting,
}

/// Overwrite an entry's status, honoring the transition policy.
///
/// The first completion of an entry bumps the served counters. Reopening
/// and completing it again does not count a second visit.
fn set_status(
    state: &mut QueueSnapshot,
    config: &QueueConfig,
    id: &str,
    status: EntryStatus,
    change: StatusChange,
) -> QueueResult<QueueEntry> {
    let entry = state
        .find_entry_mut(id)
        .ok_or_else(|| QueueError::not_found(RecordKind::QueueEntry, id))?;

    let previous = entry.status;
    let allowed = match change {
        StatusChange::Update => previous.can_transition_to(status),
        StatusChange::ReturnToWaiting => previous.can_return_to_waiting(),
    };
    if config.enforce_transitions && !allowed {
        warn!(entry = %id, from = %previous, to = %status, "Rejected status transition");
        return Err(QueueError::InvalidTransition {
            from: previous,
            to: status,
        });
    }

    entry.status = status;
    let first_completion = status == EntryStatus::Completed && entry.served_at.is_none();
    if first_completion {
        entry.served_at = Some(Utc::now());
    }
    let updated = entry.clone();

    if first_completion {
        record_completion(state, &updated);
    }

    Ok(updated)
}

/// Bump the served counters of the entry's service and staff member.
fn record_completion(state: &mut QueueSnapshot, entry: &QueueEntry) {
    if let Some(service) = state
        .services
        .iter_mut()
        .find(|s| s.name == entry.service_type)
    {
        service.today_served += 1;
    }

    if let Some(staff_name) = entry.assigned_staff.as_deref() {
        if let Some(staff) = state.staff.iter_mut().find(|s| s.name == staff_name) {
            staff.patients_served_today += 1;
        }
    }
}

impl QueueStore {
    /// Move the highest-priority, longest-waiting entry to in-service.
    ///
    /// Returns `Ok(None)` without publishing when nothing is waiting.
    pub fn call_next_patient(
        &mut self,
        service_type: Option<&str>,
    ) -> QueueResult<Option<QueueEntry>> {
        let next_id = match self.state.next_in_line(service_type) {
            Some(entry) => entry.id.clone(),
            None => {
                debug!(service = ?service_type, "No waiting patients to call");
                return Ok(None);
            }
        };

        let called = self.mutate(|state, config| {
            let entry = set_status(
                state,
                config,
                &next_id,
                EntryStatus::InService,
                StatusChange::Update,
            )?;
            state.selected_patient_id = Some(entry.id.clone());
            Ok(entry)
        })?;

        info!(
            entry = %called.id,
            queue_number = %called.queue_number,
            priority = %called.priority,
            service = %called.service_type,
            "Called next patient"
        );
        Ok(Some(called))
    }

    /// Set an entry's status.
    ///
    /// Any-to-any unless `enforce_transitions` is on, in which case an
    /// in-service entry goes back to waiting only through
    /// [`return_to_waiting`](Self::return_to_waiting). The first completion
    /// of an entry increments its service's `today_served` and the serving
    /// staff member's `patients_served_today`.
    pub fn update_patient_status(
        &mut self,
        id: &str,
        status: EntryStatus,
    ) -> QueueResult<QueueEntry> {
        let updated = self.mutate(|state, config| {
            set_status(state, config, id, status, StatusChange::Update)
        })?;
        info!(entry = %id, status = %status, "Updated patient status");
        Ok(updated)
    }

    /// Same as [`update_patient_status`](Self::update_patient_status).
    pub fn move_patient(&mut self, id: &str, new_status: EntryStatus) -> QueueResult<QueueEntry> {
        self.update_patient_status(id, new_status)
    }

    /// Put an entry back in the waiting line and drop it from the admin selection.
    pub fn return_to_waiting(&mut self, id: &str) -> QueueResult<QueueEntry> {
        let updated = self.mutate(|state, config| {
            let entry = set_status(
                state,
                config,
                id,
                EntryStatus::Waiting,
                StatusChange::ReturnToWaiting,
            )?;
            if state.selected_patient_id.as_deref() == Some(id) {
                state.selected_patient_id = None;
            }
            Ok(entry)
        })?;
        info!(entry = %id, "Returned patient to waiting");
        Ok(updated)
    }

    /// Change an entry's priority (triage).
    pub fn set_priority(&mut self, id: &str, priority: Priority) -> QueueResult<QueueEntry> {
        self.mutate(|state, _| {
            let entry = state
                .find_entry_mut(id)
                .ok_or_else(|| QueueError::not_found(RecordKind::QueueEntry, id))?;
            entry.priority = priority;
            Ok(entry.clone())
        })
    }

    /// Check the logged-in patient in for an appointment.
    ///
    /// An unknown appointment falls back to the default service and location
    /// unless `strict_references` is set. With `enforce_transitions`, only a
    /// scheduled appointment can be checked in.
    pub fn check_in_patient(&mut self, appointment_id: &str) -> QueueResult<QueueEntry> {
        let entry = self.mutate(|state, config| {
            let (service_type, location) = match state.find_appointment(appointment_id) {
                Some(appointment) => {
                    if config.enforce_transitions
                        && appointment.status != AppointmentStatus::Scheduled
                    {
                        return Err(QueueError::Validation(format!(
                            "Appointment {} is not scheduled",
                            appointment_id
                        )));
                    }
                    (appointment.service_type.clone(), appointment.location.clone())
                }
                None if config.strict_references => {
                    return Err(QueueError::invalid_reference(
                        RecordKind::Appointment,
                        appointment_id,
                    ));
                }
                None => {
                    warn!(
                        appointment = %appointment_id,
                        "Unknown appointment, using default service"
                    );
                    (
                        config.default_service_name.clone(),
                        config.default_location.clone(),
                    )
                }
            };

            let mut entry = QueueEntry::new(
                next_queue_number(&state.queue, &config.checkin_number_prefix),
                state.patient.name.clone(),
                state.patient.id.clone(),
                service_type,
                config.default_wait_minutes,
            );
            entry.location = Some(location);

            if let Some(appointment) = state
                .appointments
                .iter_mut()
                .find(|a| a.id == appointment_id)
            {
                appointment.status = AppointmentStatus::CheckedIn;
            }

            state.active_entry_id = Some(entry.id.clone());
            state.queue.push(entry.clone());
            Ok(entry)
        })?;

        info!(
            entry = %entry.id,
            queue_number = %entry.queue_number,
            appointment = %appointment_id,
            "Patient checked in"
        );
        Ok(entry)
    }

    /// Register a walk-in patient.
    ///
    /// Required fields are validated first. An unknown service ID falls back to
    /// the default service unless `strict_references` is set; a known one gets
    /// its `today_waiting` counter incremented.
    pub fn add_walk_in_patient(&mut self, data: &WalkInData) -> QueueResult<QueueEntry> {
        data.validate().map_err(QueueError::Validation)?;

        let entry = self.mutate(|state, config| {
            let (service_type, wait_minutes, location) =
                match state.services.iter_mut().find(|s| s.id == data.service) {
                    Some(service) => {
                        service.today_waiting += 1;
                        let location = service
                            .default_location()
                            .unwrap_or(config.default_location.as_str())
                            .to_string();
                        (service.name.clone(), service.avg_service_time, location)
                    }
                    None if config.strict_references => {
                        return Err(QueueError::invalid_reference(
                            RecordKind::Service,
                            &data.service,
                        ));
                    }
                    None => {
                        warn!(service = %data.service, "Unknown service, using default");
                        (
                            config.default_service_name.clone(),
                            config.default_wait_minutes,
                            config.default_location.clone(),
                        )
                    }
                };

            let patient_id = format!(
                "{}{}",
                config.walkin_patient_prefix,
                &uuid::Uuid::new_v4().simple().to_string()[..8].to_uppercase()
            );

            let mut entry = QueueEntry::new(
                next_queue_number(&state.queue, &config.walkin_number_prefix),
                data.full_name(),
                patient_id,
                service_type,
                wait_minutes,
            );
            entry.location = Some(location);
            entry.notes = data.notes.clone();

            state.active_entry_id = Some(entry.id.clone());
            state.queue.push(entry.clone());
            Ok(entry)
        })?;

        info!(
            entry = %entry.id,
            queue_number = %entry.queue_number,
            service = %entry.service_type,
            "Walk-in patient registered"
        );
        Ok(entry)
    }

    /// Remove the logged-in patient's entry from the queue.
    ///
    /// Returns the removed entry, or `Ok(None)` without publishing when there
    /// is no active entry.
    pub fn leave_queue(&mut self) -> QueueResult<Option<QueueEntry>> {
        let active_id = match self.state.active_entry_id.clone() {
            Some(id) => id,
            None => {
                debug!("No active queue entry to leave");
                return Ok(None);
            }
        };

        let removed = self.mutate(|state, _| {
            let removed = state
                .queue
                .iter()
                .position(|e| e.id == active_id)
                .map(|index| state.queue.remove(index));
            state.active_entry_id = None;
            if state.selected_patient_id.as_deref() == Some(active_id.as_str()) {
                state.selected_patient_id = None;
            }
            Ok(removed)
        })?;

        info!(entry = %active_id, "Patient left the queue");
        Ok(removed)
    }

    /// Point the admin selection at an entry.
    pub fn select_patient(&mut self, id: &str) -> QueueResult<QueueEntry> {
        self.mutate(|state, _| {
            let entry = state
                .find_entry(id)
                .cloned()
                .ok_or_else(|| QueueError::not_found(RecordKind::QueueEntry, id))?;
            state.selected_patient_id = Some(entry.id.clone());
            Ok(entry)
        })
    }

    pub fn clear_selection(&mut self) -> QueueResult<()> {
        self.mutate(|state, _| {
            state.selected_patient_id = None;
            Ok(())
        })
    }

    /// Set staff, location, lane or room on an entry.
    pub fn assign_entry(
        &mut self,
        id: &str,
        assignment: EntryAssignment,
    ) -> QueueResult<QueueEntry> {
        let updated = self.mutate(|state, _| {
            let entry = state
                .find_entry_mut(id)
                .ok_or_else(|| QueueError::not_found(RecordKind::QueueEntry, id))?;
            if let Some(staff) = assignment.assigned_staff {
                entry.assigned_staff = Some(staff);
            }
            if let Some(location) = assignment.location {
                entry.location = Some(location);
            }
            if let Some(lane) = assignment.lane {
                entry.lane = Some(lane);
            }
            if let Some(room) = assignment.room {
                entry.room = Some(room);
            }
            Ok(entry.clone())
        })?;
        debug!(entry = %id, "Updated entry placement");
        Ok(updated)
    }

    /// Replace an entry's notes.
    pub fn update_entry_notes(
        &mut self,
        id: &str,
        notes: Option<String>,
    ) -> QueueResult<QueueEntry> {
        self.mutate(|state, _| {
            let entry = state
                .find_entry_mut(id)
                .ok_or_else(|| QueueError::not_found(RecordKind::QueueEntry, id))?;
            entry.notes = notes;
            Ok(entry.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(number: &str, status: EntryStatus) -> QueueEntry {
        let mut entry = QueueEntry::new(
            number.into(),
            "Test".into(),
            "P-1".into(),
            "Lab Work".into(),
            10,
        );
        entry.status = status;
        entry
    }

    #[test]
    fn test_queue_number_format() {
        let number = next_queue_number(&[], "Q");
        assert_eq!(number.len(), 6);
        assert!(number.starts_with("Q-"));
        assert!(number[2..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_queue_number_avoids_live_entries() {
        // Every number but Q-5000 is held by a live entry
        let queue: Vec<QueueEntry> = (1000..=9999)
            .filter(|n| *n != 5000)
            .map(|n| entry(&format!("Q-{:04}", n), EntryStatus::Waiting))
            .collect();

        assert_eq!(next_queue_number(&queue, "Q"), "Q-5000");
    }

    #[test]
    fn test_queue_number_reuses_finished_entries() {
        let queue: Vec<QueueEntry> = (1000..=9999)
            .map(|n| entry(&format!("Q-{:04}", n), EntryStatus::Completed))
            .collect();

        let number = next_queue_number(&queue, "Q");
        assert!(number.starts_with("Q-"));
    }
}
