//! Staff, lane, service and notification operations.

use tracing::{info, warn};

use super::{QueueError, QueueResult, QueueStore, RecordKind};
use crate::models::{
    Lane, LaneStatus, Notification, NotificationKind, ServiceType, Staff, StaffStatus,
};

impl QueueStore {
    pub fn update_staff_status(&mut self, id: &str, status: StaffStatus) -> QueueResult<Staff> {
        let staff = self.mutate(|state, _| {
            let staff = state
                .staff
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| QueueError::not_found(RecordKind::Staff, id))?;
            staff.status = status;
            Ok(staff.clone())
        })?;
        info!(staff = %id, status = status.as_str(), "Updated staff status");
        Ok(staff)
    }

    pub fn update_lane_status(&mut self, id: &str, status: LaneStatus) -> QueueResult<Lane> {
        let lane = self.mutate(|state, _| {
            let lane = state
                .lanes
                .iter_mut()
                .find(|l| l.id == id)
                .ok_or_else(|| QueueError::not_found(RecordKind::Lane, id))?;
            lane.status = status;
            Ok(lane.clone())
        })?;
        info!(lane = %id, status = status.as_str(), "Updated lane status");
        Ok(lane)
    }

    /// Replace the set of staff serving a service.
    ///
    /// Recomputes every staff member's assignments in one pass: listed staff
    /// gain the service, everyone else loses it. `staff_count` is then set to
    /// the number of staff actually serving it, which equals
    /// `staff_ids.len()` when every ID is known and unique. Unknown staff IDs
    /// are skipped, or rejected under `strict_references`.
    pub fn assign_staff_to_service(
        &mut self,
        service_id: &str,
        staff_ids: &[String],
    ) -> QueueResult<ServiceType> {
        let service = self.mutate(|state, config| {
            if state.find_service(service_id).is_none() {
                return Err(QueueError::not_found(RecordKind::Service, service_id));
            }

            if let Some(unknown) = staff_ids.iter().find(|id| state.find_staff(id).is_none()) {
                if config.strict_references {
                    return Err(QueueError::invalid_reference(RecordKind::Staff, unknown));
                }
                warn!(
                    service = %service_id,
                    staff = %unknown,
                    "Skipping unknown staff in assignment"
                );
            }

            for staff in state.staff.iter_mut() {
                let wanted = staff_ids.iter().any(|id| *id == staff.id);
                let present = staff.serves(service_id);
                if wanted && !present {
                    staff.assigned_services.push(service_id.to_string());
                } else if !wanted && present {
                    staff.assigned_services.retain(|s| s != service_id);
                }
            }

            let count = state.staff.iter().filter(|s| s.serves(service_id)).count() as u32;
            let service = state
                .services
                .iter_mut()
                .find(|s| s.id == service_id)
                .ok_or_else(|| QueueError::not_found(RecordKind::Service, service_id))?;
            service.staff_count = count;
            Ok(service.clone())
        })?;

        info!(
            service = %service_id,
            staff_count = service.staff_count,
            "Assigned staff to service"
        );
        Ok(service)
    }

    /// Open or close a service for new patients.
    pub fn set_service_active(
        &mut self,
        service_id: &str,
        active: bool,
    ) -> QueueResult<ServiceType> {
        self.mutate(|state, _| {
            let service = state
                .services
                .iter_mut()
                .find(|s| s.id == service_id)
                .ok_or_else(|| QueueError::not_found(RecordKind::Service, service_id))?;
            service.is_active = active;
            Ok(service.clone())
        })
    }

    /// Zero the per-day counters on services and staff.
    pub fn reset_daily_counters(&mut self) -> QueueResult<()> {
        self.mutate(|state, _| {
            for service in state.services.iter_mut() {
                service.today_served = 0;
                service.today_waiting = 0;
            }
            for staff in state.staff.iter_mut() {
                staff.patients_served_today = 0;
            }
            Ok(())
        })?;
        info!("Daily counters reset");
        Ok(())
    }

    pub fn add_notification(
        &mut self,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> QueueResult<Notification> {
        self.mutate(|state, _| {
            let notification = Notification::new(kind, title.to_string(), message.to_string());
            state.notifications.push(notification.clone());
            Ok(notification)
        })
    }

    /// Mark one notification read. There is no way back to unread.
    pub fn mark_notification_read(&mut self, id: &str) -> QueueResult<Notification> {
        self.mutate(|state, _| {
            let notification = state
                .notifications
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or_else(|| QueueError::not_found(RecordKind::Notification, id))?;
            notification.read = true;
            Ok(notification.clone())
        })
    }

    /// Mark every notification read. Returns how many changed.
    pub fn mark_all_notifications_read(&mut self) -> QueueResult<usize> {
        if self.unread_notification_count() == 0 {
            return Ok(0);
        }
        self.mutate(|state, _| {
            let mut changed = 0;
            for notification in state.notifications.iter_mut().filter(|n| !n.read) {
                notification.read = true;
                changed += 1;
            }
            Ok(changed)
        })
    }
}
