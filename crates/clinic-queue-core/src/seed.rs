//! Demo clinic data.
//!
//! Check-in and appointment times are relative to the moment the snapshot
//! is built, so wait times look realistic whenever the demo starts.

use chrono::{Duration, Utc};

use crate::models::{
    Appointment, AppointmentStatus, EntryStatus, Lane, LaneStatus, Notification,
    NotificationKind, Patient, Priority, QueueEntry, ServiceType, Staff, StaffStatus,
};
use crate::store::QueueSnapshot;

#[allow(clippy::too_many_arguments)]
fn service(
    id: &str,
    name: &str,
    icon: &str,
    avg_service_time: u32,
    locations: &[&str],
    staff_count: u32,
    today_served: u32,
    today_waiting: u32,
) -> ServiceType {
    ServiceType {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        avg_service_time,
        locations: locations.iter().map(|l| l.to_string()).collect(),
        is_active: true,
        staff_count,
        today_served,
        today_waiting,
    }
}

fn staff(
    id: &str,
    name: &str,
    role: &str,
    status: StaffStatus,
    services: &[&str],
    served: u32,
) -> Staff {
    Staff {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        status,
        assigned_services: services.iter().map(|s| s.to_string()).collect(),
        patients_served_today: served,
    }
}

fn lane(id: &str, name: &str, status: LaneStatus, staff: Option<&str>, services: &[&str]) -> Lane {
    Lane {
        id: id.to_string(),
        name: name.to_string(),
        status,
        assigned_staff: staff.map(str::to_string),
        service_types: services.iter().map(|s| s.to_string()).collect(),
    }
}

#[allow(clippy::too_many_arguments)]
fn entry(
    number: &str,
    patient_name: &str,
    patient_id: &str,
    service_type: &str,
    priority: Priority,
    status: EntryStatus,
    minutes_ago: i64,
    estimated_wait_minutes: u32,
) -> QueueEntry {
    let mut entry = QueueEntry::new(
        number.to_string(),
        patient_name.to_string(),
        patient_id.to_string(),
        service_type.to_string(),
        estimated_wait_minutes,
    );
    entry.priority = priority;
    entry.status = status;
    entry.check_in_time = Utc::now() - Duration::minutes(minutes_ago);
    if status == EntryStatus::Completed {
        entry.served_at = Some(
            entry.check_in_time + Duration::minutes(estimated_wait_minutes.into()),
        );
    }
    entry
}

fn notification(
    kind: NotificationKind,
    title: &str,
    message: &str,
    minutes_ago: i64,
    read: bool,
) -> Notification {
    let mut notification = Notification::new(kind, title.to_string(), message.to_string());
    notification.timestamp = Utc::now() - Duration::minutes(minutes_ago);
    notification.read = read;
    notification
}

/// The logged-in demo patient.
pub fn demo_patient() -> Patient {
    Patient {
        id: "P-1001".to_string(),
        name: "Alex Morgan".to_string(),
        email: "alex.morgan@example.com".to_string(),
        phone: "(555) 010-2233".to_string(),
        preferred_location: Some("Building A".to_string()),
    }
}

/// Full demo state: five services, six staff, four lanes and a busy queue.
pub fn demo_snapshot() -> QueueSnapshot {
    let mut snapshot = QueueSnapshot::new(demo_patient());

    snapshot.services = vec![
        service(
            "general",
            "General Consultation",
            "stethoscope",
            15,
            &["Building A, Room 101", "Building A, Room 102"],
            2,
            18,
            4,
        ),
        service("lab", "Lab Work", "flask", 10, &["Building B, Lab 1"], 1, 24, 3),
        service("vaccination", "Vaccination", "syringe", 5, &["Building A, Room 105"], 1, 31, 1),
        service(
            "pharmacy",
            "Pharmacy",
            "pill",
            8,
            &["Building C, Counter 1", "Building C, Counter 2"],
            1,
            42,
            2,
        ),
        service("radiology", "Radiology", "scan", 25, &["Building D, Imaging Suite"], 1, 7, 1),
    ];

    snapshot.staff = vec![
        staff("staff-1", "Dr. Sarah Chen", "Physician", StaffStatus::Busy, &["general"], 9),
        staff("staff-2", "Dr. James Wilson", "Physician", StaffStatus::Available, &["general"], 8),
        staff("staff-3", "Maria Garcia", "Lab Technician", StaffStatus::Busy, &["lab"], 24),
        staff("staff-4", "Emily Park", "Nurse", StaffStatus::Available, &["vaccination"], 31),
        staff("staff-5", "David Kim", "Pharmacist", StaffStatus::Break, &["pharmacy"], 42),
        staff("staff-6", "Dr. Lisa Patel", "Radiologist", StaffStatus::Busy, &["radiology"], 7),
    ];

    snapshot.lanes = vec![
        lane(
            "lane-1",
            "Room 101",
            LaneStatus::Open,
            Some("Dr. Sarah Chen"),
            &["General Consultation"],
        ),
        lane("lane-2", "Lab 1", LaneStatus::Open, Some("Maria Garcia"), &["Lab Work"]),
        lane("lane-3", "Counter 1", LaneStatus::Break, Some("David Kim"), &["Pharmacy"]),
        lane("lane-4", "Imaging Suite", LaneStatus::Open, Some("Dr. Lisa Patel"), &["Radiology"]),
    ];

    let mut serving_general = entry(
        "Q-1041",
        "Robert Johnson",
        "P-2001",
        "General Consultation",
        Priority::Normal,
        EntryStatus::InService,
        35,
        15,
    );
    serving_general.assigned_staff = Some("Dr. Sarah Chen".to_string());
    serving_general.lane = Some("Room 101".to_string());
    serving_general.room = Some("101".to_string());
    serving_general.location = Some("Building A, Room 101".to_string());

    let mut serving_lab = entry(
        "Q-1042",
        "Linda Martinez",
        "P-2002",
        "Lab Work",
        Priority::High,
        EntryStatus::InService,
        22,
        10,
    );
    serving_lab.assigned_staff = Some("Maria Garcia".to_string());
    serving_lab.lane = Some("Lab 1".to_string());
    serving_lab.location = Some("Building B, Lab 1".to_string());

    let mut serving_radiology = entry(
        "Q-1043",
        "Thomas Brown",
        "P-2003",
        "Radiology",
        Priority::Normal,
        EntryStatus::InService,
        40,
        25,
    );
    serving_radiology.assigned_staff = Some("Dr. Lisa Patel".to_string());
    serving_radiology.lane = Some("Imaging Suite".to_string());

    let mut chest_pain = entry(
        "Q-1051",
        "Patricia Davis",
        "P-2004",
        "General Consultation",
        Priority::Urgent,
        EntryStatus::Waiting,
        4,
        5,
    );
    chest_pain.notes = Some("Chest discomfort, flagged at triage".to_string());

    snapshot.queue = vec![
        serving_general,
        serving_lab,
        serving_radiology,
        chest_pain,
        entry(
            "Q-1044",
            "Michael Lee",
            "P-2005",
            "General Consultation",
            Priority::Normal,
            EntryStatus::Waiting,
            28,
            15,
        ),
        entry(
            "Q-1045",
            "Jennifer White",
            "P-2006",
            "General Consultation",
            Priority::High,
            EntryStatus::Waiting,
            18,
            15,
        ),
        entry(
            "Q-1046",
            "William Harris",
            "P-2007",
            "Lab Work",
            Priority::Normal,
            EntryStatus::Waiting,
            16,
            10,
        ),
        entry(
            "Q-1047",
            "Elizabeth Clark",
            "P-2008",
            "Lab Work",
            Priority::Normal,
            EntryStatus::Waiting,
            9,
            10,
        ),
        entry(
            "Q-1048",
            "Daniel Lewis",
            "P-2009",
            "Vaccination",
            Priority::Normal,
            EntryStatus::Waiting,
            6,
            5,
        ),
        entry(
            "Q-1049",
            "Susan Walker",
            "P-2010",
            "Pharmacy",
            Priority::Normal,
            EntryStatus::Waiting,
            12,
            8,
        ),
        entry(
            "Q-1050",
            "Joseph Hall",
            "P-2011",
            "Pharmacy",
            Priority::High,
            EntryStatus::CheckedIn,
            2,
            8,
        ),
        entry(
            "Q-1039",
            "Karen Allen",
            "P-2012",
            "Vaccination",
            Priority::Normal,
            EntryStatus::Completed,
            75,
            5,
        ),
        entry(
            "Q-1040",
            "Steven Young",
            "P-2013",
            "Lab Work",
            Priority::Normal,
            EntryStatus::NoShow,
            90,
            10,
        ),
    ];

    snapshot.notifications = vec![
        notification(
            NotificationKind::Urgent,
            "Urgent patient waiting",
            "Q-1051 flagged urgent for General Consultation",
            4,
            false,
        ),
        notification(
            NotificationKind::Warning,
            "Pharmacy lane on break",
            "Counter 1 is on break; pharmacy queue is growing",
            10,
            false,
        ),
        notification(
            NotificationKind::Success,
            "Lab results ready",
            "Results for Q-1038 were sent to the physician",
            25,
            true,
        ),
        notification(
            NotificationKind::Info,
            "Shift change",
            "Afternoon shift starts at 14:00",
            60,
            true,
        ),
    ];

    let now = Utc::now();
    snapshot.appointments = vec![
        Appointment {
            id: "apt-1".to_string(),
            patient_id: "P-1001".to_string(),
            service_type: "General Consultation".to_string(),
            date_time: now + Duration::minutes(20),
            location: "Building A, Room 102".to_string(),
            doctor_name: Some("Dr. James Wilson".to_string()),
            status: AppointmentStatus::Scheduled,
        },
        Appointment {
            id: "apt-2".to_string(),
            patient_id: "P-1001".to_string(),
            service_type: "Lab Work".to_string(),
            date_time: now + Duration::days(3),
            location: "Building B, Lab 1".to_string(),
            doctor_name: None,
            status: AppointmentStatus::Scheduled,
        },
        Appointment {
            id: "apt-3".to_string(),
            patient_id: "P-1001".to_string(),
            service_type: "Vaccination".to_string(),
            date_time: now - Duration::days(14),
            location: "Building A, Room 105".to_string(),
            doctor_name: Some("Emily Park".to_string()),
            status: AppointmentStatus::Completed,
        },
    ];

    snapshot
}
