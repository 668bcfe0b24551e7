use chrono::NaiveDate;
use dormika::dorm::{
    AccountStatus, Building, Clock, DormService, FacilityKind, FacilityStatus, OperationStaff,
    PaymentGateway, Resident, RoomKind, RoomStatus, SharedFacility, StaffStatus, Technician,
    WorkflowError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Ids the demo registry is seeded with, so the CLI demo and manual curl sessions can
/// refer to them.
pub(crate) mod seed {
    pub(crate) const RESIDENT: &str = "R001";
    pub(crate) const SECOND_RESIDENT: &str = "R002";
    pub(crate) const SUSPENDED_RESIDENT: &str = "R003";
    pub(crate) const BUILDING: &str = "B1";
    pub(crate) const MEETING_ROOM: &str = "MR-001";
    pub(crate) const STUDY_ROOM: &str = "SR-001";
    pub(crate) const STAFF: &str = "OS001";
    pub(crate) const PLUMBER: &str = "TC001";
    pub(crate) const ELECTRICIAN: &str = "TC002";
}

/// Load a small demo dormitory: one building with shared facilities, four rooms, three
/// residents, one operation staff member and two technicians. Returns the ids of the
/// generated rooms in insertion order.
pub(crate) fn seed_demo<G, C>(service: &DormService<G, C>) -> Result<Vec<String>, WorkflowError>
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    service.add_building(Building::new(seed::BUILDING, 8));
    service.add_facility(SharedFacility {
        id: seed::MEETING_ROOM.to_string(),
        building_id: seed::BUILDING.to_string(),
        kind: FacilityKind::MeetingRoom {
            size: "Large".to_string(),
        },
        status: FacilityStatus::Available,
    })?;
    service.add_facility(SharedFacility {
        id: seed::STUDY_ROOM.to_string(),
        building_id: seed::BUILDING.to_string(),
        kind: FacilityKind::StudyRoom,
        status: FacilityStatus::Available,
    })?;

    let mut rooms = Vec::new();
    for (kind, floor) in [
        (RoomKind::Standard, "05"),
        (RoomKind::Standard, "05"),
        (RoomKind::Studio, "02"),
        (RoomKind::Studio, "03"),
    ] {
        let room = service.add_room(kind, seed::BUILDING, floor, None, RoomStatus::Available)?;
        rooms.push(room.id);
    }

    service.add_resident(Resident::new(
        seed::RESIDENT,
        "John Doe",
        "john@email.com",
        "0811111111",
    ));
    service.add_resident(Resident::new(
        seed::SECOND_RESIDENT,
        "Student A",
        "student@mail.com",
        "0812345678",
    ));
    service.add_resident(
        Resident::new(seed::SUSPENDED_RESIDENT, "Kenny", "ken@gmail.com", "1234567890")
            .with_status(AccountStatus::Suspended),
    );

    service.add_operation_staff(OperationStaff {
        id: seed::STAFF.to_string(),
        name: "Admin Somchai".to_string(),
        building_responsibility: Some(seed::BUILDING.to_string()),
        status: StaffStatus::Active,
    });
    service.add_technician(Technician {
        id: seed::PLUMBER.to_string(),
        name: "Tech Prasert".to_string(),
        skills: vec!["plumbing".to_string(), "water".to_string()],
        status: StaffStatus::Active,
    });
    service.add_technician(Technician {
        id: seed::ELECTRICIAN.to_string(),
        name: "Tech Anan".to_string(),
        skills: vec!["electrical".to_string(), "air conditioning".to_string()],
        status: StaffStatus::Active,
    });

    Ok(rooms)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
