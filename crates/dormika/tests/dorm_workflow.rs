use std::sync::Arc;

use chrono::NaiveDate;
use dormika::dorm::{
    Building, Directory, DormPolicy, DormService, FacilityKind, FacilityStatus, FixedClock,
    OfflineGateway, OperationStaff, PaymentMethod, Resident, RoomKind, RoomStatus,
    SharedFacility, StaffStatus, WorkflowError,
};

fn service_with(directory: Directory) -> DormService<OfflineGateway, FixedClock> {
    let now = NaiveDate::from_ymd_opt(2026, 3, 2)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("valid timestamp");
    DormService::new(
        directory,
        Arc::new(OfflineGateway),
        Arc::new(FixedClock::new(now)),
        DormPolicy::default(),
    )
}

fn meeting_room() -> SharedFacility {
    SharedFacility {
        id: "MR-001".to_string(),
        building_id: "B1".to_string(),
        kind: FacilityKind::MeetingRoom {
            size: "Small".to_string(),
        },
        status: FacilityStatus::Available,
    }
}

#[test]
fn facility_slots_are_booked_once() {
    let service = service_with(Directory::new("Happy Dorm"));
    service.add_resident(Resident::new("R001", "John Doe", "john@example.com", "0812"));
    service.add_building(Building::new("B1", 3));
    service.add_facility(meeting_room()).expect("building exists");

    service
        .book_shared_facility("R001", "MR-001", "B1", "2025-01-01T10:00")
        .expect("first booking");
    let err = service
        .book_shared_facility("R001", "MR-001", "B1", "2025-01-01T10:00")
        .expect_err("duplicate slot");
    assert_eq!(err.to_string(), "Time slot is already booked");
    service
        .book_shared_facility("R001", "MR-001", "B1", "2025-01-01T11:00")
        .expect("distinct slot");

    assert_eq!(
        service.inspect(|directory| directory.bookings_for_facility("MR-001")),
        2
    );
}

#[test]
fn resident_moves_in_pays_and_reports_a_repair() {
    let service = service_with(Directory::new("Happy Dorm"));
    let resident = service.register_resident("Mali Suk", "mali@example.com", "0801112222");
    assert_eq!(resident.id, "RS-2026-0001");
    service.add_building(Building::new("A01", 6));
    let staff = service.register_operation_staff("Olivia", Some("A01".to_string()));
    service.register_technician("Pat", vec!["plumbing".to_string()]);

    let studio = service
        .add_room(RoomKind::Studio, "A01", "02", None, RoomStatus::Available)
        .expect("room added");
    assert_eq!(studio.id, "RM-STUDIO-A01-02-0001");
    assert_eq!(studio.monthly_rent, 6500.0);
    let standard = service
        .add_room(RoomKind::Standard, "A01", "05", None, RoomStatus::Available)
        .expect("room added");

    let held = service
        .request_room_booking(&resident.id, "A01", &studio.id)
        .expect("room held");
    assert_eq!(held.contract.id, "LC-202603-0001");
    service
        .confirm_lease(&staff.id, &held.contract.id)
        .expect("lease confirmed");

    let invoice = service
        .create_invoice(&staff.id, &resident.id, "INV-MAR-6500-300-120-0-0-0")
        .expect_err("hyphenated id breaks the field count");
    assert!(matches!(invoice, WorkflowError::Format(_)));
    let invoice = service
        .create_invoice(&staff.id, &resident.id, "INV0301-6500-300-120-0-0-0")
        .expect("invoice issued");
    service
        .stage_payment(
            &resident.id,
            vec![invoice.id.clone()],
            Some(PaymentMethod::Card {
                card_id: "4111".to_string(),
                cardholder_name: "Mali Suk".to_string(),
                expiration_date: "01/29".to_string(),
                cvv: "987".to_string(),
            }),
        )
        .expect("staged");
    let receipt = service.pay(&resident.id, "march rent").expect("paid");
    assert_eq!(receipt.total, 6920.0);
    assert_eq!(
        service.show_invoices(&resident.id).expect("summary").total_invoices,
        0
    );

    let change = service
        .change_contract(&resident.id, &held.contract.id, &standard.id, "2026-3-17")
        .expect("upgraded");
    assert_eq!(change.proration.days_left, 15);
    assert_eq!(change.proration.amount, 822.58);
    assert_eq!(change.invoice.total(), 822.58);

    let ticket = service
        .request_maintenance(&resident.id, &standard.id, "Plumbing")
        .expect("ticket opened");
    assert_eq!(ticket.id, "MT-20260302-building-0001");
}

#[test]
fn maintenance_needs_available_staff() {
    let service = service_with(Directory::new("Quiet Dorm"));
    service.add_resident(Resident::new("R001", "John Doe", "john@example.com", "0812"));
    service.add_building(Building::new("B1", 2));
    let room = service
        .add_room(RoomKind::Standard, "B1", "01", Some(7900.0), RoomStatus::Occupied)
        .expect("room added");
    service.add_operation_staff(OperationStaff {
        id: "OS001".to_string(),
        name: "Off Duty".to_string(),
        building_responsibility: None,
        status: StaffStatus::Inactive,
    });

    assert_eq!(
        service.request_maintenance("R001", &room.id, "electrical"),
        Err(WorkflowError::precondition("no available staff!"))
    );
    service.inspect(|directory| assert!(directory.tickets().is_empty()));

    service.add_operation_staff(OperationStaff {
        id: "OS002".to_string(),
        name: "On Duty".to_string(),
        building_responsibility: None,
        status: StaffStatus::Active,
    });
    assert_eq!(
        service.request_maintenance("R001", &room.id, "electrical"),
        Err(WorkflowError::precondition("no available technician"))
    );

    let technician = service.register_technician("Spare", Vec::new());
    let ticket = service
        .request_maintenance("R001", &room.id, "electrical")
        .expect("any active technician is dispatched");
    assert_eq!(ticket.responsible_technician, technician.id);
    assert_eq!(ticket.dispatched_by, "OS002");
}
