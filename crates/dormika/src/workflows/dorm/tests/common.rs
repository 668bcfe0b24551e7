use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::workflows::dorm::{
    AccountStatus, Building, ContractStatus, Directory, DormPolicy, DormService, FacilityKind,
    FacilityStatus, FixedClock, GatewayError, LeaseContract, OfflineGateway, OperationStaff,
    PaymentGateway, PaymentMethod, Resident, Room, RoomKind, RoomStatus, SharedFacility,
    StaffStatus, Technician,
};

pub(super) const RESIDENT: &str = "R001";
pub(super) const SUSPENDED_RESIDENT: &str = "R002";
pub(super) const BUILDING: &str = "B1";
pub(super) const MEETING_ROOM: &str = "MR-001";
pub(super) const LAUNDRY: &str = "LD-001";
pub(super) const STAFF: &str = "OS001";
pub(super) const PLUMBER: &str = "TC001";
pub(super) const ELECTRICIAN: &str = "TC002";
pub(super) const LEASE: &str = "LC-202601-0007";
pub(super) const STANDARD_ROOM: &str = "RM-STANDARD-B1-05-0001";
pub(super) const STUDIO_ROOM: &str = "RM-STUDIO-B1-02-0001";
pub(super) const SPARE_STUDIO: &str = "RM-STUDIO-B1-02-0002";

pub(super) fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 2, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

/// Saturday 7 February 2026, 10:00, inside office hours.
pub(super) fn office_hours() -> NaiveDateTime {
    at(7, 10)
}

fn room(id: &str, kind: RoomKind, floor: &str, status: RoomStatus) -> Room {
    Room {
        id: id.to_string(),
        kind,
        building_id: BUILDING.to_string(),
        floor: floor.to_string(),
        monthly_rent: kind.default_rent(),
        status,
        hold_expires_at: None,
    }
}

/// One building with a meeting room, a laundry under repair, an occupied standard room
/// leased to `R001`, and two vacant studios.
pub(super) fn seeded_directory() -> Directory {
    let mut directory = Directory::new("Happy Dorm");

    let mut resident = Resident::new(RESIDENT, "John Doe", "john@example.com", "0812345678");
    resident.contracts.push(LEASE.to_string());
    directory.insert_resident(resident);
    directory.insert_resident(
        Resident::new(SUSPENDED_RESIDENT, "Jane Roe", "jane@example.com", "0898765432")
            .with_status(AccountStatus::Suspended),
    );

    directory.insert_building(Building::new(BUILDING, 8));
    directory.insert_facility(SharedFacility {
        id: MEETING_ROOM.to_string(),
        building_id: BUILDING.to_string(),
        kind: FacilityKind::MeetingRoom {
            size: "Large".to_string(),
        },
        status: FacilityStatus::Available,
    });
    directory.insert_facility(SharedFacility {
        id: LAUNDRY.to_string(),
        building_id: BUILDING.to_string(),
        kind: FacilityKind::Laundry,
        status: FacilityStatus::Maintenance,
    });
    directory.insert_room(room(STANDARD_ROOM, RoomKind::Standard, "05", RoomStatus::Occupied));
    directory.insert_room(room(STUDIO_ROOM, RoomKind::Studio, "02", RoomStatus::Available));
    directory.insert_room(room(SPARE_STUDIO, RoomKind::Studio, "02", RoomStatus::Available));

    directory.contracts.push(LeaseContract {
        id: LEASE.to_string(),
        resident_id: RESIDENT.to_string(),
        room_id: STANDARD_ROOM.to_string(),
        status: ContractStatus::Active,
        created_at: at(1, 9),
        move_in_date: NaiveDate::from_ymd_opt(2026, 1, 15),
    });

    directory.insert_operation_staff(OperationStaff {
        id: STAFF.to_string(),
        name: "Olivia Staff".to_string(),
        building_responsibility: Some(BUILDING.to_string()),
        status: StaffStatus::Active,
    });
    directory.insert_technician(Technician {
        id: PLUMBER.to_string(),
        name: "Pat Plumber".to_string(),
        skills: vec!["plumbing".to_string()],
        status: StaffStatus::Active,
    });
    directory.insert_technician(Technician {
        id: ELECTRICIAN.to_string(),
        name: "Eli Sparks".to_string(),
        skills: vec!["electrical".to_string()],
        status: StaffStatus::Active,
    });

    directory
}

pub(super) fn build_service() -> (DormService<OfflineGateway, FixedClock>, Arc<FixedClock>) {
    build_service_with(Arc::new(OfflineGateway))
}

pub(super) fn build_service_with<G>(gateway: Arc<G>) -> (DormService<G, FixedClock>, Arc<FixedClock>)
where
    G: PaymentGateway + 'static,
{
    let clock = Arc::new(FixedClock::new(office_hours()));
    let service = DormService::new(
        seeded_directory(),
        gateway,
        clock.clone(),
        DormPolicy::default(),
    );
    (service, clock)
}

pub(super) fn bank_transfer(reference_id: &str) -> PaymentMethod {
    PaymentMethod::BankAccount {
        bank_id: "KBANK".to_string(),
        account_name: "John Doe".to_string(),
        reference_id: reference_id.to_string(),
    }
}

pub(super) fn card() -> PaymentMethod {
    PaymentMethod::Card {
        card_id: "4111111111111111".to_string(),
        cardholder_name: "John Doe".to_string(),
        expiration_date: "12/28".to_string(),
        cvv: "123".to_string(),
    }
}

/// Issue an invoice to `R001` through the engine and return its id.
pub(super) fn issue_invoice<G>(service: &DormService<G, FixedClock>, invoice_data: &str) -> String
where
    G: PaymentGateway + 'static,
{
    service
        .create_invoice(STAFF, RESIDENT, invoice_data)
        .expect("invoice issued")
        .id
}

#[derive(Default, Clone)]
pub(super) struct RecordingGateway {
    charges: Arc<Mutex<Vec<(&'static str, f64)>>>,
}

impl RecordingGateway {
    pub(super) fn charges(&self) -> Vec<(&'static str, f64)> {
        self.charges.lock().expect("gateway mutex poisoned").clone()
    }
}

impl PaymentGateway for RecordingGateway {
    fn charge(&self, method: &PaymentMethod, amount: f64) -> Result<(), GatewayError> {
        OfflineGateway.charge(method, amount)?;
        self.charges
            .lock()
            .expect("gateway mutex poisoned")
            .push((method.label(), amount));
        Ok(())
    }
}

pub(super) struct OfflineBank;

impl PaymentGateway for OfflineBank {
    fn charge(&self, _method: &PaymentMethod, _amount: f64) -> Result<(), GatewayError> {
        Err(GatewayError::Unavailable("bank link down".to_string()))
    }
}

pub(super) fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
