use super::domain::{
    Building, FacilityBooking, Invoice, LeaseContract, MaintenanceTicket, OperationStaff, Receipt,
    Resident, Room, SharedFacility, Technician,
};
use super::sequence::IdSequence;

/// Canonical in-memory collections for one dormitory.
///
/// Lookups are linear scans with exact id matches. Inserts append without checking for
/// duplicate ids or references into other collections; the workflow engine validates
/// before it writes.
#[derive(Debug, Default, Clone)]
pub struct Directory {
    name: String,
    pub(crate) ids: IdSequence,
    pub(crate) residents: Vec<Resident>,
    pub(crate) buildings: Vec<Building>,
    pub(crate) facilities: Vec<SharedFacility>,
    pub(crate) rooms: Vec<Room>,
    pub(crate) operation_staff: Vec<OperationStaff>,
    pub(crate) technicians: Vec<Technician>,
    pub(crate) bookings: Vec<FacilityBooking>,
    pub(crate) contracts: Vec<LeaseContract>,
    pub(crate) invoices: Vec<Invoice>,
    pub(crate) receipts: Vec<Receipt>,
    pub(crate) tickets: Vec<MaintenanceTicket>,
}

impl Directory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ids(&mut self) -> &mut IdSequence {
        &mut self.ids
    }

    pub fn find_resident(&self, id: &str) -> Option<&Resident> {
        self.residents.iter().find(|resident| resident.id == id)
    }

    pub(crate) fn resident_index(&self, id: &str) -> Option<usize> {
        self.residents.iter().position(|resident| resident.id == id)
    }

    pub(crate) fn find_resident_mut(&mut self, id: &str) -> Option<&mut Resident> {
        self.residents.iter_mut().find(|resident| resident.id == id)
    }

    pub fn find_building(&self, id: &str) -> Option<&Building> {
        self.buildings.iter().find(|building| building.id == id)
    }

    pub(crate) fn find_building_mut(&mut self, id: &str) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|building| building.id == id)
    }

    pub fn find_facility(&self, id: &str) -> Option<&SharedFacility> {
        self.facilities.iter().find(|facility| facility.id == id)
    }

    pub fn find_room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    pub(crate) fn find_room_mut(&mut self, id: &str) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|room| room.id == id)
    }

    pub fn find_operation_staff(&self, id: &str) -> Option<&OperationStaff> {
        self.operation_staff.iter().find(|staff| staff.id == id)
    }

    pub fn find_technician(&self, id: &str) -> Option<&Technician> {
        self.technicians.iter().find(|technician| technician.id == id)
    }

    pub fn find_contract(&self, id: &str) -> Option<&LeaseContract> {
        self.contracts.iter().find(|contract| contract.id == id)
    }

    pub fn find_invoice(&self, id: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|invoice| invoice.id == id)
    }

    pub fn find_receipt(&self, id: &str) -> Option<&Receipt> {
        self.receipts.iter().find(|receipt| receipt.id == id)
    }

    pub fn find_ticket(&self, id: &str) -> Option<&MaintenanceTicket> {
        self.tickets.iter().find(|ticket| ticket.id == id)
    }

    pub fn insert_resident(&mut self, resident: Resident) {
        self.residents.push(resident);
    }

    pub fn insert_building(&mut self, building: Building) {
        self.buildings.push(building);
    }

    pub fn insert_operation_staff(&mut self, staff: OperationStaff) {
        self.operation_staff.push(staff);
    }

    pub fn insert_technician(&mut self, technician: Technician) {
        self.technicians.push(technician);
    }

    /// Adds the facility and lists it under its building when that building exists.
    pub fn insert_facility(&mut self, facility: SharedFacility) {
        if let Some(building) = self.find_building_mut(&facility.building_id) {
            building.facilities.push(facility.id.clone());
        }
        self.facilities.push(facility);
    }

    /// Adds the room and lists it under its building when that building exists.
    pub fn insert_room(&mut self, room: Room) {
        if let Some(building) = self.find_building_mut(&room.building_id) {
            building.rooms.push(room.id.clone());
        }
        self.rooms.push(room);
    }

    /// Any booking already holding this exact facility and slot label.
    pub fn slot_taken(&self, facility_id: &str, booking_time: &str) -> bool {
        self.bookings
            .iter()
            .any(|booking| booking.occupies(facility_id, booking_time))
    }

    pub fn bookings(&self) -> &[FacilityBooking] {
        &self.bookings
    }

    pub fn bookings_for_facility(&self, facility_id: &str) -> usize {
        self.bookings
            .iter()
            .filter(|booking| booking.facility_id == facility_id)
            .count()
    }

    pub fn residents(&self) -> &[Resident] {
        &self.residents
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn contracts(&self) -> &[LeaseContract] {
        &self.contracts
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn tickets(&self) -> &[MaintenanceTicket] {
        &self.tickets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::dorm::domain::{FacilityKind, FacilityStatus, RoomKind, RoomStatus};

    #[test]
    fn lookups_are_exact_and_optional() {
        let mut directory = Directory::new("Happy Dorm");
        directory.insert_resident(Resident::new("R001", "John Doe", "john@example.com", "0812"));

        assert!(directory.find_resident("R001").is_some());
        assert!(directory.find_resident("R00").is_none());
        assert!(directory.find_resident("r001").is_none());
        assert_eq!(directory.name(), "Happy Dorm");
    }

    #[test]
    fn insert_does_not_enforce_unique_ids() {
        let mut directory = Directory::new("Happy Dorm");
        directory.insert_resident(Resident::new("R001", "John", "a@example.com", "1"));
        directory.insert_resident(Resident::new("R001", "Jane", "b@example.com", "2"));

        assert_eq!(directory.residents().len(), 2);
        let found = directory.find_resident("R001").expect("first match");
        assert_eq!(found.name, "John");
    }

    #[test]
    fn resources_are_listed_under_their_building() {
        let mut directory = Directory::new("Happy Dorm");
        directory.insert_building(Building::new("B1", 4));
        directory.insert_facility(SharedFacility {
            id: "MR-001".to_string(),
            building_id: "B1".to_string(),
            kind: FacilityKind::MeetingRoom {
                size: "Large".to_string(),
            },
            status: FacilityStatus::Available,
        });
        directory.insert_room(Room {
            id: "RM-STUDIO-B1-02-0001".to_string(),
            kind: RoomKind::Studio,
            building_id: "B1".to_string(),
            floor: "02".to_string(),
            monthly_rent: 6500.0,
            status: RoomStatus::Available,
            hold_expires_at: None,
        });

        let building = directory.find_building("B1").expect("building present");
        assert!(building.has_facility("MR-001"));
        assert!(building.has_room("RM-STUDIO-B1-02-0001"));
    }
}
