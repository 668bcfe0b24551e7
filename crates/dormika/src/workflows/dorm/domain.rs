use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::payment::PaymentMethod;

/// Lifecycle of a resident account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    PendingVerification,
    Active,
    Suspended,
    Closed,
}

impl AccountStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AccountStatus::PendingVerification => "Pending Verification",
            AccountStatus::Active => "Active",
            AccountStatus::Suspended => "Suspended",
            AccountStatus::Closed => "Closed",
        }
    }
}

/// A dorm occupant. The id lists are views over the directory's collections and are
/// only written by the workflow engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resident {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub status: AccountStatus,
    pub move_in_date: Option<NaiveDate>,
    pub(crate) facility_bookings: Vec<usize>,
    pub(crate) contracts: Vec<String>,
    pub(crate) invoices: Vec<String>,
    pub(crate) receipts: Vec<String>,
    pub(crate) tickets: Vec<String>,
    pub(crate) pending_payment: Option<Payment>,
}

impl Resident {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
            status: AccountStatus::Active,
            move_in_date: None,
            facility_bookings: Vec::new(),
            contracts: Vec::new(),
            invoices: Vec::new(),
            receipts: Vec::new(),
            tickets: Vec::new(),
            pending_payment: None,
        }
    }

    pub fn with_status(mut self, status: AccountStatus) -> Self {
        self.status = status;
        self
    }

    /// Ids of invoices the resident still owes.
    pub fn outstanding_invoices(&self) -> &[String] {
        &self.invoices
    }

    pub fn contract_ids(&self) -> &[String] {
        &self.contracts
    }

    pub fn receipt_ids(&self) -> &[String] {
        &self.receipts
    }

    pub fn ticket_ids(&self) -> &[String] {
        &self.tickets
    }

    pub fn facility_booking_count(&self) -> usize {
        self.facility_bookings.len()
    }

    pub fn pending_payment(&self) -> Option<&Payment> {
        self.pending_payment.as_ref()
    }
}

/// A dormitory building grouping rooms and shared facilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub floors: u8,
    pub(crate) facilities: Vec<String>,
    pub(crate) rooms: Vec<String>,
}

impl Building {
    pub fn new(id: impl Into<String>, floors: u8) -> Self {
        Self {
            id: id.into(),
            floors,
            facilities: Vec::new(),
            rooms: Vec::new(),
        }
    }

    pub fn facility_ids(&self) -> &[String] {
        &self.facilities
    }

    pub fn room_ids(&self) -> &[String] {
        &self.rooms
    }

    pub fn has_facility(&self, facility_id: &str) -> bool {
        self.facilities.iter().any(|id| id == facility_id)
    }

    pub fn has_room(&self, room_id: &str) -> bool {
        self.rooms.iter().any(|id| id == room_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityStatus {
    Available,
    Reserved,
    InUse,
    Maintenance,
    Disabled,
}

impl FacilityStatus {
    /// Reserved and in-use facilities still take bookings for other slots.
    pub fn accepts_bookings(&self) -> bool {
        !matches!(self, FacilityStatus::Maintenance | FacilityStatus::Disabled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FacilityKind {
    MeetingRoom { size: String },
    StudyRoom,
    Laundry,
    Gym,
}

/// A shared space residents book by time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFacility {
    pub id: String,
    pub building_id: String,
    pub kind: FacilityKind,
    pub status: FacilityStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomKind {
    Standard,
    Studio,
}

impl RoomKind {
    pub fn code(&self) -> &'static str {
        match self {
            RoomKind::Standard => "STANDARD",
            RoomKind::Studio => "STUDIO",
        }
    }

    pub fn size_sqm(&self) -> u8 {
        match self {
            RoomKind::Standard => 26,
            RoomKind::Studio => 20,
        }
    }

    /// List monthly rent for the room type.
    pub fn default_rent(&self) -> f64 {
        match self {
            RoomKind::Standard => 8200.0,
            RoomKind::Studio => 6500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Reserved,
    Occupied,
    Maintenance,
}

impl RoomStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RoomStatus::Available => "Available",
            RoomStatus::Reserved => "Reserved",
            RoomStatus::Occupied => "Occupied",
            RoomStatus::Maintenance => "Maintenance",
        }
    }
}

/// A leasable room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub kind: RoomKind,
    pub building_id: String,
    pub floor: String,
    pub monthly_rent: f64,
    pub status: RoomStatus,
    pub hold_expires_at: Option<NaiveDateTime>,
}

impl Room {
    pub fn is_available(&self) -> bool {
        self.status == RoomStatus::Available
    }

    /// A reserved room whose hold deadline has passed.
    pub fn hold_lapsed(&self, now: NaiveDateTime) -> bool {
        self.status == RoomStatus::Reserved
            && self.hold_expires_at.is_some_and(|expiry| expiry <= now)
    }

    pub fn hold(&mut self, until: NaiveDateTime) {
        self.status = RoomStatus::Reserved;
        self.hold_expires_at = Some(until);
    }

    pub fn release(&mut self) {
        self.status = RoomStatus::Available;
        self.hold_expires_at = None;
    }

    pub fn occupy(&mut self) {
        self.status = RoomStatus::Occupied;
        self.hold_expires_at = None;
    }
}

/// A confirmed reservation of a shared facility for one time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityBooking {
    pub resident_id: String,
    pub building_id: String,
    pub facility_id: String,
    /// Opaque slot label; two bookings collide only when the labels are equal.
    pub booking_time: String,
    pub booked_at: NaiveDateTime,
}

impl FacilityBooking {
    pub fn occupies(&self, facility_id: &str, booking_time: &str) -> bool {
        self.facility_id == facility_id && self.booking_time == booking_time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Draft,
    PendingSign,
    Active,
    EndingSoon,
    Terminated,
    Expired,
}

impl ContractStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self, ContractStatus::Terminated | ContractStatus::Expired)
    }

    pub fn awaiting_confirmation(&self) -> bool {
        matches!(self, ContractStatus::Draft | ContractStatus::PendingSign)
    }
}

/// Binds a resident to a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseContract {
    pub id: String,
    pub resident_id: String,
    pub room_id: String,
    pub status: ContractStatus,
    pub created_at: NaiveDateTime,
    pub move_in_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Issued,
    Paid,
    Overdue,
    Disputed,
    Refunded,
}

impl InvoiceStatus {
    pub fn is_settled(&self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Refunded)
    }
}

/// Monthly cost breakdown entered by operation staff. Components are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InvoiceCharges {
    pub room_cost: f64,
    pub electricity_cost: f64,
    pub water_cost: f64,
    pub parking_slot_cost: f64,
    pub share_facility_cost: f64,
    pub maintenance_cost: f64,
}

impl InvoiceCharges {
    pub fn total(&self) -> f64 {
        self.room_cost
            + self.electricity_cost
            + self.water_cost
            + self.parking_slot_cost
            + self.share_facility_cost
            + self.maintenance_cost
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentKind {
    Charge,
    Credit,
}

impl AdjustmentKind {
    pub fn for_amount(amount: f64) -> Self {
        if amount > 0.0 {
            AdjustmentKind::Charge
        } else {
            AdjustmentKind::Credit
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "invoice_type", rename_all = "snake_case")]
pub enum InvoiceBody {
    Statement(InvoiceCharges),
    /// Signed difference produced when a lease moves to another room mid-month.
    Adjustment { amount: f64, kind: AdjustmentKind },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub resident_id: String,
    pub resident_name: String,
    pub body: InvoiceBody,
    pub status: InvoiceStatus,
    pub created_at: NaiveDateTime,
}

impl Invoice {
    pub fn total(&self) -> f64 {
        match &self.body {
            InvoiceBody::Statement(charges) => charges.total(),
            InvoiceBody::Adjustment { amount, .. } => *amount,
        }
    }

    pub fn mark_paid(&mut self) {
        self.status = InvoiceStatus::Paid;
    }
}

/// A resident's checkout: invoices to settle and the method to settle them with.
/// Consumed by a successful payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    invoice_ids: Vec<String>,
    method: Option<PaymentMethod>,
    pub staged_at: NaiveDateTime,
}

impl Payment {
    pub fn new(
        invoice_ids: Vec<String>,
        method: Option<PaymentMethod>,
        staged_at: NaiveDateTime,
    ) -> Self {
        Self {
            invoice_ids,
            method,
            staged_at,
        }
    }

    pub fn invoice_ids(&self) -> &[String] {
        &self.invoice_ids
    }

    pub fn method(&self) -> Option<&PaymentMethod> {
        self.method.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub resident_id: String,
    pub invoice_ids: Vec<String>,
    pub total: f64,
    pub reference: String,
    pub issued_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Idle,
    Started,
    Finished,
    Approved,
}

impl TicketStatus {
    /// The only legal successor of each state; approval is terminal.
    pub fn successor(&self) -> Option<TicketStatus> {
        match self {
            TicketStatus::Idle => Some(TicketStatus::Started),
            TicketStatus::Started => Some(TicketStatus::Finished),
            TicketStatus::Finished => Some(TicketStatus::Approved),
            TicketStatus::Approved => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceTicket {
    pub id: String,
    pub reporter_id: String,
    pub room_id: String,
    pub issue_category: String,
    pub responsible_technician: String,
    pub dispatched_by: String,
    pub approved_by: Option<String>,
    pub status: TicketStatus,
    pub reported_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffStatus {
    Active,
    Working,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStaff {
    pub id: String,
    pub name: String,
    pub building_responsibility: Option<String>,
    pub status: StaffStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    pub id: String,
    pub name: String,
    pub skills: Vec<String>,
    pub status: StaffStatus,
}

impl Technician {
    pub fn handles(&self, issue_category: &str) -> bool {
        self.skills
            .iter()
            .any(|skill| skill.eq_ignore_ascii_case(issue_category))
    }
}
