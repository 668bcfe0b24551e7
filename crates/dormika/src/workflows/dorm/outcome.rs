//! Tagged workflow failures and the response payloads handed to HTTP callers.
//!
//! Views copy the salient fields out of registry entities so nothing outside the engine
//! holds a reference into the directory.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::json;

use super::billing::{InvoiceFormatError, ProratedChange};
use super::domain::{
    FacilityBooking, Invoice, InvoiceBody, MaintenanceTicket, Receipt, Resident, Room, RoomKind,
};
use super::payment::GatewayError;
use super::service::{ContractChange, LeaseBinding, StagedPayment};

/// Registry collections a lookup can miss in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Resident,
    OperationStaff,
    Technician,
    Building,
    Facility,
    Room,
    Contract,
    Invoice,
    Ticket,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Resident => "Resident",
            EntityKind::OperationStaff => "Operation Staff",
            EntityKind::Technician => "Technician",
            EntityKind::Building => "Building",
            EntityKind::Facility => "Facility",
            EntityKind::Room => "Room",
            EntityKind::Contract => "Contract",
            EntityKind::Invoice => "Invoice",
            EntityKind::Ticket => "Maintenance ticket",
        }
    }
}

/// Every way a workflow can refuse a request. All variants are recoverable by the caller
/// except [`WorkflowError::Invariant`], which signals a registry inconsistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("{} not found", .0.label())]
    NotFound(EntityKind),
    #[error("Time slot is already booked")]
    AlreadyBooked,
    #[error("Format error: {0}")]
    Format(String),
    #[error("{0}")]
    PreconditionFailed(String),
    #[error("{0}")]
    Restricted(String),
    #[error("{0}")]
    PaymentMethod(String),
    #[error("registry invariant violated: {0}")]
    Invariant(String),
}

impl WorkflowError {
    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::PreconditionFailed(reason.into())
    }

    /// Stable machine-readable tag rendered as the `fn` field.
    pub fn tag(&self) -> &'static str {
        match self {
            WorkflowError::NotFound(_) => "not_found",
            WorkflowError::AlreadyBooked => "already_booked",
            WorkflowError::Format(_) => "format_error",
            WorkflowError::PreconditionFailed(_) => "precondition_failed",
            WorkflowError::Restricted(_) => "restricted",
            WorkflowError::PaymentMethod(_) => "payment_failed",
            WorkflowError::Invariant(_) => "invariant_violation",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
            WorkflowError::AlreadyBooked => StatusCode::CONFLICT,
            WorkflowError::Format(_) => StatusCode::BAD_REQUEST,
            WorkflowError::PreconditionFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WorkflowError::Restricted(_) => StatusCode::FORBIDDEN,
            WorkflowError::PaymentMethod(_) => StatusCode::PAYMENT_REQUIRED,
            WorkflowError::Invariant(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<InvoiceFormatError> for WorkflowError {
    fn from(value: InvoiceFormatError) -> Self {
        Self::Format(value.to_string())
    }
}

impl From<GatewayError> for WorkflowError {
    fn from(value: GatewayError) -> Self {
        Self::PaymentMethod(value.to_string())
    }
}

impl IntoResponse for WorkflowError {
    fn into_response(self) -> Response {
        let payload = json!({
            "ok": false,
            "fn": self.tag(),
            "reason": self.to_string(),
        });
        (self.status_code(), Json(payload)).into_response()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingDetails {
    pub facility: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingSuccess {
    pub ok: bool,
    pub message: &'static str,
    pub details: BookingDetails,
}

impl From<FacilityBooking> for BookingSuccess {
    fn from(booking: FacilityBooking) -> Self {
        Self {
            ok: true,
            message: "Booking Success",
            details: BookingDetails {
                facility: booking.facility_id,
                time: booking.booking_time,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResidentInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceView {
    pub invoice_id: String,
    pub resident_info: ResidentInfo,
    pub invoice_status: String,
    pub date_created_invoice: NaiveDateTime,
    #[serde(flatten)]
    pub body: InvoiceBody,
    pub total: f64,
}

impl From<&Invoice> for InvoiceView {
    fn from(invoice: &Invoice) -> Self {
        Self {
            invoice_id: invoice.id.clone(),
            resident_info: ResidentInfo {
                id: invoice.resident_id.clone(),
                name: invoice.resident_name.clone(),
            },
            invoice_status: format!("{:?}", invoice.status),
            date_created_invoice: invoice.created_at,
            body: invoice.body.clone(),
            total: invoice.total(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceCreated {
    pub ok: bool,
    pub message: &'static str,
    pub invoice: InvoiceView,
}

impl From<Invoice> for InvoiceCreated {
    fn from(invoice: Invoice) -> Self {
        Self {
            ok: true,
            message: "Create Invoice Success",
            invoice: InvoiceView::from(&invoice),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceSummary {
    pub resident_id: String,
    pub total_invoices: usize,
    pub invoice_ids: Vec<String>,
}

impl From<&Resident> for InvoiceSummary {
    fn from(resident: &Resident) -> Self {
        let invoice_ids = resident.outstanding_invoices().to_vec();
        Self {
            resident_id: resident.id.clone(),
            total_invoices: invoice_ids.len(),
            invoice_ids,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReceiptView {
    pub receipt_id: String,
    pub invoice_ids: Vec<String>,
    pub total: f64,
    pub reference: String,
    pub issued_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentSuccess {
    pub ok: bool,
    #[serde(rename = "fn")]
    pub tag: &'static str,
    pub receipt_info: &'static str,
    pub receipt: ReceiptView,
}

impl From<Receipt> for PaymentSuccess {
    fn from(receipt: Receipt) -> Self {
        Self {
            ok: true,
            tag: "payment_success",
            receipt_info: "Payment Successful. Receipt Created.",
            receipt: ReceiptView {
                receipt_id: receipt.id,
                invoice_ids: receipt.invoice_ids,
                total: receipt.total,
                reference: receipt.reference,
                issued_at: receipt.issued_at,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentStaged {
    pub ok: bool,
    pub resident_id: String,
    pub invoice_ids: Vec<String>,
    pub total: f64,
    pub method: Option<&'static str>,
}

impl From<StagedPayment> for PaymentStaged {
    fn from(staged: StagedPayment) -> Self {
        Self {
            ok: true,
            resident_id: staged.resident_id,
            invoice_ids: staged.payment.invoice_ids().to_vec(),
            total: staged.total,
            method: staged.payment.method().map(|method| method.label()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResidentView {
    pub id: String,
    pub name: String,
    pub status: &'static str,
    pub contract_ids: Vec<String>,
    pub outstanding_invoices: Vec<String>,
}

impl From<&Resident> for ResidentView {
    fn from(resident: &Resident) -> Self {
        Self {
            id: resident.id.clone(),
            name: resident.name.clone(),
            status: resident.status.label(),
            contract_ids: resident.contract_ids().to_vec(),
            outstanding_invoices: resident.outstanding_invoices().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomView {
    pub id: String,
    pub kind: RoomKind,
    pub building_id: String,
    pub floor: String,
    pub monthly_rent: f64,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_expires_at: Option<NaiveDateTime>,
}

impl From<&Room> for RoomView {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.clone(),
            kind: room.kind,
            building_id: room.building_id.clone(),
            floor: room.floor.clone(),
            monthly_rent: room.monthly_rent,
            status: room.status.label(),
            hold_expires_at: room.hold_expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContractChanged {
    pub ok: bool,
    pub resident: ResidentView,
    #[serde(rename = "old-room")]
    pub old_room: RoomView,
    pub new_room: RoomView,
    pub lease_id: String,
    pub invoice: InvoiceView,
    pub proration: ProratedChange,
}

impl From<ContractChange> for ContractChanged {
    fn from(change: ContractChange) -> Self {
        Self {
            ok: true,
            resident: ResidentView::from(&change.resident),
            old_room: RoomView::from(&change.old_room),
            new_room: RoomView::from(&change.new_room),
            lease_id: change.contract.id,
            invoice: InvoiceView::from(&change.invoice),
            proration: change.proration,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomHeld {
    pub status: &'static str,
    pub lease_id: String,
    pub room_id: String,
    pub room_status: &'static str,
    pub hold_expires_at: Option<NaiveDateTime>,
    pub message: String,
}

impl RoomHeld {
    pub fn new(binding: LeaseBinding, hold_hours: i64) -> Self {
        Self {
            status: "success",
            lease_id: binding.contract.id,
            room_id: binding.room.id.clone(),
            room_status: binding.room.status.label(),
            hold_expires_at: binding.room.hold_expires_at,
            message: format!("Booking successful, held for {hold_hours} hours."),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaseConfirmed {
    pub ok: bool,
    pub lease_id: String,
    pub contract_status: String,
    pub room: RoomView,
}

impl From<LeaseBinding> for LeaseConfirmed {
    fn from(binding: LeaseBinding) -> Self {
        Self {
            ok: true,
            lease_id: binding.contract.id,
            contract_status: format!("{:?}", binding.contract.status),
            room: RoomView::from(&binding.room),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketView {
    pub ticket_id: String,
    pub reporter: String,
    pub room: String,
    pub issue_category: String,
    pub technician: String,
    pub status: String,
}

impl From<MaintenanceTicket> for TicketView {
    fn from(ticket: MaintenanceTicket) -> Self {
        Self {
            ticket_id: ticket.id,
            reporter: ticket.reporter_id,
            room: ticket.room_id,
            issue_category: ticket.issue_category,
            technician: ticket.responsible_technician,
            status: format!("{:?}", ticket.status).to_ascii_uppercase(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceRequested {
    pub ok: bool,
    pub res: TicketView,
}

impl From<MaintenanceTicket> for MaintenanceRequested {
    fn from(ticket: MaintenanceTicket) -> Self {
        Self {
            ok: true,
            res: TicketView::from(ticket),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketUpdated {
    pub ok: bool,
    pub ticket: TicketView,
}

impl From<MaintenanceTicket> for TicketUpdated {
    fn from(ticket: MaintenanceTicket) -> Self {
        Self {
            ok: true,
            ticket: TicketView::from(ticket),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResidentRegistered {
    pub ok: bool,
    pub resident_id: String,
    pub status: &'static str,
}

impl From<Resident> for ResidentRegistered {
    fn from(resident: Resident) -> Self {
        Self {
            ok: true,
            resident_id: resident.id,
            status: resident.status.label(),
        }
    }
}
