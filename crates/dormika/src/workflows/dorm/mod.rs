//! Resolve, validate, mutate, respond: every dormitory use case runs as one pass over the
//! [`Directory`] under a single lock and ends in a typed outcome or a [`WorkflowError`].

pub mod billing;
mod clock;
pub mod directory;
pub mod domain;
pub mod outcome;
pub mod payment;
pub mod router;
mod sequence;
pub mod service;

#[cfg(test)]
mod tests;

pub use billing::{
    parse_invoice_data, prorate_room_change, InvoiceDraft, InvoiceFormatError, ProratedChange,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use directory::Directory;
pub use domain::{
    AccountStatus, AdjustmentKind, Building, ContractStatus, FacilityBooking, FacilityKind,
    FacilityStatus, Invoice, InvoiceBody, InvoiceCharges, InvoiceStatus, LeaseContract,
    MaintenanceTicket, OperationStaff, Payment, Receipt, Resident, Room, RoomKind, RoomStatus,
    SharedFacility, StaffStatus, Technician, TicketStatus,
};
pub use outcome::{EntityKind, InvoiceSummary, WorkflowError};
pub use payment::{GatewayError, OfflineGateway, PaymentGateway, PaymentMethod};
pub use router::dorm_router;
pub use sequence::IdSequence;
pub use service::{ContractChange, DormPolicy, DormService, LeaseBinding, StagedPayment};
