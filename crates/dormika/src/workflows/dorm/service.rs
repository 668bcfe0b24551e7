use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Duration, NaiveDateTime, Timelike};
use tracing::{error, info, warn};

use super::billing::{parse_invoice_data, parse_move_date, prorate_room_change, ProratedChange};
use super::clock::Clock;
use super::directory::Directory;
use super::domain::{
    AccountStatus, AdjustmentKind, Building, ContractStatus, FacilityBooking, Invoice,
    InvoiceBody, InvoiceStatus, LeaseContract, MaintenanceTicket, OperationStaff, Payment,
    Receipt, Resident, Room, RoomKind, RoomStatus, SharedFacility, StaffStatus, Technician,
    TicketStatus,
};
use super::outcome::{EntityKind, InvoiceSummary, WorkflowError};
use super::payment::{PaymentGateway, PaymentMethod};
use crate::config::DormConfig;

/// Operating rules applied by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DormPolicy {
    pub hold_duration: Duration,
    pub office_open_hour: u32,
    pub office_close_hour: u32,
}

impl DormPolicy {
    fn office_open_at(&self, now: NaiveDateTime) -> bool {
        (self.office_open_hour..=self.office_close_hour).contains(&now.hour())
    }
}

impl Default for DormPolicy {
    fn default() -> Self {
        Self::from(&DormConfig::default())
    }
}

impl From<&DormConfig> for DormPolicy {
    fn from(config: &DormConfig) -> Self {
        Self {
            hold_duration: config.hold_duration(),
            office_open_hour: config.office_open_hour,
            office_close_hour: config.office_close_hour,
        }
    }
}

/// A room reservation or confirmation together with the lease it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaseBinding {
    pub contract: LeaseContract,
    pub room: Room,
}

/// Everything a contract change touched.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractChange {
    pub resident: Resident,
    pub contract: LeaseContract,
    pub old_room: Room,
    pub new_room: Room,
    pub invoice: Invoice,
    pub proration: ProratedChange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagedPayment {
    pub resident_id: String,
    pub payment: Payment,
    pub total: f64,
}

/// Workflow engine over one dormitory directory.
///
/// Every workflow holds the directory lock from its first lookup to its last write, so a
/// check such as "slot is free" can never be invalidated before the booking lands. All
/// validation happens before the first write; a rejected request leaves the registry as
/// it found it.
pub struct DormService<G, C> {
    directory: Mutex<Directory>,
    gateway: Arc<G>,
    clock: Arc<C>,
    policy: DormPolicy,
}

impl<G, C> DormService<G, C>
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    pub fn new(directory: Directory, gateway: Arc<G>, clock: Arc<C>, policy: DormPolicy) -> Self {
        Self {
            directory: Mutex::new(directory),
            gateway,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> &DormPolicy {
        &self.policy
    }

    pub fn hold_hours(&self) -> i64 {
        self.policy.hold_duration.num_hours()
    }

    fn directory(&self) -> MutexGuard<'_, Directory> {
        self.directory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a read-only query against the registry.
    pub fn inspect<T>(&self, query: impl FnOnce(&Directory) -> T) -> T {
        query(&self.directory())
    }


    pub fn add_resident(&self, resident: Resident) {
        self.directory().insert_resident(resident);
    }

    pub fn register_resident(&self, name: &str, email: &str, phone_number: &str) -> Resident {
        let today = self.clock.now().date();
        let mut directory = self.directory();
        let id = directory.ids().resident(today);
        let resident = Resident::new(id, name, email, phone_number)
            .with_status(AccountStatus::PendingVerification);
        directory.insert_resident(resident.clone());
        info!(resident_id = %resident.id, "resident registered");
        resident
    }

    pub fn add_operation_staff(&self, staff: OperationStaff) {
        self.directory().insert_operation_staff(staff);
    }

    pub fn register_operation_staff(
        &self,
        name: &str,
        building_responsibility: Option<String>,
    ) -> OperationStaff {
        let today = self.clock.now().date();
        let mut directory = self.directory();
        let staff = OperationStaff {
            id: directory.ids().operation_staff(today),
            name: name.to_string(),
            building_responsibility,
            status: StaffStatus::Active,
        };
        directory.insert_operation_staff(staff.clone());
        staff
    }

    pub fn add_technician(&self, technician: Technician) {
        self.directory().insert_technician(technician);
    }

    pub fn register_technician(&self, name: &str, skills: Vec<String>) -> Technician {
        let today = self.clock.now().date();
        let mut directory = self.directory();
        let technician = Technician {
            id: directory.ids().technician(today),
            name: name.to_string(),
            skills,
            status: StaffStatus::Active,
        };
        directory.insert_technician(technician.clone());
        technician
    }

    pub fn add_building(&self, building: Building) {
        self.directory().insert_building(building);
    }

    pub fn add_facility(&self, facility: SharedFacility) -> Result<(), WorkflowError> {
        let mut directory = self.directory();
        if directory.find_building(&facility.building_id).is_none() {
            return Err(WorkflowError::NotFound(EntityKind::Building));
        }
        directory.insert_facility(facility);
        Ok(())
    }

    /// Create a room with a generated id; rent defaults to the list price of its type.
    pub fn add_room(
        &self,
        kind: RoomKind,
        building_id: &str,
        floor: &str,
        monthly_rent: Option<f64>,
        status: RoomStatus,
    ) -> Result<Room, WorkflowError> {
        let mut directory = self.directory();
        if directory.find_building(building_id).is_none() {
            return Err(WorkflowError::NotFound(EntityKind::Building));
        }
        let room = Room {
            id: directory.ids().room(kind, building_id, floor),
            kind,
            building_id: building_id.to_string(),
            floor: floor.to_string(),
            monthly_rent: monthly_rent.unwrap_or_else(|| kind.default_rent()),
            status,
            hold_expires_at: None,
        };
        directory.insert_room(room.clone());
        Ok(room)
    }


    /// Reserve a shared facility for one slot. Slots conflict only on exact label equality.
    pub fn book_shared_facility(
        &self,
        resident_id: &str,
        facility_id: &str,
        building_id: &str,
        booking_time: &str,
    ) -> Result<FacilityBooking, WorkflowError> {
        let now = self.clock.now();
        audited("booking_share_facility", || {
            let mut directory = self.directory();

            let resident = resident_index(&directory, resident_id)?;
            let building = directory
                .find_building(building_id)
                .ok_or(WorkflowError::NotFound(EntityKind::Building))?;
            if !building.has_facility(facility_id) {
                return Err(WorkflowError::NotFound(EntityKind::Facility));
            }
            let facility = directory
                .find_facility(facility_id)
                .ok_or(WorkflowError::NotFound(EntityKind::Facility))?;
            if !facility.status.accepts_bookings() {
                return Err(WorkflowError::precondition("Facility is not available"));
            }
            if directory.slot_taken(facility_id, booking_time) {
                return Err(WorkflowError::AlreadyBooked);
            }

            let booking = FacilityBooking {
                resident_id: resident_id.to_string(),
                building_id: building_id.to_string(),
                facility_id: facility_id.to_string(),
                booking_time: booking_time.to_string(),
                booked_at: now,
            };
            directory.bookings.push(booking.clone());
            let position = directory.bookings.len() - 1;
            directory.residents[resident].facility_bookings.push(position);

            info!(resident_id, facility_id, booking_time, "shared facility booked");
            Ok(booking)
        })
    }


    /// Place outstanding invoices and a method into the resident's pending payment,
    /// replacing whatever was staged before.
    pub fn stage_payment(
        &self,
        resident_id: &str,
        invoice_ids: Vec<String>,
        method: Option<PaymentMethod>,
    ) -> Result<StagedPayment, WorkflowError> {
        let now = self.clock.now();
        audited("stage_payment", || {
            let mut directory = self.directory();
            let resident = resident_index(&directory, resident_id)?;

            let mut selected: Vec<String> = Vec::with_capacity(invoice_ids.len());
            let mut total = 0.0;
            for invoice_id in invoice_ids {
                if selected.contains(&invoice_id) {
                    continue;
                }
                let owed = directory.residents[resident]
                    .outstanding_invoices()
                    .contains(&invoice_id);
                let invoice = directory
                    .find_invoice(&invoice_id)
                    .filter(|_| owed)
                    .ok_or(WorkflowError::NotFound(EntityKind::Invoice))?;
                total += invoice.total();
                selected.push(invoice_id);
            }

            let payment = Payment::new(selected, method, now);
            directory.residents[resident].pending_payment = Some(payment.clone());

            info!(resident_id, invoices = payment.invoice_ids().len(), "payment staged");
            Ok(StagedPayment {
                resident_id: resident_id.to_string(),
                payment,
                total,
            })
        })
    }

    /// Settle the resident's pending payment. `payment_data` is kept on the receipt as the
    /// payer's reference.
    pub fn pay(&self, resident_id: &str, payment_data: &str) -> Result<Receipt, WorkflowError> {
        let now = self.clock.now();
        audited("payment", || {
            let mut directory = self.directory();
            let resident = resident_index(&directory, resident_id)?;

            let payment = directory.residents[resident]
                .pending_payment()
                .cloned()
                .ok_or_else(|| WorkflowError::precondition("Payment not found (Cart is empty)"))?;
            let method = payment
                .method()
                .ok_or_else(|| WorkflowError::PaymentMethod("payment_method not found".into()))?;
            if payment.invoice_ids().is_empty() {
                return Err(WorkflowError::precondition("invoice_list is empty"));
            }

            let mut total = 0.0;
            for invoice_id in payment.invoice_ids() {
                let invoice = directory.find_invoice(invoice_id).ok_or_else(|| {
                    WorkflowError::Invariant(format!("staged invoice {invoice_id} is missing"))
                })?;
                total += invoice.total();
            }

            self.gateway.charge(method, total)?;

            let paid = payment.invoice_ids();
            for invoice in directory
                .invoices
                .iter_mut()
                .filter(|invoice| paid.contains(&invoice.id))
            {
                invoice.mark_paid();
            }

            let receipt = Receipt {
                id: directory.ids().receipt(now.date()),
                resident_id: resident_id.to_string(),
                invoice_ids: paid.to_vec(),
                total,
                reference: payment_data.to_string(),
                issued_at: now,
            };
            directory.receipts.push(receipt.clone());

            let holder = &mut directory.residents[resident];
            holder.invoices.retain(|id| !paid.contains(id));
            holder.receipts.push(receipt.id.clone());
            holder.pending_payment = None;

            info!(resident_id, receipt_id = %receipt.id, total, "payment settled");
            Ok(receipt)
        })
    }


    /// Operation staff bill a resident from the seven-field `invoice_data` string.
    pub fn create_invoice(
        &self,
        operation_staff_id: &str,
        resident_id: &str,
        invoice_data: &str,
    ) -> Result<Invoice, WorkflowError> {
        let now = self.clock.now();
        audited("create_invoice", || {
            let mut directory = self.directory();

            directory
                .find_operation_staff(operation_staff_id)
                .ok_or(WorkflowError::NotFound(EntityKind::OperationStaff))?;
            let resident = resident_index(&directory, resident_id)?;
            let draft = parse_invoice_data(invoice_data)?;
            if directory.find_invoice(&draft.invoice_id).is_some() {
                return Err(WorkflowError::precondition(format!(
                    "Invoice {} already exists",
                    draft.invoice_id
                )));
            }

            let invoice = Invoice {
                id: draft.invoice_id,
                resident_id: resident_id.to_string(),
                resident_name: directory.residents[resident].name.clone(),
                body: InvoiceBody::Statement(draft.charges),
                status: InvoiceStatus::Issued,
                created_at: now,
            };
            directory.invoices.push(invoice.clone());
            directory.residents[resident].invoices.push(invoice.id.clone());

            info!(operation_staff_id, resident_id, invoice_id = %invoice.id, "invoice issued");
            Ok(invoice)
        })
    }

    pub fn show_invoices(&self, resident_id: &str) -> Result<InvoiceSummary, WorkflowError> {
        let directory = self.directory();
        directory
            .find_resident(resident_id)
            .map(InvoiceSummary::from)
            .ok_or(WorkflowError::NotFound(EntityKind::Resident))
    }


    /// Hold an available room for the resident and open a draft lease for it.
    pub fn request_room_booking(
        &self,
        resident_id: &str,
        building_id: &str,
        room_id: &str,
    ) -> Result<LeaseBinding, WorkflowError> {
        let now = self.clock.now();
        audited("request_booking", || {
            let mut directory = self.directory();

            let resident = resident_index(&directory, resident_id)?;
            if matches!(
                directory.residents[resident].status,
                AccountStatus::Suspended | AccountStatus::Closed
            ) {
                return Err(WorkflowError::Restricted("Account restricted".to_string()));
            }
            if !self.policy.office_open_at(now) {
                return Err(WorkflowError::precondition("Office hours not available"));
            }
            let building = directory
                .find_building(building_id)
                .ok_or(WorkflowError::NotFound(EntityKind::Building))?;
            if !building.has_room(room_id) {
                return Err(WorkflowError::precondition("Room is busy or maintenance"));
            }
            let room = room_index(&directory, room_id)?;
            expire_lapsed_hold(&mut directory, room, now);
            if !directory.rooms[room].is_available() {
                return Err(WorkflowError::precondition("Room is busy or maintenance"));
            }

            let contract = LeaseContract {
                id: directory.ids().lease_contract(now.date()),
                resident_id: resident_id.to_string(),
                room_id: room_id.to_string(),
                status: ContractStatus::Draft,
                created_at: now,
                move_in_date: None,
            };
            directory.rooms[room].hold(now + self.policy.hold_duration);
            directory.contracts.push(contract.clone());
            directory.residents[resident]
                .contracts
                .push(contract.id.clone());

            info!(resident_id, room_id, lease_id = %contract.id, "room held");
            Ok(LeaseBinding {
                contract,
                room: directory.rooms[room].clone(),
            })
        })
    }

    /// Operation staff turn a held room into an occupied one with an active lease.
    pub fn confirm_lease(
        &self,
        operation_staff_id: &str,
        lease_id: &str,
    ) -> Result<LeaseBinding, WorkflowError> {
        let now = self.clock.now();
        audited("confirm_booking", || {
            let mut directory = self.directory();

            directory
                .find_operation_staff(operation_staff_id)
                .ok_or(WorkflowError::NotFound(EntityKind::OperationStaff))?;
            let contract = contract_index(&directory, lease_id)?;
            if !directory.contracts[contract].status.awaiting_confirmation() {
                return Err(WorkflowError::precondition(
                    "Lease is not awaiting confirmation",
                ));
            }
            let room_id = directory.contracts[contract].room_id.clone();
            let room = directory
                .rooms
                .iter()
                .position(|room| room.id == room_id)
                .ok_or_else(|| {
                    WorkflowError::Invariant(format!("lease {lease_id} points at missing room"))
                })?;
            if expire_lapsed_hold(&mut directory, room, now) {
                return Err(WorkflowError::precondition("Room hold has expired"));
            }
            if directory.rooms[room].status != RoomStatus::Reserved {
                return Err(WorkflowError::Invariant(format!(
                    "lease {lease_id} awaits confirmation but room {room_id} is not reserved"
                )));
            }

            let today = now.date();
            directory.rooms[room].occupy();
            let lease = &mut directory.contracts[contract];
            lease.status = ContractStatus::Active;
            lease.move_in_date = Some(today);
            let resident_id = lease.resident_id.clone();
            if let Some(resident) = directory.find_resident_mut(&resident_id) {
                resident.move_in_date.get_or_insert(today);
            }

            info!(operation_staff_id, lease_id, room_id = %room_id, "lease confirmed");
            Ok(LeaseBinding {
                contract: directory.contracts[contract].clone(),
                room: directory.rooms[room].clone(),
            })
        })
    }

    /// Move an active lease to another room and bill the pro-rated difference.
    pub fn change_contract(
        &self,
        resident_id: &str,
        contract_id: &str,
        target_room_id: &str,
        move_date: &str,
    ) -> Result<ContractChange, WorkflowError> {
        let now = self.clock.now();
        audited("change_contract", || {
            let mut directory = self.directory();

            let resident = resident_index(&directory, resident_id)?;
            let contract = directory.residents[resident]
                .contract_ids()
                .iter()
                .any(|id| id == contract_id)
                .then(|| directory.contracts.iter().position(|c| c.id == contract_id))
                .flatten()
                .ok_or(WorkflowError::NotFound(EntityKind::Contract))?;
            let status = directory.contracts[contract].status;
            if status.is_closed() {
                return Err(WorkflowError::precondition("contract has expired"));
            }
            if status.awaiting_confirmation() {
                return Err(WorkflowError::precondition("contract is not yet active"));
            }
            let target = room_index(&directory, target_room_id)?;
            expire_lapsed_hold(&mut directory, target, now);
            if !directory.rooms[target].is_available() {
                return Err(WorkflowError::precondition("target room not available"));
            }
            if !directory.residents[resident].outstanding_invoices().is_empty() {
                return Err(WorkflowError::precondition(
                    "reject: resident has outstanding invoices",
                ));
            }
            let move_date = parse_move_date(move_date)
                .map_err(|err| WorkflowError::Format(format!("moveDate '{move_date}': {err}")))?;

            let old_room_id = directory.contracts[contract].room_id.clone();
            let old = directory
                .rooms
                .iter()
                .position(|room| room.id == old_room_id)
                .ok_or_else(|| {
                    WorkflowError::Invariant(format!(
                        "contract {contract_id} points at missing room {old_room_id}"
                    ))
                })?;

            let proration = prorate_room_change(
                directory.rooms[old].monthly_rent,
                directory.rooms[target].monthly_rent,
                move_date,
            );
            let invoice = Invoice {
                id: directory.ids().adjustment_invoice(now.date()),
                resident_id: resident_id.to_string(),
                resident_name: directory.residents[resident].name.clone(),
                body: InvoiceBody::Adjustment {
                    amount: proration.amount,
                    kind: proration.kind,
                },
                status: InvoiceStatus::Issued,
                created_at: now,
            };

            directory.rooms[old].release();
            directory.contracts[contract].room_id = target_room_id.to_string();
            directory.rooms[target].occupy();
            directory.invoices.push(invoice.clone());
            directory.residents[resident]
                .invoices
                .push(invoice.id.clone());

            info!(
                resident_id,
                contract_id,
                from = %old_room_id,
                to = target_room_id,
                amount = proration.amount,
                credit = proration.kind == AdjustmentKind::Credit,
                "lease moved to another room"
            );
            Ok(ContractChange {
                resident: directory.residents[resident].clone(),
                contract: directory.contracts[contract].clone(),
                old_room: directory.rooms[old].clone(),
                new_room: directory.rooms[target].clone(),
                invoice,
                proration,
            })
        })
    }

    /// Release every room whose hold has lapsed. Returns the released room ids.
    pub fn sweep_expired_holds(&self) -> Vec<String> {
        let now = self.clock.now();
        let mut directory = self.directory();
        let mut released = Vec::new();
        for room in 0..directory.rooms.len() {
            if expire_lapsed_hold(&mut directory, room, now) {
                released.push(directory.rooms[room].id.clone());
            }
        }
        released
    }


    /// Open a ticket for a room and assign it to a technician through available staff.
    pub fn request_maintenance(
        &self,
        resident_id: &str,
        room_id: &str,
        issue_category: &str,
    ) -> Result<MaintenanceTicket, WorkflowError> {
        let now = self.clock.now();
        audited("request_maintenance", || {
            let mut directory = self.directory();

            let resident = resident_index(&directory, resident_id)?;
            room_index(&directory, room_id)?;
            let staff_id = directory
                .operation_staff
                .iter()
                .find(|staff| staff.status == StaffStatus::Active)
                .map(|staff| staff.id.clone())
                .ok_or_else(|| WorkflowError::precondition("no available staff!"))?;

            let available: Vec<&Technician> = directory
                .technicians
                .iter()
                .filter(|technician| technician.status == StaffStatus::Active)
                .collect();
            let technician_id = available
                .iter()
                .find(|technician| technician.handles(issue_category))
                .or_else(|| available.first())
                .map(|technician| technician.id.clone())
                .ok_or_else(|| WorkflowError::precondition("no available technician"))?;

            let ticket = MaintenanceTicket {
                id: directory.ids().maintenance_ticket(now.date()),
                reporter_id: resident_id.to_string(),
                room_id: room_id.to_string(),
                issue_category: issue_category.to_string(),
                responsible_technician: technician_id,
                dispatched_by: staff_id,
                approved_by: None,
                status: TicketStatus::Idle,
                reported_at: now,
            };
            directory.tickets.push(ticket.clone());
            directory.residents[resident].tickets.push(ticket.id.clone());

            info!(
                resident_id,
                room_id,
                ticket_id = %ticket.id,
                technician_id = %ticket.responsible_technician,
                "maintenance dispatched"
            );
            Ok(ticket)
        })
    }

    /// The assigned technician begins work. A vacant room is taken out of service.
    pub fn start_ticket(
        &self,
        technician_id: &str,
        ticket_id: &str,
    ) -> Result<MaintenanceTicket, WorkflowError> {
        audited("start_maintenance", || {
            let mut directory = self.directory();

            let technician = technician_index(&directory, technician_id)?;
            let ticket = assigned_ticket(&directory, technician_id, ticket_id)?;
            let next = advance_ticket(&directory.tickets[ticket], TicketStatus::Idle, "start")?;
            if directory.technicians[technician].status != StaffStatus::Active {
                return Err(WorkflowError::precondition("technician is busy"));
            }

            directory.tickets[ticket].status = next;
            directory.technicians[technician].status = StaffStatus::Working;
            let room_id = directory.tickets[ticket].room_id.clone();
            if let Some(room) = directory.find_room_mut(&room_id) {
                if room.status == RoomStatus::Available {
                    room.status = RoomStatus::Maintenance;
                }
            }

            info!(technician_id, ticket_id, "maintenance started");
            Ok(directory.tickets[ticket].clone())
        })
    }

    pub fn finish_ticket(
        &self,
        technician_id: &str,
        ticket_id: &str,
    ) -> Result<MaintenanceTicket, WorkflowError> {
        audited("finish_maintenance", || {
            let mut directory = self.directory();

            let technician = technician_index(&directory, technician_id)?;
            let ticket = assigned_ticket(&directory, technician_id, ticket_id)?;
            let next = advance_ticket(&directory.tickets[ticket], TicketStatus::Started, "finish")?;

            directory.tickets[ticket].status = next;
            directory.technicians[technician].status = StaffStatus::Active;

            info!(technician_id, ticket_id, "maintenance finished");
            Ok(directory.tickets[ticket].clone())
        })
    }

    /// Staff sign off finished work. An out-of-service room returns to availability once
    /// no other repair on it is still open.
    pub fn approve_ticket(
        &self,
        operation_staff_id: &str,
        ticket_id: &str,
    ) -> Result<MaintenanceTicket, WorkflowError> {
        audited("approve_maintenance", || {
            let mut directory = self.directory();

            directory
                .find_operation_staff(operation_staff_id)
                .ok_or(WorkflowError::NotFound(EntityKind::OperationStaff))?;
            let ticket = ticket_index(&directory, ticket_id)?;
            let next = advance_ticket(&directory.tickets[ticket], TicketStatus::Finished, "approve")?;

            let entry = &mut directory.tickets[ticket];
            entry.status = next;
            entry.approved_by = Some(operation_staff_id.to_string());
            let room_id = entry.room_id.clone();
            let repairs_open = directory.tickets.iter().any(|other| {
                other.room_id == room_id
                    && matches!(other.status, TicketStatus::Started | TicketStatus::Finished)
            });
            if let Some(room) = directory.find_room_mut(&room_id) {
                if room.status == RoomStatus::Maintenance && !repairs_open {
                    room.status = RoomStatus::Available;
                }
            }

            info!(operation_staff_id, ticket_id, "maintenance approved");
            Ok(directory.tickets[ticket].clone())
        })
    }
}

fn audited<T>(
    workflow: &'static str,
    run: impl FnOnce() -> Result<T, WorkflowError>,
) -> Result<T, WorkflowError> {
    let result = run();
    match &result {
        Ok(_) => {}
        Err(WorkflowError::Invariant(detail)) => {
            error!(workflow, %detail, "registry invariant violated");
        }
        Err(err) => warn!(workflow, tag = err.tag(), reason = %err, "workflow rejected"),
    }
    result
}

fn resident_index(directory: &Directory, id: &str) -> Result<usize, WorkflowError> {
    directory
        .resident_index(id)
        .ok_or(WorkflowError::NotFound(EntityKind::Resident))
}

fn room_index(directory: &Directory, id: &str) -> Result<usize, WorkflowError> {
    directory
        .rooms
        .iter()
        .position(|room| room.id == id)
        .ok_or(WorkflowError::NotFound(EntityKind::Room))
}

fn contract_index(directory: &Directory, id: &str) -> Result<usize, WorkflowError> {
    directory
        .contracts
        .iter()
        .position(|contract| contract.id == id)
        .ok_or(WorkflowError::NotFound(EntityKind::Contract))
}

fn technician_index(directory: &Directory, id: &str) -> Result<usize, WorkflowError> {
    directory
        .technicians
        .iter()
        .position(|technician| technician.id == id)
        .ok_or(WorkflowError::NotFound(EntityKind::Technician))
}

fn ticket_index(directory: &Directory, id: &str) -> Result<usize, WorkflowError> {
    directory
        .tickets
        .iter()
        .position(|ticket| ticket.id == id)
        .ok_or(WorkflowError::NotFound(EntityKind::Ticket))
}

fn assigned_ticket(
    directory: &Directory,
    technician_id: &str,
    ticket_id: &str,
) -> Result<usize, WorkflowError> {
    let ticket = ticket_index(directory, ticket_id)?;
    if directory.tickets[ticket].responsible_technician != technician_id {
        return Err(WorkflowError::Restricted(
            "ticket is assigned to another technician".to_string(),
        ));
    }
    Ok(ticket)
}

fn advance_ticket(
    ticket: &MaintenanceTicket,
    from: TicketStatus,
    action: &str,
) -> Result<TicketStatus, WorkflowError> {
    match ticket.status.successor() {
        Some(next) if ticket.status == from => Ok(next),
        _ => Err(WorkflowError::precondition(format!(
            "cannot {action} a ticket that is {:?}",
            ticket.status
        ))),
    }
}

/// Release a lapsed hold and expire the draft lease that was waiting on it.
fn expire_lapsed_hold(directory: &mut Directory, room: usize, now: NaiveDateTime) -> bool {
    if !directory.rooms[room].hold_lapsed(now) {
        return false;
    }
    directory.rooms[room].release();
    let room_id = directory.rooms[room].id.clone();
    for contract in directory
        .contracts
        .iter_mut()
        .filter(|contract| contract.room_id == room_id && contract.status.awaiting_confirmation())
    {
        contract.status = ContractStatus::Expired;
    }
    info!(room_id = %room_id, "room hold lapsed");
    true
}
