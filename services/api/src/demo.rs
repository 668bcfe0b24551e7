use crate::infra::{seed, seed_demo};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use dormika::dorm::outcome::{
    BookingSuccess, ContractChanged, InvoiceCreated, LeaseConfirmed, MaintenanceRequested,
    PaymentSuccess, RoomHeld, TicketUpdated,
};
use dormika::dorm::{
    Directory, DormPolicy, DormService, FixedClock, OfflineGateway, PaymentMethod, WorkflowError,
};
use dormika::error::AppError;
use serde::Serialize;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Business day to run the demo on (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print every outcome payload as JSON.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct StepReport<'a, V> {
    step: &'a str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<V>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

struct Transcript {
    json: bool,
}

impl Transcript {
    fn step<V: Serialize>(&self, step: &str, result: Result<V, WorkflowError>) {
        let report = match result {
            Ok(outcome) => StepReport {
                step,
                ok: true,
                outcome: Some(outcome),
                reason: None,
            },
            Err(err) => StepReport {
                step,
                ok: false,
                outcome: None,
                reason: Some(format!("{} ({})", err, err.tag())),
            },
        };

        match (&report.reason, self.json) {
            (_, true) => match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(err) => println!("- {step}: payload unavailable ({err})"),
            },
            (None, false) => println!("- {step}: ok"),
            (Some(reason), false) => println!("- {step}: rejected: {reason}"),
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, json } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let opening = today
        .and_hms_opt(10, 0, 0)
        .ok_or_else(|| WorkflowError::Invariant(format!("no 10:00 on {today}")))?;

    let clock = Arc::new(FixedClock::new(opening));
    let service = DormService::new(
        Directory::new("DormiKa demo"),
        Arc::new(OfflineGateway),
        clock.clone(),
        DormPolicy::default(),
    );
    let rooms = seed_demo(&service)?;
    let [standard, spare_standard, studio, spare_studio] = rooms.as_slice() else {
        return Err(WorkflowError::Invariant(format!("demo seeded {} rooms", rooms.len())).into());
    };
    let out = Transcript { json };

    println!("Dormitory workflow demo ({today})");

    println!("\nShared facility booking");
    for (label, slot) in [
        ("book meeting room 10:00", "2025-01-01T10:00"),
        ("book the same slot again", "2025-01-01T10:00"),
        ("book meeting room 11:00", "2025-01-01T11:00"),
    ] {
        let result = service
            .book_shared_facility(seed::RESIDENT, seed::MEETING_ROOM, seed::BUILDING, slot)
            .map(BookingSuccess::from);
        out.step(label, result);
    }

    println!("\nRoom hold and lease");
    let hold_hours = service.hold_hours();
    let held = service.request_room_booking(seed::SECOND_RESIDENT, seed::BUILDING, studio);
    out.step(
        "hold studio for R002",
        held.clone()
            .map(|binding| RoomHeld::new(binding, hold_hours)),
    );
    out.step(
        "suspended resident asks for a room",
        service
            .request_room_booking(seed::SUSPENDED_RESIDENT, seed::BUILDING, spare_studio)
            .map(|binding| RoomHeld::new(binding, hold_hours)),
    );
    let Ok(held) = held else {
        return Ok(());
    };
    let lease_id = held.contract.id;
    out.step(
        "staff confirm the lease",
        service
            .confirm_lease(seed::STAFF, &lease_id)
            .map(LeaseConfirmed::from),
    );

    println!("\nBilling");
    out.step(
        "malformed invoice data",
        service
            .create_invoice(seed::STAFF, seed::SECOND_RESIDENT, "INV001-6500-300")
            .map(InvoiceCreated::from),
    );
    let invoice = service.create_invoice(
        seed::STAFF,
        seed::SECOND_RESIDENT,
        "INV001-6500-420-110-0-50-0",
    );
    out.step("monthly invoice", invoice.clone().map(InvoiceCreated::from));
    if let Ok(invoice) = invoice {
        let bank = PaymentMethod::BankAccount {
            bank_id: "KBANK".to_string(),
            account_name: "Student A".to_string(),
            reference_id: String::new(),
        };
        let staged = service.stage_payment(seed::SECOND_RESIDENT, vec![invoice.id.clone()], Some(bank));
        if staged.is_ok() {
            out.step(
                "pay by transfer without a reference",
                service
                    .pay(seed::SECOND_RESIDENT, "counter slip")
                    .map(PaymentSuccess::from),
            );
        }

        let card = PaymentMethod::Card {
            card_id: "4111111111111111".to_string(),
            cardholder_name: "Student A".to_string(),
            expiration_date: "12/29".to_string(),
            cvv: "123".to_string(),
        };
        let staged = service.stage_payment(seed::SECOND_RESIDENT, vec![invoice.id], Some(card));
        if staged.is_ok() {
            out.step(
                "pay by card",
                service
                    .pay(seed::SECOND_RESIDENT, "card ending 1111")
                    .map(PaymentSuccess::from),
            );
        }
    }

    println!("\nContract change");
    let move_date = today.format("%Y-%m-%d").to_string();
    out.step(
        "upgrade to a standard room",
        service
            .change_contract(seed::SECOND_RESIDENT, &lease_id, standard, &move_date)
            .map(ContractChanged::from),
    );

    println!("\nMaintenance");
    let ticket = service.request_maintenance(seed::SECOND_RESIDENT, spare_standard, "Plumbing");
    out.step("report a leak", ticket.clone().map(MaintenanceRequested::from));
    if let Ok(ticket) = ticket {
        let technician = ticket.responsible_technician.clone();
        out.step(
            "staff approve too early",
            service
                .approve_ticket(seed::STAFF, &ticket.id)
                .map(TicketUpdated::from),
        );
        out.step(
            "technician starts",
            service
                .start_ticket(&technician, &ticket.id)
                .map(TicketUpdated::from),
        );
        out.step(
            "technician finishes",
            service
                .finish_ticket(&technician, &ticket.id)
                .map(TicketUpdated::from),
        );
        out.step(
            "staff approve",
            service
                .approve_ticket(seed::STAFF, &ticket.id)
                .map(TicketUpdated::from),
        );
    }

    println!("\nHold expiry");
    out.step(
        "hold the last studio for R001",
        service
            .request_room_booking(seed::RESIDENT, seed::BUILDING, spare_studio)
            .map(|binding| RoomHeld::new(binding, hold_hours)),
    );
    clock.advance(Duration::hours(hold_hours + 1));
    let released = service.sweep_expired_holds();
    println!(
        "- {} hours later the sweep released: {}",
        hold_hours + 1,
        if released.is_empty() {
            "nothing".to_string()
        } else {
            released.join(", ")
        }
    );

    Ok(())
}
