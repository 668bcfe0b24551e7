use super::common::*;
use crate::workflows::dorm::{EntityKind, InvoiceBody, InvoiceStatus, WorkflowError};

#[test]
fn staff_invoice_is_stored_and_listed_for_the_resident() {
    let (service, _) = build_service();

    let invoice = service
        .create_invoice(STAFF, RESIDENT, "INV001-5000-1200-200-500-100-300")
        .expect("invoice created");
    assert_eq!(invoice.id, "INV001");
    assert_eq!(invoice.resident_name, "John Doe");
    assert_eq!(invoice.status, InvoiceStatus::Issued);
    assert_eq!(invoice.total(), 7300.0);
    assert!(matches!(invoice.body, InvoiceBody::Statement(_)));

    let summary = service.show_invoices(RESIDENT).expect("summary");
    assert_eq!(summary.total_invoices, 1);
    assert_eq!(summary.invoice_ids, vec!["INV001".to_string()]);
}

#[test]
fn malformed_invoice_data_never_creates_an_invoice() {
    let (service, _) = build_service();

    for raw in [
        "INV002-5000-1200",
        "INV002-5000-1200-200-500-100-300-42",
        "INV002-5000-1200-200-500-100-lots",
    ] {
        let err = service
            .create_invoice(STAFF, RESIDENT, raw)
            .expect_err("format error");
        assert!(matches!(err, WorkflowError::Format(_)), "{raw}: {err:?}");
    }

    service.inspect(|directory| assert!(directory.invoices().is_empty()));
    assert_eq!(
        service.show_invoices(RESIDENT).expect("summary").total_invoices,
        0
    );
}

#[test]
fn staff_is_resolved_before_resident() {
    let (service, _) = build_service();

    let err = service
        .create_invoice("OS404", "R999", "INV001-1-1-1-1-1-1")
        .expect_err("unknown staff");
    assert_eq!(err, WorkflowError::NotFound(EntityKind::OperationStaff));
    assert_eq!(err.to_string(), "Operation Staff not found");

    let err = service
        .create_invoice(STAFF, "R999", "INV001-1-1-1-1-1-1")
        .expect_err("unknown resident");
    assert_eq!(err, WorkflowError::NotFound(EntityKind::Resident));
}

#[test]
fn invoice_ids_are_unique() {
    let (service, _) = build_service();
    issue_invoice(&service, "INV001-5000-0-0-0-0-0");

    let err = service
        .create_invoice(STAFF, RESIDENT, "INV001-100-0-0-0-0-0")
        .expect_err("duplicate id");
    assert!(matches!(err, WorkflowError::PreconditionFailed(_)));
    assert_eq!(service.show_invoices(RESIDENT).expect("summary").total_invoices, 1);
}

#[test]
fn show_invoices_requires_a_known_resident() {
    let (service, _) = build_service();
    assert_eq!(
        service.show_invoices("R404"),
        Err(WorkflowError::NotFound(EntityKind::Resident))
    );
}
