use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::dorm::dorm_router;
use crate::workflows::dorm::router::FacilityBookingRequest;

#[tokio::test]
async fn booking_route_reports_success_then_conflict() {
    let (service, _) = build_service();
    let router = dorm_router(Arc::new(service));
    let body = json!({
        "resident_id": RESIDENT,
        "share_facility_id": MEETING_ROOM,
        "building_id": BUILDING,
        "booking_time": "2025-01-01T10:00",
    });

    let response = router
        .clone()
        .oneshot(json_request("POST", "/booking_share_facility", body.clone()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["ok"], true);
    assert_eq!(payload["message"], "Booking Success");
    assert_eq!(payload["details"]["facility"], MEETING_ROOM);
    assert_eq!(payload["details"]["time"], "2025-01-01T10:00");

    let response = router
        .oneshot(json_request("POST", "/booking_share_facility", body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert_eq!(payload["ok"], false);
    assert_eq!(payload["fn"], "already_booked");
    assert_eq!(payload["reason"], "Time slot is already booked");
}

#[tokio::test]
async fn booking_handler_maps_missing_resident_to_not_found() {
    let (service, _) = build_service();

    let response = crate::workflows::dorm::router::book_facility_handler(
        State(Arc::new(service)),
        axum::Json(FacilityBookingRequest {
            resident_id: "R404".to_string(),
            share_facility_id: MEETING_ROOM.to_string(),
            building_id: BUILDING.to_string(),
            booking_time: "2025-01-01T10:00".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["reason"], "Resident not found");
}

#[tokio::test]
async fn invoice_routes_create_and_list() {
    let (service, _) = build_service();
    let router = dorm_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/create_invoice",
            json!({
                "operation_staff_id": STAFF,
                "resident_id": RESIDENT,
                "invoice_data": "INV001-5000-1200-200-500-100-300",
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["message"], "Create Invoice Success");
    assert_eq!(payload["invoice"]["invoice_id"], "INV001");
    assert_eq!(payload["invoice"]["invoice_type"], "statement");
    assert_eq!(payload["invoice"]["room_cost"], 5000.0);
    assert_eq!(payload["invoice"]["total"], 7300.0);
    assert_eq!(payload["invoice"]["resident_info"]["name"], "John Doe");

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/create_invoice",
            json!({
                "operation_staff_id": STAFF,
                "resident_id": RESIDENT,
                "invoice_data": "INV002-5000",
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await["fn"], "format_error");

    let response = router
        .clone()
        .oneshot(
            Request::get(format!("/show_invoice?resident_id={RESIDENT}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["resident_id"], RESIDENT);
    assert_eq!(payload["total_invoices"], 1);
    assert_eq!(payload["invoice_ids"], json!(["INV001"]));

    let response = router
        .oneshot(
            Request::get("/show_invoice?resident_id=R404")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn payment_routes_stage_and_settle() {
    let (service, _) = build_service();
    let invoice = issue_invoice(&service, "INV001-5000-0-0-0-0-0");
    let router = dorm_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/stage_payment",
            json!({
                "resident_id": RESIDENT,
                "invoice_ids": [invoice],
                "payment_method": {
                    "type": "bank_account",
                    "bank_id": "KBANK",
                    "account_name": "John Doe",
                    "reference_id": "",
                },
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["method"], "bank_account");
    assert_eq!(payload["total"], 5000.0);

    let pay = json!({ "resident_id": RESIDENT, "paymentdata": "slip-001" });
    let response = router
        .clone()
        .oneshot(json_request("POST", "/payment", pay.clone()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["fn"], "payment_failed");
    assert_eq!(payload["reason"], "bank transfer fail");

    router
        .clone()
        .oneshot(json_request(
            "POST",
            "/stage_payment",
            json!({
                "resident_id": RESIDENT,
                "invoice_ids": ["INV001"],
                "payment_method": {
                    "type": "card",
                    "card_id": "4111",
                    "cardholder_name": "John Doe",
                    "expiration_date": "12/28",
                    "cvv": "123",
                },
            }),
        ))
        .await
        .expect("response");
    let response = router
        .oneshot(json_request("POST", "/payment", pay))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["ok"], true);
    assert_eq!(payload["fn"], "payment_success");
    assert_eq!(payload["receipt_info"], "Payment Successful. Receipt Created.");
    assert_eq!(payload["receipt"]["reference"], "slip-001");
}

#[tokio::test]
async fn change_contract_route_uses_camel_case_fields() {
    let (service, _) = build_service();
    let router = dorm_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "POST",
            "/change-contract",
            json!({
                "residentId": RESIDENT,
                "currentLeaseContractId": LEASE,
                "targetRoomId": STUDIO_ROOM,
                "moveDate": "2026-2-1",
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["resident"]["id"], RESIDENT);
    assert_eq!(payload["old-room"]["id"], STANDARD_ROOM);
    assert_eq!(payload["old-room"]["status"], "Available");
    assert_eq!(payload["invoice"]["invoice_type"], "adjustment");
    assert_eq!(payload["invoice"]["kind"], "CREDIT");
    assert_eq!(payload["invoice"]["amount"], -1700.0);
}

#[tokio::test]
async fn room_booking_and_confirmation_routes() {
    let (service, _) = build_service();
    let router = dorm_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/request_booking",
            json!({ "user_id": RESIDENT, "building_id": BUILDING, "room_id": SPARE_STUDIO }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "success");
    assert_eq!(payload["room_status"], "Reserved");
    assert_eq!(payload["message"], "Booking successful, held for 48 hours.");
    let lease_id = payload["lease_id"].as_str().expect("lease id").to_string();

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/request_booking",
            json!({ "user_id": SUSPENDED_RESIDENT, "building_id": BUILDING, "room_id": STUDIO_ROOM }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = router
        .oneshot(json_request(
            "POST",
            "/confirm_booking",
            json!({ "operation_staff_id": STAFF, "lease_id": lease_id }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["contract_status"], "Active");
    assert_eq!(payload["room"]["status"], "Occupied");
}

#[tokio::test]
async fn maintenance_routes_accept_user_id_alias() {
    let (service, _) = build_service();
    let router = dorm_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/request-maintenance",
            json!({ "user_id": RESIDENT, "room_id": STUDIO_ROOM, "issue_category": "plumbing" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["ok"], true);
    assert_eq!(payload["res"]["technician"], PLUMBER);
    assert_eq!(payload["res"]["status"], "IDLE");
    let ticket_id = payload["res"]["ticket_id"]
        .as_str()
        .expect("ticket id")
        .to_string();

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/maintenance/{ticket_id}/approve"),
            json!({ "operation_staff_id": STAFF }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    for step in ["start", "finish"] {
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/maintenance/{ticket_id}/{step}"),
                json!({ "technician_id": PLUMBER }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK, "{step}");
    }

    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/maintenance/{ticket_id}/approve"),
            json!({ "operation_staff_id": STAFF }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["ticket"]["status"], "APPROVED");
}

#[tokio::test]
async fn residents_route_registers_with_generated_id() {
    let (service, _) = build_service();
    let router = dorm_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "POST",
            "/residents",
            json!({ "name": "Mali", "email": "mali@example.com", "phone_number": "0801112222" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["resident_id"], "RS-2026-0001");
    assert_eq!(payload["status"], "Pending Verification");
}
