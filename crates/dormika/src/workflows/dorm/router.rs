use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::clock::Clock;
use super::outcome::{
    BookingSuccess, ContractChanged, InvoiceCreated, LeaseConfirmed, MaintenanceRequested,
    PaymentStaged, PaymentSuccess, ResidentRegistered, RoomHeld, TicketUpdated, WorkflowError,
};
use super::payment::{PaymentGateway, PaymentMethod};
use super::service::DormService;

type SharedService<G, C> = State<Arc<DormService<G, C>>>;

/// Router exposing every dormitory workflow. Paths and body field names are part of the
/// public contract with existing clients.
pub fn dorm_router<G, C>(service: Arc<DormService<G, C>>) -> Router
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/booking_share_facility", post(book_facility_handler::<G, C>))
        .route("/stage_payment", post(stage_payment_handler::<G, C>))
        .route("/payment", post(payment_handler::<G, C>))
        .route("/change-contract", post(change_contract_handler::<G, C>))
        .route("/create_invoice", post(create_invoice_handler::<G, C>))
        .route("/show_invoice", get(show_invoice_handler::<G, C>))
        .route("/request_booking", post(request_booking_handler::<G, C>))
        .route("/confirm_booking", post(confirm_booking_handler::<G, C>))
        .route("/request-maintenance", post(request_maintenance_handler::<G, C>))
        .route(
            "/maintenance/:ticket_id/start",
            post(start_ticket_handler::<G, C>),
        )
        .route(
            "/maintenance/:ticket_id/finish",
            post(finish_ticket_handler::<G, C>),
        )
        .route(
            "/maintenance/:ticket_id/approve",
            post(approve_ticket_handler::<G, C>),
        )
        .route("/residents", post(register_resident_handler::<G, C>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct FacilityBookingRequest {
    pub resident_id: String,
    pub share_facility_id: String,
    pub building_id: String,
    pub booking_time: String,
}

#[derive(Debug, Deserialize)]
pub struct StagePaymentRequest {
    pub resident_id: String,
    #[serde(default)]
    pub invoice_ids: Vec<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub resident_id: String,
    #[serde(default)]
    pub paymentdata: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeContractRequest {
    pub resident_id: String,
    pub current_lease_contract_id: String,
    pub target_room_id: String,
    pub move_date: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub operation_staff_id: String,
    pub resident_id: String,
    pub invoice_data: String,
}

#[derive(Debug, Deserialize)]
pub struct ShowInvoiceQuery {
    pub resident_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RoomBookingRequest {
    pub user_id: String,
    pub building_id: String,
    pub room_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmBookingRequest {
    pub operation_staff_id: String,
    pub lease_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MaintenanceRequest {
    #[serde(alias = "user_id")]
    pub resident_id: String,
    pub room_id: String,
    pub issue_category: String,
}

#[derive(Debug, Deserialize)]
pub struct TechnicianAction {
    pub technician_id: String,
}

#[derive(Debug, Deserialize)]
pub struct StaffAction {
    pub operation_staff_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ResidentRegistration {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

fn respond<T, V>(status: StatusCode, result: Result<T, WorkflowError>) -> Response
where
    V: From<T> + serde::Serialize,
{
    match result {
        Ok(value) => (status, Json(V::from(value))).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn book_facility_handler<G, C>(
    State(service): SharedService<G, C>,
    Json(request): Json<FacilityBookingRequest>,
) -> Response
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    let result = service.book_shared_facility(
        &request.resident_id,
        &request.share_facility_id,
        &request.building_id,
        &request.booking_time,
    );
    respond::<_, BookingSuccess>(StatusCode::OK, result)
}

pub(crate) async fn stage_payment_handler<G, C>(
    State(service): SharedService<G, C>,
    Json(request): Json<StagePaymentRequest>,
) -> Response
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    let result = service.stage_payment(
        &request.resident_id,
        request.invoice_ids,
        request.payment_method,
    );
    respond::<_, PaymentStaged>(StatusCode::OK, result)
}

pub(crate) async fn payment_handler<G, C>(
    State(service): SharedService<G, C>,
    Json(request): Json<PaymentRequest>,
) -> Response
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    let result = service.pay(&request.resident_id, &request.paymentdata);
    respond::<_, PaymentSuccess>(StatusCode::OK, result)
}

pub(crate) async fn change_contract_handler<G, C>(
    State(service): SharedService<G, C>,
    Json(request): Json<ChangeContractRequest>,
) -> Response
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    let result = service.change_contract(
        &request.resident_id,
        &request.current_lease_contract_id,
        &request.target_room_id,
        &request.move_date,
    );
    respond::<_, ContractChanged>(StatusCode::OK, result)
}

pub(crate) async fn create_invoice_handler<G, C>(
    State(service): SharedService<G, C>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Response
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    let result = service.create_invoice(
        &request.operation_staff_id,
        &request.resident_id,
        &request.invoice_data,
    );
    respond::<_, InvoiceCreated>(StatusCode::CREATED, result)
}

pub(crate) async fn show_invoice_handler<G, C>(
    State(service): SharedService<G, C>,
    Query(query): Query<ShowInvoiceQuery>,
) -> Response
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    match service.show_invoices(&query.resident_id) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn request_booking_handler<G, C>(
    State(service): SharedService<G, C>,
    Json(request): Json<RoomBookingRequest>,
) -> Response
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    let hold_hours = service.hold_hours();
    match service.request_room_booking(&request.user_id, &request.building_id, &request.room_id)
    {
        Ok(binding) => {
            (StatusCode::CREATED, Json(RoomHeld::new(binding, hold_hours))).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn confirm_booking_handler<G, C>(
    State(service): SharedService<G, C>,
    Json(request): Json<ConfirmBookingRequest>,
) -> Response
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    let result = service.confirm_lease(&request.operation_staff_id, &request.lease_id);
    respond::<_, LeaseConfirmed>(StatusCode::OK, result)
}

pub(crate) async fn request_maintenance_handler<G, C>(
    State(service): SharedService<G, C>,
    Json(request): Json<MaintenanceRequest>,
) -> Response
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    let result = service.request_maintenance(
        &request.resident_id,
        &request.room_id,
        &request.issue_category,
    );
    respond::<_, MaintenanceRequested>(StatusCode::CREATED, result)
}

pub(crate) async fn start_ticket_handler<G, C>(
    State(service): SharedService<G, C>,
    Path(ticket_id): Path<String>,
    Json(action): Json<TechnicianAction>,
) -> Response
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    let result = service.start_ticket(&action.technician_id, &ticket_id);
    respond::<_, TicketUpdated>(StatusCode::OK, result)
}

pub(crate) async fn finish_ticket_handler<G, C>(
    State(service): SharedService<G, C>,
    Path(ticket_id): Path<String>,
    Json(action): Json<TechnicianAction>,
) -> Response
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    let result = service.finish_ticket(&action.technician_id, &ticket_id);
    respond::<_, TicketUpdated>(StatusCode::OK, result)
}

pub(crate) async fn approve_ticket_handler<G, C>(
    State(service): SharedService<G, C>,
    Path(ticket_id): Path<String>,
    Json(action): Json<StaffAction>,
) -> Response
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    let result = service.approve_ticket(&action.operation_staff_id, &ticket_id);
    respond::<_, TicketUpdated>(StatusCode::OK, result)
}

pub(crate) async fn register_resident_handler<G, C>(
    State(service): SharedService<G, C>,
    Json(registration): Json<ResidentRegistration>,
) -> Response
where
    G: PaymentGateway + 'static,
    C: Clock + 'static,
{
    let resident = service.register_resident(
        &registration.name,
        &registration.email,
        &registration.phone_number,
    );
    (StatusCode::CREATED, Json(ResidentRegistered::from(resident))).into_response()
}
