//! Invoice wire parsing and rent arithmetic.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::domain::{AdjustmentKind, InvoiceCharges};

const INVOICE_FIELDS: usize = 7;

/// Parsed `invoice_data` string, before it is bound to a resident.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub invoice_id: String,
    pub charges: InvoiceCharges,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvoiceFormatError {
    #[error("expected 7 hyphen-separated fields, found {0}")]
    FieldCount(usize),
    #[error("invoice id is empty")]
    EmptyId,
    #[error("{field} '{value}' is not a non-negative amount")]
    InvalidAmount { field: &'static str, value: String },
}

/// Parse `invoice_id-room-electricity-water-parking_slot-share_facility-maintenance`.
pub fn parse_invoice_data(raw: &str) -> Result<InvoiceDraft, InvoiceFormatError> {
    let fields: Vec<&str> = raw.split('-').map(str::trim).collect();
    if fields.len() != INVOICE_FIELDS {
        return Err(InvoiceFormatError::FieldCount(fields.len()));
    }

    let invoice_id = fields[0];
    if invoice_id.is_empty() {
        return Err(InvoiceFormatError::EmptyId);
    }

    let charges = InvoiceCharges {
        room_cost: amount("room_cost", fields[1])?,
        electricity_cost: amount("electricity_cost", fields[2])?,
        water_cost: amount("water_cost", fields[3])?,
        parking_slot_cost: amount("parking_slot_cost", fields[4])?,
        share_facility_cost: amount("share_facility_cost", fields[5])?,
        maintenance_cost: amount("maintenance_cost", fields[6])?,
    };

    Ok(InvoiceDraft {
        invoice_id: invoice_id.to_string(),
        charges,
    })
}

fn amount(field: &'static str, value: &str) -> Result<f64, InvoiceFormatError> {
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed >= 0.0 => Ok(parsed),
        _ => Err(InvoiceFormatError::InvalidAmount {
            field,
            value: value.to_string(),
        }),
    }
}

/// Result of moving a lease to another room partway through a month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProratedChange {
    pub days_in_month: u32,
    pub days_left: u32,
    pub old_cost: f64,
    pub new_cost: f64,
    pub amount: f64,
    pub kind: AdjustmentKind,
}

/// Price the remainder of the move month at both rents. The move day itself is billed
/// at the new rent.
pub fn prorate_room_change(old_rent: f64, target_rent: f64, move_date: NaiveDate) -> ProratedChange {
    let days_in_month = days_in_month(move_date);
    let days_left = days_in_month - move_date.day() + 1;

    let new_cost = target_rent / f64::from(days_in_month) * f64::from(days_left);
    let old_cost = old_rent / f64::from(days_in_month) * f64::from(days_left);
    let amount = round_cents(new_cost - old_cost);

    ProratedChange {
        days_in_month,
        days_left,
        old_cost: round_cents(old_cost),
        new_cost: round_cents(new_cost),
        amount,
        kind: AdjustmentKind::for_amount(amount),
    }
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    match date.month() {
        2 if NaiveDate::from_ymd_opt(date.year(), 2, 29).is_some() => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Accepts `YYYY-MM-DD` as well as unpadded month and day (`2026-2-7`).
pub fn parse_move_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
