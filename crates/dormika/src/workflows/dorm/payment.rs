use serde::{Deserialize, Serialize};

/// Instrument a resident settles invoices with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentMethod {
    BankAccount {
        bank_id: String,
        account_name: String,
        /// Transfer slip reference; a transfer without one cannot be matched.
        reference_id: String,
    },
    Card {
        card_id: String,
        cardholder_name: String,
        expiration_date: String,
        cvv: String,
    },
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::BankAccount { .. } => "bank_account",
            PaymentMethod::Card { .. } => "card",
        }
    }
}

/// Outbound seam to whatever actually moves the money.
pub trait PaymentGateway: Send + Sync {
    fn charge(&self, method: &PaymentMethod, amount: f64) -> Result<(), GatewayError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("bank transfer fail")]
    BankTransfer,
    #[error("card pay fail")]
    CardDeclined,
    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),
}

/// Gateway that accepts any method carrying the details a transfer or card charge needs.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGateway;

impl PaymentGateway for OfflineGateway {
    fn charge(&self, method: &PaymentMethod, _amount: f64) -> Result<(), GatewayError> {
        match method {
            PaymentMethod::BankAccount { reference_id, .. } => {
                if reference_id.trim().is_empty() {
                    return Err(GatewayError::BankTransfer);
                }
            }
            PaymentMethod::Card { card_id, cvv, .. } => {
                if card_id.trim().is_empty() || cvv.trim().is_empty() {
                    return Err(GatewayError::CardDeclined);
                }
            }
        }
        Ok(())
    }
}
