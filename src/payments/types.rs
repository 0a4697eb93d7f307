//! Payment gateway types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A request to charge a card on file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    pub user_id: u64,
    pub amount_cents: u64,
    /// Full card number when the client supplied one, else the stored last four.
    pub card_number: String,
    pub description: String,
}

/// A successful charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub charge_id: String,
    pub amount_cents: u64,
}

/// Why a payment did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentFailure {
    /// The gateway or billing stage rejected the card.
    #[error("card declined: {0}")]
    Declined(String),

    /// The order failed validation; per-field messages.
    #[error("order rejected: {0:?}")]
    Rejected(BTreeMap<String, Vec<String>>),
}

impl PaymentFailure {
    /// Single-field rejection.
    pub fn field(field: &str, message: &str) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), vec![message.to_string()]);
        Self::Rejected(errors)
    }
}
