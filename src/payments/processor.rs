//! Card charging.

use tracing::info;

use crate::payments::types::{Charge, PaymentFailure, Receipt};

/// External card processor.
pub trait PaymentGateway: Send + Sync {
    fn charge(&self, charge: &Charge) -> Result<Receipt, PaymentFailure>;
}

/// Card suffix the simulated gateway always declines.
pub const DECLINED_SUFFIX: &str = "0002";

/// Gateway that approves every card except those ending in [`DECLINED_SUFFIX`].
#[derive(Debug, Clone, Default)]
pub struct SimulatedGateway;

impl PaymentGateway for SimulatedGateway {
    fn charge(&self, charge: &Charge) -> Result<Receipt, PaymentFailure> {
        if charge.card_number.ends_with(DECLINED_SUFFIX) {
            return Err(PaymentFailure::Declined("Your card was declined.".to_string()));
        }
        if charge.amount_cents == 0 {
            return Err(PaymentFailure::Declined("Invalid amount.".to_string()));
        }

        let receipt = Receipt {
            charge_id: format!("ch_{}", uuid::Uuid::new_v4().simple()),
            amount_cents: charge.amount_cents,
        };
        info!(
            user_id = charge.user_id,
            amount_cents = charge.amount_cents,
            charge_id = %receipt.charge_id,
            "Charge approved"
        );
        Ok(receipt)
    }
}
