//! Payment collaborator.
//!
//! Handlers charge orders through [`PaymentGateway`]; failures surface as
//! [`PaymentFailure`] and become 403 envelopes at the action gate.

pub mod processor;
pub mod types;

pub use processor::{PaymentGateway, SimulatedGateway};
pub use types::{Charge, PaymentFailure, Receipt};
