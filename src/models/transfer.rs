//! Transfer (send) models

use uuid::Uuid;

use super::Movement;

/// A validated transfer, ready to be posted
#[derive(Debug, Clone, PartialEq)]
pub struct TransferDraft {
    pub name: String,
    pub phone_number: String,
    pub amount: f64,
    pub detail: String,
}

/// Result of a completed transfer
#[derive(Debug, Clone)]
pub struct TransferResult {
    pub movement: Movement,
    /// Idempotency key sent with the request
    pub reference: Uuid,
    pub formatted_amount: String,
    pub formatted_phone: String,
}
