use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::sinpe::{ApiError, CreateMovementRequest, SinpeClient};
use crate::models::{TransferDraft, TransferResult};
use crate::utils::format::{local_phone_digits, parse_currency_input};
use crate::utils::{format_currency, format_phone};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransferError {
    #[error("Amount and detail are required")]
    MissingFields,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for TransferError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InsufficientFunds(msg) => TransferError::InsufficientFunds(msg),
            other => TransferError::Api(other),
        }
    }
}

/// Validate what the user typed into the transfer form
pub fn prepare_transfer(
    name: &str,
    phone: &str,
    amount_input: &str,
    detail: &str,
) -> Result<TransferDraft, TransferError> {
    if amount_input.trim().is_empty() || detail.trim().is_empty() {
        return Err(TransferError::MissingFields);
    }

    let amount = parse_currency_input(amount_input)
        .ok_or_else(|| TransferError::InvalidAmount(amount_input.trim().to_string()))?;
    if amount <= 0.0 {
        return Err(TransferError::InvalidAmount(amount_input.trim().to_string()));
    }

    let local = local_phone_digits(phone);
    if local.len() != 8 {
        return Err(TransferError::InvalidPhone(phone.trim().to_string()));
    }

    let name = if name.trim().is_empty() {
        format_phone(&local)
    } else {
        name.trim().to_string()
    };

    Ok(TransferDraft {
        name,
        phone_number: format!("506{}", local),
        amount,
        detail: detail.trim().to_string(),
    })
}

/// Reject a draft the available balance cannot cover
pub fn check_funds(draft: &TransferDraft, balance: f64) -> Result<(), TransferError> {
    if draft.amount > balance {
        return Err(TransferError::InsufficientFunds(format!(
            "available {}, requested {}",
            format_currency(balance),
            format_currency(draft.amount)
        )));
    }
    Ok(())
}

pub async fn execute_transfer(
    client: &SinpeClient,
    draft: TransferDraft,
) -> Result<TransferResult, TransferError> {
    let balance = client.get_balance().await?.balance;
    if let Err(e) = check_funds(&draft, balance) {
        warn!("Transfer to {} rejected locally: {}", draft.phone_number, e);
        return Err(e);
    }

    let reference = Uuid::new_v4();
    let body = CreateMovementRequest {
        name: draft.name.clone(),
        phone_number: draft.phone_number.clone(),
        amount: draft.amount,
        detail: draft.detail.clone(),
    };

    let movement = client.create_movement(&body, &reference).await?;
    info!(
        "Transfer {} sent: {} to {} (movement {})",
        reference, draft.amount, draft.phone_number, movement.id
    );

    Ok(TransferResult {
        movement,
        reference,
        formatted_amount: format_currency(draft.amount),
        formatted_phone: format_phone(&draft.phone_number),
    })
}

pub fn render_transfer(result: &TransferResult) -> String {
    format!(
        "✅ Transferencia realizada\n   Para:        {}\n   Teléfono:    {}\n   Monto:       {}\n   Comprobante: {}",
        result.movement.name, result.formatted_phone, result.formatted_amount, result.reference
    )
}
