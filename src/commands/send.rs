use tracing::warn;

use crate::services::transfer_service::{self, TransferError};
use crate::AppContext;

const USAGE: &str = "Usage: `send <phone> <amount> <detail...>` e.g. `send 8753-6347 1,500 almuerzo`";

pub async fn execute(ctx: &AppContext, args: &[&str]) -> Result<String, String> {
    let [phone, amount, detail @ ..] = args else {
        return Err(USAGE.to_string());
    };
    if detail.is_empty() {
        return Err(USAGE.to_string());
    }

    let name = ctx
        .contacts
        .find_by_phone(phone)
        .map(|c| c.name.clone())
        .unwrap_or_default();

    let draft = transfer_service::prepare_transfer(&name, phone, amount, &detail.join(" "))
        .map_err(|e| e.to_string())?;

    let result = match transfer_service::execute_transfer(&ctx.client, draft).await {
        Ok(result) => result,
        Err(TransferError::InsufficientFunds(reason)) => {
            return Err(format!("Saldo insuficiente ({})", reason));
        }
        Err(e) => return Err(format!("Transfer failed: {}", e)),
    };

    // The new movement only shows up after a reload
    if let Err(e) = ctx.feed.refresh().await {
        warn!("Feed refresh after transfer failed: {}", e);
    }

    Ok(transfer_service::render_transfer(&result))
}
