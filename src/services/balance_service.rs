use crate::api::sinpe::SinpeClient;
use crate::models::BalanceResult;
use crate::utils::format_currency;

pub async fn get_balance(client: &SinpeClient) -> Result<BalanceResult, String> {
    let response = client
        .get_balance()
        .await
        .map_err(|e| format!("Failed to fetch balance: {}", e))?;

    Ok(BalanceResult {
        balance: response.balance,
    })
}

pub fn render_balance(result: &BalanceResult) -> String {
    format!("💰 Cuenta Colones\n   Saldo disponible: {}", format_currency(result.balance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_balance() {
        let result = BalanceResult { balance: 125_000.5 };
        assert!(render_balance(&result).ends_with("₡ 125,000.50"));
    }
}
