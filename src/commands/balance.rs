use crate::services::balance_service;
use crate::AppContext;

pub async fn execute(ctx: &AppContext, args: &[&str]) -> Result<String, String> {
    if args.first() == Some(&"help") {
        return Ok("💰 Balance Command\n  Usage: `balance` or `bal`\n  Shows the available balance of Cuenta Colones".to_string());
    }

    let result = balance_service::get_balance(&ctx.client).await?;
    Ok(balance_service::render_balance(&result))
}
