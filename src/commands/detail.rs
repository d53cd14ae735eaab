use chrono::Local;

use crate::services::movement_service;
use crate::AppContext;

pub async fn execute(ctx: &AppContext, args: &[&str]) -> Result<String, String> {
    let (id, date) = match args {
        [position] => {
            let index = position
                .trim_start_matches('#')
                .parse::<usize>()
                .map_err(|_| "Usage: `detail <#>` or `detail <id> <date>`".to_string())?;

            let state = ctx.feed.snapshot().await;
            let movement = index
                .checked_sub(1)
                .and_then(|i| state.items.get(i))
                .ok_or_else(|| format!("No movement #{} in the list ({} loaded)", index, state.items.len()))?;
            (movement.id.clone(), movement.date.clone())
        }
        [id, date] => (id.to_string(), date.to_string()),
        _ => return Err("Usage: `detail <#>` or `detail <id> <date>`".to_string()),
    };

    let detail = movement_service::get_movement_detail(&ctx.client, &id, &date).await?;
    Ok(movement_service::render_detail(&detail, &Local::now()))
}
