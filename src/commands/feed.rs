use chrono::Local;

use crate::feed::FeedError;
use crate::services::movement_service;
use crate::AppContext;

pub async fn execute(ctx: &AppContext, args: &[&str]) -> Result<String, String> {
    match args.first().map(|a| a.to_lowercase()).as_deref() {
        None => {
            let state = ctx.feed.snapshot().await;
            Ok(movement_service::render_feed(&state, &Local::now()))
        }
        Some("refresh") => refresh(ctx).await,
        Some("more") => more(ctx).await,
        Some(other) => Err(format!("Unknown feed option `{}`. Use: `feed`, `feed refresh` or `more`", other)),
    }
}

pub async fn refresh(ctx: &AppContext) -> Result<String, String> {
    let state = ctx.feed.refresh().await.map_err(describe)?;
    Ok(movement_service::render_feed(&state, &Local::now()))
}

pub async fn more(ctx: &AppContext) -> Result<String, String> {
    let before = ctx.feed.snapshot().await;
    if before.exhausted {
        return Ok("No hay más movimientos.".to_string());
    }

    let state = ctx.feed.load_more().await.map_err(describe)?;
    Ok(movement_service::render_feed(&state, &Local::now()))
}

fn describe(error: FeedError) -> String {
    match error {
        FeedError::Busy => "Actualizando... the movement list is already loading".to_string(),
        other => format!("Failed to load movements: {}", other),
    }
}
