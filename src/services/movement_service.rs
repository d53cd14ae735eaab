use chrono::{DateTime, TimeZone};

use crate::api::sinpe::SinpeClient;
use crate::feed::FeedState;
use crate::models::MovementDetail;
use crate::utils::format::format_movement_date_at;
use crate::utils::{format_currency, format_movement_amount, format_phone, Table};

/// Fetch one movement; the API keys movements by id and date
pub async fn get_movement_detail(
    client: &SinpeClient,
    id: &str,
    date: &str,
) -> Result<MovementDetail, String> {
    client
        .get_movement_detail(id, date)
        .await
        .map_err(|e| format!("Failed to fetch movement {}: {}", id, e))
}

/// Movement list as a table, newest first, numbered for `detail`
pub fn render_feed<Tz: TimeZone>(state: &FeedState, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if state.items.is_empty() {
        return "📋 Movimientos\nNo hay movimientos todavía.".to_string();
    }

    let mut table = Table::new(&["#", "Movimiento", "Fecha", "Monto"]).align_right(3);
    for (idx, movement) in state.items.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            format!("SINPE móvil - {}", movement.name),
            format_movement_date_at(&movement.date, now),
            format_movement_amount(movement.amount),
        ]);
    }

    let footer = if state.has_more() {
        "Escribí `more` para cargar más movimientos."
    } else {
        "No hay más movimientos."
    };

    format!("📋 Movimientos\n{}\n{}", table.render(), footer)
}

pub fn render_detail<Tz: TimeZone>(detail: &MovementDetail, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let movement = &detail.movement;
    let mut lines = vec![
        format!("🧾 SINPE móvil - {}", movement.name),
        format!("   Monto:       {}", format_currency(movement.amount)),
        format!("   Fecha:       {}", format_movement_date_at(&movement.date, now)),
    ];
    if let Some(phone) = &detail.phone_number {
        lines.push(format!("   Teléfono:    {}", format_phone(phone)));
    }
    if let Some(text) = detail.detail.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(format!("   Detalle:     {}", text));
    }
    lines.push(format!("   Comprobante: {}", movement.id));
    lines.join("\n")
}
