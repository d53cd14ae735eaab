//! Display formatting for colón amounts, Costa Rican phone numbers and
//! movement timestamps.

use chrono::{DateTime, TimeZone};

use crate::models::parse_timestamp;

const COUNTRY_CODE: &str = "506";

/// `₡ 1,234.56`, always unsigned
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    format!("₡ {}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// Amount as shown in the movement list: debits carry a leading `- `
pub fn format_movement_amount(amount: f64) -> String {
    if amount < 0.0 {
        format!("- {}", format_currency(amount))
    } else {
        format_currency(amount)
    }
}

fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Parse what a user types in the amount field: `₡ 1,500.50`, `1500`, `CRC 20`.
///
/// Returns `None` for anything that is not a finite number with at most
/// two decimals.
pub fn parse_currency_input(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('₡')
        .trim_start_matches("CRC")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-') {
        return None;
    }

    if let Some((_, decimals)) = cleaned.split_once('.') {
        if decimals.len() > 2 {
            return None;
        }
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Digits of a phone number without separators or `+`
pub fn phone_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// National 8-digit number, dropping the country code when present
pub fn local_phone_digits(raw: &str) -> String {
    let digits = phone_digits(raw);
    if digits.len() == 11 && digits.starts_with(COUNTRY_CODE) {
        digits[3..].to_string()
    } else {
        digits
    }
}

/// `+506 8753-6347` for Costa Rican numbers, anything else unchanged
pub fn format_phone(raw: &str) -> String {
    let local = local_phone_digits(raw);
    if local.len() == 8 {
        format!("+{} {}-{}", COUNTRY_CODE, &local[..4], &local[4..])
    } else {
        raw.to_string()
    }
}

/// `Hoy 03:15 PM` for movements from `now`'s day, `01/02/24 03:15 PM` otherwise
pub fn format_movement_date_at<Tz: TimeZone>(raw: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(parsed) = parse_timestamp(raw) else {
        return raw.to_string();
    };

    let local = parsed.with_timezone(&now.timezone());
    if local.date_naive() == now.date_naive() {
        format!("Hoy {}", local.format("%I:%M %p"))
    } else {
        local.format("%d/%m/%y %I:%M %p").to_string()
    }
}

/// Upper-cased first letter of a name
pub fn initial(name: &str) -> Option<char> {
    name.trim().chars().next().and_then(|c| c.to_uppercase().next())
}
