/// Extract a human-readable message from an API error body
///
/// The backend answers errors with JSON such as:
/// `{"code":"INSUFFICIENT_FUNDS","message":"Saldo insuficiente"}`
///
/// Returns only the meaningful part:
/// "Saldo insuficiente"
///
/// Non-JSON bodies are returned trimmed, empty bodies become a placeholder.
pub fn extract_clean_error(body: &str) -> String {
    let trimmed = body.trim();

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for field in ["message", "error", "detail"] {
            if let Some(msg) = json.get(field).and_then(|v| v.as_str()) {
                if !msg.trim().is_empty() {
                    return msg.trim().to_string();
                }
            }
        }
    }

    if trimmed.is_empty() {
        "no details provided".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Machine-readable error code from an API error body, if any
pub fn extract_error_code(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body.trim())
        .ok()?
        .get("code")
        .and_then(|v| v.as_str())
        .map(|code| code.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_field() {
        let body = r#"{"code":"INSUFFICIENT_FUNDS","message":"Saldo insuficiente"}"#;
        assert_eq!(extract_clean_error(body), "Saldo insuficiente");
        assert_eq!(extract_error_code(body).as_deref(), Some("INSUFFICIENT_FUNDS"));
    }

    #[test]
    fn test_falls_back_to_error_field_and_raw_text() {
        assert_eq!(extract_clean_error(r#"{"error":"bad cursor"}"#), "bad cursor");
        assert_eq!(extract_clean_error("  Gateway Timeout \n"), "Gateway Timeout");
        assert_eq!(extract_clean_error(""), "no details provided");
        assert_eq!(extract_error_code("not json"), None);
    }
}
