use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as HttpClient, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use super::models::{
    ApiError, BalanceResponse, CreateMovementRequest, MovementPageResponse, RateLimitInfo,
    RateLimitResponse,
};
use crate::models::{Movement, MovementDetail};
use crate::utils::{extract_clean_error, extract_error_code, rate_limit_api};

const INSUFFICIENT_FUNDS_CODE: &str = "INSUFFICIENT_FUNDS";

/// Client for the SINPE móvil banking REST API
pub struct SinpeClient {
    http_client: HttpClient,
    api_token: String,
    base_url: String,
}

impl SinpeClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api-tu-backend.com";

    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create default headers with authorization
    fn create_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth_value = HeaderValue::from_str(&format!("Bearer {}", self.api_token))
            .map_err(|e| ApiError::RequestError(format!("Failed to create auth header: {}", e)))?;
        headers.insert(AUTHORIZATION, auth_value);

        Ok(headers)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::RequestError(format!("Invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::RequestError(format!("Base URL {} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Extract rate limit information from response headers
    fn extract_rate_limit_info(response: &reqwest::Response) -> RateLimitInfo {
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        RateLimitInfo {
            limit: header("X-RateLimit-Limit").and_then(|s| s.parse().ok()),
            remaining: header("X-RateLimit-Remaining").and_then(|s| s.parse().ok()),
            reset: header("X-RateLimit-Reset").and_then(|s| s.parse().ok()),
        }
    }

    /// Map a non-success status and its body to an error
    pub fn classify_error(status_code: u16, body: &str) -> ApiError {
        let message = extract_clean_error(body);

        match status_code {
            400 | 402 | 409 | 422 if signals_insufficient_funds(body, &message) => {
                ApiError::InsufficientFunds(message)
            }
            400 | 422 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            429 => {
                let retry_after = serde_json::from_str::<RateLimitResponse>(body)
                    .ok()
                    .and_then(|r| r.retry_after)
                    .unwrap_or(1000);
                warn!("Rate limited by banking API, retry after {} ms", retry_after);
                ApiError::RateLimited { retry_after }
            }
            500..=599 => {
                warn!("Server error {}: {}", status_code, message);
                ApiError::ServerError(status_code, message)
            }
            _ => ApiError::HttpError(status_code, message),
        }
    }

    /// Send a request and decode a JSON body, waiting on the shared rate limit first
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        rate_limit_api().await;

        let response = request
            .headers(self.create_headers()?)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        let rate_limit = Self::extract_rate_limit_info(&response);
        if let Some(remaining) = rate_limit.remaining {
            debug!(
                "API quota: {} of {:?} remaining (reset {:?})",
                remaining, rate_limit.limit, rate_limit.reset
            );
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_error(status.as_u16(), &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }

    /// GET /balance
    ///
    /// Available balance of the authenticated account.
    pub async fn get_balance(&self) -> Result<BalanceResponse, ApiError> {
        let url = self.endpoint(&["balance"])?;
        self.execute(self.http_client.get(url)).await
    }

    /// GET /movements
    ///
    /// One page of movement history. `cursor` is the key returned by the
    /// previous page; `None` requests the most recent page.
    pub async fn get_movements_page(
        &self,
        cursor: Option<&str>,
    ) -> Result<MovementPageResponse, ApiError> {
        let url = self.endpoint(&["movements"])?;
        let mut request = self.http_client.get(url);
        if let Some(cursor) = cursor {
            request = request.query(&[("lastKey", cursor)]);
        }

        debug!("Fetching movements page (cursor: {:?})", cursor);
        self.execute(request).await
    }

    /// GET /movements/{id}?date={date}
    ///
    /// Movements are stored by id and date, so both are needed to look one up.
    pub async fn get_movement_detail(
        &self,
        id: &str,
        date: &str,
    ) -> Result<MovementDetail, ApiError> {
        let url = self.endpoint(&["movements", id])?;
        self.execute(self.http_client.get(url).query(&[("date", date)]))
            .await
    }

    /// POST /movements
    ///
    /// Creates a SINPE transfer. `idempotency_key` lets the backend drop a
    /// retried request instead of charging twice.
    ///
    /// # Returns
    /// * `Ok(Movement)` - The recorded movement
    /// * `Err(ApiError::InsufficientFunds)` - The balance does not cover `amount`
    pub async fn create_movement(
        &self,
        body: &CreateMovementRequest,
        idempotency_key: &Uuid,
    ) -> Result<Movement, ApiError> {
        let url = self.endpoint(&["movements"])?;
        let request = self
            .http_client
            .post(url)
            .header("Idempotency-Key", idempotency_key.to_string())
            .json(body);

        self.execute(request).await
    }
}

fn signals_insufficient_funds(body: &str, message: &str) -> bool {
    if extract_error_code(body).as_deref() == Some(INSUFFICIENT_FUNDS_CODE) {
        return true;
    }
    let message = message.to_lowercase();
    message.contains("insufficient") || message.contains("insuficiente")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_insufficient_funds() {
        let by_code = SinpeClient::classify_error(
            422,
            r#"{"code":"insufficient_funds","message":"No alcanza"}"#,
        );
        assert_eq!(by_code, ApiError::InsufficientFunds("No alcanza".to_string()));

        let by_message =
            SinpeClient::classify_error(400, r#"{"message":"Saldo insuficiente"}"#);
        assert!(matches!(by_message, ApiError::InsufficientFunds(_)));
    }

    #[test]
    fn test_classify_status_codes() {
        assert_eq!(
            SinpeClient::classify_error(400, r#"{"message":"amount required"}"#),
            ApiError::BadRequest("amount required".to_string())
        );
        assert!(matches!(SinpeClient::classify_error(401, ""), ApiError::Unauthorized(_)));
        assert!(matches!(SinpeClient::classify_error(404, "nope"), ApiError::NotFound(_)));
        assert_eq!(
            SinpeClient::classify_error(429, r#"{"retry_after":250}"#),
            ApiError::RateLimited { retry_after: 250 }
        );
        assert_eq!(
            SinpeClient::classify_error(429, "slow down"),
            ApiError::RateLimited { retry_after: 1000 }
        );
        assert!(matches!(SinpeClient::classify_error(503, ""), ApiError::ServerError(503, _)));
        assert!(matches!(SinpeClient::classify_error(418, ""), ApiError::HttpError(418, _)));
    }

    #[test]
    fn test_endpoint_joins_and_escapes_segments() {
        let client = SinpeClient::new("https://bank.example/api/".to_string(), "t".to_string());

        let url = client.endpoint(&["movements", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "https://bank.example/api/movements/a%2Fb");
    }
}
