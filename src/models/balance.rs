//! Balance command models

/// Result of a balance query
#[derive(Debug, Clone)]
pub struct BalanceResult {
    pub balance: f64,
}
