pub mod encryption;
pub mod errors;
pub mod format;
pub mod ratelimit;
pub mod table;

pub use encryption::{CryptoError, TokenCipher};
pub use errors::{extract_clean_error, extract_error_code};
pub use format::{format_currency, format_movement_amount, format_phone, initial};
pub use ratelimit::rate_limit_api;
pub use table::Table;
