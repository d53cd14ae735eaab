//! Data models for the SINPE client
//!
//! Wire records shared with the API client plus the result structs
//! returned by services to commands.

pub mod balance;
pub mod contact;
pub mod movement;
pub mod transfer;

pub use balance::BalanceResult;
pub use contact::{Contact, ContactSection};
pub use movement::{parse_timestamp, FeedPage, Movement, MovementDetail, MovementKey};
pub use transfer::{TransferDraft, TransferResult};
