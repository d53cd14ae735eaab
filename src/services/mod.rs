pub mod balance_service;
pub mod contacts_service;
pub mod movement_service;
pub mod transfer_service;
