//! Contact book models

use serde::{Deserialize, Serialize};

/// One number attached to a contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub number: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// A contact as exported from the device address book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
}

impl Contact {
    /// The number transfers are sent to
    pub fn primary_number(&self) -> Option<&str> {
        self.phone_numbers.first().map(|p| p.number.as_str())
    }
}

/// Contacts sharing the same initial
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSection {
    pub title: char,
    pub data: Vec<Contact>,
}
