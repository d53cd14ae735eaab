use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::models::{Contact, ContactSection};
use crate::utils::format::local_phone_digits;
use crate::utils::{format_phone, initial};

#[derive(Debug, Error)]
pub enum ContactsError {
    #[error("Failed to read contacts file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid contacts file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Address book grouped by initial, limited to contacts that can receive a transfer
#[derive(Debug, Clone, Default)]
pub struct ContactBook {
    sections: Vec<ContactSection>,
}

impl ContactBook {
    pub fn from_contacts(contacts: Vec<Contact>) -> Self {
        let mut grouped: BTreeMap<char, Vec<Contact>> = BTreeMap::new();

        for contact in contacts {
            if contact.phone_numbers.is_empty() {
                continue;
            }
            let Some(letter) = initial(&contact.name) else {
                continue;
            };
            grouped.entry(letter).or_default().push(contact);
        }

        Self {
            sections: grouped
                .into_iter()
                .map(|(title, data)| ContactSection { title, data })
                .collect(),
        }
    }

    /// Load a JSON array of contacts exported from the phone
    pub async fn load(path: &Path) -> Result<Self, ContactsError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ContactsError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let contacts: Vec<Contact> =
            serde_json::from_str(&raw).map_err(|source| ContactsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Read {} contacts from {}", contacts.len(), path.display());
        Ok(Self::from_contacts(contacts))
    }

    pub fn sections(&self) -> &[ContactSection] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.data.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections filtered by a case-insensitive name match or a match on
    /// the primary number. An empty query returns everything.
    pub fn search(&self, query: &str) -> Vec<ContactSection> {
        let query = query.trim();
        if query.is_empty() {
            return self.sections.clone();
        }
        let needle = query.to_lowercase();

        self.sections
            .iter()
            .map(|section| ContactSection {
                title: section.title,
                data: section
                    .data
                    .iter()
                    .filter(|c| {
                        c.name.to_lowercase().contains(&needle)
                            || c.primary_number().is_some_and(|n| n.contains(query))
                    })
                    .cloned()
                    .collect(),
            })
            .filter(|section| !section.data.is_empty())
            .collect()
    }

    /// Contact owning `phone`, comparing national digits only
    pub fn find_by_phone(&self, phone: &str) -> Option<&Contact> {
        let wanted = local_phone_digits(phone);
        if wanted.is_empty() {
            return None;
        }
        self.sections
            .iter()
            .flat_map(|s| s.data.iter())
            .find(|c| {
                c.phone_numbers
                    .iter()
                    .any(|p| local_phone_digits(&p.number) == wanted)
            })
    }
}

pub fn render_sections(sections: &[ContactSection]) -> String {
    if sections.is_empty() {
        return "No se encontraron contactos.".to_string();
    }

    let mut out = String::new();
    for section in sections {
        out.push_str(&format!("{}\n", section.title));
        for contact in &section.data {
            let number = contact.primary_number().map(format_phone).unwrap_or_default();
            out.push_str(&format!("  ({}) {}  {}\n", section.title, contact.name, number));
        }
    }
    out.trim_end().to_string()
}
