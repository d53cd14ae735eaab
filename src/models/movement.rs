//! Movement models shared by the API client, the feed and the commands

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single SINPE movement as returned by the banking API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Negative for debits
    pub amount: f64,
    pub date: String,
}

/// Identity of a movement across fetches.
///
/// Ids are issued per user by the backing store, so both halves are needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovementKey {
    pub user_id: String,
    pub id: String,
}

impl Movement {
    pub fn key(&self) -> MovementKey {
        MovementKey {
            user_id: self.user_id.clone(),
            id: self.id.clone(),
        }
    }

    /// Parsed `date`, or `None` when the upstream value is not ISO-8601
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date)
    }
}

/// One page of movement history
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedPage {
    pub items: Vec<Movement>,
    /// `None` when there are no more pages
    pub cursor: Option<String>,
}

/// Movement plus the transfer metadata only the detail endpoint returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementDetail {
    #[serde(flatten)]
    pub movement: Movement,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Parse the timestamp formats the API is known to emit.
///
/// Offset-less values are read as UTC; a bare date is midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    // ISO-8601 variants RFC 3339 leaves out: `+0000` offsets, minute precision
    for format in ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%MZ",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
