//! Feed state and the pure transitions applied to it.

use std::cmp::Reverse;
use std::collections::HashMap;

use super::UpstreamFetchError;
use crate::models::{FeedPage, Movement, MovementKey};

/// The client's view of the movement history
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedState {
    /// Deduplicated by `(user_id, id)`, newest first
    pub items: Vec<Movement>,
    /// Cursor for the next incremental fetch
    pub cursor: Option<String>,
    /// Set once a fetch came back without a cursor
    pub exhausted: bool,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_more(&self) -> bool {
        !self.exhausted
    }

    /// State after a full reload: only `page` survives
    pub fn replaced_with(&self, page: FeedPage) -> Result<FeedState, UpstreamFetchError> {
        let items = reconcile(Vec::new(), page.items)?;
        Ok(Self::from_parts(items, page.cursor))
    }

    /// State after appending `page`; incoming records win over known ones
    pub fn merged_with(&self, page: FeedPage) -> Result<FeedState, UpstreamFetchError> {
        let items = reconcile(self.items.clone(), page.items)?;
        Ok(Self::from_parts(items, page.cursor))
    }

    fn from_parts(items: Vec<Movement>, cursor: Option<String>) -> Self {
        let cursor = cursor.filter(|c| !c.is_empty());
        Self {
            items,
            exhausted: cursor.is_none(),
            cursor,
        }
    }
}

/// Merge `incoming` into `existing` by identity and sort newest first.
///
/// A replaced record keeps its slot, so equal timestamps stay in the order
/// records first entered the collection.
fn reconcile(
    existing: Vec<Movement>,
    incoming: Vec<Movement>,
) -> Result<Vec<Movement>, UpstreamFetchError> {
    if let Some(bad) = incoming.iter().find(|m| m.timestamp().is_none()) {
        return Err(UpstreamFetchError::Malformed(format!(
            "movement {}/{} has unparseable date {:?}",
            bad.user_id, bad.id, bad.date
        )));
    }

    let mut slots: HashMap<MovementKey, usize> = existing
        .iter()
        .enumerate()
        .map(|(i, m)| (m.key(), i))
        .collect();
    let mut merged = existing;

    for movement in incoming {
        let key = movement.key();
        match slots.get(&key) {
            Some(&slot) => merged[slot] = movement,
            None => {
                slots.insert(key, merged.len());
                merged.push(movement);
            }
        }
    }

    merged.sort_by_cached_key(|m| Reverse(m.timestamp()));
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;
    use std::collections::HashSet;

    fn mv(user_id: &str, id: &str, date: &str, amount: f64) -> Movement {
        Movement {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: format!("Contacto {}", id),
            amount,
            date: date.to_string(),
        }
    }

    fn page(items: Vec<Movement>, cursor: Option<&str>) -> FeedPage {
        FeedPage {
            items,
            cursor: cursor.map(str::to_string),
        }
    }

    fn ids(state: &FeedState) -> Vec<&str> {
        state.items.iter().map(|m| m.id.as_str()).collect()
    }

    fn assert_invariants(state: &FeedState) {
        let keys: HashSet<MovementKey> = state.items.iter().map(Movement::key).collect();
        assert_eq!(keys.len(), state.items.len(), "duplicate identity in feed");

        for pair in state.items.windows(2) {
            assert!(
                parse_timestamp(&pair[0].date) >= parse_timestamp(&pair[1].date),
                "feed not sorted newest first"
            );
        }
    }

    #[test]
    fn test_replace_sorts_and_sets_cursor() {
        let state = FeedState::new()
            .replaced_with(page(
                vec![
                    mv("u1", "2", "2024-01-01", -10.0),
                    mv("u1", "1", "2024-01-02", -20.0),
                ],
                Some("c1"),
            ))
            .unwrap();

        assert_eq!(ids(&state), vec!["1", "2"]);
        assert_eq!(state.cursor.as_deref(), Some("c1"));
        assert!(!state.exhausted);
        assert_invariants(&state);
    }

    #[test]
    fn test_replace_discards_previous_items() {
        let first = FeedState::new()
            .replaced_with(page(vec![mv("u1", "old", "2023-05-05", -1.0)], None))
            .unwrap();
        let second = first
            .replaced_with(page(vec![mv("u1", "new", "2024-05-05", -1.0)], Some("c9")))
            .unwrap();

        assert_eq!(ids(&second), vec!["new"]);
        assert!(second.has_more());
    }

    #[test]
    fn test_replace_dedups_within_a_page() {
        let state = FeedState::new()
            .replaced_with(page(
                vec![
                    mv("u1", "1", "2024-01-02", -1.0),
                    mv("u1", "1", "2024-01-02", -2.0),
                ],
                None,
            ))
            .unwrap();

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].amount, -2.0);
        assert!(state.exhausted);
    }

    #[test]
    fn test_same_id_different_users_are_distinct() {
        let state = FeedState::new()
            .replaced_with(page(
                vec![
                    mv("u1", "1", "2024-01-02", -1.0),
                    mv("u2", "1", "2024-01-01", -2.0),
                ],
                Some("c1"),
            ))
            .unwrap();

        assert_eq!(state.items.len(), 2);
        assert_invariants(&state);
    }

    #[test]
    fn test_merge_keeps_same_id_from_another_user() {
        let before = FeedState::new()
            .replaced_with(page(vec![mv("u1", "1", "2024-01-02", -100.0)], Some("c1")))
            .unwrap();
        let after = before
            .merged_with(page(vec![mv("u2", "1", "2024-01-03", -999.0)], None))
            .unwrap();

        let keys: Vec<(&str, &str)> = after
            .items
            .iter()
            .map(|m| (m.user_id.as_str(), m.id.as_str()))
            .collect();
        assert_eq!(keys, vec![("u2", "1"), ("u1", "1")]);
        assert_eq!(after.items[1].amount, -100.0);
        assert_invariants(&after);
    }

    #[test]
    fn test_merge_keeps_unrelated_and_overwrites_known() {
        let before = FeedState::new()
            .replaced_with(page(
                vec![
                    mv("u1", "1", "2024-01-03", -100.0),
                    mv("u1", "2", "2024-01-02", -200.0),
                ],
                Some("c1"),
            ))
            .unwrap();

        let mut updated = mv("u1", "2", "2024-01-02", -250.0);
        updated.name = "Renamed".to_string();
        let after = before
            .merged_with(page(
                vec![updated, mv("u1", "3", "2024-01-04", -300.0)],
                Some("c2"),
            ))
            .unwrap();

        assert_eq!(ids(&after), vec!["3", "1", "2"]);
        assert_eq!(after.items[2].amount, -250.0);
        assert_eq!(after.items[2].name, "Renamed");
        assert_eq!(after.cursor.as_deref(), Some("c2"));
        assert_invariants(&after);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let state = FeedState::new()
            .replaced_with(page(
                vec![
                    mv("u1", "a", "2024-01-01T10:00:00Z", -1.0),
                    mv("u1", "b", "2024-01-01T10:00:00Z", -1.0),
                ],
                Some("c1"),
            ))
            .unwrap()
            .merged_with(page(
                vec![
                    mv("u1", "c", "2024-01-01T10:00:00Z", -1.0),
                    mv("u1", "a", "2024-01-01T10:00:00Z", -5.0),
                ],
                Some("c2"),
            ))
            .unwrap();

        assert_eq!(ids(&state), vec!["a", "b", "c"]);
        assert_eq!(state.items[0].amount, -5.0);
    }

    #[test]
    fn test_sort_uses_parsed_time_not_text() {
        let state = FeedState::new()
            .replaced_with(page(
                vec![
                    mv("u1", "utc", "2024-01-01T10:00:00Z", -1.0),
                    mv("u1", "offset", "2024-01-01T08:00:00-05:00", -1.0),
                ],
                None,
            ))
            .unwrap();

        assert_eq!(ids(&state), vec!["offset", "utc"]);
    }

    #[test]
    fn test_minute_precision_dates_are_admitted() {
        let state = FeedState::new()
            .replaced_with(page(
                vec![
                    mv("u1", "early", "2024-01-02T10:00Z", -1.0),
                    mv("u1", "late", "2024-01-02T11:30Z", -1.0),
                ],
                Some("c1"),
            ))
            .unwrap();

        assert_eq!(ids(&state), vec!["late", "early"]);
        assert_invariants(&state);
    }

    #[test]
    fn test_unparseable_date_rejects_whole_page() {
        let before = FeedState::new()
            .replaced_with(page(vec![mv("u1", "1", "2024-01-02", -1.0)], Some("c1")))
            .unwrap();

        let result = before.merged_with(page(
            vec![
                mv("u1", "2", "2024-01-03", -1.0),
                mv("u1", "3", "not a date", -1.0),
            ],
            None,
        ));

        assert!(matches!(result, Err(UpstreamFetchError::Malformed(_))));
        assert_eq!(ids(&before), vec!["1"]);
    }

    #[test]
    fn test_empty_cursor_means_exhausted() {
        let state = FeedState::new()
            .replaced_with(page(vec![], Some("")))
            .unwrap();

        assert_eq!(state.cursor, None);
        assert!(state.exhausted);
    }
}
