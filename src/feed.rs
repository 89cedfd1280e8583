use crate::cursor::{Cursor, CursorOrder};
use crate::display::BoostEntry;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 500;

/// Rendered boosts, newest first, plus the sync cursor.
///
/// The cursor is tracked on its own so that dropping old entries off the
/// back of the list never moves it.
#[derive(Debug, Clone)]
pub struct FeedState {
    cursor: Cursor,
    entries: VecDeque<BoostEntry>,
    order: CursorOrder,
    history_limit: usize,
}

impl FeedState {
    pub fn new(order: CursorOrder, history_limit: usize) -> Self {
        Self {
            cursor: Cursor::empty(),
            entries: VecDeque::new(),
            order,
            history_limit: history_limit.max(1),
        }
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn order(&self) -> CursorOrder {
        self.order
    }

    pub fn entries(&self) -> impl Iterator<Item = &BoostEntry> {
        self.entries.iter()
    }

    pub fn newest(&self) -> Option<&BoostEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepend a batch of boosts and advance the cursor.
    ///
    /// The batch is sorted oldest to newest and each entry is checked against
    /// the cursor as it stands at that moment, so anything already rendered
    /// (or older than what is on top) is dropped. Returns the entries that
    /// were actually added, in the order they were prepended.
    pub fn apply(&mut self, mut batch: Vec<BoostEntry>) -> Vec<BoostEntry> {
        let order = self.order;
        batch.sort_by(|a, b| order.compare(a.index(), b.index()));

        let mut applied = Vec::with_capacity(batch.len());

        for entry in batch {
            if !order.is_newer(entry.index(), &self.cursor) {
                continue;
            }

            self.cursor = Cursor::at(entry.index());
            self.entries.push_front(entry.clone());
            applied.push(entry);
        }

        self.entries.truncate(self.history_limit);

        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boosts::BoostEvent;
    use crate::display::DEFAULT_ICON_BASE_URL;

    fn entry(index: &str) -> BoostEntry {
        let event = BoostEvent {
            index: index.to_string(),
            action: 2,
            value_msat_total: Some(1000),
            ..Default::default()
        };
        BoostEntry::from_event(event, DEFAULT_ICON_BASE_URL)
    }

    fn indices(state: &FeedState) -> Vec<String> {
        state.entries().map(|e| e.index().to_string()).collect()
    }

    #[test]
    fn test_new_state_has_no_cursor() {
        let state = FeedState::new(CursorOrder::Numeric, 10);
        assert!(state.cursor().is_empty());
        assert!(state.is_empty());
    }

    #[test]
    fn test_apply_advances_cursor() {
        let mut state = FeedState::new(CursorOrder::Numeric, 10);
        let applied = state.apply(vec![entry("42")]);

        assert_eq!(applied.len(), 1);
        assert_eq!(state.cursor().as_query(), "42");
        assert_eq!(state.newest().map(|e| e.index()), Some("42"));
    }

    #[test]
    fn test_newest_first_batch_ends_with_highest_on_top() {
        let mut state = FeedState::new(CursorOrder::Numeric, 10);
        let applied = state.apply(vec![entry("12"), entry("11"), entry("10")]);

        let applied: Vec<&str> = applied.iter().map(|e| e.index()).collect();
        assert_eq!(applied, vec!["10", "11", "12"]);
        assert_eq!(indices(&state), vec!["12", "11", "10"]);
        assert_eq!(state.cursor().as_query(), "12");
    }

    #[test]
    fn test_reapplying_is_a_no_op() {
        let mut state = FeedState::new(CursorOrder::Numeric, 10);
        state.apply(vec![entry("1"), entry("2")]);

        let applied = state.apply(vec![entry("1"), entry("2")]);

        assert!(applied.is_empty());
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_stale_entries_are_dropped() {
        let mut state = FeedState::new(CursorOrder::Numeric, 10);
        state.apply(vec![entry("20")]);

        let applied = state.apply(vec![entry("15"), entry("21")]);

        assert_eq!(applied.len(), 1);
        assert_eq!(indices(&state), vec!["21", "20"]);
    }

    #[test]
    fn test_duplicate_within_batch_rendered_once() {
        let mut state = FeedState::new(CursorOrder::Numeric, 10);
        let applied = state.apply(vec![entry("5"), entry("5")]);
        assert_eq!(applied.len(), 1);
    }

    #[test]
    fn test_history_limit_keeps_cursor() {
        let mut state = FeedState::new(CursorOrder::Numeric, 2);
        state.apply(vec![entry("1"), entry("2"), entry("3")]);

        assert_eq!(indices(&state), vec!["3", "2"]);
        assert_eq!(state.cursor().as_query(), "3");

        state.apply(vec![entry("4")]);
        assert_eq!(indices(&state), vec!["4", "3"]);
        assert_eq!(state.cursor().as_query(), "4");
    }

    #[test]
    fn test_mixed_ids_keep_front_as_cursor() {
        let mut state = FeedState::new(CursorOrder::Numeric, 10);
        state.apply(vec![entry("1a"), entry("10")]);

        let applied = state.apply(vec![entry("9"), entry("10"), entry("010")]);

        assert!(applied.is_empty());
        assert_eq!(indices(&state), vec!["1a", "10"]);
        assert_eq!(state.cursor().as_query(), "1a");
    }

    #[test]
    fn test_lexicographic_state() {
        let mut state = FeedState::new(CursorOrder::Lexicographic, 10);
        state.apply(vec![entry("9")]);

        // "10" < "9" as text, so it is treated as old
        let applied = state.apply(vec![entry("10")]);
        assert!(applied.is_empty());
        assert_eq!(state.cursor().as_query(), "9");
    }
}
