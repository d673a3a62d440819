use std::collections::HashSet;

use content_api::{ContentItem, ItemId};
use serde::Serialize;

use super::FeedPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedPhase {
    Idle,
    Loading,
    Ready,
    LoadingMore,
    Exhausted,
    Error,
}

impl FeedPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedPhase::Idle => "idle",
            FeedPhase::Loading => "loading",
            FeedPhase::Ready => "ready",
            FeedPhase::LoadingMore => "loading_more",
            FeedPhase::Exhausted => "exhausted",
            FeedPhase::Error => "error",
        }
    }
}

impl std::fmt::Display for FeedPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Client-held view of one feed.
///
/// `items` is append-only and never holds two items with the same id.
/// `current_page` is the last page that was fetched successfully.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedState {
    pub items: Vec<ContentItem>,
    pub current_page: u32,
    pub has_more: bool,
    pub is_loading: bool,
    pub is_loading_more: bool,
    pub error: Option<String>,
    #[serde(skip)]
    seen: HashSet<ItemId>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            current_page: 0,
            has_more: true,
            is_loading: false,
            is_loading_more: false,
            error: None,
            seen: HashSet::new(),
        }
    }

    pub fn phase(&self) -> FeedPhase {
        if self.is_loading {
            FeedPhase::Loading
        } else if self.is_loading_more {
            FeedPhase::LoadingMore
        } else if self.error.is_some() {
            FeedPhase::Error
        } else if self.current_page == 0 {
            FeedPhase::Idle
        } else if !self.has_more {
            FeedPhase::Exhausted
        } else {
            FeedPhase::Ready
        }
    }

    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_loading_more
    }

    /// Whether a sentinel trigger may request the next page
    pub fn can_load_more(&self) -> bool {
        self.current_page > 0 && self.has_more && !self.is_busy() && self.error.is_none()
    }

    /// Page the next load-more would request
    pub fn next_page(&self) -> u32 {
        self.current_page + 1
    }

    pub fn begin_initial(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn begin_more(&mut self) {
        self.is_loading_more = true;
        self.error = None;
    }

    /// Record a successful fetch of `page`. Returns how many new items were appended.
    pub fn apply_page(&mut self, page: FeedPage, requested: u32) -> usize {
        let before = self.items.len();

        for item in page.items {
            if self.seen.insert(item.id.clone()) {
                self.items.push(item);
            }
        }

        self.current_page = requested;
        self.has_more = !page.is_last;
        self.finish();

        self.items.len() - before
    }

    /// Record a failed fetch. Items and page position stay untouched.
    pub fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.finish();
    }

    /// Drop loading flags without touching anything else
    pub fn finish(&mut self) {
        self.is_loading = false;
        self.is_loading_more = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64) -> ContentItem {
        serde_json::from_value(serde_json::json!({ "id": id, "heading": format!("Post {}", id) }))
            .unwrap()
    }

    fn page(ids: &[i64], page_number: u32, is_last: bool) -> FeedPage {
        FeedPage::new(ids.iter().copied().map(item).collect(), page_number, is_last)
    }

    #[test]
    fn test_phases() {
        let mut state = FeedState::new();
        assert_eq!(state.phase(), FeedPhase::Idle);
        assert!(!state.can_load_more());

        state.begin_initial();
        assert_eq!(state.phase(), FeedPhase::Loading);

        state.apply_page(page(&[1, 2], 1, false), 1);
        assert_eq!(state.phase(), FeedPhase::Ready);
        assert!(state.can_load_more());

        state.begin_more();
        assert_eq!(state.phase(), FeedPhase::LoadingMore);
        assert!(!state.can_load_more());

        state.fail("boom".to_string());
        assert_eq!(state.phase(), FeedPhase::Error);
        assert!(!state.can_load_more());

        state.begin_more();
        state.apply_page(page(&[3], 2, true), 2);
        assert_eq!(state.phase(), FeedPhase::Exhausted);
        assert!(!state.can_load_more());
    }

    #[test]
    fn test_duplicates_across_pages_are_dropped() {
        let mut state = FeedState::new();
        state.begin_initial();
        assert_eq!(state.apply_page(page(&[1, 2, 3], 1, false), 1), 3);

        state.begin_more();
        assert_eq!(state.apply_page(page(&[3, 4, 4, 5], 2, false), 2), 2);

        let ids: Vec<&str> = state.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert!(state.seen.contains(&ItemId::from(4_i64)));
    }

    #[test]
    fn test_failure_keeps_items_and_page() {
        let mut state = FeedState::new();
        state.begin_initial();
        state.apply_page(page(&[1, 2], 1, false), 1);

        state.begin_more();
        state.fail("Server responded with 500: Internal Server Error".to_string());

        assert_eq!(state.items.len(), 2);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.next_page(), 2);
        assert!(state.has_more);
    }

    #[test]
    fn test_begin_clears_previous_error() {
        let mut state = FeedState::new();
        state.begin_initial();
        state.fail("offline".to_string());
        assert_eq!(state.phase(), FeedPhase::Error);

        state.begin_initial();
        assert!(state.error.is_none());
        assert_eq!(state.phase(), FeedPhase::Loading);
    }

    #[test]
    fn test_serializes_without_seen_set() {
        let mut state = FeedState::new();
        state.begin_initial();
        state.apply_page(page(&[1], 1, true), 1);

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["current_page"], 1);
        assert_eq!(value["has_more"], false);
        assert!(value.get("seen").is_none());
    }
}
