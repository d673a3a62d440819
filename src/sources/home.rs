use content_api::PageRequest;

use crate::domain::{FeedKind, FeedQuery};
use crate::errors::FeedResult;
use crate::sources::traits::{with_search, FeedSource};

/// Latest posts, optionally filtered by a search term
pub struct HomeSource;

impl HomeSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HomeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSource for HomeSource {
    fn kind(&self) -> FeedKind {
        FeedKind::Home
    }

    fn can_handle(&self, _query: &FeedQuery) -> bool {
        // Fallback for anything more specific sources reject
        true
    }

    fn request(&self, query: &FeedQuery, page: u32, page_size: u32) -> FeedResult<PageRequest> {
        Ok(with_search(PageRequest::new("/posts", page, page_size), query))
    }
}
