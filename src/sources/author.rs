use content_api::PageRequest;

use crate::domain::{FeedKind, FeedQuery};
use crate::errors::{FeedError, FeedResult};
use crate::sources::traits::{path_segment, with_search, FeedSource};

/// Posts written by one user
pub struct AuthorSource;

impl AuthorSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AuthorSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSource for AuthorSource {
    fn kind(&self) -> FeedKind {
        FeedKind::Author
    }

    fn can_handle(&self, query: &FeedQuery) -> bool {
        query.author.is_some()
    }

    fn request(&self, query: &FeedQuery, page: u32, page_size: u32) -> FeedResult<PageRequest> {
        let author = query
            .author
            .as_deref()
            .ok_or_else(|| FeedError::InvalidQuery("author feed without an author".to_string()))?;
        let id = path_segment(FeedKind::Author, author)?;

        let request = PageRequest::new(format!("/users/{}/posts", id), page, page_size);
        Ok(with_search(request, query))
    }
}
