use content_api::PageRequest;

use crate::domain::{FeedKind, FeedQuery};
use crate::errors::{FeedError, FeedResult};
use crate::sources::traits::{path_segment, with_search, FeedSource};

pub struct TagSource;

impl TagSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TagSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSource for TagSource {
    fn kind(&self) -> FeedKind {
        FeedKind::Tag
    }

    fn can_handle(&self, query: &FeedQuery) -> bool {
        query.tag.is_some()
    }

    fn request(&self, query: &FeedQuery, page: u32, page_size: u32) -> FeedResult<PageRequest> {
        let slug = query
            .tag
            .as_deref()
            .ok_or_else(|| FeedError::InvalidQuery("tag feed without a tag".to_string()))?;
        let slug = path_segment(FeedKind::Tag, slug)?;

        // The tag listing is the one endpoint paginated with per_page
        let request = PageRequest::new(format!("/tags/{}/posts", slug), page, page_size)
            .with_page_size_param("per_page");

        Ok(with_search(request, query))
    }
}
