use async_trait::async_trait;
use content_api::PageRequest;

use crate::domain::{FeedKind, FeedPage, FeedQuery};
use crate::errors::{FeedError, FeedResult};

/// Maps a feed query onto one listing endpoint of the backend.
pub trait FeedSource: Send + Sync {
    /// Identifies this source
    fn kind(&self) -> FeedKind;

    /// Check if this source serves the given query
    fn can_handle(&self, query: &FeedQuery) -> bool;

    /// Build the request for one page of the query
    fn request(&self, query: &FeedQuery, page: u32, page_size: u32) -> FeedResult<PageRequest>;
}

/// Fetches single pages of a feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, query: &FeedQuery, page: u32, page_size: u32) -> FeedResult<FeedPage>;
}

/// Slugs and ids end up in a path segment, so only plain identifiers pass
pub(crate) fn path_segment(kind: FeedKind, value: &str) -> FeedResult<&str> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(value)
    } else {
        Err(FeedError::InvalidQuery(format!(
            "invalid {} segment: {}",
            kind.as_str(),
            value
        )))
    }
}

/// Attach the optional search term shared by every listing endpoint
pub(crate) fn with_search(request: PageRequest, query: &FeedQuery) -> PageRequest {
    match query.search_term() {
        Some(term) => request.with_param("search", term),
        None => request,
    }
}
