use content_api::PageRequest;

use crate::domain::{FeedKind, FeedQuery};
use crate::errors::{FeedError, FeedResult};
use crate::sources::traits::FeedSource;
use crate::sources::{
    author::AuthorSource, category::CategorySource, home::HomeSource, tag::TagSource,
};

pub struct SourceRegistry {
    sources: Vec<Box<dyn FeedSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            sources: Vec::new(),
        };

        // Register sources in order of specificity (most specific first)
        registry.register(Box::new(AuthorSource::new()));
        registry.register(Box::new(TagSource::new()));
        registry.register(Box::new(CategorySource::new()));
        registry.register(Box::new(HomeSource::new())); // Fallback

        registry
    }

    pub fn register(&mut self, source: Box<dyn FeedSource>) {
        self.sources.push(source);
    }

    /// Find appropriate source for a query
    pub fn find_source(&self, query: &FeedQuery) -> Option<&dyn FeedSource> {
        self.sources
            .iter()
            .find(|s| s.can_handle(query))
            .map(|s| s.as_ref())
    }

    pub fn kind_of(&self, query: &FeedQuery) -> Option<FeedKind> {
        self.find_source(query).map(|s| s.kind())
    }

    /// Build the page request using the appropriate source
    pub fn request(&self, query: &FeedQuery, page: u32, page_size: u32) -> FeedResult<PageRequest> {
        let source = self
            .find_source(query)
            .ok_or_else(|| FeedError::UnsupportedQuery(query.describe()))?;

        source.request(query, page, page_size)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
