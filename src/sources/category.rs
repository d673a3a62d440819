use content_api::PageRequest;

use crate::domain::{FeedKind, FeedQuery};
use crate::errors::{FeedError, FeedResult};
use crate::sources::traits::{path_segment, with_search, FeedSource};

pub struct CategorySource;

impl CategorySource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CategorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSource for CategorySource {
    fn kind(&self) -> FeedKind {
        FeedKind::Category
    }

    fn can_handle(&self, query: &FeedQuery) -> bool {
        query.category.is_some()
    }

    fn request(&self, query: &FeedQuery, page: u32, page_size: u32) -> FeedResult<PageRequest> {
        let slug = query
            .category
            .as_deref()
            .ok_or_else(|| FeedError::InvalidQuery("category feed without a category".to_string()))?;
        let slug = path_segment(FeedKind::Category, slug)?;

        let request = PageRequest::new(format!("/categories/{}/posts", slug), page, page_size);
        Ok(with_search(request, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request() {
        let request = CategorySource::new()
            .request(&FeedQuery::category("Tutorials").with_search("lifetimes"), 1, 9)
            .unwrap();

        assert_eq!(request.path, "/categories/tutorials/posts");
        assert_eq!(request.page_size_param, "limit");
        assert_eq!(
            request.params,
            vec![("search".to_string(), "lifetimes".to_string())]
        );
    }

    #[test]
    fn test_raw_slug_cannot_escape_path() {
        for slug in ["../admin", "news/../../users", "a?b=1", ""] {
            let query = FeedQuery {
                category: Some(slug.to_string()),
                ..FeedQuery::default()
            };

            let result = CategorySource::new().request(&query, 1, 9);
            assert!(
                matches!(result, Err(FeedError::InvalidQuery(_))),
                "slug {:?} should be rejected",
                slug
            );
        }
    }
}
