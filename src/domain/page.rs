use content_api::{ContentItem, Listing};

/// A single fetched page of a feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPage {
    pub items: Vec<ContentItem>,
    pub page_number: u32,
    pub is_last: bool,
}

impl FeedPage {
    pub fn new(items: Vec<ContentItem>, page_number: u32, is_last: bool) -> Self {
        Self {
            items,
            page_number,
            is_last,
        }
    }

    /// Interpret a listing fetched for `page`. Pagination meta wins when present,
    /// otherwise a short page marks the end.
    pub fn from_listing(listing: Listing, page: u32, page_size: u32) -> Self {
        let is_last = listing.items.is_empty()
            || match listing.meta {
                Some(meta) => meta.last_page <= page,
                None => listing.items.len() < page_size as usize,
            };

        let page_number = listing.meta.map(|m| m.current_page).unwrap_or(page);

        Self {
            items: listing.items,
            page_number,
            is_last,
        }
    }
}
