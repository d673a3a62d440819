use async_trait::async_trait;
use content_api::{ContentClient, Session};
use tracing::debug;

use crate::config::Config;
use crate::domain::{FeedPage, FeedQuery};
use crate::errors::FeedResult;
use crate::sources::{PageFetcher, SourceRegistry};

/// Fetches feed pages from the backend, routing each query through the source registry.
pub struct FetchService {
    client: ContentClient,
    source_registry: SourceRegistry,
}

impl FetchService {
    pub fn new(client: ContentClient, source_registry: SourceRegistry) -> Self {
        Self {
            client,
            source_registry,
        }
    }

    pub fn from_config(config: &Config) -> FeedResult<Self> {
        let session = config.api_token.as_deref().map(Session::new);
        let client = ContentClient::new(&config.api_url, session.as_ref(), config.timeout)?;

        Ok(Self::new(client, SourceRegistry::new()))
    }
}

#[async_trait]
impl PageFetcher for FetchService {
    async fn fetch_page(&self, query: &FeedQuery, page: u32, page_size: u32) -> FeedResult<FeedPage> {
        let request = self.source_registry.request(query, page, page_size)?;
        let kind = self
            .source_registry
            .kind_of(query)
            .map_or("unknown", |kind| kind.as_str());

        debug!(
            kind,
            url = %self.client.endpoint(&request.path),
            page,
            page_size,
            "fetching feed page"
        );

        let listing = self.client.fetch_listing(&request).await?;
        let feed_page = FeedPage::from_listing(listing, page, page_size);

        debug!(
            page,
            items = feed_page.items.len(),
            is_last = feed_page.is_last,
            "feed page received"
        );

        Ok(feed_page)
    }
}
