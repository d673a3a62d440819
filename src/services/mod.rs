pub mod feed_loader;
pub mod fetch_service;
pub mod sentinel;

pub use feed_loader::{FeedLoader, LoadOutcome, SkipReason};
pub use fetch_service::FetchService;
pub use sentinel::Sentinel;
