pub mod traits;
pub mod home;
pub mod tag;
pub mod category;
pub mod author;
pub mod registry;

pub use traits::{FeedSource, PageFetcher};
pub use registry::SourceRegistry;

#[cfg(test)]
pub use traits::MockPageFetcher;
