pub mod page;
pub mod query;
pub mod state;

pub use content_api::{ContentItem, ItemId};
pub use page::FeedPage;
pub use query::{FeedKind, FeedQuery};
pub use state::{FeedPhase, FeedState};
