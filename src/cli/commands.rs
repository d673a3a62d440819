use clap::{Args, Parser, Subcommand};

use crate::domain::FeedQuery;

#[derive(Parser)]
#[command(name = "feedscroll")]
#[command(about = "Scroll paginated post feeds of a publishing backend")]
#[command(version)]
pub struct Cli {
    /// Log every page request to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Latest posts, optionally filtered by a search term
    Home {
        /// Search term
        #[arg(short, long)]
        search: Option<String>,

        #[command(flatten)]
        scroll: ScrollArgs,
    },

    /// Posts with a tag
    Tag {
        /// Tag name or slug
        slug: String,

        #[command(flatten)]
        scroll: ScrollArgs,
    },

    /// Posts in a category
    Category {
        /// Category name or slug
        slug: String,

        #[command(flatten)]
        scroll: ScrollArgs,
    },

    /// Posts written by one author
    Author {
        /// Author id
        id: String,

        #[command(flatten)]
        scroll: ScrollArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ScrollArgs {
    /// Number of pages to load, 0 loads until the feed is exhausted
    #[arg(short, long, default_value_t = 1)]
    pub pages: u32,

    /// Items per page (defaults to FEEDSCROLL_PAGE_SIZE or 9)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Print the final feed state as JSON instead of a listing
    #[arg(long, conflicts_with = "interactive")]
    pub json: bool,

    /// Scroll by hand: Enter loads the next page, r retries, s <term> searches, q quits
    #[arg(short, long)]
    pub interactive: bool,
}

impl Commands {
    pub fn query(&self) -> FeedQuery {
        match self {
            Commands::Home { search, .. } => match search {
                Some(term) => FeedQuery::search(term),
                None => FeedQuery::home(),
            },
            Commands::Tag { slug, .. } => FeedQuery::tag(slug),
            Commands::Category { slug, .. } => FeedQuery::category(slug),
            Commands::Author { id, .. } => FeedQuery::author(id),
        }
    }

    pub fn scroll(&self) -> &ScrollArgs {
        match self {
            Commands::Home { scroll, .. }
            | Commands::Tag { scroll, .. }
            | Commands::Category { scroll, .. }
            | Commands::Author { scroll, .. } => scroll,
        }
    }
}
