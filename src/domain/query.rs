use std::sync::OnceLock;

use regex::Regex;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Home,
    Tag,
    Category,
    Author,
}

impl FeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Home => "home",
            FeedKind::Tag => "tag",
            FeedKind::Category => "category",
            FeedKind::Author => "author",
        }
    }
}

/// Parameters that identify one feed. Any change yields a fresh feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FeedQuery {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
}

impl FeedQuery {
    pub fn home() -> Self {
        Self::default()
    }

    pub fn search(term: &str) -> Self {
        Self::default().with_search(term)
    }

    pub fn tag(slug: &str) -> Self {
        Self {
            tag: non_empty(&slugify(slug)),
            ..Self::default()
        }
    }

    pub fn category(slug: &str) -> Self {
        Self {
            category: non_empty(&slugify(slug)),
            ..Self::default()
        }
    }

    pub fn author(id: &str) -> Self {
        Self {
            author: non_empty(id.trim()),
            ..Self::default()
        }
    }

    /// Blank terms clear the search
    pub fn with_search(mut self, term: &str) -> Self {
        self.search = non_empty(term.trim());
        self
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Short human label, e.g. `tag:rust search:"async"`
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(author) = &self.author {
            parts.push(format!("author:{}", author));
        }
        if let Some(tag) = &self.tag {
            parts.push(format!("tag:{}", tag));
        }
        if let Some(category) = &self.category {
            parts.push(format!("category:{}", category));
        }
        if let Some(search) = &self.search {
            parts.push(format!("search:\"{}\"", search));
        }
        if parts.is_empty() {
            parts.push("home".to_string());
        }
        parts.join(" ")
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Lowercase and collapse anything that is not alphanumeric into single dashes
pub fn slugify(input: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let separators =
        SEPARATORS.get_or_init(|| Regex::new(r"[^\p{Alphabetic}\p{N}]+").expect("valid slug regex"));

    let lowered = input.trim().to_lowercase();
    separators
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
