use chrono::{DateTime, NaiveDate, NaiveDateTime};
use scraper::Html;

use crate::domain::{ContentItem, FeedState};

const SUMMARY_LEN: usize = 140;

/// Extract plain text from HTML content, preserving word boundaries
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_fragment(html);
    let mut text = String::new();

    for node in document.root_element().descendants() {
        if let Some(text_node) = node.value().as_text() {
            text.push_str(text_node);
        }
        if let Some(element) = node.value().as_element() {
            match element.name() {
                "p" | "br" | "div" | "li" | "h1" | "h2" | "h3" => text.push(' '),
                _ => {}
            }
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate at a word boundary, counting characters rather than bytes
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    match cut.rfind(' ') {
        Some(pos) if pos > 0 => format!("{}...", &cut[..pos]),
        _ => format!("{}...", cut),
    }
}

/// Render backend timestamps as `Mar 01, 2024`; unknown formats pass through
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%b %d, %Y").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.format("%b %d, %Y").to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%b %d, %Y").to_string();
    }
    raw.to_string()
}

/// One listing entry: numbered heading line, byline, optional summary
pub fn format_item(index: usize, item: &ContentItem) -> String {
    let heading = if item.heading.trim().is_empty() {
        "(untitled)"
    } else {
        item.heading.trim()
    };
    let mut out = format!("{:>4}. {}", index, heading);

    let mut byline = Vec::new();
    if let Some(author) = item.author.as_ref().filter(|a| !a.name.is_empty()) {
        byline.push(format!("by {}", author.name));
    }
    if let Some(date) = item.published_at() {
        byline.push(format_date(date));
    }
    if !item.tags.is_empty() {
        let tags: Vec<String> = item.tags.iter().map(|t| format!("#{}", t.name())).collect();
        byline.push(tags.join(" "));
    }
    if !byline.is_empty() {
        out.push_str("\n      ");
        out.push_str(&byline.join(" · "));
    }

    if let Some(summary) = &item.summary {
        let text = html_to_text(summary);
        if !text.is_empty() {
            out.push_str("\n      ");
            out.push_str(&truncate(&text, SUMMARY_LEN));
        }
    }

    out
}

/// Footer shown under the listing
pub fn format_status(state: &FeedState) -> String {
    let mut status = format!(
        "[{}] {} items, page {}",
        state.phase(),
        state.items.len(),
        state.current_page
    );
    if !state.has_more && state.current_page > 0 {
        status.push_str(", end of feed");
    }
    if let Some(error) = &state.error {
        status.push_str(&format!(", error: {}", error));
    }
    status
}
