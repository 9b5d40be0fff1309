use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

pub const WORDS_PER_MINUTE: f64 = 200.0;

lazy_static! {
    static ref TAG_REGEX: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref WORD_REGEX: Regex = Regex::new(r"[0-9A-Za-z_]+").unwrap();
    static ref SPACES_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

/// Every tag replaced by a single space
pub fn strip_tags(html: &str) -> String {
    TAG_REGEX.replace_all(html, " ").to_string()
}

pub fn collapse_whitespace(text: &str) -> String {
    SPACES_REGEX.replace_all(text, " ").trim().to_string()
}

pub fn count_words(html: &str) -> usize {
    WORD_REGEX.find_iter(&strip_tags(html)).count()
}

/// "4 min read", never less than a minute. Halves round to even
pub fn estimate_reading_time(body_html: &str) -> String {
    let words = count_words(body_html) as f64;
    let minutes = (words / WORDS_PER_MINUTE).round_ties_even().max(1.0) as u64;
    format!("{} min read", minutes)
}

/// "December 8, 2025"
pub fn format_publish_date(date: &NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Accepts the publish format and ISO dates
pub fn parse_publish_date(date_str: &str) -> Option<NaiveDate> {
    let date_str = date_str.trim();
    NaiveDate::parse_from_str(date_str, "%B %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(date_str, "%Y-%m-%d"))
        .ok()
}

/// Cuts at `max_len` characters, ending with "..." when something was removed
pub fn truncate_excerpt(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}
