use lazy_static::lazy_static;
use regex::Regex;

use crate::config::TemplateAnchors;
use crate::text_utils::{collapse_whitespace, strip_tags, truncate_excerpt};

pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const DEFAULT_TITLE: &str = "Untitled";
pub const EXCERPT_LEN: usize = 150;

lazy_static! {
    static ref ARTICLE_REGEX: Regex = Regex::new(r"(?is)<article[^>]*>(?P<inner>.*?)</article>").unwrap();
    static ref CATEGORY_REGEX: Regex = Regex::new(r"(?is)<span[^>]*>(?P<category>[^<]+)</span>").unwrap();
    static ref TITLE_REGEX: Regex = Regex::new(r"(?is)<h1[^>]*>(?P<title>.*?)</h1>").unwrap();
    static ref DATE_REGEX: Regex = Regex::new(
        r">\s*(?P<date>[A-Z][a-z]+ \d{1,2}, \d{4})(?:\s*•\s*By\s+(?P<author>[^<]+?))?\s*</p>"
    ).unwrap();
    static ref FIRST_PARAGRAPH_REGEX: Regex = Regex::new(r"(?is)^\s*<p[^>]*>(?P<text>.*?)</p>").unwrap();
}

/// What a published document says about itself
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMeta {
    pub title: String,
    pub category: String,
    pub date: Option<String>,
    pub author: Option<String>,
    pub excerpt: String,
    pub body_html: String,
}

/// Content of the body container, up to the end marker or the end of the article
fn body_html<'a>(article: &'a str, anchors: &TemplateAnchors) -> &'a str {
    let open = format!(r#"(?is)<div\s+class="{}"[^>]*>"#, regex::escape(&anchors.body_class));
    let Some(start) = Regex::new(&open).ok().and_then(|re| re.find(article)) else {
        return "";
    };
    let rest = &article[start.end()..];

    let marker = format!(r"(?is)</div>\s*<!--\s*{}\s*-->", regex::escape(anchors.end_marker.trim()));
    let end = Regex::new(&marker).ok()
        .and_then(|re| re.find(rest))
        .map(|m| m.start())
        .unwrap_or(rest.len());
    &rest[..end]
}

pub fn extract_metadata(html: &str, anchors: &TemplateAnchors) -> DocumentMeta {
    // Header and logo markup live outside the article
    let article = ARTICLE_REGEX.captures(html)
        .and_then(|cap| cap.name("inner"))
        .map(|m| m.as_str())
        .unwrap_or(html);

    let category = CATEGORY_REGEX.captures(article)
        .and_then(|cap| cap.name("category"))
        .map(|m| collapse_whitespace(m.as_str()))
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let title = TITLE_REGEX.captures(article)
        .and_then(|cap| cap.name("title"))
        .map(|m| collapse_whitespace(&strip_tags(m.as_str())))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let (date, author) = match DATE_REGEX.captures(article) {
        Some(cap) => (
            cap.name("date").map(|m| m.as_str().to_string()),
            cap.name("author").map(|m| collapse_whitespace(m.as_str())),
        ),
        None => (None, None),
    };

    let body_html = body_html(article, anchors).to_string();
    let excerpt = FIRST_PARAGRAPH_REGEX.captures(&body_html)
        .and_then(|cap| cap.name("text"))
        .map(|m| truncate_excerpt(&collapse_whitespace(&strip_tags(m.as_str())), EXCERPT_LEN))
        .unwrap_or_default();

    DocumentMeta {
        title,
        category,
        date,
        author,
        excerpt,
        body_html,
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::TEMPLATE_HTML;

    use super::*;

    #[test]
    fn test_extract_metadata() {
        let meta = extract_metadata(TEMPLATE_HTML, &TemplateAnchors::default());
        assert_eq!(meta.title, "Old Post");
        assert_eq!(meta.category, "Old Category");
        assert_eq!(meta.date.as_deref(), Some("November 25, 2025"));
        assert_eq!(meta.author.as_deref(), Some("Yi Qu"));
        assert_eq!(meta.excerpt, "Old first paragraph.");
        assert!(meta.body_html.contains("Nested old content"));
        assert!(!meta.body_html.contains("Like this post"));
    }

    #[test]
    fn test_defaults() {
        let meta = extract_metadata("<html><body><p>nothing</p></body></html>", &TemplateAnchors::default());
        assert_eq!(meta.title, DEFAULT_TITLE);
        assert_eq!(meta.category, DEFAULT_CATEGORY);
        assert_eq!(meta.date, None);
        assert_eq!(meta.author, None);
        assert_eq!(meta.excerpt, "");
        assert_eq!(meta.body_html, "");
    }

    #[test]
    fn test_multiline_title_and_long_excerpt() {
        let long = "word ".repeat(60);
        let html = format!(r#"<article>
<span>  Science
 Labs </span>
<h1>A <em>very</em>
  long title</h1>
<p>March 3, 2024</p>
<div class="article-body">
<p>{}</p>
</div>
</article>"#, long);
        let meta = extract_metadata(&html, &TemplateAnchors::default());
        assert_eq!(meta.title, "A very long title");
        assert_eq!(meta.category, "Science Labs");
        assert_eq!(meta.date.as_deref(), Some("March 3, 2024"));
        assert_eq!(meta.author, None);
        assert_eq!(meta.excerpt.chars().count(), EXCERPT_LEN);
        assert!(meta.excerpt.ends_with("..."));
    }
}
