use std::path::{Path, PathBuf};
use std::{fs, io};

use chrono::{Datelike, NaiveDate};
use spdlog::info;
use thiserror::Error;

use crate::post_list::PostList;
use crate::slug::derive_slug;
use crate::text_utils::parse_publish_date;
use crate::view::document_renderer::{DocumentFields, DocumentRenderer};

const MIN_LINES: usize = 4;
const SECTION_PREFIX: &str = "## ";
const ITEM_PREFIX: &str = "- ";

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Text file must have at least 4 lines: category, title, date (e.g. November 25, 2025) and content, found {0}")]
    TooShort(usize),

    #[error("Error converting {0}: {1}")]
    Io(PathBuf, #[source] io::Error),
}

/// A plain text article: one header field per line, then the content
#[derive(Debug, Clone, PartialEq)]
pub struct TextArticle {
    pub category: String,
    pub title: String,
    pub date: String,
    pub body_lines: Vec<String>,
}

/// Blank lines are ignored, everything else is trimmed
pub fn parse_text_article(text: &str) -> Result<TextArticle, ConvertError> {
    let lines: Vec<String> = text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if lines.len() < MIN_LINES {
        return Err(ConvertError::TooShort(lines.len()));
    }

    let mut lines = lines.into_iter();
    // Length was checked above
    let category = lines.next().unwrap_or_default();
    let title = lines.next().unwrap_or_default();
    let date = lines.next().unwrap_or_default();

    Ok(TextArticle {
        category,
        title,
        date,
        body_lines: lines.collect(),
    })
}

/// `## X` opens a section, runs of `- X` make one list, the rest are paragraphs
pub fn body_to_html(lines: &[String]) -> String {
    let mut html = String::new();
    let mut in_list = false;

    for line in lines {
        if let Some(item) = line.strip_prefix(ITEM_PREFIX) {
            if !in_list {
                html.push_str("<ul style=\"padding-left: 1.5rem;\">\n");
                in_list = true;
            }
            html.push_str(&format!("    <li style=\"margin-bottom: 0.5rem;\">{}</li>\n", item));
            continue;
        }

        if in_list {
            html.push_str("</ul>\n");
            in_list = false;
        }

        match line.strip_prefix(SECTION_PREFIX) {
            Some(header) => html.push_str(&format!(
                "<h2 style=\"font-size: 1.75rem; color: var(--primary-color); margin-top: 2.5rem; margin-bottom: 1rem;\">{}</h2>\n",
                header
            )),
            None => html.push_str(&format!("<p style=\"margin-bottom: 1.5rem;\">{}</p>\n", line)),
        }
    }

    if in_list {
        html.push_str("</ul>\n");
    }
    html
}

/// Renders `input` into `{posts_dir}/{slug}.html`, replacing a document with the same slug
pub fn convert_file(input: &Path, posts_dir: &Path, renderer: &DocumentRenderer, today: NaiveDate) -> Result<PathBuf, ConvertError> {
    let text = fs::read_to_string(input)
        .map_err(|e| ConvertError::Io(input.to_path_buf(), e))?;
    let article = parse_text_article(&text)?;

    let year = parse_publish_date(&article.date)
        .unwrap_or(today)
        .year()
        .to_string();
    let body_html = body_to_html(&article.body_lines);

    let html = renderer.render(&DocumentFields {
        title: &article.title,
        category: &article.category,
        date: &article.date,
        year: &year,
        body_html: &body_html,
    });

    let output = PostList::new(posts_dir).document_path(&derive_slug(&article.title));
    fs::create_dir_all(posts_dir)
        .and_then(|_| fs::write(&output, html))
        .map_err(|e| ConvertError::Io(output.clone(), e))?;

    info!("Created {} from {}", output.display(), input.display());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use crate::config::TemplateAnchors;
    use crate::html::metadata::extract_metadata;

    use super::*;

    const ARTICLE: &str = "
AI Chemistry
Agents for Retrosynthesis
November 25, 2025

Planning routes is hard.
## Why agents
- search
- scoring
Closing words.
";

    #[test]
    fn test_parse_text_article() {
        let article = parse_text_article(ARTICLE).unwrap();
        assert_eq!(article.category, "AI Chemistry");
        assert_eq!(article.title, "Agents for Retrosynthesis");
        assert_eq!(article.date, "November 25, 2025");
        assert_eq!(article.body_lines.len(), 5);
    }

    #[test]
    fn test_too_short() {
        let err = parse_text_article("Category\n\nTitle\nDate\n   \n").unwrap_err();
        assert!(matches!(err, ConvertError::TooShort(3)));
    }

    #[test]
    fn test_body_to_html() {
        let article = parse_text_article(ARTICLE).unwrap();
        let html = body_to_html(&article.body_lines);
        let tags: Vec<&str> = html.lines()
            .map(|l| l.trim())
            .map(|l| &l[..l.find(|c| c == ' ' || c == '>').unwrap_or(l.len())])
            .collect();
        assert_eq!(tags, vec!["<p", "<h2", "<ul", "<li", "<li", "</ul", "<p"]);
        assert!(html.contains(">Why agents</h2>"));
        assert!(html.contains(">scoring</li>"));
    }

    #[test]
    fn test_list_at_end_is_closed() {
        let lines = vec!["- one".to_string(), "- two".to_string()];
        let html = body_to_html(&lines);
        assert!(html.starts_with("<ul"));
        assert!(html.ends_with("</ul>\n"));
        assert_eq!(html.matches("<li").count(), 2);
    }

    #[test]
    fn test_convert_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("article.txt");
        fs::write(&input, ARTICLE).unwrap();
        let posts_dir = dir.path().join("posts");

        let anchors = TemplateAnchors::default();
        let renderer = DocumentRenderer::new("ChemBio AI Insights", "Yi Qu", &anchors).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let output = convert_file(&input, &posts_dir, &renderer, today).unwrap();
        assert_eq!(output, posts_dir.join("agents-for-retrosynthesis.html"));

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("&copy; 2025"));

        let meta = extract_metadata(&html, &anchors);
        assert_eq!(meta.title, "Agents for Retrosynthesis");
        assert_eq!(meta.category, "AI Chemistry");
        assert_eq!(meta.date.as_deref(), Some("November 25, 2025"));
        assert_eq!(meta.author.as_deref(), Some("Yi Qu"));
        assert_eq!(meta.excerpt, "Planning routes is hard.");
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let anchors = TemplateAnchors::default();
        let renderer = DocumentRenderer::new("Site", "Me", &anchors).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let err = convert_file(&dir.path().join("none.txt"), dir.path(), &renderer, today).unwrap_err();
        assert!(matches!(err, ConvertError::Io(_, _)));
    }
}
