use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use crate::issue::{Field, IssueFields, MissingFieldError};

/// Lines containing any of these come from the authoring assistant and never reach a post
const ARTIFACT_MARKERS: [&str; 2] = ["contentReference", "oaicite"];

lazy_static! {
    static ref TITLE_MARKER: Regex = marker_regex(r"post\s+title|title");
    static ref CATEGORY_MARKER: Regex = marker_regex(r"post\s+category|category");
    static ref SUMMARY_MARKER: Regex = marker_regex(r"summary|excerpt");
    static ref BODY_MARKER: Regex = marker_regex(r"body\s*html|post\s+body|body");

    static ref INLINE_TITLE: Regex = Regex::new(r"(?i)Post\s+title\s*:\s*(?P<value>.+)").unwrap();
    static ref INLINE_CATEGORY: Regex = Regex::new(r"(?i)Category\s*:\s*(?P<value>.+)").unwrap();
    static ref PUBLISH_PREFIX: Regex = Regex::new(r"(?i)^\s*\[publish\]\s*").unwrap();
}

/// Either `### Label` (one to six hashes) or `Label:` alone on its line
fn marker_regex(labels: &str) -> Regex {
    let patt = format!(r"(?i)^\s*(?:#{{1,6}}\s*(?:{labels})|(?:{labels})\s*:)\s*$");
    Regex::new(&patt).unwrap()
}

enum Section {
    Preamble,
    Open(Field),
    Discarded,
}

pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn is_artifact(line: &str) -> bool {
    ARTIFACT_MARKERS.iter().any(|marker| line.contains(marker))
}

pub fn strip_artifacts(text: &str) -> String {
    text.split('\n')
        .filter(|line| !is_artifact(line))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn match_marker(line: &str) -> Option<Field> {
    let markers: [(&Regex, Field); 4] = [
        (&*TITLE_MARKER, Field::Title),
        (&*CATEGORY_MARKER, Field::Category),
        (&*SUMMARY_MARKER, Field::Summary),
        (&*BODY_MARKER, Field::Body),
    ];

    markers.iter()
        .find(|(re, _)| re.is_match(line))
        .map(|(_, field)| *field)
}

fn split_sections(text: &str) -> HashMap<Field, String> {
    let mut sections: HashMap<Field, String> = HashMap::new();
    let mut seen: HashSet<Field> = HashSet::new();
    let mut current = Section::Preamble;

    for line in text.split('\n') {
        if let Some(field) = match_marker(line) {
            // First occurrence wins, a repeated heading opens a section that is dropped
            current = if seen.insert(field) {
                Section::Open(field)
            } else {
                Section::Discarded
            };
            continue;
        }

        if let Section::Open(field) = current {
            let content = sections.entry(field).or_default();
            content.push_str(line);
            content.push('\n');
        }
    }

    sections
}

fn inline_value(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|cap| cap.name("value"))
        .map(|v| v.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Issue title without the `[Publish]` prefix used by the issue template
pub fn clean_fallback_title(issue_title: &str) -> String {
    PUBLISH_PREFIX.replace(issue_title, "").trim().to_string()
}

/// Extracts the post fields from an issue body.
///
/// Supports Issue Form output (`### Post title`) and plain label blocks
/// (`Post title:`), each followed by the field content on the next lines.
pub fn parse_issue_body(issue_body: &str, fallback_title: Option<&str>) -> Result<IssueFields, MissingFieldError> {
    let body = strip_artifacts(&normalize_line_endings(issue_body));
    let mut sections = split_sections(&body);

    let mut take = |field: Field| -> String {
        sections.remove(&field)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let mut title = take(Field::Title);
    let mut category = take(Field::Category);
    let summary = take(Field::Summary);
    let body_html = take(Field::Body);

    if title.is_empty() {
        if let Some(fallback) = fallback_title {
            title = clean_fallback_title(fallback);
        }
    }

    // Some renderings put the value on the label line
    if title.is_empty() {
        title = inline_value(&INLINE_TITLE, &body).unwrap_or_default();
    }
    if category.is_empty() {
        category = inline_value(&INLINE_CATEGORY, &body).unwrap_or_default();
    }

    let missing: Vec<Field> = Field::ALL.into_iter()
        .zip([&title, &category, &summary, &body_html])
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

    if !missing.is_empty() {
        return Err(MissingFieldError { missing });
    }

    Ok(IssueFields {
        title,
        category,
        summary,
        body: body_html,
    })
}
