use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::post_index::PostRecord;

const PUBLISHED_TPL: &str = "✅ Published!

- **Slug:** `{{{slug}}}`
- **HTML:** `{{{document_path}}}`
- **posts.json id:** `{{id}}`

JSON entry added:
```json
{{{entry_json}}}
```";

const NO_CHANGES_TPL: &str = "⚠️ **No changes detected**

A post with slug `{{{slug}}}` may already exist, or the content is identical to an existing post.
Please check the repository and try again with different content.";

const COMMIT_FAILED_TPL: &str = "❌ **Commit failed**

Error while committing changes:
```
{{{error}}}
```

Please check the repository status and try again.";

#[derive(ramhorns::Content)]
struct PublishedView<'a> {
    slug: &'a str,
    document_path: &'a str,
    id: u64,
    entry_json: &'a str,
}

#[derive(ramhorns::Content)]
struct NoChangesView<'a> {
    slug: &'a str,
}

#[derive(ramhorns::Content)]
struct CommitFailedView<'a> {
    error: &'a str,
}

/// Messages posted back on the publishing issue
pub struct CommentRenderer<'a> {
    published: Template<'a>,
    no_changes: Template<'a>,
    commit_failed: Template<'a>,
}

fn parse_template<'a>(name: &str, src: &'a str) -> io::Result<Template<'a>> {
    match Template::new(src) {
        Ok(x) => Ok(x),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing {} comment template: {}", name, e))),
    }
}

impl CommentRenderer<'static> {
    pub fn new() -> io::Result<Self> {
        Ok(CommentRenderer {
            published: parse_template("published", PUBLISHED_TPL)?,
            no_changes: parse_template("no changes", NO_CHANGES_TPL)?,
            commit_failed: parse_template("commit failed", COMMIT_FAILED_TPL)?,
        })
    }
}

impl CommentRenderer<'_> {
    /// `document_path` is relative to the repository root
    pub fn published(&self, record: &PostRecord, document_path: &str) -> io::Result<String> {
        let entry_json = record.to_pretty_json()
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;

        Ok(self.published.render(&PublishedView {
            slug: &record.slug,
            document_path,
            id: record.id,
            entry_json: &entry_json,
        }))
    }

    pub fn no_changes(&self, slug: &str) -> String {
        self.no_changes.render(&NoChangesView { slug })
    }

    pub fn commit_failed(&self, error: &str) -> String {
        self.commit_failed.render(&CommitFailedView { error })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;

    fn record() -> PostRecord {
        PostRecord {
            id: 4,
            title: "Hello <World>".to_string(),
            slug: "hello-world".to_string(),
            date: "December 8, 2025".to_string(),
            category: "Labs & Tools".to_string(),
            author: "Yi Qu".to_string(),
            summary: "S".to_string(),
            reading_time: "1 min read".to_string(),
            content_url: "/posts/hello-world.html".to_string(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_published() {
        let renderer = CommentRenderer::new().unwrap();
        let res = renderer.published(&record(), "posts/hello-world.html").unwrap();
        assert!(res.starts_with("✅ Published!\n\n- **Slug:** `hello-world`\n- **HTML:** `posts/hello-world.html`\n- **posts.json id:** `4`\n"));
        assert!(res.contains("```json\n{\n  \"id\": 4,\n  \"title\": \"Hello <World>\","));
        assert!(res.contains("\"category\": \"Labs & Tools\""));
        assert!(res.ends_with("}\n```"));
    }

    #[test]
    fn test_no_changes() {
        let renderer = CommentRenderer::new().unwrap();
        let res = renderer.no_changes("hello-world");
        assert!(res.starts_with("⚠️ **No changes detected**"));
        assert!(res.contains("A post with slug `hello-world` may already exist"));
    }

    #[test]
    fn test_commit_failed() {
        let renderer = CommentRenderer::new().unwrap();
        let res = renderer.commit_failed("Command failed: git commit -m <x>");
        assert!(res.contains("```\nCommand failed: git commit -m <x>\n```"));
    }
}
