use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Missing post index {0}")]
    Missing(PathBuf),

    #[error("Post index {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Error accessing post index {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    #[error("Error serializing post index: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One entry of the post index.
///
/// Older entries may miss fields or carry extra ones; both survive a load/save cycle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(default)]
    pub id: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reading_time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PostRecord {
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// `{prefix}/{slug}.html`
pub fn content_url(prefix: &str, slug: &str) -> String {
    format!("{}/{}.html", prefix.trim_end_matches('/'), slug)
}

/// Posts ordered newest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostIndex {
    pub records: Vec<PostRecord>,
}

impl PostIndex {
    pub fn new(records: Vec<PostRecord>) -> Self {
        PostIndex { records }
    }

    pub fn next_id(&self) -> u64 {
        self.records.iter().map(|r| r.id).max().unwrap_or(0) + 1
    }

    pub fn slugs(&self) -> HashSet<String> {
        self.records.iter()
            .filter(|r| !r.slug.is_empty())
            .map(|r| r.slug.clone())
            .collect()
    }

    pub fn insert_newest(&mut self, record: PostRecord) {
        self.records.insert(0, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The JSON file holding the index
pub struct PostIndexStore {
    pub path: PathBuf,
}

impl PostIndexStore {
    pub fn new(path: &Path) -> Self {
        PostIndexStore {
            path: path.to_path_buf(),
        }
    }

    fn corrupt(&self, reason: impl Into<String>) -> IndexError {
        IndexError::Corrupt {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    pub fn parse(&self, content: &str) -> Result<PostIndex, IndexError> {
        let root: Value = serde_json::from_str(content)
            .map_err(|e| self.corrupt(format!("invalid JSON: {}", e)))?;

        let Value::Array(entries) = root else {
            return Err(self.corrupt("root is not an array"));
        };

        let mut records = Vec::with_capacity(entries.len());
        for (pos, entry) in entries.into_iter().enumerate() {
            if !entry.is_object() {
                return Err(self.corrupt(format!("entry {} is not an object", pos)));
            }
            let record: PostRecord = serde_json::from_value(entry)
                .map_err(|e| self.corrupt(format!("entry {}: {}", pos, e)))?;
            records.push(record);
        }

        Ok(PostIndex::new(records))
    }

    pub fn load(&self) -> Result<PostIndex, IndexError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(IndexError::Missing(self.path.clone())),
            Err(e) => return Err(IndexError::Io(self.path.clone(), e)),
        };

        self.parse(&content)
    }

    pub fn to_json(index: &PostIndex) -> Result<String, IndexError> {
        let mut json = serde_json::to_string_pretty(&index.records)?;
        json.push('\n');
        Ok(json)
    }

    /// Replaces the whole file. The content is written next to it first and renamed over it
    pub fn save(&self, index: &PostIndex) -> Result<(), IndexError> {
        let json = Self::to_json(index)?;

        let mut tmp_name = OsString::from(".");
        tmp_name.push(self.path.file_name().unwrap_or_default());
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, json.as_bytes()).map_err(|e| IndexError::Io(tmp_path.clone(), e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| IndexError::Io(self.path.clone(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, slug: &str) -> PostRecord {
        PostRecord {
            id,
            title: format!("Title {}", id),
            slug: slug.to_string(),
            date: "December 1, 2025".to_string(),
            category: "Science".to_string(),
            author: "Yi Qu".to_string(),
            summary: "Summary".to_string(),
            reading_time: "1 min read".to_string(),
            content_url: content_url("/posts", slug),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_record_json_names() {
        let json = record(4, "hello-world").to_pretty_json().unwrap();
        assert_eq!(json, r#"{
  "id": 4,
  "title": "Title 4",
  "slug": "hello-world",
  "date": "December 1, 2025",
  "category": "Science",
  "author": "Yi Qu",
  "summary": "Summary",
  "readingTime": "1 min read",
  "contentUrl": "/posts/hello-world.html"
}"#);
    }

    #[test]
    fn test_next_id_and_slugs() {
        let index = PostIndex::new(vec![record(3, "x"), record(7, "y"), record(1, "z")]);
        assert_eq!(index.next_id(), 8);
        assert_eq!(index.slugs().len(), 3);
        assert!(index.slugs().contains("y"));
        assert_eq!(PostIndex::default().next_id(), 1);
    }

    #[test]
    fn test_insert_newest() {
        let mut index = PostIndex::new(vec![record(3, "x")]);
        index.insert_newest(record(4, "hello-world"));
        assert_eq!(index.len(), 2);
        assert_eq!(index.records[0].slug, "hello-world");
        assert_eq!(index.records[1].slug, "x");
    }

    #[test]
    fn test_parse_not_array() {
        let store = PostIndexStore::new(Path::new("posts.json"));
        let err = store.parse(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, IndexError::Corrupt { .. }));
        assert!(err.to_string().contains("root is not an array"));

        let err = store.parse("not json").unwrap_err();
        assert!(matches!(err, IndexError::Corrupt { .. }));

        let err = store.parse("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("entry 0 is not an object"));

        let err = store.parse(r#"[{"id": "three"}]"#).unwrap_err();
        assert!(matches!(err, IndexError::Corrupt { .. }));
    }

    #[test]
    fn test_legacy_entries_round_trip() {
        let content = r#"[
  {
    "id": 2,
    "title": "Old",
    "slug": "old",
    "date": "November 25, 2025",
    "category": "Labs",
    "name": "Yi Qu",
    "summary": "s",
    "readingTime": "3 min read",
    "contentUrl": "/posts/old.html"
  },
  {
    "id": 1,
    "title": "Older",
    "slug": "older",
    "date": "2025-01-02",
    "category": "Labs",
    "contentUrl": "/posts/older.html",
    "excerpt": "An excerpt"
  }
]
"#;
        let store = PostIndexStore::new(Path::new("posts.json"));
        let index = store.parse(content).unwrap();
        assert_eq!(index.records[0].author, "");
        assert_eq!(index.records[0].extra.get("name"), Some(&Value::from("Yi Qu")));
        assert_eq!(index.records[1].extra.get("excerpt"), Some(&Value::from("An excerpt")));
        assert_eq!(index.next_id(), 3);

        let json = PostIndexStore::to_json(&index).unwrap();
        let reparsed: Value = serde_json::from_str(&json).unwrap();
        let original: Value = serde_json::from_str(content).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = PostIndexStore::new(&dir.path().join("posts.json"));
        assert!(matches!(store.load().unwrap_err(), IndexError::Missing(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        let store = PostIndexStore::new(&path);

        let mut index = PostIndex::new(vec![record(1, "first")]);
        index.insert_newest(record(2, "Über ñ"));
        store.save(&index).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("}\n]\n"));
        assert!(content.contains("\"slug\": \"Über ñ\""));
        assert!(content.starts_with("[\n  {\n    \"id\": 2,"));
        assert!(!dir.path().join(".posts.json.tmp").exists());

        assert_eq!(store.load().unwrap(), index);
    }
}
