use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::{fs, io};

pub const DOCUMENT_EXT: &str = "html";

/// Published documents living in the posts directory
pub struct PostList {
    pub root_dir: PathBuf,
}

impl PostList {
    pub fn new(root_dir: &Path) -> Self {
        PostList {
            root_dir: root_dir.to_path_buf(),
        }
    }

    /// Document files sorted by name. A missing directory has no documents
    pub fn retrieve_files(&self) -> io::Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(self.root_dir.as_path()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e),
        };

        let mut posts = vec![];
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(DOCUMENT_EXT) {
                posts.push(path);
            }
        }
        posts.sort();
        Ok(posts)
    }

    /// File stems of the documents, the identifiers a new slug must not reuse
    pub fn content_ids(&self) -> io::Result<HashSet<String>> {
        let ids = self.retrieve_files()?
            .iter()
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(|s| s.to_string()))
            .collect();
        Ok(ids)
    }

    pub fn document_path(&self, slug: &str) -> PathBuf {
        self.root_dir.join(format!("{}.{}", slug, DOCUMENT_EXT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieve_files() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("b-post.html"), "<html></html>")?;
        fs::write(dir.path().join("a-post.html"), "<html></html>")?;
        fs::write(dir.path().join("posts.json"), "[]")?;
        fs::write(dir.path().join("notes.htm.bak"), "")?;
        fs::create_dir(dir.path().join("dir.html"))?;

        let post_list = PostList::new(dir.path());
        let files = post_list.retrieve_files()?;
        assert_eq!(files, vec![dir.path().join("a-post.html"), dir.path().join("b-post.html")]);

        let ids = post_list.content_ids()?;
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("a-post"));
        assert!(ids.contains("b-post"));
        Ok(())
    }

    #[test]
    fn test_missing_dir() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let post_list = PostList::new(&dir.path().join("nope"));
        assert!(post_list.retrieve_files()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_document_path() {
        let post_list = PostList::new(Path::new("/repo/posts"));
        assert_eq!(post_list.document_path("hello"), PathBuf::from("/repo/posts/hello.html"));
    }
}
