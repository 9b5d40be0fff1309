use std::fs;
use std::path::Path;

use regex::{Captures, Regex};
use spdlog::{debug, info};

use crate::post_list::PostList;

pub const DEFAULT_SCRIPT: &str = "engage.js";

/// Stamps a cache busting `?v=N` on every reference to one script
pub struct AssetVersioner {
    script: String,
    version: u32,
    reference: Regex,
}

impl AssetVersioner {
    pub fn new(script: &str, version: u32) -> Result<Self, regex::Error> {
        // The name must be a whole path segment, ended by a quote, a fragment or the tag
        let reference = Regex::new(&format!(
            r#"(?P<before>["'/=])(?:{})(?:\?v=[0-9]*)?(?P<after>["'#>\s]|$)"#,
            regex::escape(script)
        ))?;
        Ok(AssetVersioner {
            script: script.to_string(),
            version,
            reference,
        })
    }

    /// `None` when the document already carries the version or never references the script
    pub fn apply(&self, html: &str) -> Option<String> {
        let updated = self.reference.replace_all(html, |cap: &Captures| {
            format!("{}{}?v={}{}", &cap["before"], self.script, self.version, &cap["after"])
        });
        if updated == html {
            None
        } else {
            Some(updated.into_owned())
        }
    }

    /// Number of documents rewritten
    pub fn update_dir(&self, posts_dir: &Path) -> std::io::Result<usize> {
        let mut count = 0;
        for file in PostList::new(posts_dir).retrieve_files()? {
            let html = fs::read_to_string(&file)?;
            match self.apply(&html) {
                Some(updated) => {
                    fs::write(&file, updated)?;
                    debug!("Stamped {} in {}", self.script, file.display());
                    count += 1;
                }
                None => continue,
            }
        }
        info!("Updated {} files to {}?v={}", count, self.script, self.version);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        let versioner = AssetVersioner::new(DEFAULT_SCRIPT, 3).unwrap();
        assert_eq!(
            versioner.apply(r#"<script src="../assets/js/engage.js"></script>"#).unwrap(),
            r#"<script src="../assets/js/engage.js?v=3"></script>"#
        );
        assert_eq!(
            versioner.apply(r#"<script src="../assets/js/engage.js?v=2"></script>"#).unwrap(),
            r#"<script src="../assets/js/engage.js?v=3"></script>"#
        );
        assert_eq!(versioner.apply(r#"<script src="engage.js?v=3"></script>"#), None);
        assert_eq!(versioner.apply(r#"<script src="main.js"></script>"#), None);
    }

    #[test]
    fn test_dot_is_literal() {
        let versioner = AssetVersioner::new("engage.js", 1).unwrap();
        assert_eq!(versioner.apply("engagexjs"), None);
    }

    #[test]
    fn test_only_whole_script_name() {
        let versioner = AssetVersioner::new(DEFAULT_SCRIPT, 3).unwrap();
        let html = r#"<link href="../data/engage.json"><script src="../js/preengage.js"></script>"#;
        assert_eq!(versioner.apply(html), None);

        let html = r#"<script src="engage.js#x"></script><script src='/js/engage.js?v=1'></script>"#;
        assert_eq!(
            versioner.apply(html).unwrap(),
            r#"<script src="engage.js?v=3#x"></script><script src='/js/engage.js?v=3'></script>"#
        );
    }

    #[test]
    fn test_update_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.html"), r#"<script src="engage.js?v=2"></script>"#).unwrap();
        fs::write(dir.path().join("b.html"), r#"<script src="engage.js?v=5"></script>"#).unwrap();
        fs::write(dir.path().join("c.html"), "<p>no scripts</p>").unwrap();
        fs::write(dir.path().join("d.txt"), r#"engage.js?v=2"#).unwrap();

        let versioner = AssetVersioner::new(DEFAULT_SCRIPT, 5).unwrap();
        assert_eq!(versioner.update_dir(dir.path()).unwrap(), 1);
        assert_eq!(fs::read_to_string(dir.path().join("a.html")).unwrap(), r#"<script src="engage.js?v=5"></script>"#);
        assert_eq!(fs::read_to_string(dir.path().join("d.txt")).unwrap(), "engage.js?v=2");

        assert_eq!(versioner.update_dir(dir.path()).unwrap(), 0);
    }
}
