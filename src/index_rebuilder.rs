use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use spdlog::{info, warn};

use crate::config::TemplateAnchors;
use crate::html::metadata::extract_metadata;
use crate::post_index::{content_url, IndexError, PostIndex, PostIndexStore, PostRecord};
use crate::post_list::PostList;
use crate::text_utils::{estimate_reading_time, parse_publish_date};

/// Rebuilds the post index from the documents themselves
pub struct IndexRebuilder<'a> {
    pub anchors: &'a TemplateAnchors,
    /// Byline used when a document names no author
    pub author: &'a str,
    pub url_prefix: &'a str,
}

/// Newest first, undated documents last, ties broken by slug
fn newest_first(a: &PostRecord, b: &PostRecord) -> Ordering {
    let date_a = parse_publish_date(&a.date);
    let date_b = parse_publish_date(&b.date);
    let by_date = match (date_a, date_b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date.then_with(|| a.slug.cmp(&b.slug))
}

impl IndexRebuilder<'_> {
    pub fn record_for(&self, slug: &str, html: &str) -> PostRecord {
        let meta = extract_metadata(html, self.anchors);
        PostRecord {
            id: 0,
            title: meta.title,
            slug: slug.to_string(),
            date: meta.date.unwrap_or_default(),
            category: meta.category,
            author: meta.author.unwrap_or_else(|| self.author.to_string()),
            summary: meta.excerpt,
            reading_time: estimate_reading_time(&meta.body_html),
            content_url: content_url(self.url_prefix, slug),
            ..Default::default()
        }
    }

    pub fn build(&self, posts_dir: &Path) -> Result<PostIndex, IndexError> {
        let files = PostList::new(posts_dir).retrieve_files()
            .map_err(|e| IndexError::Io(posts_dir.to_path_buf(), e))?;

        let mut records = Vec::with_capacity(files.len());
        for file in files {
            let Some(slug) = file.file_stem().and_then(|s| s.to_str()) else {
                warn!("Skipping document with a non UTF-8 name: {}", file.display());
                continue;
            };
            let html = fs::read_to_string(&file)
                .map_err(|e| IndexError::Io(file.clone(), e))?;
            let record = self.record_for(slug, &html);
            if record.date.is_empty() {
                warn!("No publish date found in {}", file.display());
            }
            records.push(record);
        }

        records.sort_by(newest_first);
        let total = records.len() as u64;
        for (pos, record) in records.iter_mut().enumerate() {
            record.id = total - pos as u64;
        }

        Ok(PostIndex::new(records))
    }

    pub fn rebuild(&self, posts_dir: &Path, store: &PostIndexStore) -> Result<PostIndex, IndexError> {
        let index = self.build(posts_dir)?;
        store.save(&index)?;
        info!("Rebuilt {} with {} posts", store.path.display(), index.len());
        Ok(index)
    }
}
