use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use spdlog::{info, warn};
use thiserror::Error;

use crate::config::{Config, RepoPaths, TemplateAnchors};
use crate::html::template_renderer::{select_template, PostView, TemplateRenderer};
use crate::html::TemplateError;
use crate::issue::field_parser::parse_issue_body;
use crate::issue::{IssueFields, MissingFieldError};
use crate::post_index::{content_url, IndexError, PostIndex, PostIndexStore, PostRecord};
use crate::post_list::PostList;
use crate::slug::{allocate_unique, derive_slug};
use crate::text_utils::{estimate_reading_time, format_publish_date};
use crate::tracker::{IssueTracker, TrackerError};
use crate::vcs::{commit_message, VcsError, VersionControl};
use crate::view::comment_renderer::CommentRenderer;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    MissingFields(#[from] MissingFieldError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("Error writing {0}: {1}")]
    Write(PathBuf, #[source] io::Error),

    #[error("Error staging post files: {0}")]
    Stage(#[source] VcsError),

    #[error("Commit failed: {0}")]
    CommitFailed(#[source] VcsError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error("Error rendering issue comment: {0}")]
    Comment(#[source] io::Error),
}

/// The issue asking for a post
#[derive(Debug, Clone)]
pub struct IssueInput {
    pub number: u64,
    pub body: String,
    /// Issue title, used when the body has no title section
    pub title: Option<String>,
}

/// Everything a run needs besides the issue itself
#[derive(Debug, Clone)]
pub struct PublishSettings {
    pub paths: RepoPaths,
    pub site_name: String,
    pub author: String,
    pub link_color: String,
    pub content_url_prefix: String,
    pub anchors: TemplateAnchors,
    pub today: NaiveDate,
}

impl PublishSettings {
    pub fn from_config(config: &Config, root: &Path, today: NaiveDate) -> Self {
        PublishSettings {
            paths: config.repo_paths(root),
            site_name: config.site.name.clone(),
            author: config.site.author_name(),
            link_color: config.site.link_color.clone(),
            content_url_prefix: config.site.content_url_prefix.clone(),
            anchors: config.template.clone(),
            today,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    Published { record: PostRecord, document: PathBuf },
    /// The files matched what was already committed
    NothingToCommit { slug: String },
}

/// A post that passed every check, ready to be written
struct PreparedPost {
    record: PostRecord,
    document: PathBuf,
    html: String,
    index: PostIndex,
}

pub struct Publisher<V: VersionControl, T: IssueTracker> {
    pub settings: PublishSettings,
    pub vcs: V,
    pub tracker: T,
    comments: CommentRenderer<'static>,
}

impl<V: VersionControl, T: IssueTracker> Publisher<V, T> {
    pub fn new(settings: PublishSettings, vcs: V, tracker: T) -> io::Result<Self> {
        Ok(Publisher {
            settings,
            vcs,
            tracker,
            comments: CommentRenderer::new()?,
        })
    }

    fn index_store(&self) -> PostIndexStore {
        PostIndexStore::new(&self.settings.paths.index_file)
    }

    /// Repository relative path, as shown to the issue author
    fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.settings.paths.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    pub fn publish(&self, issue: &IssueInput) -> Result<PublishOutcome, PublishError> {
        let prepared = self.prepare(issue)?;
        self.persist(&prepared)?;
        self.commit_and_notify(issue.number, prepared)
    }

    /// Every check that can fail before something is written
    fn prepare(&self, issue: &IssueInput) -> Result<PreparedPost, PublishError> {
        let settings = &self.settings;
        let fields: IssueFields = parse_issue_body(&issue.body, issue.title.as_deref())?;
        info!("Parsed issue #{}: {}", issue.number, fields.title);

        let store = self.index_store();
        let index = store.load()?;
        let content_ids = PostList::new(&settings.paths.posts_dir).content_ids()
            .map_err(|e| IndexError::Io(settings.paths.posts_dir.clone(), e))?;

        let slug = allocate_unique(&derive_slug(&fields.title), &index.slugs(), &content_ids);
        let date = format_publish_date(&settings.today);
        let reading_time = estimate_reading_time(&fields.body);

        let (_, template) = select_template(
            &settings.paths.posts_dir,
            settings.paths.template.as_deref(),
            &settings.anchors.end_marker,
        )?;
        let renderer = TemplateRenderer::new(&settings.site_name, &settings.author, &settings.link_color, &settings.anchors);
        let rendered = renderer.render(&template, &PostView {
            title: &fields.title,
            category: &fields.category,
            date: &date,
            body: &fields.body,
        })?;

        let record = PostRecord {
            id: index.next_id(),
            title: fields.title,
            slug: slug.clone(),
            date,
            category: fields.category,
            author: settings.author.clone(),
            summary: fields.summary,
            reading_time,
            content_url: content_url(&settings.content_url_prefix, &slug),
            ..Default::default()
        };

        Ok(PreparedPost {
            record,
            document: PostList::new(&settings.paths.posts_dir).document_path(&slug),
            html: rendered.html,
            index,
        })
    }

    fn persist(&self, prepared: &PreparedPost) -> Result<(), PublishError> {
        fs::create_dir_all(&self.settings.paths.posts_dir)
            .and_then(|_| fs::write(&prepared.document, &prepared.html))
            .map_err(|e| PublishError::Write(prepared.document.clone(), e))?;
        info!("Created {}", prepared.document.display());

        let mut index = prepared.index.clone();
        index.insert_newest(prepared.record.clone());
        self.index_store().save(&index)?;
        info!("Updated {} with id {}", self.settings.paths.index_file.display(), prepared.record.id);
        Ok(())
    }

    fn commit_and_notify(&self, issue_number: u64, prepared: PreparedPost) -> Result<PublishOutcome, PublishError> {
        let PreparedPost { record, document, .. } = prepared;
        let index_file = self.settings.paths.index_file.as_path();

        self.vcs.stage(&[document.as_path(), index_file])
            .map_err(PublishError::Stage)?;

        let staged = match self.vcs.has_staged_changes() {
            Ok(staged) => staged,
            Err(e) => {
                warn!("Could not check staged changes, committing anyway: {}", e);
                true
            }
        };

        if !staged {
            warn!("Nothing staged for {}", record.slug);
            self.tracker.comment_and_close(issue_number, &self.comments.no_changes(&record.slug))?;
            return Ok(PublishOutcome::NothingToCommit { slug: record.slug });
        }

        if let Err(e) = self.vcs.commit(&commit_message(&record.title)) {
            let comment = self.comments.commit_failed(&e.to_string());
            if let Err(notify_err) = self.tracker.comment(issue_number, &comment) {
                warn!("Could not report the failed commit on issue #{}: {}", issue_number, notify_err);
            }
            if let Err(close_err) = self.tracker.close(issue_number) {
                warn!("Could not close issue #{}: {}", issue_number, close_err);
            }
            return Err(PublishError::CommitFailed(e));
        }
        info!("Committed {}", record.slug);

        let comment = self.comments.published(&record, &self.display_path(&document))
            .map_err(PublishError::Comment)?;
        self.tracker.comment_and_close(issue_number, &comment)?;

        Ok(PublishOutcome::Published { record, document })
    }
}
