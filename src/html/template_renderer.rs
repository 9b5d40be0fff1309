use std::cell::RefCell;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use lazy_static::lazy_static;
use lol_html::html_content::{ContentType, EndTag};
use lol_html::{doc_comments, doc_text, element, rewrite_str, EndTagHandler, HandlerResult, RewriteStrSettings};
use regex::Regex;
use spdlog::{info, warn};

use crate::config::TemplateAnchors;
use crate::html::link_styler::style_links;
use crate::html::TemplateError;
use crate::post_list::PostList;

lazy_static! {
    static ref CLASS_NAME: Regex = Regex::new(r"^-?[A-Za-z_][A-Za-z0-9_-]*$").unwrap();
}

/// Places of the scaffold document that receive new content
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Anchor {
    DocumentTitle,
    Heading,
    Label,
    DateLine,
    BodyContainer,
    EndMarker,
}

impl Display for Anchor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Anchor::DocumentTitle => "<title> element",
            Anchor::Heading => "<h1> after the page header",
            Anchor::Label => "<span> after the page header",
            Anchor::DateLine => "<p> after the heading",
            Anchor::BodyContainer => "article body container",
            Anchor::EndMarker => "end of body marker",
        };
        write!(f, "{}", name)
    }
}

/// Fields going into the new document
pub struct PostView<'a> {
    pub title: &'a str,
    pub category: &'a str,
    pub date: &'a str,
    pub body: &'a str,
}

#[derive(Debug)]
pub struct RenderedDocument {
    pub html: String,
    /// Optional anchors the scaffold did not have, left untouched
    pub skipped: Vec<Anchor>,
}

/// Walk state shared by the rewriter handlers
#[derive(Default)]
struct Cursor {
    title_done: bool,
    header_seen: bool,
    inside_header: bool,
    heading_done: bool,
    label_done: bool,
    date_done: bool,
    body_found: bool,
    inside_body: bool,
    body_closed: bool,
    // Only whitespace met since the container closed
    adjacent_to_body: bool,
    marker_found: bool,
    marker_out_of_place: bool,
}

impl Cursor {
    /// Outside the page header, before the body container ends
    fn in_article_header(&self) -> bool {
        !self.inside_header && !self.inside_body && !self.body_closed
    }

    fn awaiting_marker(&self) -> bool {
        self.body_closed && !self.marker_found
    }

    fn skipped(&self) -> Vec<Anchor> {
        [
            (self.title_done, Anchor::DocumentTitle),
            (self.heading_done, Anchor::Heading),
            (self.label_done, Anchor::Label),
            (self.date_done, Anchor::DateLine),
        ].into_iter()
            .filter(|(done, _)| !done)
            .map(|(_, anchor)| anchor)
            .collect()
    }
}

fn on_end_tag(cursor: Rc<RefCell<Cursor>>, update: fn(&mut Cursor)) -> EndTagHandler<'static> {
    Box::new(move |_end: &mut EndTag<'_>| -> HandlerResult {
        update(&mut cursor.borrow_mut());
        Ok(())
    })
}

pub struct TemplateRenderer {
    pub site_name: String,
    pub author: String,
    pub link_color: String,
    pub anchors: TemplateAnchors,
}

impl TemplateRenderer {
    pub fn new(site_name: &str, author: &str, link_color: &str, anchors: &TemplateAnchors) -> Self {
        TemplateRenderer {
            site_name: site_name.to_string(),
            author: author.to_string(),
            link_color: link_color.to_string(),
            anchors: anchors.clone(),
        }
    }

    fn is_marker(&self, comment: &str) -> bool {
        comment.trim().eq_ignore_ascii_case(self.anchors.end_marker.trim())
    }

    /// Builds a new post document out of `template`, a previously published post
    pub fn render(&self, template: &str, post: &PostView) -> Result<RenderedDocument, TemplateError> {
        if !CLASS_NAME.is_match(&self.anchors.body_class) {
            return Err(TemplateError::InvalidBodyClass(self.anchors.body_class.clone()));
        }

        let body = style_links(post.body, &self.link_color)?;
        let body = format!("\n{}\n\n", body);
        let doc_title = format!("{} - {}", post.title, self.site_name);
        let by_line = format!("{} • By {}", post.date, self.author);
        let body_selector = format!("div.{}", self.anchors.body_class);

        let cursor = Rc::new(RefCell::new(Cursor::default()));

        let html = {
            let c_any = cursor.clone();
            let c_title = cursor.clone();
            let c_header = cursor.clone();
            let c_heading = cursor.clone();
            let c_label = cursor.clone();
            let c_date = cursor.clone();
            let c_body = cursor.clone();
            let c_text = cursor.clone();
            let c_comment = cursor.clone();

            rewrite_str(
                template,
                RewriteStrSettings {
                    element_content_handlers: vec![
                        element!("*", move |_el| {
                            let mut cur = c_any.borrow_mut();
                            if cur.awaiting_marker() {
                                cur.adjacent_to_body = false;
                            }
                            Ok(())
                        }),
                        element!("title", move |el| {
                            let mut cur = c_title.borrow_mut();
                            if !cur.title_done {
                                el.set_inner_content(&doc_title, ContentType::Html);
                                cur.title_done = true;
                            }
                            Ok(())
                        }),
                        element!("header", move |el| {
                            let mut cur = c_header.borrow_mut();
                            if cur.header_seen {
                                return Ok(());
                            }
                            cur.header_seen = true;
                            if let Some(handlers) = el.end_tag_handlers() {
                                cur.inside_header = true;
                                handlers.push(on_end_tag(c_header.clone(), |cur| cur.inside_header = false));
                            }
                            Ok(())
                        }),
                        element!("h1", move |el| {
                            let mut cur = c_heading.borrow_mut();
                            if cur.in_article_header() && !cur.heading_done {
                                el.set_inner_content(post.title, ContentType::Html);
                                cur.heading_done = true;
                            }
                            Ok(())
                        }),
                        element!("span", move |el| {
                            let mut cur = c_label.borrow_mut();
                            if cur.in_article_header() && !cur.label_done {
                                el.set_inner_content(post.category, ContentType::Html);
                                cur.label_done = true;
                            }
                            Ok(())
                        }),
                        element!("p", move |el| {
                            let mut cur = c_date.borrow_mut();
                            if cur.in_article_header() && cur.heading_done && !cur.date_done {
                                el.set_inner_content(&by_line, ContentType::Html);
                                cur.date_done = true;
                            }
                            Ok(())
                        }),
                        element!(body_selector.as_str(), move |el| {
                            let mut cur = c_body.borrow_mut();
                            if cur.body_found {
                                return Ok(());
                            }
                            cur.body_found = true;
                            el.set_inner_content(&body, ContentType::Html);
                            match el.end_tag_handlers() {
                                Some(handlers) => {
                                    cur.inside_body = true;
                                    handlers.push(on_end_tag(c_body.clone(), |cur| {
                                        cur.inside_body = false;
                                        cur.body_closed = true;
                                        cur.adjacent_to_body = true;
                                    }));
                                }
                                None => {
                                    cur.body_closed = true;
                                    cur.adjacent_to_body = true;
                                }
                            }
                            Ok(())
                        }),
                    ],
                    document_content_handlers: vec![
                        doc_text!(move |text| {
                            let mut cur = c_text.borrow_mut();
                            if cur.awaiting_marker() && !text.as_str().trim().is_empty() {
                                cur.adjacent_to_body = false;
                            }
                            Ok(())
                        }),
                        doc_comments!(move |comment| {
                            let mut cur = c_comment.borrow_mut();
                            if cur.inside_body || cur.marker_found || !self.is_marker(&comment.text()) {
                                return Ok(());
                            }
                            if cur.awaiting_marker() && cur.adjacent_to_body {
                                cur.marker_found = true;
                            } else {
                                cur.marker_out_of_place = true;
                            }
                            Ok(())
                        }),
                    ],
                    ..RewriteStrSettings::new()
                },
            )?
        };

        let cur = cursor.borrow();
        if !cur.body_found {
            return Err(TemplateError::MissingAnchor(Anchor::BodyContainer));
        }
        if !cur.marker_found {
            return Err(if cur.marker_out_of_place {
                TemplateError::MisplacedMarker(self.anchors.end_marker.clone())
            } else {
                TemplateError::MissingAnchor(Anchor::EndMarker)
            });
        }

        let skipped = cur.skipped();
        for anchor in skipped.iter() {
            warn!("Template has no {}, left as is", anchor);
        }

        Ok(RenderedDocument {
            html,
            skipped,
        })
    }
}

fn has_marker(html: &str, marker: &str) -> bool {
    let patt = format!(r"(?i)<!--\s*{}\s*-->", regex::escape(marker.trim()));
    match Regex::new(&patt) {
        Ok(re) => re.is_match(html),
        Err(_) => false,
    }
}

/// The configured template, or the first published document carrying the end marker,
/// or else the first published document
pub fn select_template(posts_dir: &Path, explicit: Option<&Path>, marker: &str) -> Result<(PathBuf, String), TemplateError> {
    if let Some(path) = explicit {
        let content = fs::read_to_string(path)?;
        return Ok((path.to_path_buf(), content));
    }

    let files = PostList::new(posts_dir).retrieve_files()?;
    let mut first: Option<(PathBuf, String)> = None;
    for path in files {
        let content = fs::read_to_string(&path)?;
        if has_marker(&content, marker) {
            info!("Using template {}", path.display());
            return Ok((path, content));
        }
        if first.is_none() {
            first = Some((path, content));
        }
    }

    match first {
        Some((path, content)) => {
            warn!("No template carries the end marker, trying {}", path.display());
            Ok((path, content))
        }
        None => Err(TemplateError::NoTemplate(posts_dir.to_path_buf())),
    }
}
