use std::io;
use std::path::PathBuf;

use lol_html::errors::RewritingError;
use thiserror::Error;

use crate::html::template_renderer::Anchor;

pub mod link_styler;
pub mod template_renderer;
pub mod metadata;
pub mod text_converter;

/// The scaffold document can't take a new post
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template structure not found: missing {0}")]
    MissingAnchor(Anchor),

    #[error("Template structure not found: <!-- {0} --> must directly follow the article body container")]
    MisplacedMarker(String),

    #[error("Invalid article body class `{0}`")]
    InvalidBodyClass(String),

    #[error("No template found in {0}. Add at least one existing post HTML file")]
    NoTemplate(PathBuf),

    #[error("Error rewriting HTML: {0}")]
    Rewrite(#[from] RewritingError),

    #[error("Error reading template: {0}")]
    Io(#[from] io::Error),
}
