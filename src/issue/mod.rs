use std::fmt;
use std::fmt::{Display, Formatter};

use thiserror::Error;

pub mod field_parser;

/// The four sections a publishing issue must contain
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Field {
    Title,
    Category,
    Summary,
    Body,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Category, Field::Summary, Field::Body];

    /// Name used in messages back to the issue author
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Field::Title => "Post title",
            Field::Category => "Category",
            Field::Summary => "Summary",
            Field::Body => "Body HTML",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssueFields {
    pub title: String,
    pub category: String,
    pub summary: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Missing required fields: {}.\n\n\
Fix: open the Issue and make sure it contains these sections:\n\
Post title, Category, Summary, Body HTML.\n\
If you used an Issue Form, the '### Field' sections must exist.", missing_names(.missing))]
pub struct MissingFieldError {
    pub missing: Vec<Field>,
}

fn missing_names(missing: &[Field]) -> String {
    missing.iter()
        .map(|f| f.canonical_name())
        .collect::<Vec<_>>()
        .join(", ")
}
