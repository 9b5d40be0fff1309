use thiserror::Error;

pub mod github;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("GitHub API HTTP error {status}: {body}")]
    RemoteApi { status: u16, body: String },

    #[error("GitHub API connection error: {0}")]
    Connection(#[from] reqwest::Error),
}

/// Where the publishing issue lives
pub trait IssueTracker {
    fn comment(&self, issue_number: u64, body: &str) -> Result<(), TrackerError>;

    fn close(&self, issue_number: u64) -> Result<(), TrackerError>;

    fn comment_and_close(&self, issue_number: u64, body: &str) -> Result<(), TrackerError> {
        self.comment(issue_number, body)?;
        self.close(issue_number)
    }
}
