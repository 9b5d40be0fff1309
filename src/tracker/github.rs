use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Method;
use serde_json::{json, Value};
use spdlog::{debug, info};

use crate::tracker::{IssueTracker, TrackerError};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Issue comments and state changes through the GitHub REST API
pub struct GitHubClient {
    api_url: String,
    repo: String,
    token: String,
    user_agent: String,
    client: Client,
}

impl GitHubClient {
    /// `repo` is `owner/name`
    pub fn new(api_url: &str, repo: &str, token: &str, user_agent: &str) -> Result<Self, TrackerError> {
        let client = Client::builder().build()?;
        Ok(GitHubClient {
            api_url: api_url.trim_end_matches('/').to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
            user_agent: user_agent.to_string(),
            client,
        })
    }

    fn issue_url(&self, issue_number: u64) -> String {
        format!("{}/repos/{}/issues/{}", self.api_url, self.repo, issue_number)
    }

    fn request(&self, method: Method, url: &str, payload: &Value) -> Result<(), TrackerError> {
        debug!("GitHub API {} {}", method, url);
        let response = self.client.request(method, url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, &self.user_agent)
            .json(payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TrackerError::RemoteApi {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

impl IssueTracker for GitHubClient {
    fn comment(&self, issue_number: u64, body: &str) -> Result<(), TrackerError> {
        let url = format!("{}/comments", self.issue_url(issue_number));
        self.request(Method::POST, &url, &json!({ "body": body }))?;
        info!("Commented on issue #{}", issue_number);
        Ok(())
    }

    fn close(&self, issue_number: u64) -> Result<(), TrackerError> {
        let url = self.issue_url(issue_number);
        self.request(Method::PATCH, &url, &json!({ "state": "closed" }))?;
        info!("Closed issue #{}", issue_number);
        Ok(())
    }
}
