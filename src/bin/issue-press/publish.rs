use std::path::Path;

use anyhow::Result;
use chrono::Local;
use spdlog::{info, warn};

use issue_press::config::Config;
use issue_press::pipeline::{IssueInput, PublishOutcome, PublishSettings, Publisher};
use issue_press::tracker::github::GitHubClient;
use issue_press::vcs::GitCli;

use crate::PublishArgs;

pub fn publish_cmd(config: &Config, root: &Path, args: PublishArgs) -> Result<()> {
    let settings = PublishSettings::from_config(config, root, Local::now().date_naive());
    let tracker = GitHubClient::new(&config.github.api_url, &args.repo, &args.token, &config.github.user_agent)?;
    let publisher = Publisher::new(settings, GitCli::new(root), tracker)?;

    let issue = IssueInput {
        number: args.issue_number,
        body: args.issue_body,
        title: args.issue_title,
    };

    match publisher.publish(&issue)? {
        PublishOutcome::Published { record, document } => {
            info!("Published {} as {} (id {})", record.title, document.display(), record.id);
        }
        PublishOutcome::NothingToCommit { slug } => {
            warn!("No changes to commit for {}. Post may already exist", slug);
        }
    }

    Ok(())
}
