use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use spdlog::{info, warn};

use issue_press::config::open_config;
use issue_press::logger::configure_logger;

use crate::maintenance::{bump_asset_cmd, convert_cmd, rebuild_index_cmd};
use crate::publish::publish_cmd;

mod maintenance;
mod publish;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path. Searched next to the executable, in the current and the user config directory otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Root of the blog repository
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Publishes the post described by a GitHub issue
    Publish(PublishArgs),
    /// Regenerates the post index from the published documents
    RebuildIndex,
    /// Creates a post document from a plain text article
    Convert(ConvertArgs),
    /// Stamps a version on a script referenced by every post
    BumpAsset(BumpAssetArgs),
}

#[derive(Parser, Debug)]
struct PublishArgs {
    /// Issue body holding the post fields
    #[arg(long, env = "ISSUE_BODY")]
    issue_body: String,

    #[arg(long, env = "ISSUE_NUMBER")]
    issue_number: u64,

    /// Issue title, used when the body has no title
    #[arg(long, env = "ISSUE_TITLE")]
    issue_title: Option<String>,

    /// Repository as owner/name
    #[arg(long, env = "REPO")]
    repo: String,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Text file: category, title and date lines followed by the content
    input: PathBuf,
}

#[derive(Parser, Debug)]
struct BumpAssetArgs {
    /// Script file name as referenced by the posts
    #[arg(short, long, default_value = issue_press::asset_version::DEFAULT_SCRIPT)]
    script: String,

    /// New version number
    #[arg(short = 'n', long = "version")]
    number: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_path) = match open_config(args.config.as_deref()) {
        Ok(res) => res,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run issue-press --help");
            return Err(err.into());
        }
    };

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    match config_path {
        Some(path) => info!("Using configuration {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }

    match args.command {
        Command::Publish(cmd) => publish_cmd(&config, &args.root, cmd),
        Command::RebuildIndex => rebuild_index_cmd(&config, &args.root),
        Command::Convert(cmd) => convert_cmd(&config, &args.root, cmd),
        Command::BumpAsset(cmd) => bump_asset_cmd(&config, &args.root, cmd),
    }
}
