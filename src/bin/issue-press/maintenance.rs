use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use issue_press::asset_version::AssetVersioner;
use issue_press::config::Config;
use issue_press::html::text_converter::convert_file;
use issue_press::index_rebuilder::IndexRebuilder;
use issue_press::post_index::PostIndexStore;
use issue_press::view::document_renderer::DocumentRenderer;

use crate::{BumpAssetArgs, ConvertArgs};

pub fn rebuild_index_cmd(config: &Config, root: &Path) -> Result<()> {
    let paths = config.repo_paths(root);
    let author = config.site.author_name();
    let rebuilder = IndexRebuilder {
        anchors: &config.template,
        author: &author,
        url_prefix: &config.site.content_url_prefix,
    };

    let index = rebuilder.rebuild(&paths.posts_dir, &PostIndexStore::new(&paths.index_file))?;
    println!("Generated {} with {} posts", paths.index_file.display(), index.len());
    Ok(())
}

pub fn convert_cmd(config: &Config, root: &Path, args: ConvertArgs) -> Result<()> {
    let paths = config.repo_paths(root);
    let renderer = DocumentRenderer::new(&config.site.name, &config.site.author_name(), &config.template)?;

    let output = convert_file(&args.input, &paths.posts_dir, &renderer, Local::now().date_naive())?;
    println!("Successfully created: {}", output.display());
    println!("Run issue-press rebuild-index to list it");
    Ok(())
}

pub fn bump_asset_cmd(config: &Config, root: &Path, args: BumpAssetArgs) -> Result<()> {
    let paths = config.repo_paths(root);
    let versioner = AssetVersioner::new(&args.script, args.number)
        .with_context(|| format!("Invalid script name {}", args.script))?;

    let count = versioner.update_dir(&paths.posts_dir)
        .with_context(|| format!("Error updating documents in {}", paths.posts_dir.display()))?;
    println!("Updated {} files to {}?v={}", count, args.script, args.number);
    Ok(())
}
