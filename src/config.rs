use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::util::os_helper::get_name;

pub const CFG_FILE_NAME: &str = "issue-press.toml";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Site {
    pub name: String,
    /// Name printed in the byline. If empty, OS user real name is being used
    pub author: Option<String>,
    pub link_color: String,
    pub content_url_prefix: String,
}

impl Default for Site {
    fn default() -> Self {
        Site {
            name: "ChemBio AI Insights".to_string(),
            author: None,
            link_color: "#2563eb".to_string(),
            content_url_prefix: "/posts".to_string(),
        }
    }
}

impl Site {
    pub fn author_name(&self) -> String {
        match self.author {
            Some(ref author) if !author.trim().is_empty() => author.clone(),
            _ => get_name(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Paths {
    pub posts_dir: PathBuf,
    pub index_file: PathBuf,
    pub template: Option<PathBuf>,
}

impl Default for Paths {
    fn default() -> Self {
        Paths {
            posts_dir: PathBuf::from("posts"),
            index_file: PathBuf::from("posts/posts.json"),
            template: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TemplateAnchors {
    pub body_class: String,
    pub end_marker: String,
}

impl Default for TemplateAnchors {
    fn default() -> Self {
        TemplateAnchors {
            body_class: "article-body".to_string(),
            end_marker: "ENGAGE MODULE".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GitHub {
    pub api_url: String,
    pub user_agent: String,
}

impl Default for GitHub {
    fn default() -> Self {
        GitHub {
            api_url: "https://api.github.com".to_string(),
            user_agent: "issue-press".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    pub template: TemplateAnchors,
    pub github: GitHub,
    pub log: Option<Log>,
}

/// Paths resolved against the repository the posts live in
#[derive(Debug, Clone, PartialEq)]
pub struct RepoPaths {
    pub root: PathBuf,
    pub posts_dir: PathBuf,
    pub index_file: PathBuf,
    pub template: Option<PathBuf>,
}

impl Config {
    pub fn repo_paths(&self, root: &Path) -> RepoPaths {
        let resolve = |p: &Path| if p.is_absolute() { p.to_path_buf() } else { root.join(p) };
        RepoPaths {
            root: root.to_path_buf(),
            posts_dir: resolve(&self.paths.posts_dir),
            index_file: resolve(&self.paths.index_file),
            template: self.paths.template.as_deref().map(resolve),
        }
    }
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if path.starts_with("${exe_dir}") {
        let cur_exe = env::current_exe()?;
        let exe_dir = cur_exe.parent()
            .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "Executable has no parent directory"))?;
        let str_path = path.to_string_lossy();
        Ok(PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy())))
    } else {
        Ok(path)
    }
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        posts_dir: parse_path(cfg.paths.posts_dir)?,
        index_file: parse_path(cfg.paths.index_file)?,
        template: cfg.paths.template.map(parse_path).transpose()?,
    };
    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path).transpose()?;
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}

/// Looks for the configuration next to the executable, in the current directory
/// and in the user config directory, in this order
pub fn find_config_path() -> Option<PathBuf> {
    let mut candidates = vec![];
    if let Some(exe_dir) = env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        candidates.push(exe_dir.join(CFG_FILE_NAME));
    }
    if let Ok(cur_dir) = env::current_dir() {
        candidates.push(cur_dir.join(CFG_FILE_NAME));
    }
    if let Some(cfg_dir) = dirs::config_dir() {
        candidates.push(cfg_dir.join(CFG_FILE_NAME));
    }

    candidates.into_iter().find(|p| p.exists())
}

/// Reads the given configuration or the first one found. Without any file, defaults are used
pub fn open_config(cfg_path: Option<&Path>) -> io::Result<(Config, Option<PathBuf>)> {
    let path = match cfg_path {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_path(),
    };

    match path {
        Some(path) => Ok((read_config(&path)?, Some(path))),
        None => Ok((Config::default(), None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_sample_cfg() -> &'static str {
        include_str!("../issue-press.toml")
    }

    #[test]
    fn test_sample_cfg() {
        let cfg = parse_config(get_sample_cfg()).unwrap();
        assert_eq!(cfg.site.name, "ChemBio AI Insights");
        assert_eq!(cfg.site.author.as_deref(), Some("Yi Qu"));
        assert_eq!(cfg.site.link_color, "#2563eb");
        assert_eq!(cfg.paths.posts_dir, PathBuf::from("posts"));
        assert_eq!(cfg.paths.index_file, PathBuf::from("posts/posts.json"));
        assert_eq!(cfg.template.end_marker, "ENGAGE MODULE");
        assert_eq!(cfg.github.api_url, "https://api.github.com");
        let log = cfg.log.unwrap();
        assert_eq!(log.level, LogLevel::Info);
        assert!(log.log_to_console);
    }

    #[test]
    fn test_empty_cfg_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.site.content_url_prefix, "/posts");
        assert_eq!(cfg.template.body_class, "article-body");
        assert_eq!(cfg.github.user_agent, "issue-press");
        assert!(cfg.paths.template.is_none());
        assert!(cfg.log.is_none());
    }

    #[test]
    fn test_partial_section() {
        let cfg = parse_config(r##"
[site]
name = "My Blog"

[paths]
template = "posts/scaffold.html"
"##).unwrap();
        assert_eq!(cfg.site.name, "My Blog");
        assert_eq!(cfg.site.link_color, "#2563eb");
        assert_eq!(cfg.paths.posts_dir, PathBuf::from("posts"));
        assert_eq!(cfg.paths.template, Some(PathBuf::from("posts/scaffold.html")));
    }

    #[test]
    fn test_invalid_cfg() {
        let err = parse_config("[site]\nname = 12").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_repo_paths() {
        let cfg = Config::default();
        let paths = cfg.repo_paths(Path::new("/repo"));
        assert_eq!(paths.posts_dir, PathBuf::from("/repo/posts"));
        assert_eq!(paths.index_file, PathBuf::from("/repo/posts/posts.json"));
        assert_eq!(paths.template, None);
    }

    #[test]
    fn test_explicit_author() {
        let site = Site { author: Some("Yi Qu".to_string()), ..Site::default() };
        assert_eq!(site.author_name(), "Yi Qu");
    }
}
