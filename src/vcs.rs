use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use spdlog::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("Command failed: {command}\n\nSTDOUT:\n{stdout}\n\nSTDERR:\n{stderr}")]
    Failed { command: String, stdout: String, stderr: String },

    #[error("Could not run `{command}`: {source}")]
    Spawn { command: String, #[source] source: io::Error },
}

/// Records the published files in the repository history
pub trait VersionControl {
    fn stage(&self, paths: &[&Path]) -> Result<(), VcsError>;

    fn has_staged_changes(&self) -> Result<bool, VcsError>;

    fn commit(&self, message: &str) -> Result<(), VcsError>;
}

pub fn commit_message(title: &str) -> String {
    format!("Add new post: {}", title)
}

/// The `git` executable, run in the repository root
pub struct GitCli {
    pub work_dir: PathBuf,
}

impl GitCli {
    pub fn new(work_dir: &Path) -> Self {
        GitCli {
            work_dir: work_dir.to_path_buf(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<Output, VcsError> {
        let command = format!("git {}", args.join(" "));
        debug!("Running {}", command);
        Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|source| VcsError::Spawn { command, source })
    }

    fn run_checked(&self, args: &[&str]) -> Result<String, VcsError> {
        let output = self.run(args)?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() {
            return Err(VcsError::Failed {
                command: format!("git {}", args.join(" ")),
                stdout,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(stdout)
    }
}

impl VersionControl for GitCli {
    fn stage(&self, paths: &[&Path]) -> Result<(), VcsError> {
        let paths: Vec<String> = paths.iter().map(|p| p.to_string_lossy().to_string()).collect();
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run_checked(&args)?;
        Ok(())
    }

    /// `git diff --cached --quiet` exits 1 when something is staged
    fn has_staged_changes(&self) -> Result<bool, VcsError> {
        let args = ["diff", "--cached", "--quiet"];
        let output = self.run(&args)?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(VcsError::Failed {
                command: format!("git {}", args.join(" ")),
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }

    fn commit(&self, message: &str) -> Result<(), VcsError> {
        self.run_checked(&["commit", "-m", message])?;
        Ok(())
    }
}
