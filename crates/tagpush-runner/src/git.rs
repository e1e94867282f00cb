use crate::docker::args;
use crate::executor::{CommandExecutor, RealExecutor};
use crate::tool::{Tool, ToolError};
use std::path::{Path, PathBuf};

/// git operations needed to cut a release tag.
pub struct GitClient<E: CommandExecutor = RealExecutor> {
    executor: E,
}

impl GitClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for GitClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> GitClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// `git status --porcelain`, trimmed. Empty means a clean working tree.
    pub async fn uncommitted_changes(&self) -> Result<String, GitError> {
        let output = self
            .executor
            .exec(Tool::Git, &args(["status", "--porcelain"]))
            .await
            .map_err(|e| GitError::Status { source: e })?;

        Ok(output.trim().to_owned())
    }

    /// Replace local tags with the remote's, dropping tags that were never pushed.
    pub async fn prune_local_tags(&self) -> Result<(), GitError> {
        self.executor
            .exec(
                Tool::Git,
                &args(["fetch", "--prune", "origin", "+refs/tags/*:refs/tags/*"]),
            )
            .await
            .map_err(|e| GitError::FetchTags { source: e })?;

        Ok(())
    }

    /// Most recent tag reachable from any ref, or `None` if the repository has no tags.
    pub async fn latest_tag(&self) -> Result<Option<String>, GitError> {
        let rev = self
            .executor
            .exec(Tool::Git, &args(["rev-list", "--tags", "--max-count=1"]))
            .await
            .map_err(|e| GitError::Describe { source: e })?;

        let rev = rev.trim();
        if rev.is_empty() {
            return Ok(None);
        }

        let tag = self
            .executor
            .exec(Tool::Git, &args(["describe", "--tags", rev]))
            .await
            .map_err(|e| GitError::Describe { source: e })?;

        Ok(Some(tag.trim().to_owned()))
    }

    /// `git log <since>...HEAD`, or the whole history when `since` is `None`.
    pub async fn log_since(&self, since: Option<&str>) -> Result<String, GitError> {
        let cmd = match since {
            Some(tag) => args(["log", &format!("{tag}...HEAD")]),
            None => args(["log"]),
        };

        let output = self
            .executor
            .exec(Tool::Git, &cmd)
            .await
            .map_err(|e| GitError::Log { source: e })?;

        Ok(output.trim().to_owned())
    }

    pub async fn create_annotated_tag(&self, name: &str, message: &str) -> Result<(), GitError> {
        self.executor
            .exec(Tool::Git, &args(["tag", "-a", name, "-m", message]))
            .await
            .map_err(|e| GitError::Tag {
                name: name.to_owned(),
                source: e,
            })?;

        Ok(())
    }

    pub async fn push_tag(&self, name: &str) -> Result<(), GitError> {
        self.executor
            .exec_streaming(Tool::Git, &args(["push", "origin", name]))
            .await
            .map_err(|e| GitError::PushTag {
                name: name.to_owned(),
                source: e,
            })
    }

    pub async fn add(&self, path: &Path) -> Result<(), GitError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| GitError::InvalidPath(path.to_path_buf()))?;

        self.executor
            .exec(Tool::Git, &args(["add", path_str]))
            .await
            .map_err(|e| GitError::Add {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    pub async fn commit_allow_empty(&self, message: &str) -> Result<(), GitError> {
        self.executor
            .exec(Tool::Git, &args(["commit", "--allow-empty", "-m", message]))
            .await
            .map_err(|e| GitError::Commit { source: e })?;

        Ok(())
    }

    /// `git reset --hard HEAD~1`
    pub async fn drop_last_commit(&self) -> Result<(), GitError> {
        self.executor
            .exec(Tool::Git, &args(["reset", "--hard", "HEAD~1"]))
            .await
            .map_err(|e| GitError::Reset { source: e })?;

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("git status failed")]
    Status { source: ToolError },

    #[error("failed to fetch tags from origin")]
    FetchTags { source: ToolError },

    #[error("failed to find the latest tag")]
    Describe { source: ToolError },

    #[error("failed to read git log")]
    Log { source: ToolError },

    #[error("failed to create tag {name}")]
    Tag { name: String, source: ToolError },

    #[error("failed to push tag {name} to origin")]
    PushTag { name: String, source: ToolError },

    #[error("failed to stage {path}")]
    Add { path: PathBuf, source: ToolError },

    #[error("failed to commit")]
    Commit { source: ToolError },

    #[error("failed to reset the release commit")]
    Reset { source: ToolError },
}
