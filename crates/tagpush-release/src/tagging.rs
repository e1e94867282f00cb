//! Annotated git release tags.
//!
//! A release tag is named after the version and carries the commit log
//! since the previous tag as its message.

use crate::error::{ReleaseError, Result};
use std::path::Path;
use tagpush_core::ReleaseVersion;
use tagpush_runner::{CommandExecutor, GitClient};

/// A tag pushed to origin.
#[derive(Debug, Clone)]
pub struct ReleaseTag {
    pub name: String,
    /// Tag the release notes start from; `None` if this is the first tag
    pub previous: Option<String>,
    pub notes: String,
}

/// Fail with [`ReleaseError::DirtyWorkingTree`] if anything is uncommitted.
pub async fn ensure_clean_tree<E: CommandExecutor>(git: &GitClient<E>) -> Result<()> {
    let changes = git.uncommitted_changes().await?;
    if changes.is_empty() {
        Ok(())
    } else {
        Err(ReleaseError::DirtyWorkingTree { changes })
    }
}

/// Tag HEAD as `version` and push the tag.
pub async fn cut_release_tag<E: CommandExecutor>(
    git: &GitClient<E>,
    version: &ReleaseVersion,
) -> Result<ReleaseTag> {
    tracing::info!("removing local-only git tags");
    git.prune_local_tags().await?;

    let previous = git.latest_tag().await?;
    match &previous {
        Some(tag) => tracing::info!(since = %tag, "collecting commits for release notes"),
        None => tracing::info!("no tags found; using the full history for release notes"),
    }
    let notes = git.log_since(previous.as_deref()).await?;

    git.create_annotated_tag(version.as_str(), &notes).await?;
    tracing::info!(tag = %version, "pushing tag to origin");
    git.push_tag(version.as_str()).await?;

    Ok(ReleaseTag {
        name: version.to_string(),
        previous,
        notes,
    })
}

/// Commit `file`, tag that commit as `version`, push the tag, then drop the
/// commit from the branch again. The file is only reachable through the tag.
///
/// The commit is dropped even when tagging fails; the tagging error wins
/// over a reset error.
pub async fn tag_with_file<E: CommandExecutor>(
    git: &GitClient<E>,
    file: &Path,
    version: &ReleaseVersion,
) -> Result<ReleaseTag> {
    git.add(file).await?;
    git.commit_allow_empty(&format!("added {}", file.display()))
        .await?;

    let tagged = cut_release_tag(git, version).await;
    let reset = git.drop_last_commit().await;

    match (tagged, reset) {
        (Ok(tag), Ok(())) => Ok(tag),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(reset_err)) => {
            tracing::warn!(error = %reset_err, "failed to drop the release commit");
            Err(e)
        }
    }
}
