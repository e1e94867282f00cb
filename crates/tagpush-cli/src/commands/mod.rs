mod compose;
mod dockerfile;

use tagpush_core::TagpushConfig;

pub use compose::{ComposeArgs, compose};
pub use dockerfile::{DockerfileArgs, dockerfile};

/// `--registry-user` / `DOCKERHUB_USER`, then `[registry].user` in tagpush.toml.
pub(crate) fn resolve_registry_user(
    flag: Option<String>,
    config: &TagpushConfig,
) -> Option<String> {
    flag.filter(|u| !u.is_empty())
        .or_else(|| config.registry.user.clone())
        .filter(|u| !u.is_empty())
}

pub(crate) fn require_version(flag: Option<String>) -> anyhow::Result<String> {
    flag.filter(|v| !v.is_empty()).ok_or_else(|| {
        anyhow::anyhow!("release version not set; set PROJECT_VERSION or pass --version")
    })
}
