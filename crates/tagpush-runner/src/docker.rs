use crate::executor::{CommandExecutor, ProcessHandle, RealExecutor};
use crate::tool::{Tool, ToolError};
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use tagpush_core::ImageReference;

/// docker / docker-compose operations, parameterized over the executor for testability.
pub struct DockerClient<E: CommandExecutor = RealExecutor> {
    executor: E,
}

impl DockerClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor,
        }
    }
}

impl Default for DockerClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CommandExecutor> DockerClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Build ──

    /// `docker-compose -f <file> build`, streamed to the terminal.
    pub async fn compose_build(&self, compose_file: &Path) -> Result<(), BuildError> {
        let file = path_arg(compose_file)?;

        self.executor
            .exec_streaming(Tool::DockerCompose, &args(["-f", file, "build"]))
            .await
            .map_err(|e| BuildError::Compose {
                file: compose_file.to_path_buf(),
                source: e,
            })
    }

    /// `docker build -t <image> <context>`, streamed to the terminal.
    pub async fn build(&self, image: &ImageReference, context: &Path) -> Result<(), BuildError> {
        let context_str = path_arg(context)?;
        let tag = image.to_string();

        self.executor
            .exec_streaming(Tool::Docker, &args(["build", "-t", &tag, context_str]))
            .await
            .map_err(|e| BuildError::Image { image: tag, source: e })
    }

    // ── Tag ──

    /// Bind the locally built `local_image` to the registry reference.
    pub async fn tag(&self, local_image: &str, target: &ImageReference) -> Result<(), TagError> {
        let target = target.to_string();

        self.executor
            .exec(Tool::Docker, &args(["tag", local_image, &target]))
            .await
            .map_err(|e| TagError {
                local_image: local_image.to_owned(),
                target,
                source: e,
            })?;

        Ok(())
    }

    // ── Registry ──

    /// `docker login`, with the password piped through `--password-stdin`.
    pub async fn login(&self, user: &str, password: &SecretString) -> Result<(), LoginError> {
        self.executor
            .exec_with_stdin(
                Tool::Docker,
                &args(["login", "-u", user, "--password-stdin"]),
                password.expose_secret().as_bytes(),
            )
            .await
            .map_err(|e| LoginError {
                user: user.to_owned(),
                source: e,
            })?;

        Ok(())
    }

    /// `docker push`, waiting for it to finish.
    pub async fn push(&self, image: &ImageReference) -> Result<(), PushError> {
        let image = image.to_string();

        self.executor
            .exec_streaming(Tool::Docker, &args(["push", &image]))
            .await
            .map_err(|e| PushError::Push { image, source: e })
    }

    /// Start `docker push` in the background.
    pub fn spawn_push(&self, image: &ImageReference) -> Result<ProcessHandle, PushError> {
        let image = image.to_string();

        self.executor
            .spawn(Tool::Docker, &args(["push", &image]))
            .map_err(|e| PushError::Spawn { image, source: e })
    }
}

// ── Helpers ──

pub(crate) fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

fn path_arg(path: &Path) -> Result<&str, BuildError> {
    path.to_str()
        .ok_or_else(|| BuildError::InvalidPath(path.to_path_buf()))
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("docker-compose build failed for {file}")]
    Compose { file: PathBuf, source: ToolError },

    #[error("docker build failed for {image}")]
    Image { image: String, source: ToolError },
}

#[derive(Debug, thiserror::Error)]
#[error("failed to tag {local_image} as {target}")]
pub struct TagError {
    pub local_image: String,
    pub target: String,
    pub source: ToolError,
}

#[derive(Debug, thiserror::Error)]
#[error("docker login failed for user {user}")]
pub struct LoginError {
    pub user: String,
    pub source: ToolError,
}

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("docker push failed for {image}")]
    Push { image: String, source: ToolError },

    #[error("failed to start docker push for {image}")]
    Spawn { image: String, source: ToolError },
}
