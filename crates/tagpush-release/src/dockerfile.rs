use crate::error::Result;
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use tagpush_core::ImageReference;
use tagpush_runner::{CommandExecutor, DockerClient};

/// Registry login used when publishing.
#[derive(Debug)]
pub struct RegistryCredentials {
    pub user: String,
    pub password: SecretString,
}

/// Resolved inputs for a single-Dockerfile release.
#[derive(Debug)]
pub struct DockerfileReleaseSettings {
    /// Build context; must contain a `Dockerfile`
    pub context: PathBuf,
    /// `<hub-user>/<repo>:<version>`
    pub image: ImageReference,
    /// Log in and push after building. `None` builds only.
    pub publish: Option<RegistryCredentials>,
}

/// Path of the Dockerfile in `context`.
///
/// # Errors
///
/// [`tagpush_core::Error::MissingDockerfile`] if there is none.
pub fn require_dockerfile(context: &Path) -> Result<PathBuf> {
    let dockerfile = context.join("Dockerfile");
    if dockerfile.is_file() {
        Ok(dockerfile)
    } else {
        Err(tagpush_core::Error::MissingDockerfile {
            dir: context.to_path_buf(),
        }
        .into())
    }
}

/// Build `settings.image` from the Dockerfile, then optionally log in and push it.
///
/// Unlike compose releases the push is awaited inline and a failure is fatal.
pub async fn release_dockerfile<E: CommandExecutor>(
    docker: &DockerClient<E>,
    settings: &DockerfileReleaseSettings,
) -> Result<()> {
    require_dockerfile(&settings.context)?;

    tracing::info!(image = %settings.image, "building and tagging release");
    docker.build(&settings.image, &settings.context).await?;

    if let Some(credentials) = &settings.publish {
        docker
            .login(&credentials.user, &credentials.password)
            .await?;

        tracing::info!(image = %settings.image, "pushing release");
        docker.push(&settings.image).await?;
    }

    Ok(())
}
