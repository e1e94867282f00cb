use crate::dispatch::{PushDispatcher, PushReport};
use crate::error::{ReleaseError, Result};
use std::path::PathBuf;
use tagpush_core::{ComposeDocument, ImageReference, ProjectName, ReleaseVersion};
use tagpush_runner::{CommandExecutor, DockerClient};

/// Resolved inputs for a compose release. Nothing here is read from the
/// environment; the caller resolves flags, variables and config first.
#[derive(Debug, Clone)]
pub struct ComposeReleaseSettings {
    pub registry_user: String,
    pub project: ProjectName,
    pub version: ReleaseVersion,
    /// Compose document to build and rewrite
    pub input: PathBuf,
    /// Where the rewritten document goes; must differ from `input`
    pub output: PathBuf,
    /// Push rewritten images to the registry
    pub push: bool,
}

impl ComposeReleaseSettings {
    pub fn image(&self) -> ImageReference {
        ImageReference::for_project(&self.registry_user, &self.project, &self.version)
    }
}

/// Result of a successful compose release.
#[derive(Debug)]
pub struct ComposeRelease {
    pub output: PathBuf,
    pub image: ImageReference,
    /// Services whose build directive was replaced, sorted by name
    pub rewritten: Vec<String>,
    /// Push outcomes; `None` when pushing was disabled.
    pub pushes: Option<PushReport>,
}

/// Run the compose release pipeline:
/// clobber check → load → compose build → retag/rewrite/dispatch → barrier → write.
///
/// # Errors
///
/// Every step before the write is fatal except individual push failures,
/// which are reported in [`ComposeRelease::pushes`]. On a retag failure the
/// pushes already started are joined before the error is returned, and no
/// file is written.
pub async fn release_compose<E: CommandExecutor>(
    docker: &DockerClient<E>,
    settings: &ComposeReleaseSettings,
) -> Result<ComposeRelease> {
    tagpush_core::ensure_distinct_output(&settings.input, &settings.output)?;

    let mut document = ComposeDocument::load(&settings.input)?;
    tracing::info!(
        input = %settings.input.display(),
        output = %settings.output.display(),
        services = document.services().len(),
        "compose file loaded"
    );

    docker.compose_build(&settings.input).await?;

    let image = settings.image();
    let mut dispatcher = PushDispatcher::new();
    let mut rewritten = Vec::new();

    for service in document.buildable_services() {
        tracing::info!(service = %service, "found service to build");
        let local_image = settings.project.local_image(&service);

        if let Err(e) = docker.tag(&local_image, &image).await {
            if !dispatcher.is_empty() {
                let report = dispatcher.wait_all().await;
                tracing::debug!(joined = report.total(), "pending pushes joined after retag failure");
            }
            return Err(ReleaseError::Retag { service, source: e });
        }

        if settings.push {
            dispatcher.dispatch(docker, &service, &image);
        }

        document.rewrite_service(&service, &image);
        rewritten.push(service);
    }

    if rewritten.is_empty() {
        tracing::warn!("no service has a build directive; nothing to push");
    }

    let pushes = if settings.push {
        Some(dispatcher.wait_all().await)
    } else {
        None
    };

    document.write(&settings.output)?;
    tracing::info!(path = %settings.output.display(), "wrote new compose file");

    Ok(ComposeRelease {
        output: settings.output.clone(),
        image,
        rewritten,
        pushes,
    })
}
