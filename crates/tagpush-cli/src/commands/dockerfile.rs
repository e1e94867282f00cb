use crate::output;
use clap::Args;
use secrecy::SecretString;
use std::path::PathBuf;
use tagpush_core::{ImageReference, ReleaseVersion, TagpushConfig};
use tagpush_release::{
    DockerfileReleaseSettings, RegistryCredentials, cut_release_tag, ensure_clean_tree,
    release_dockerfile, require_dockerfile,
};
use tagpush_runner::{DockerClient, GitClient};

#[derive(Args)]
pub struct DockerfileArgs {
    /// Docker Hub repository, <hub-user>/<repo-name>
    #[arg(long)]
    image: String,
    /// Release version, e.g. 1.2.0
    #[arg(long, env = "PROJECT_VERSION")]
    version: Option<String>,
    /// Log in and push the image to Docker Hub
    #[arg(long)]
    dockerhub_release: bool,
    /// Push a release tag to origin
    #[arg(long)]
    github_release: bool,
    /// Docker Hub login [default: the user part of --image]
    #[arg(long, env = "DOCKERHUB_USER")]
    registry_user: Option<String>,
    /// Docker Hub password, only needed with --dockerhub-release
    #[arg(long, env = "DOCKERHUB_PASS", hide_env_values = true)]
    registry_password: Option<String>,
}

/// Build `./Dockerfile` as `<image>:<version>`, then optionally push and tag it.
pub async fn dockerfile(args: DockerfileArgs) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let config = TagpushConfig::load(&project_dir)?;

    let version = ReleaseVersion::parse(&super::require_version(args.version)?)?;
    let image = ImageReference::parse(&format!("{}:{version}", args.image))?;
    require_dockerfile(&project_dir)?;

    let publish = if args.dockerhub_release {
        let password = args
            .registry_password
            .filter(|p| !p.is_empty())
            .map(SecretString::from)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "registry password not set; set DOCKERHUB_PASS or pass --registry-password"
                )
            })?;
        let user = super::resolve_registry_user(args.registry_user, &config)
            .unwrap_or_else(|| image.user.clone());
        Some(RegistryCredentials { user, password })
    } else {
        None
    };

    let git = GitClient::new();
    if args.github_release {
        output::step("checking for uncommitted changes");
        ensure_clean_tree(&git).await?;
    }

    let settings = DockerfileReleaseSettings {
        context: project_dir,
        image,
        publish,
    };

    output::step(format!("building {}", settings.image));
    let docker = DockerClient::new();
    release_dockerfile(&docker, &settings).await?;
    if settings.publish.is_some() {
        output::success(format!("pushed {} to Docker Hub", settings.image));
    } else {
        output::success(format!("built {}", settings.image));
    }

    if args.github_release {
        output::step("tagging release");
        let tag = cut_release_tag(&git, &version).await?;
        output::success(format!("pushed tag {} to origin", tag.name));
    }

    Ok(())
}
