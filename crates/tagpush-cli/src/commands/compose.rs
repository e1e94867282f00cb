use crate::output;
use clap::Args;
use std::path::PathBuf;
use tagpush_core::{ProjectName, ReleaseVersion, TagpushConfig};
use tagpush_release::{ComposeReleaseSettings, ensure_clean_tree, release_compose, tag_with_file};
use tagpush_runner::{DockerClient, GitClient};

#[derive(Args)]
pub struct ComposeArgs {
    /// Push the rewritten images to Docker Hub
    #[arg(long)]
    dockerhub_release: bool,
    /// Commit the rewritten compose file and push a release tag to origin
    #[arg(long)]
    github_release: bool,
    /// Compose file to release [default: docker-compose.yml]
    #[arg(long, env = "DOCKER_COMPOSE_YML")]
    compose_file: Option<PathBuf>,
    /// Where to write the rewritten compose file [default: <compose-file>-<version>]
    #[arg(long, env = "TAGPUSH_OUTPUT")]
    output: Option<PathBuf>,
    /// Docker Hub user owning the release repository
    #[arg(long, env = "DOCKERHUB_USER")]
    registry_user: Option<String>,
    /// Release version, e.g. 1.2.0
    #[arg(long, env = "PROJECT_VERSION")]
    version: Option<String>,
}

/// Build, retag and optionally push every buildable service, then write the release file.
pub async fn compose(args: ComposeArgs) -> anyhow::Result<()> {
    let project_dir = PathBuf::from(".");
    let config = TagpushConfig::load(&project_dir)?;

    let registry_user = super::resolve_registry_user(args.registry_user, &config)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "registry user not set; set DOCKERHUB_USER, pass --registry-user, \
                 or set [registry].user in tagpush.toml"
            )
        })?;
    let version = ReleaseVersion::parse(&super::require_version(args.version)?)?;

    let input = args.compose_file.unwrap_or(config.compose.file);
    let output_path = args
        .output
        .or(config.compose.output)
        .unwrap_or_else(|| tagpush_core::default_output_path(&input, &version));
    tagpush_core::ensure_distinct_output(&input, &output_path)?;

    let project = ProjectName::from_dir(&project_dir)?;

    let git = GitClient::new();
    if args.github_release {
        output::step("checking for uncommitted changes");
        ensure_clean_tree(&git).await?;
    }

    let settings = ComposeReleaseSettings {
        registry_user,
        project,
        version,
        input,
        output: output_path,
        push: args.dockerhub_release,
    };

    output::step(format!("building {}", settings.input.display()));
    let docker = DockerClient::new();
    let release = release_compose(&docker, &settings).await?;

    for service in &release.rewritten {
        output::step(format!("{service} -> {}", release.image));
    }
    if let Some(pushes) = &release.pushes {
        for failure in &pushes.failed {
            output::warn(format!("push failed for {failure}"));
        }
        if pushes.all_succeeded() && pushes.total() > 0 {
            output::success(format!("pushed {} to Docker Hub", release.image));
        }
    }
    output::success(format!("wrote {}", release.output.display()));

    if args.github_release {
        output::step("tagging release");
        let tag = tag_with_file(&git, &release.output, &settings.version).await?;
        output::success(format!("pushed tag {} to origin", tag.name));
    }

    println!("COMPOSE_FILE={}", release.output.display());
    Ok(())
}
