use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the optional per-project configuration.
pub const CONFIG_FILE_NAME: &str = "tagpush.toml";

/// tagpush.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagpushConfig {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub compose: ComposeConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Registry (Docker Hub) user that owns the pushed repositories.
    /// `DOCKERHUB_USER` or `--registry-user` take precedence.
    pub user: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// Compose document to release
    #[serde(default = "default_compose_file")]
    pub file: PathBuf,
    /// Where the rewritten document is written.
    /// When None, `<file>-<version>` next to the input is used.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            file: default_compose_file(),
            output: None,
        }
    }
}

impl TagpushConfig {
    /// Load from tagpush.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading config");
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }
}

fn default_compose_file() -> PathBuf {
    PathBuf::from("docker-compose.yml")
}
