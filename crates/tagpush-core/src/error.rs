use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Compose document ──
    #[error("failed to read compose file {path}")]
    ComposeRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse compose file {path}")]
    ComposeParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error(
        "unsupported compose file version {} in {path}; expected version \"{expected}\"",
        found.as_deref().map_or_else(|| "(missing)".to_owned(), |v| format!("\"{v}\""))
    )]
    UnsupportedSchema {
        path: PathBuf,
        found: Option<String>,
        expected: &'static str,
    },

    #[error("failed to serialize compose document for {path}")]
    ComposeSerialize {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to write compose file {path}")]
    ComposeWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "refusing to overwrite the input compose file {path}; choose a different output path"
    )]
    WouldClobberInput { path: PathBuf },

    // ── Release inputs ──
    #[error("invalid release version {version:?}: expected <MAJOR>.<MINOR>.<PATCH>")]
    InvalidVersion { version: String },

    #[error("invalid image {image:?}: expected <hub-user>/<repo-name>:<tag>")]
    InvalidImageName { image: String },

    #[error("no Dockerfile found in {dir}")]
    MissingDockerfile { dir: PathBuf },

    // ── Project discovery ──
    #[error("failed to resolve project directory {path}")]
    ProjectDirResolve {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot derive a project name from {path}")]
    ProjectName { path: PathBuf },
}
