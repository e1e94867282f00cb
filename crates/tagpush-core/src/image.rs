//! Image naming for releases.
//!
//! A release pushes images named `<registry-user>/<repository>:<version>`.
//! For compose releases the repository is the [`ProjectName`], and the image
//! built locally by `docker-compose build` is `<project>_<service>`.

use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

static VERSION_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+\w*$").expect("version pattern is valid"));

static HUB_IMAGE_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([-a-zA-Z0-9]+)/([-a-zA-Z0-9]+):([-\w.]+)$").expect("image pattern is valid")
});

/// A validated release version such as `1.0.0` or `2.3.1rc1`.
///
/// # Examples
///
/// ```
/// use tagpush_core::ReleaseVersion;
///
/// assert!(ReleaseVersion::parse("1.0.0").is_ok());
/// assert!(ReleaseVersion::parse("v1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    /// # Errors
    ///
    /// [`Error::InvalidVersion`](crate::Error::InvalidVersion) unless the
    /// input looks like `<MAJOR>.<MINOR>.<PATCH>` with an optional
    /// alphanumeric suffix.
    pub fn parse(version: &str) -> crate::Result<Self> {
        if VERSION_FORMAT.is_match(version) {
            Ok(Self(version.to_owned()))
        } else {
            Err(crate::Error::InvalidVersion {
                version: version.to_owned(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Project name used as the registry repository for compose releases.
///
/// Derived from the working directory's base name with every `-` removed,
/// which is also the prefix `docker-compose` gives the images it builds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    /// Strip `-` from `raw`. Returns `None` if nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let name: String = raw.chars().filter(|c| *c != '-').collect();
        if name.is_empty() { None } else { Some(Self(name)) }
    }

    /// Derive the project name from a directory, resolving symlinks and
    /// relative components first.
    ///
    /// # Errors
    ///
    /// - [`Error::ProjectDirResolve`](crate::Error::ProjectDirResolve) if the
    ///   directory cannot be canonicalized
    /// - [`Error::ProjectName`](crate::Error::ProjectName) if it has no usable
    ///   base name (e.g. `/`)
    pub fn from_dir(dir: &Path) -> crate::Result<Self> {
        let canonical = dir
            .canonicalize()
            .map_err(|e| crate::Error::ProjectDirResolve {
                path: dir.to_path_buf(),
                source: e,
            })?;

        let name = canonical
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(Self::new)
            .ok_or_else(|| crate::Error::ProjectName {
                path: canonical.clone(),
            })?;

        tracing::debug!(dir = %canonical.display(), project = %name, "project name derived");
        Ok(name)
    }

    /// Name of the image `docker-compose build` produced for `service`.
    pub fn local_image(&self, service: &str) -> String {
        format!("{}_{service}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully qualified registry image `user/repository:tag`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageReference {
    pub user: String,
    pub repository: String,
    pub tag: String,
}

impl ImageReference {
    /// Registry reference for a compose release: `{user}/{project}:{version}`.
    pub fn for_project(registry_user: &str, project: &ProjectName, version: &ReleaseVersion) -> Self {
        Self {
            user: registry_user.to_owned(),
            repository: project.as_str().to_owned(),
            tag: version.as_str().to_owned(),
        }
    }

    /// Parse a `<hub-user>/<repo-name>:<tag>` string.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidImageName`](crate::Error::InvalidImageName) if any of
    /// the three parts is missing or contains unexpected characters.
    pub fn parse(image: &str) -> crate::Result<Self> {
        let caps = HUB_IMAGE_FORMAT
            .captures(image)
            .ok_or_else(|| crate::Error::InvalidImageName {
                image: image.to_owned(),
            })?;

        Ok(Self {
            user: caps[1].to_owned(),
            repository: caps[2].to_owned(),
            tag: caps[3].to_owned(),
        })
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.user, self.repository, self.tag)
    }
}
