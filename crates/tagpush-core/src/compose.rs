//! Typed compose document.
//!
//! Only the keys a release touches are modelled (`version`, `services`,
//! and each service's `build` / `image`). Everything else is carried
//! through verbatim so the written document differs from the input only
//! in the rewritten services.

use crate::image::{ImageReference, ReleaseVersion};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// The only compose file format version tagpush rewrites.
pub const SUPPORTED_VERSION: &str = "2";

/// A service's local build context: `build: ./dir` or `build: {context: ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuildDirective {
    Context(String),
    Detailed(BTreeMap<String, Value>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Absent when the key is missing. `build: ~` is rejected.
    #[serde(
        default,
        deserialize_with = "present_build",
        skip_serializing_if = "Option::is_none"
    )]
    pub build: Option<BuildDirective>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Remaining keys (`ports`, `environment`, ...), untouched.
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl ServiceDefinition {
    pub fn is_buildable(&self) -> bool {
        self.build.is_some()
    }

    /// Replace the build directive with a registry image.
    pub fn rewrite_to_image(&mut self, image: &ImageReference) {
        self.build = None;
        self.image = Some(image.to_string());
    }
}

fn present_build<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BuildDirective>, D::Error> {
    BuildDirective::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
struct RawComposeDocument {
    #[serde(default)]
    version: Option<Value>,
    #[serde(default)]
    services: BTreeMap<String, ServiceDefinition>,
    #[serde(flatten)]
    other: BTreeMap<String, Value>,
}

/// A compose document whose `version` has been checked against
/// [`SUPPORTED_VERSION`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposeDocument {
    version: String,
    services: BTreeMap<String, ServiceDefinition>,
    #[serde(flatten)]
    other: BTreeMap<String, Value>,
    #[serde(skip)]
    source: PathBuf,
}

impl ComposeDocument {
    /// Read and validate the compose document at `path`.
    ///
    /// # Errors
    ///
    /// - [`Error::ComposeRead`](crate::Error::ComposeRead) if the file is missing or unreadable
    /// - [`Error::ComposeParse`](crate::Error::ComposeParse) if it is not a compose mapping
    /// - [`Error::UnsupportedSchema`](crate::Error::UnsupportedSchema) if `version` is not `"2"`
    pub fn load(path: &Path) -> crate::Result<Self> {
        tracing::debug!(path = %path.display(), "loading compose file");
        let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ComposeRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    /// Parse compose YAML. `source` is the file it came from; the document
    /// refuses to be written back to it.
    pub fn parse(content: &str, source: &Path) -> crate::Result<Self> {
        let raw: RawComposeDocument =
            serde_yaml::from_str(content).map_err(|e| crate::Error::ComposeParse {
                path: source.to_path_buf(),
                source: e,
            })?;

        let version = match raw.version {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let version = match version {
            Some(v) if v == SUPPORTED_VERSION => v,
            found => {
                return Err(crate::Error::UnsupportedSchema {
                    path: source.to_path_buf(),
                    found,
                    expected: SUPPORTED_VERSION,
                });
            }
        };

        Ok(Self {
            version,
            services: raw.services,
            other: raw.other,
            source: source.to_path_buf(),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn services(&self) -> &BTreeMap<String, ServiceDefinition> {
        &self.services
    }

    pub fn service(&self, name: &str) -> Option<&ServiceDefinition> {
        self.services.get(name)
    }

    /// Names of services that declare a `build` directive.
    pub fn buildable_services(&self) -> Vec<String> {
        self.services
            .iter()
            .filter(|(_, service)| service.is_buildable())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Point a buildable service at `image`.
    ///
    /// Returns `false` and leaves the document alone if the service does
    /// not exist or has no build directive.
    pub fn rewrite_service(&mut self, name: &str, image: &ImageReference) -> bool {
        match self.services.get_mut(name) {
            Some(service) if service.is_buildable() => {
                service.rewrite_to_image(image);
                true
            }
            _ => false,
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Serialize the document to `path`.
    ///
    /// # Errors
    ///
    /// [`Error::WouldClobberInput`](crate::Error::WouldClobberInput) if `path`
    /// is the file the document was loaded from; serialization and I/O
    /// failures otherwise.
    pub fn write(&self, path: &Path) -> crate::Result<()> {
        ensure_distinct_output(&self.source, path)?;

        let yaml = self.to_yaml().map_err(|e| crate::Error::ComposeSerialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, yaml).map_err(|e| crate::Error::ComposeWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), "compose file written");
        Ok(())
    }
}

/// `<input>-<version>` next to the input file.
pub fn default_output_path(input: &Path, version: &ReleaseVersion) -> PathBuf {
    match input.file_name() {
        Some(name) => {
            let mut name = name.to_os_string();
            name.push("-");
            name.push(version.as_str());
            input.with_file_name(name)
        }
        None => PathBuf::from(format!("{}-{version}", input.display())),
    }
}

/// Fail if `output` names the same file as `input`.
///
/// Paths are compared lexically (ignoring `.` components) and, when both
/// exist, by their canonical form.
pub fn ensure_distinct_output(input: &Path, output: &Path) -> crate::Result<()> {
    let same_file = lexical(input) == lexical(output)
        || matches!(
            (input.canonicalize(), output.canonicalize()),
            (Ok(a), Ok(b)) if a == b
        );

    if same_file {
        return Err(crate::Error::WouldClobberInput {
            path: input.to_path_buf(),
        });
    }
    Ok(())
}

fn lexical(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
