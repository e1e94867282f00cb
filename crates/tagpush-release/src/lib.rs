//! Release pipelines for tagpush.
//!
//! # Compose release
//!
//! ```text
//! tagpush compose
//!   1. Clobber check ── output path must differ from the input
//!   2. Load          ── parse the compose file, require version "2"
//!   3. Build         ── docker-compose -f <file> build
//!   4. Rewrite       ── per buildable service: docker tag <project>_<service> <user>/<project>:<version>,
//!                       start docker push (optional), build: → image:
//!   5. Barrier       ── wait for every push
//!   6. Write         ── <file>-<version>
//!   7. Tag           ── commit the output, git tag + push (optional)
//! ```
//!
//! # Dockerfile release
//!
//! ```text
//! tagpush dockerfile
//!   1. Build ── docker build -t <user>/<repo>:<version> .
//!   2. Push  ── docker login + docker push (optional)
//!   3. Tag   ── git tag + push (optional)
//! ```

pub mod compose;
pub mod dispatch;
pub mod dockerfile;
pub mod error;
pub mod tagging;

pub use compose::{ComposeRelease, ComposeReleaseSettings, release_compose};
pub use dispatch::{PushDispatcher, PushFailure, PushOperation, PushReport};
pub use dockerfile::{
    DockerfileReleaseSettings, RegistryCredentials, release_dockerfile, require_dockerfile,
};
pub use error::{ReleaseError, Result};
pub use tagging::{ReleaseTag, cut_release_tag, ensure_clean_tree, tag_with_file};
