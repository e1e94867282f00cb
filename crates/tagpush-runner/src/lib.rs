pub mod docker;
pub mod executor;
pub mod git;
pub mod tool;

pub use docker::{BuildError, DockerClient, LoginError, PushError, TagError};
pub use executor::{CommandExecutor, ProcessHandle, RealExecutor};
pub use git::{GitClient, GitError};
pub use tool::{Tool, ToolError};
