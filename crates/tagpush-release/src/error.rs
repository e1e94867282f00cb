use tagpush_runner::{BuildError, GitError, LoginError, PushError, TagError};

pub type Result<T> = std::result::Result<T, ReleaseError>;

#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error(transparent)]
    Core(#[from] tagpush_core::Error),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("failed to retag service '{service}'")]
    Retag { service: String, source: TagError },

    #[error(transparent)]
    Login(#[from] LoginError),

    #[error(transparent)]
    Push(#[from] PushError),

    #[error("there are uncommitted changes:\n{changes}")]
    DirtyWorkingTree { changes: String },

    #[error(transparent)]
    Git(#[from] GitError),
}
