use std::fmt;

/// External command-line tools tagpush drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Docker,
    DockerCompose,
    Git,
}

impl Tool {
    pub fn program(self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::DockerCompose => "docker-compose",
            Self::Git => "git",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("failed to run {tool}; is it installed and on PATH?")]
    NotFound { tool: Tool, source: std::io::Error },

    #[error("{tool} command failed: {args:?}\n{stderr}")]
    CommandFailed {
        tool: Tool,
        args: Vec<String>,
        stderr: String,
    },

    #[error("{tool} output was not valid UTF-8")]
    InvalidUtf8 {
        tool: Tool,
        source: std::string::FromUtf8Error,
    },

    #[error("failed to write to {tool} stdin")]
    StdinWrite { tool: Tool, source: std::io::Error },

    #[error("failed to wait for {tool}")]
    Wait { tool: Tool, source: std::io::Error },

    #[error("background {tool} task did not complete")]
    Join {
        tool: Tool,
        source: tokio::task::JoinError,
    },
}
