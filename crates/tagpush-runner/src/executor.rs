use crate::tool::{Tool, ToolError};
use std::process::Stdio;

/// Abstraction over external CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait CommandExecutor: Send + Sync {
    /// Execute a command and capture stdout.
    async fn exec(&self, tool: Tool, args: &[String]) -> Result<String, ToolError>;

    /// Execute a command, streaming output to the terminal.
    async fn exec_streaming(&self, tool: Tool, args: &[String]) -> Result<(), ToolError>;

    /// Execute a command with data piped to stdin.
    async fn exec_with_stdin(
        &self,
        tool: Tool,
        args: &[String],
        stdin_data: &[u8],
    ) -> Result<String, ToolError>;

    /// Start a command in the background and return without waiting.
    ///
    /// Output is streamed to the terminal; the exit status is collected
    /// through [`ProcessHandle::wait`].
    fn spawn(&self, tool: Tool, args: &[String]) -> Result<ProcessHandle, ToolError>;
}

/// A background command started by [`CommandExecutor::spawn`].
///
/// Dropping the handle does not kill the process.
#[derive(Debug)]
pub struct ProcessHandle {
    state: HandleState,
}

#[derive(Debug)]
enum HandleState {
    Running {
        tool: Tool,
        task: tokio::task::JoinHandle<Result<(), ToolError>>,
    },
    Finished(Result<(), ToolError>),
}

impl ProcessHandle {
    pub fn running(tool: Tool, task: tokio::task::JoinHandle<Result<(), ToolError>>) -> Self {
        Self {
            state: HandleState::Running { tool, task },
        }
    }

    /// A handle whose outcome is already known.
    pub fn finished(result: Result<(), ToolError>) -> Self {
        Self {
            state: HandleState::Finished(result),
        }
    }

    /// Wait for the process to exit. `Ok` only for a zero exit status.
    pub async fn wait(self) -> Result<(), ToolError> {
        match self.state {
            HandleState::Running { tool, task } => match task.await {
                Ok(result) => result,
                Err(e) => Err(ToolError::Join { tool, source: e }),
            },
            HandleState::Finished(result) => result,
        }
    }
}

/// Real executor that shells out to the installed tools.
pub struct RealExecutor;

impl CommandExecutor for RealExecutor {
    async fn exec(&self, tool: Tool, args: &[String]) -> Result<String, ToolError> {
        tracing::debug!(%tool, ?args, "exec");

        let output = tokio::process::Command::new(tool.program())
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ToolError::NotFound { tool, source: e })?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| ToolError::InvalidUtf8 { tool, source: e })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(ToolError::CommandFailed {
                tool,
                args: args.to_vec(),
                stderr,
            })
        }
    }

    async fn exec_streaming(&self, tool: Tool, args: &[String]) -> Result<(), ToolError> {
        tracing::debug!(%tool, ?args, "exec (streaming)");

        let status = tokio::process::Command::new(tool.program())
            .args(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ToolError::NotFound { tool, source: e })?;

        if status.success() {
            Ok(())
        } else {
            Err(ToolError::CommandFailed {
                tool,
                args: args.to_vec(),
                stderr: format!("exit code: {status}"),
            })
        }
    }

    async fn exec_with_stdin(
        &self,
        tool: Tool,
        args: &[String],
        stdin_data: &[u8],
    ) -> Result<String, ToolError> {
        use tokio::io::AsyncWriteExt;

        tracing::debug!(%tool, ?args, "exec (stdin)");

        let mut child = tokio::process::Command::new(tool.program())
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ToolError::NotFound { tool, source: e })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(stdin_data)
                .await
                .map_err(|e| ToolError::StdinWrite { tool, source: e })?;
            stdin
                .shutdown()
                .await
                .map_err(|e| ToolError::StdinWrite { tool, source: e })?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ToolError::Wait { tool, source: e })?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| ToolError::InvalidUtf8 { tool, source: e })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(ToolError::CommandFailed {
                tool,
                args: args.to_vec(),
                stderr,
            })
        }
    }

    fn spawn(&self, tool: Tool, args: &[String]) -> Result<ProcessHandle, ToolError> {
        tracing::debug!(%tool, ?args, "spawn");

        let mut child = tokio::process::Command::new(tool.program())
            .args(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ToolError::NotFound { tool, source: e })?;

        let args = args.to_vec();
        let task = tokio::spawn(async move {
            let status = child
                .wait()
                .await
                .map_err(|e| ToolError::Wait { tool, source: e })?;

            if status.success() {
                Ok(())
            } else {
                Err(ToolError::CommandFailed {
                    tool,
                    args,
                    stderr: format!("exit code: {status}"),
                })
            }
        });

        Ok(ProcessHandle::running(tool, task))
    }
}
