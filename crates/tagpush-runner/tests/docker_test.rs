use mockall::mock;
use secrecy::SecretString;
use std::path::Path;
use tagpush_core::ImageReference;
use tagpush_runner::docker::{BuildError, DockerClient, PushError};
use tagpush_runner::executor::{CommandExecutor, ProcessHandle};
use tagpush_runner::tool::{Tool, ToolError};

mock! {
    Executor {}

    impl CommandExecutor for Executor {
        async fn exec(&self, tool: Tool, args: &[String]) -> Result<String, ToolError>;
        async fn exec_streaming(&self, tool: Tool, args: &[String]) -> Result<(), ToolError>;
        async fn exec_with_stdin(
            &self,
            tool: Tool,
            args: &[String],
            stdin_data: &[u8],
        ) -> Result<String, ToolError>;
        fn spawn(&self, tool: Tool, args: &[String]) -> Result<ProcessHandle, ToolError>;
    }
}

fn is(args: &[String], expected: &[&str]) -> bool {
    args.iter().map(String::as_str).eq(expected.iter().copied())
}

fn failed(tool: Tool) -> ToolError {
    ToolError::CommandFailed {
        tool,
        args: vec![],
        stderr: "exit code: exit status: 1".to_owned(),
    }
}

fn image() -> ImageReference {
    ImageReference::parse("acme/myapp:1.0.0").unwrap()
}

// ── Build Tests ──

#[tokio::test]
async fn compose_build_uses_compose_file() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|tool, args| {
            *tool == Tool::DockerCompose && is(args, &["-f", "docker-compose.yml", "build"])
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let client = DockerClient::with_executor(mock);
    client
        .compose_build(Path::new("docker-compose.yml"))
        .await
        .unwrap();
}

#[tokio::test]
async fn compose_build_failure() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .returning(|_, _| Err(failed(Tool::DockerCompose)));

    let client = DockerClient::with_executor(mock);
    let result = client.compose_build(Path::new("stack.yml")).await;

    assert!(matches!(result, Err(BuildError::Compose { ref file, .. }) if file == Path::new("stack.yml")));
}

#[tokio::test]
async fn build_tags_image_from_context() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|tool, args| *tool == Tool::Docker && is(args, &["build", "-t", "acme/myapp:1.0.0", "."]))
        .times(1)
        .returning(|_, _| Ok(()));

    let client = DockerClient::with_executor(mock);
    client.build(&image(), Path::new(".")).await.unwrap();
}

#[tokio::test]
async fn build_failure_names_image() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .returning(|_, _| Err(failed(Tool::Docker)));

    let client = DockerClient::with_executor(mock);
    let err = client.build(&image(), Path::new(".")).await.unwrap_err();

    assert!(err.to_string().contains("acme/myapp:1.0.0"), "got: {err}");
}

// ── Tag Tests ──

#[tokio::test]
async fn tag_binds_local_image_to_registry_reference() {
    let mut mock = MockExecutor::new();

    mock.expect_exec()
        .withf(|tool, args| {
            *tool == Tool::Docker && is(args, &["tag", "myapp_web", "acme/myapp:1.0.0"])
        })
        .times(1)
        .returning(|_, _| Ok(String::new()));

    let client = DockerClient::with_executor(mock);
    client.tag("myapp_web", &image()).await.unwrap();
}

#[tokio::test]
async fn tag_failure_reports_both_names() {
    let mut mock = MockExecutor::new();

    mock.expect_exec().returning(|_, _| Err(failed(Tool::Docker)));

    let client = DockerClient::with_executor(mock);
    let err = client.tag("myapp_web", &image()).await.unwrap_err();

    assert_eq!(err.local_image, "myapp_web");
    assert_eq!(err.target, "acme/myapp:1.0.0");
}

// ── Registry Tests ──

#[tokio::test]
async fn login_pipes_password_on_stdin() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_with_stdin()
        .withf(|tool, args, stdin| {
            *tool == Tool::Docker
                && is(args, &["login", "-u", "james", "--password-stdin"])
                && stdin.to_vec() == b"password12".to_vec()
        })
        .times(1)
        .returning(|_, _, _| Ok("Login Succeeded\n".to_owned()));

    let client = DockerClient::with_executor(mock);
    client
        .login("james", &SecretString::from("password12".to_owned()))
        .await
        .unwrap();
}

#[tokio::test]
async fn login_failure() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_with_stdin()
        .returning(|_, _, _| Err(failed(Tool::Docker)));

    let client = DockerClient::with_executor(mock);
    let err = client
        .login("james", &SecretString::from("wrong".to_owned()))
        .await
        .unwrap_err();

    assert_eq!(err.user, "james");
    assert!(!err.to_string().contains("wrong"));
}

#[tokio::test]
async fn push_waits_for_completion() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .withf(|tool, args| *tool == Tool::Docker && is(args, &["push", "acme/myapp:1.0.0"]))
        .times(1)
        .returning(|_, _| Ok(()));

    let client = DockerClient::with_executor(mock);
    client.push(&image()).await.unwrap();
}

#[tokio::test]
async fn push_failure() {
    let mut mock = MockExecutor::new();

    mock.expect_exec_streaming()
        .returning(|_, _| Err(failed(Tool::Docker)));

    let client = DockerClient::with_executor(mock);
    let result = client.push(&image()).await;

    assert!(matches!(result, Err(PushError::Push { ref image, .. }) if image == "acme/myapp:1.0.0"));
}

#[tokio::test]
async fn spawn_push_returns_handle() {
    let mut mock = MockExecutor::new();

    mock.expect_spawn()
        .withf(|tool, args| *tool == Tool::Docker && is(args, &["push", "acme/myapp:1.0.0"]))
        .times(1)
        .returning(|_, _| Ok(ProcessHandle::finished(Ok(()))));

    let client = DockerClient::with_executor(mock);
    let handle = client.spawn_push(&image()).unwrap();
    handle.wait().await.unwrap();
}

#[tokio::test]
async fn spawn_push_reports_exit_failure_on_wait() {
    let mut mock = MockExecutor::new();

    mock.expect_spawn()
        .returning(|_, _| Ok(ProcessHandle::finished(Err(failed(Tool::Docker)))));

    let client = DockerClient::with_executor(mock);
    let handle = client.spawn_push(&image()).unwrap();

    assert!(matches!(
        handle.wait().await,
        Err(ToolError::CommandFailed { .. })
    ));
}

#[tokio::test]
async fn spawn_push_not_found() {
    let mut mock = MockExecutor::new();

    mock.expect_spawn().returning(|tool, _| {
        Err(ToolError::NotFound {
            tool,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    });

    let client = DockerClient::with_executor(mock);
    let result = client.spawn_push(&image());

    assert!(matches!(result, Err(PushError::Spawn { .. })));
}
