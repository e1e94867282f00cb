use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const COMPOSE: &str = "version: '2'\nservices:\n  web:\n    build: .\n";

/// The binary with no release settings leaking in from the environment.
fn tagpush(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tagpush");
    cmd.current_dir(dir.path())
        .env_remove("DOCKERHUB_USER")
        .env_remove("DOCKERHUB_PASS")
        .env_remove("PROJECT_VERSION")
        .env_remove("DOCKER_COMPOSE_YML")
        .env_remove("TAGPUSH_OUTPUT");
    cmd
}

// ── Help / Version ──

#[test]
fn shows_help() {
    cargo_bin_cmd!("tagpush")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("docker-compose releases"));
}

#[test]
fn shows_version() {
    cargo_bin_cmd!("tagpush")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tagpush"));
}

#[test]
fn compose_help_lists_env_vars() {
    cargo_bin_cmd!("tagpush")
        .args(["compose", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DOCKERHUB_USER"))
        .stdout(predicate::str::contains("PROJECT_VERSION"));
}

// ── Compose ──

#[test]
fn compose_requires_registry_user() {
    let tmp = TempDir::new().unwrap();

    tagpush(&tmp)
        .args(["compose", "--version", "1.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DOCKERHUB_USER"));
}

#[test]
fn compose_requires_version() {
    let tmp = TempDir::new().unwrap();

    tagpush(&tmp)
        .args(["compose", "--registry-user", "acme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PROJECT_VERSION"));
}

#[test]
fn compose_reads_registry_user_from_config() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("tagpush.toml"), "[registry]\nuser = \"acme\"\n").unwrap();

    // gets past user resolution and fails on the version instead
    tagpush(&tmp)
        .args(["compose", "--version", "not-a-version"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid release version"));
}

#[test]
fn compose_rejects_invalid_version() {
    let tmp = TempDir::new().unwrap();

    tagpush(&tmp)
        .args(["compose", "--registry-user", "acme", "--version", "v1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid release version"));
}

#[test]
fn compose_refuses_to_overwrite_input() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("docker-compose.yml"), COMPOSE).unwrap();

    tagpush(&tmp)
        .args(["compose", "--registry-user", "acme", "--version", "1.0.0"])
        .args(["--output", "./docker-compose.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite"));

    let content = std::fs::read_to_string(tmp.path().join("docker-compose.yml")).unwrap();
    assert_eq!(content, COMPOSE);
}

#[test]
fn compose_output_from_env_is_checked_too() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("release.yml"), COMPOSE).unwrap();

    tagpush(&tmp)
        .env("DOCKER_COMPOSE_YML", "release.yml")
        .env("TAGPUSH_OUTPUT", "release.yml")
        .env("DOCKERHUB_USER", "acme")
        .env("PROJECT_VERSION", "1.0.0")
        .arg("compose")
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite"));
}

#[test]
fn compose_rejects_malformed_config() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("tagpush.toml"), "[registry\n").unwrap();

    tagpush(&tmp)
        .args(["compose", "--registry-user", "acme", "--version", "1.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

// ── Dockerfile ──

#[test]
fn dockerfile_requires_image() {
    let tmp = TempDir::new().unwrap();

    tagpush(&tmp)
        .args(["dockerfile", "--version", "1.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--image"));
}

#[test]
fn dockerfile_rejects_invalid_image() {
    let tmp = TempDir::new().unwrap();

    tagpush(&tmp)
        .args(["dockerfile", "--image", "just-a-name", "--version", "1.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid image"));
}

#[test]
fn dockerfile_requires_dockerfile() {
    let tmp = TempDir::new().unwrap();

    tagpush(&tmp)
        .args(["dockerfile", "--image", "acme/tool", "--version", "1.0.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no Dockerfile found"));
}

#[test]
fn dockerfile_push_requires_password() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("Dockerfile"), "FROM scratch\n").unwrap();

    tagpush(&tmp)
        .args(["dockerfile", "--image", "acme/tool", "--version", "1.0.0"])
        .arg("--dockerhub-release")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DOCKERHUB_PASS"));
}

#[test]
fn dotenv_supplies_settings() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join(".env"),
        "DOCKERHUB_USER=acme\nPROJECT_VERSION=bogus\n",
    )
    .unwrap();

    // user and version both come from .env; the version is then rejected
    tagpush(&tmp)
        .arg("compose")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid release version \"bogus\""));
}
