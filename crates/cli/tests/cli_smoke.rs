//! Offline smoke tests for the repolens binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn repolens() -> Command {
    let mut cmd = Command::cargo_bin("repolens").expect("binary builds");
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("REPOLENS_LLM_API_KEY")
        .env_remove("REPOLENS_LLM_BASE_URL")
        .env_remove("REPOLENS_LLM_MODEL");
    cmd
}

#[test]
fn help_lists_subcommands() {
    repolens()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("summarize"));
}

#[test]
fn missing_llm_api_key_is_a_startup_error() {
    repolens()
        .args(["summarize", "https://github.com/owner/repo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("REPOLENS_LLM_API_KEY"));
}

#[test]
fn malformed_repository_url_fails_without_network() {
    repolens()
        .env("REPOLENS_LLM_API_KEY", "test-key")
        .args(["summarize", "not-a-github-url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid repository URL"));
}
