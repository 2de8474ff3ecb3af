mod common;

use assert_matches::assert_matches;
use tempfile::TempDir;

use common::git_available;
use fork_sync::config::GitConfig;
use fork_sync::error::CommandFailure;
use fork_sync::{parse_remote_url, GitClient, GitCommand, GitRunner, RepositoryIdentity};

async fn init_repository() -> (TempDir, GitClient) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let git = GitClient::new("git").in_dir(dir.path());
    git.run(&GitCommand::new(["init", "--quiet"], "initializing repository"))
        .await
        .expect("git init");
    (dir, git)
}

#[tokio::test]
async fn test_origin_identity_from_real_repository() {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return;
    }
    let (_dir, git) = init_repository().await;

    let cases = [
        ("https://github.com/owner/repo.git", "owner", "repo"),
        ("git@github.com:owner/repo.git", "owner", "repo"),
    ];

    for (url, owner, name) in cases {
        // Ignore failure when origin doesn't exist yet
        let _ = git.run(&GitCommand::remove_remote("origin")).await;
        git.run(&GitCommand::new(
            ["remote", "add", "origin", url],
            "adding origin remote",
        ))
        .await
        .expect("add origin");

        let output = git.execute(&GitCommand::origin_url()).await.expect("get-url");
        assert_eq!(
            parse_remote_url(&output.stdout),
            Ok(RepositoryIdentity {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            "url: {}",
            url
        );
    }
}

#[tokio::test]
async fn test_adding_upstream_twice_reports_existing_remote() {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return;
    }
    let (_dir, git) = init_repository().await;
    let add = GitCommand::add_upstream("https://github.com/up/stream.git");

    git.run(&add).await.expect("first add succeeds");
    let err = git.run(&add).await.unwrap_err();

    assert!(err.remote_already_exists(), "output: {}", err.output);
    assert_eq!(err.description, "adding upstream remote");
}

#[tokio::test]
async fn test_failed_command_carries_exit_code_and_output() {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return;
    }
    let (_dir, git) = init_repository().await;

    let err = git.run(&GitCommand::fetch_upstream()).await.unwrap_err();

    assert_matches!(err.cause, CommandFailure::Exit { code: Some(code) } if code != 0);
    assert!(err.output.contains("upstream"), "output: {}", err.output);
    assert!(err.to_string().starts_with("fetching upstream: exit status"));
}

#[tokio::test]
async fn test_locate_git() {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return;
    }

    let git = GitClient::locate(&GitConfig::default()).await.expect("git found");
    assert_eq!(git.binary().to_str(), Some("git"));

    let missing = GitConfig {
        binary: "/nonexistent/fork-sync/git".to_string(),
    };
    assert_matches!(
        GitClient::locate(&missing).await,
        Err(err) if matches!(err.cause, CommandFailure::Spawn(_))
    );
}
