mod common;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;
use fork_sync::config::GitHubConfig;
use fork_sync::{ForkSync, GitHubClient, RepositoryHost, RepositoryIdentity, SyncConfig, SyncError};

fn anonymous_client(server: &MockServer) -> GitHubClient {
    let config = GitHubConfig {
        api_url: Some(server.uri()),
        auth_method: "none".to_string(),
        ..GitHubConfig::default()
    };
    GitHubClient::new(&config).expect("client for mock server")
}

fn identity(owner: &str, name: &str) -> RepositoryIdentity {
    RepositoryIdentity {
        owner: owner.to_string(),
        name: name.to_string(),
    }
}

fn fork_body() -> serde_json::Value {
    json!({
        "id": 1,
        "name": "stream",
        "full_name": "me/stream",
        "fork": true,
        "default_branch": "main",
        "parent": {
            "id": 2,
            "name": "stream",
            "full_name": "up/stream",
            "clone_url": PARENT_CLONE_URL
        }
    })
}

#[tokio::test]
async fn test_get_repository_reads_fork_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/me/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fork_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    let info = client
        .get_repository(&identity("me", "stream"))
        .await
        .expect("repository metadata");

    assert_eq!(info, fork_info());
}

#[tokio::test]
async fn test_missing_repository_is_a_lookup_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/me/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest/repos/repos#get-a-repository"
        })))
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    let err = client
        .get_repository(&identity("me", "missing"))
        .await
        .unwrap_err();

    assert_eq!(err.repository, "me/missing");
    assert!(err.to_string().starts_with("failed to get repo info for me/missing"));
}

#[tokio::test]
async fn test_malformed_response_is_a_lookup_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/me/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "full_name": "me/stream" })))
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    assert!(client.get_repository(&identity("me", "stream")).await.is_err());
}

#[tokio::test]
async fn test_sync_against_mock_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/me/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fork_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    let git = RecordingGit::with_origin("https://github.com/me/stream.git");
    let config = SyncConfig::default();

    let mut out = Vec::new();
    let result = ForkSync::new(&config, &git, &client).run(&mut out).await;

    assert!(result.is_ok());
    assert_eq!(
        git.calls(),
        vec![
            "remote get-url origin",
            "remote add upstream https://github.com/up/stream.git",
            "fetch upstream",
            "merge upstream upstream/main",
            "push origin HEAD:main",
        ]
    );
}

#[tokio::test]
async fn test_sync_stops_on_non_fork_from_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/up/stream"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "full_name": "up/stream", "fork": false })),
        )
        .mount(&server)
        .await;

    let client = anonymous_client(&server);
    let git = RecordingGit::with_origin("git@github.com:up/stream.git");
    let config = SyncConfig::default();

    let mut out = Vec::new();
    let result = ForkSync::new(&config, &git, &client).run(&mut out).await;

    assert_matches!(result, Err(SyncError::NotAFork(_)));
    assert_eq!(git.calls().len(), 1);
}
