//! Common test utilities and helpers for fork-sync tests
#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use std::sync::Mutex;

use fork_sync::error::{CommandFailure, LookupError};
use fork_sync::git::CommandOutput;
use fork_sync::github::ParentRepository;
use fork_sync::{CommandError, GitCommand, GitRunner, RepositoryHost, RepositoryIdentity, RepositoryInfo};

pub const PARENT_CLONE_URL: &str = "https://github.com/up/stream.git";

mock! {
    pub Host {}

    #[async_trait]
    impl RepositoryHost for Host {
        async fn get_repository(
            &self,
            identity: &RepositoryIdentity,
        ) -> Result<RepositoryInfo, LookupError>;
    }
}

/// Git runner that records every command and answers from a script
pub struct RecordingGit {
    origin_url: String,
    failures: Vec<(String, String)>,
    calls: Mutex<Vec<String>>,
}

impl RecordingGit {
    pub fn with_origin(origin_url: &str) -> Self {
        Self {
            origin_url: origin_url.to_string(),
            failures: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make every command whose arguments start with `prefix` fail, printing `output`
    pub fn failing(mut self, prefix: &str, output: &str) -> Self {
        self.failures.push((prefix.to_string(), output.to_string()));
        self
    }

    /// Commands run so far, as space-joined argument lists
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GitRunner for RecordingGit {
    async fn execute(&self, command: &GitCommand) -> Result<CommandOutput, CommandError> {
        let line = command.args.join(" ");
        self.calls.lock().unwrap().push(line.clone());

        if let Some((_, output)) = self
            .failures
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
        {
            return Err(CommandError {
                description: command.description.clone(),
                cause: CommandFailure::Exit { code: Some(1) },
                output: output.clone(),
            });
        }

        let stdout = if line == "remote get-url origin" {
            format!("{}\n", self.origin_url)
        } else {
            String::new()
        };

        Ok(CommandOutput {
            stdout,
            stderr: String::new(),
        })
    }
}

/// Metadata for `me/stream`, a fork of `up/stream`
pub fn fork_info() -> RepositoryInfo {
    RepositoryInfo {
        full_name: "me/stream".to_string(),
        fork: true,
        parent: Some(ParentRepository {
            full_name: "up/stream".to_string(),
            clone_url: PARENT_CLONE_URL.to_string(),
        }),
    }
}

/// A host mock that must be asked exactly once and answers with `info`
pub fn host_returning(info: RepositoryInfo) -> MockHost {
    let mut host = MockHost::new();
    host.expect_get_repository()
        .times(1)
        .returning(move |_| Ok(info.clone()));
    host
}

/// A host mock that must never be asked
pub fn untouched_host() -> MockHost {
    let mut host = MockHost::new();
    host.expect_get_repository().times(0);
    host
}

pub fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Assertion helper for printed output
pub fn assert_contains_all(text: &str, expected: &[&str]) {
    for item in expected {
        assert!(
            text.contains(item),
            "Expected text to contain '{}', but it didn't. Text: {}",
            item,
            text
        );
    }
}
