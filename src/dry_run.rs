//! Dry-run projection
//!
//! Shows the commands a sync would run without touching git or the network.
//! The parent's clone URL is not known without an API call, so a placeholder
//! stands in for it.

use std::io::{self, Write};

use crate::config::SyncConfig;

/// Upstream URL shown in place of the real parent clone URL
pub const PLACEHOLDER_UPSTREAM_URL: &str = "https://github.com/upstream/repo.git";

/// The lines a dry run prints, in order
pub fn project_dry_run(config: &SyncConfig, parent_clone_url: &str) -> Vec<String> {
    let push_flag = if config.force_push { " -f" } else { "" };

    vec![
        "Note: The following commands are examples. The actual upstream URL will be taken \
         from your fork's parent repository."
            .to_string(),
        "Dry run mode - commands that would be executed:".to_string(),
        format!("Would run: git remote add upstream {}", parent_clone_url),
        "Would run: git fetch upstream".to_string(),
        format!(
            "Would run: git {} {}",
            config.strategy().verb(),
            config.upstream_ref()
        ),
        format!(
            "Would run: git push{} origin HEAD:{}",
            push_flag, config.origin_branch
        ),
    ]
}

/// Write the dry-run projection to `out`
pub fn print_dry_run(
    config: &SyncConfig,
    parent_clone_url: &str,
    out: &mut dyn Write,
) -> io::Result<()> {
    for line in project_dry_run(config, parent_clone_url) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
