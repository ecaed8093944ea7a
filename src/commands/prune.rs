use anyhow::Result;

use crate::git::Git;

use super::Workspace;

/// Drops stale worktree registrations via git's own prune.
///
/// # Errors
/// Returns an error if the prune fails.
pub fn run(git: &Git, workspace: &Workspace) -> Result<()> {
    git.worktree_prune(&workspace.root)?;
    println!("✓ Pruned stale worktree metadata");
    Ok(())
}
