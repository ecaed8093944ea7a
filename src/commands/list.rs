use anyhow::Result;

use crate::args::ParsedArgs;
use crate::git::Git;

use super::Workspace;

/// Prints git's native worktree listing for the resolved repository.
///
/// `--all` is accepted but resolves the same single root: the listing is
/// inherently repo-scoped, and no cross-repository aggregation happens.
///
/// # Errors
/// Returns an error if the listing fails.
pub fn run(git: &Git, workspace: &Workspace, args: &ParsedArgs) -> Result<()> {
    // Accepted for compatibility; scoping is identical either way.
    let _all = args.flag_bool("all", false);

    let listing = git.worktree_list(&workspace.root)?;
    if listing.is_empty() {
        println!("No worktrees found.");
    } else {
        println!("{listing}");
    }

    Ok(())
}
