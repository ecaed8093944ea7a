use anyhow::{Context, Result};

use crate::args::ParsedArgs;
use crate::depot;
use crate::git::Git;

use super::Workspace;

/// Creates a worktree under the depot, creating its branch when needed.
///
/// The branch defaults to the worktree name (`--branch` overrides); if it
/// already exists the worktree checks it out, otherwise the branch is created
/// from `base`. `--no-branch` skips branches entirely and checks out `base`
/// detached.
///
/// # Errors
/// Returns an error if:
/// - No worktree name was given
/// - The worktree path already exists
/// - Git refuses the worktree creation
pub fn run(git: &Git, workspace: &Workspace, args: &ParsedArgs) -> Result<()> {
    let Some(name) = args.operand(0) else {
        anyhow::bail!(
            "missing worktree name\nusage: wtd new <name> [base] [--branch <name>] [--no-branch]"
        );
    };
    let base = args.operand(1).unwrap_or("main");

    let worktree_path = depot::worktree_path(&workspace.depot, &workspace.root, name);
    if worktree_path.exists() {
        anyhow::bail!(
            "worktree already exists at {} (run `wtd rm {name}` first)",
            worktree_path.display()
        );
    }

    if let Some(parent) = worktree_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create depot directory: {}", parent.display()))?;
    }

    println!(
        "Creating worktree '{name}' at: {}",
        worktree_path.display()
    );

    let branch = args.flag_str("branch").unwrap_or(name);

    let checked_out = if args.flag_bool("no-branch", false) {
        git.worktree_add_detached(&workspace.root, &worktree_path, base)?;
        format!("{base} (detached)")
    } else if git.branch_exists(&workspace.root, branch) {
        git.worktree_add_existing(&workspace.root, &worktree_path, branch)?;
        branch.to_string()
    } else {
        println!("Creating new branch: {branch} (from {base})");
        git.worktree_add_new_branch(&workspace.root, &worktree_path, branch, base)?;
        branch.to_string()
    };

    println!("✓ Worktree created successfully!");
    println!("  Repo:   {}", workspace.root.display());
    println!("  Branch: {checked_out}");
    println!("  Path:   {}", worktree_path.display());

    Ok(())
}
