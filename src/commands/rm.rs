use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::args::ParsedArgs;
use crate::depot;
use crate::git::Git;

use super::Workspace;

/// Removes one named worktree, or with `--all` every worktree under this
/// repository's depot namespace.
///
/// The branch named after the worktree is deleted only when `--delete-branch`
/// was given and `--keep-branch` does not override it; by default branches
/// are preserved.
///
/// # Errors
/// Returns an error if:
/// - Neither a name nor `--all` was given
/// - A targeted worktree directory does not exist
/// - Git refuses a worktree removal
pub fn run(git: &Git, workspace: &Workspace, args: &ParsedArgs) -> Result<()> {
    let force = args.flag_bool("force", false);
    let delete_branch =
        args.flag_bool("delete-branch", false) && !args.flag_bool("keep-branch", false);

    if args.flag_bool("all", false) {
        // An explicit <name> alongside --all is ignored; --all wins.
        let names = depot_worktrees(git, workspace)?;
        if names.is_empty() {
            println!("No depot worktrees to remove.");
            return Ok(());
        }
        for name in names {
            remove_one(git, workspace, &name, force, delete_branch)?;
        }
        return Ok(());
    }

    let Some(name) = args.operand(0) else {
        anyhow::bail!(
            "missing worktree name (or pass --all)\nusage: wtd rm [<name>] [--all] [--force] [--delete-branch] [--keep-branch]"
        );
    };
    remove_one(git, workspace, name, force, delete_branch)
}

/// Worktree names under this repository's depot directory, discovered from
/// git's own porcelain listing.
///
/// The repository's own entry is excluded, entries outside the canonical
/// per-repo depot directory (other repositories sharing the depot) are
/// filtered out, duplicates dropped, and the survivors sorted so removal
/// order is deterministic.
fn depot_worktrees(git: &Git, workspace: &Workspace) -> Result<Vec<String>> {
    let listing = git.worktree_list_porcelain(&workspace.root)?;
    let root = canonical(&workspace.root);
    let repo_dir = canonical(&depot::repo_dir(&workspace.depot, &workspace.root));

    let mut names = Vec::new();
    for line in listing.lines() {
        let Some(reported) = line.strip_prefix("worktree ") else {
            continue;
        };
        let reported = canonical(Path::new(reported));
        if reported == root || !reported.starts_with(&repo_dir) {
            continue;
        }
        if let Some(name) = reported.file_name().and_then(|name| name.to_str()) {
            let name = name.to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Symlink-resolved form of a path, falling back to the input when it cannot
/// be canonicalized (e.g. it no longer exists).
fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn remove_one(
    git: &Git,
    workspace: &Workspace,
    name: &str,
    force: bool,
    delete_branch: bool,
) -> Result<()> {
    let worktree_path = depot::worktree_path(&workspace.depot, &workspace.root, name);
    if !worktree_path.exists() {
        anyhow::bail!(
            "no worktree named '{name}' at {}",
            worktree_path.display()
        );
    }

    println!("Removing worktree: {}", worktree_path.display());
    git.worktree_remove(&workspace.root, &worktree_path, force)?;

    // Directory removal is advisory cleanup; git already dropped the
    // registration above.
    if worktree_path.exists() {
        let _ = std::fs::remove_dir_all(&worktree_path);
    }

    if delete_branch {
        match git.branch_delete(&workspace.root, name) {
            Ok(()) => println!("✓ Deleted branch: {name}"),
            Err(e) => println!("⚠ Could not delete branch '{name}': {e}"),
        }
    }

    println!("✓ Worktree removed: {name}");
    Ok(())
}
