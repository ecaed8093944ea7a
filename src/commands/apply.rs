use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::args::ParsedArgs;
use crate::depot;
use crate::git::Git;

use super::Workspace;

/// How worktree changes are reconciled into the main repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    Merge,
    Rebase,
    Patch,
}

/// Collapses the mutually exclusive mode flags with fixed precedence
/// (patch > rebase > merge); merge is the default when none is set.
#[must_use]
pub fn resolve_mode(merge: bool, rebase: bool, patch: bool) -> ApplyMode {
    let _ = merge; // merge is the default either way
    if patch {
        ApplyMode::Patch
    } else if rebase {
        ApplyMode::Rebase
    } else {
        ApplyMode::Merge
    }
}

/// Reconciles a worktree's changes into the main repository.
///
/// `--switch` checks the worktree's branch out directly and short-circuits
/// every other mode. Merge and rebase carry committed history; patch also
/// carries staged and unstaged worktree edits, which is the only way to move
/// uncommitted work between the two checkouts.
///
/// # Errors
/// Returns an error if:
/// - No worktree name was given, or the worktree directory does not exist
/// - The main repository is dirty (switch, merge, and rebase modes)
/// - A git merge/rebase/checkout fails
/// - The patch is rejected by git
pub fn run(git: &Git, workspace: &Workspace, args: &ParsedArgs) -> Result<()> {
    let Some(name) = args.operand(0) else {
        anyhow::bail!(
            "missing worktree name\nusage: wtd apply <name> [--target <branch>] [--merge|--rebase|--patch|--switch] [--no-ff] [--message <text>]"
        );
    };
    let target = args.flag_str("target").unwrap_or("main");

    let worktree_path = depot::worktree_path(&workspace.depot, &workspace.root, name);
    if !worktree_path.exists() {
        anyhow::bail!(
            "no worktree named '{name}' at {}",
            worktree_path.display()
        );
    }

    // Pure ref reassignment; no merge machinery runs.
    if args.flag_bool("switch", false) {
        return switch_to(git, workspace, name, &worktree_path);
    }

    let mode = resolve_mode(
        args.flag_bool("merge", false),
        args.flag_bool("rebase", false),
        args.flag_bool("patch", false),
    );

    if mode != ApplyMode::Patch && !git.is_clean(&workspace.root)? {
        anyhow::bail!(
            "main repository at {} has uncommitted changes; commit or stash them first",
            workspace.root.display()
        );
    }

    // Where the worktree's history left the target; if the probe fails the
    // target itself serves as the diff base.
    let base_ref = git
        .merge_base(&workspace.root, target, name)
        .unwrap_or_else(|| target.to_string());

    if mode != ApplyMode::Patch && !git.is_clean(&worktree_path)? {
        eprintln!("⚠ Worktree '{name}' has uncommitted changes; they will not be included");
    }

    let previous_branch = git.current_branch(&workspace.root);

    git.checkout(&workspace.root, target)?;

    let outcome = match mode {
        ApplyMode::Merge => apply_merge(git, workspace, name, target, args.flag_bool("no-ff", false)),
        ApplyMode::Rebase => apply_rebase(git, workspace, &worktree_path, name, target),
        ApplyMode::Patch => apply_patch(
            git,
            workspace,
            &worktree_path,
            name,
            target,
            &base_ref,
            args.flag_str("message"),
        ),
    };

    // Best-effort: put the main checkout back where it was. A failure here
    // leaves the user on `target`, which beats aborting a finished apply.
    if let Some(previous) = previous_branch
        && previous != target
    {
        if let Err(e) = git.run_quiet(&workspace.root, &["checkout", &previous]) {
            eprintln!("⚠ Could not restore branch '{previous}': {e}");
        }
    }

    outcome
}

/// `--switch`: check the worktree's branch out directly in the main
/// repository.
fn switch_to(git: &Git, workspace: &Workspace, name: &str, worktree_path: &Path) -> Result<()> {
    if !git.is_clean(&workspace.root)? {
        eprintln!(
            "⚠ Repository at {} has uncommitted changes",
            workspace.root.display()
        );
        anyhow::bail!("aborting switch with dirty repo");
    }

    // A branch cannot be checked out in two places at once; release it from
    // the worktree first when it holds the ref.
    if git.current_branch(worktree_path).as_deref() == Some(name) {
        git.detach_head(worktree_path)?;
    }

    git.checkout(&workspace.root, name)?;
    println!("✓ Switched main repository to branch '{name}'");
    Ok(())
}

fn apply_merge(git: &Git, workspace: &Workspace, name: &str, target: &str, no_ff: bool) -> Result<()> {
    git.merge(&workspace.root, name, no_ff)
        .with_context(|| format!("failed to merge '{name}' into '{target}'"))?;
    println!("✓ Merged '{name}' into '{target}'");
    Ok(())
}

/// Rewrites the worktree's branch onto the target, then fast-forwards the
/// target onto it; `--ff-only` keeps a diverged rebase from silently turning
/// into a merge.
fn apply_rebase(
    git: &Git,
    workspace: &Workspace,
    worktree_path: &Path,
    name: &str,
    target: &str,
) -> Result<()> {
    git.checkout(worktree_path, name)?;
    git.rebase(worktree_path, target)
        .with_context(|| format!("failed to rebase '{name}' onto '{target}'"))?;
    git.merge_ff_only(&workspace.root, name)
        .with_context(|| format!("'{target}' could not fast-forward to rebased '{name}'"))?;
    println!("✓ Rebased '{name}' onto '{target}' and fast-forwarded");
    Ok(())
}

/// Builds the union of committed, staged, and unstaged worktree changes and
/// applies it into the main repository's index.
fn apply_patch(
    git: &Git,
    workspace: &Workspace,
    worktree_path: &Path,
    name: &str,
    target: &str,
    base_ref: &str,
    message: Option<&str>,
) -> Result<()> {
    let committed = git.diff_range(worktree_path, base_ref)?;
    let staged = git.diff_staged(worktree_path)?;
    let unstaged = git.diff_unstaged(worktree_path)?;

    let patch = [committed, staged, unstaged]
        .into_iter()
        .filter(|section| !section.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    if patch.trim().is_empty() {
        println!("No changes to apply from '{name}'");
        return Ok(());
    }

    let mut patch_file = tempfile::Builder::new()
        .prefix("wtd-")
        .suffix(".patch")
        .tempfile()
        .context("failed to create patch file")?;
    // git apply wants the file to end with exactly one newline
    patch_file.write_all(patch.trim_end().as_bytes())?;
    patch_file.write_all(b"\n")?;
    patch_file.flush()?;

    if let Err(err) = git.apply_index(&workspace.root, patch_file.path()) {
        let detail = err
            .stderr()
            .map_or_else(|| err.to_string(), str::to_string);
        anyhow::bail!("failed to apply patch from '{name}':\n{detail}");
    }

    match message {
        Some(message) => {
            git.commit(&workspace.root, message)?;
            println!("✓ Applied and committed changes from '{name}' on '{target}'");
        }
        None => {
            println!("✓ Applied changes from '{name}' to the index of '{target}'");
            println!("  Review with `git diff --cached`, then commit.");
        }
    }
    Ok(())
}
